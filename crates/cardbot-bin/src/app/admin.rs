//! Operator subcommands (authorize, authorized, lookup).

use crate::app::BotState;
use card_command_dispatch::{render, Command};
use cardbot_config_and_utils::{Config, Paths};
use tracing::info;

/// Add an identity to the authorization set.
pub async fn authorize(
    config: Config,
    paths: Paths,
    identity: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = BotState::open(config, paths).await?;

    if state.catalog.grant_authorization(identity).await? {
        info!(identity = %identity, "Identity authorized");
        println!("Authorized {}", identity);
    } else {
        println!("{} is already authorized", identity);
    }

    Ok(())
}

/// Print every identity allowed to add and update cards.
pub async fn list_authorized(
    config: Config,
    paths: Paths,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = BotState::open(config, paths).await?;
    let senders = state.catalog.authorized_senders().await?;

    if senders.is_empty() {
        println!("No authorized identities");
    }
    for sender in senders {
        println!("{}\t{}", sender.identity, sender.added_at.to_rfc3339());
    }

    Ok(())
}

/// Print the reply the bot would give to `!<name>`.
pub async fn lookup(
    config: Config,
    paths: Paths,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = BotState::open(config, paths).await?;
    println!("{}", lookup_reply(&state, name).await);
    Ok(())
}

async fn lookup_reply(state: &BotState, name: &str) -> String {
    // Operator lookups are not routed through the dispatcher, so there is no sender.
    let reply = state
        .service
        .execute(Command::Lookup(name.to_string()), "")
        .await;
    if reply == render::NOT_FOUND {
        info!(name = %name, "Operator lookup missed");
    }
    reply
}
