//! Cardbot - chat-driven card catalog lookup and moderation bot.

mod app;

use std::path::PathBuf;

use cardbot_config_and_utils::{init_logging, init_logging_for_service, Config, Paths};
use clap::{Parser, Subcommand};

/// Cardbot command-line interface.
#[derive(Parser)]
#[command(name = "cardbot")]
#[command(about = "Card catalog bot for a messaging bridge")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Base directory for runtime files (socket, database, logs, config). Defaults to ~/.cardbot
    #[arg(long, global = true, env = "CARDBOT_BASE_DIR")]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot and listen for the messaging bridge
    Start,
    /// Allow an identity to add and update cards
    Authorize {
        /// Sender identity, e.g. 5511999999999@s.whatsapp.net
        identity: String,
    },
    /// List identities allowed to add and update cards
    Authorized,
    /// Print a card the way the bot would reply
    Lookup {
        /// Portuguese or English card name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    let config = Config::load(&paths)?;
    let level = cli.log_level.unwrap_or_else(|| config.log_level.clone());
    let log_path = Some(paths.log_file());

    match cli.command {
        Some(Commands::Start) | None => {
            init_logging(&level, log_path);
            app::run_bot(config, paths).await?;
        }
        Some(Commands::Authorize { identity }) => {
            init_logging_for_service("cardbot-admin", &level, log_path);
            app::authorize(config, paths, &identity).await?;
        }
        Some(Commands::Authorized) => {
            init_logging_for_service("cardbot-admin", &level, log_path);
            app::list_authorized(config, paths).await?;
        }
        Some(Commands::Lookup { name }) => {
            init_logging_for_service("cardbot-admin", &level, log_path);
            app::lookup(config, paths, &name).await?;
        }
    }

    Ok(())
}
