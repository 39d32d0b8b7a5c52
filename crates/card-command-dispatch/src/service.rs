//! Catalog business logic: lookup, insert and update.

use crate::auth_gate::AuthorizationGate;
use crate::command::{CardArgs, Command, MutationKind};
use crate::render;
use crate::{CatalogError, CatalogResult};
use card_catalog_database::{CardFields, CardRecord, RecordStore, StoreError};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Business logic over the record store.
///
/// Holds no cached records; every call goes to the store.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn RecordStore>,
    gate: AuthorizationGate,
}

impl CatalogService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let gate = AuthorizationGate::new(store.clone());
        Self { store, gate }
    }

    /// Find a card by PT or EN name.
    ///
    /// Store faults are logged and reported as a miss.
    pub async fn lookup(&self, name: &str) -> Option<CardRecord> {
        if name.is_empty() {
            return None;
        }

        match self.store.get_by_either(name).await {
            Ok(card) => card,
            Err(e) => {
                warn!(name = %name, error = %e, "Lookup failed, reporting not found");
                None
            }
        }
    }

    pub async fn insert(&self, args: CardArgs, requester: &str) -> CatalogResult<CardRecord> {
        self.authorize(requester).await?;
        let fields = into_fields(args)?;
        Ok(self.store.insert(fields).await?)
    }

    /// Overwrite every field except the key. The key is never renamed.
    pub async fn update(&self, args: CardArgs, requester: &str) -> CatalogResult<CardRecord> {
        self.authorize(requester).await?;
        let fields = into_fields(args)?;
        Ok(self.store.update(fields).await?)
    }

    /// Run a command to completion and produce its single reply.
    pub async fn execute(&self, command: Command, requester: &str) -> String {
        match command {
            Command::Lookup(name) => match self.lookup(&name).await {
                Some(card) => render::render_card(&card),
                None => {
                    debug!(name = %name, "Card not found");
                    render::NOT_FOUND.to_string()
                }
            },
            Command::Mutate { kind, args } => {
                let result = match kind {
                    MutationKind::Insert => self.insert(args, requester).await,
                    MutationKind::Update => self.update(args, requester).await,
                };
                mutation_reply(kind, requester, result)
            }
        }
    }

    async fn authorize(&self, requester: &str) -> CatalogResult<()> {
        if self.gate.check_authorized(requester).await {
            Ok(())
        } else {
            Err(CatalogError::Unauthorized(requester.to_string()))
        }
    }
}

fn into_fields(args: CardArgs) -> CatalogResult<CardFields> {
    let name_pt = args
        .name_pt
        .ok_or_else(|| StoreError::InvalidRecord("name_pt must not be empty".to_string()))?;

    Ok(CardFields {
        name_pt,
        name_en: args.name_en,
        cost: args.cost,
        power: args.power,
        ability: args.ability,
        availability: args.availability,
        image_url: args.image_url,
    })
}

fn mutation_reply(
    kind: MutationKind,
    requester: &str,
    result: CatalogResult<CardRecord>,
) -> String {
    match result {
        Ok(card) => {
            info!(sender = %requester, name_pt = %card.name_pt, intent = ?kind, "Catalog updated");
            match kind {
                MutationKind::Insert => render::INSERTED.to_string(),
                MutationKind::Update => render::UPDATED.to_string(),
            }
        }
        Err(CatalogError::Unauthorized(_)) => {
            info!(sender = %requester, intent = ?kind, "Unauthorized mutation rejected");
            match kind {
                MutationKind::Insert => render::INSERT_DENIED.to_string(),
                MutationKind::Update => render::UPDATE_DENIED.to_string(),
            }
        }
        Err(CatalogError::Store(e)) => {
            match &e {
                StoreError::DuplicateKey(_)
                | StoreError::NotFound(_)
                | StoreError::InvalidRecord(_) => {
                    info!(sender = %requester, intent = ?kind, reason = %e, "Mutation refused");
                }
                _ => warn!(sender = %requester, intent = ?kind, error = %e, "Mutation failed"),
            }
            render::write_error(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse;
    use crate::test_support::{BrokenWritesStore, FailingStore};
    use card_catalog_database::{AsyncDatabase, CardCatalog};

    const ADMIN: &str = "admin@s.whatsapp.net";
    const GUEST: &str = "guest@s.whatsapp.net";

    async fn service() -> (CatalogService, CardCatalog) {
        let catalog = CardCatalog::new(AsyncDatabase::open_in_memory().await.unwrap());
        catalog.grant_authorization(ADMIN).await.unwrap();
        (CatalogService::new(Arc::new(catalog.clone())), catalog)
    }

    async fn run(service: &CatalogService, text: &str, sender: &str) -> String {
        service.execute(parse(text).unwrap(), sender).await
    }

    #[tokio::test]
    async fn test_insert_then_lookup_by_both_names() {
        let (service, _) = service().await;

        let reply = run(&service, "!addcarta Homem-Aranha Spider-Man 2 3 Swing Comum url.png", ADMIN).await;
        assert_eq!(reply, render::INSERTED);

        let by_en = run(&service, "!Spider-Man", GUEST).await;
        assert!(by_en.contains("Nome PT: Homem-Aranha"));
        assert!(by_en.contains("Imagem: url.png"));
        assert_eq!(by_en, run(&service, "!Homem-Aranha", GUEST).await);
    }

    #[tokio::test]
    async fn test_duplicate_insert_keeps_original() {
        let (service, catalog) = service().await;
        run(&service, "!addcarta Thor Thor 4 5 Raio Comum thor.png", ADMIN).await;

        let reply = run(&service, "!addcarta Thor Other 9 9 X Y Z", ADMIN).await;
        assert_eq!(reply, "Erro: Card already exists: Thor");

        let thor = catalog.get("Thor").await.unwrap().unwrap();
        assert_eq!(thor.cost, Some(4));
        assert_eq!(thor.name_en.as_deref(), Some("Thor"));
    }

    #[tokio::test]
    async fn test_update_missing_card_is_not_found() {
        let (service, catalog) = service().await;

        let reply = run(&service, "!attcarta Ghost Ghost 1 1 A B C", ADMIN).await;
        assert_eq!(reply, "Erro: Card not found: Ghost");
        assert!(catalog.get("Ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_overwrites_every_field_but_the_key() {
        let (service, catalog) = service().await;
        run(&service, "!addcarta Thor Thor 4 5 Raio Comum thor.png", ADMIN).await;

        let reply = run(&service, "!attcarta Thor Thunder 6", ADMIN).await;
        assert_eq!(reply, render::UPDATED);

        let thor = catalog.get("Thor").await.unwrap().unwrap();
        assert_eq!(thor.name_pt, "Thor");
        assert_eq!(thor.name_en.as_deref(), Some("Thunder"));
        assert_eq!(thor.cost, Some(6));
        assert_eq!(thor.power, None);
        assert_eq!(thor.ability, None);
        assert_eq!(thor.availability, None);
        assert_eq!(thor.image_url, None);
    }

    #[tokio::test]
    async fn test_unauthorized_mutations_never_touch_store() {
        let (service, catalog) = service().await;

        let insert = run(&service, "!addcarta X Y 1 1 A B C", GUEST).await;
        assert_eq!(insert, render::INSERT_DENIED);

        let update = run(&service, "!attcarta X Y 1 1 A B C", GUEST).await;
        assert_eq!(update, render::UPDATE_DENIED);

        let count = catalog
            .database()
            .call(|conn| card_catalog_database::queries::count_cards(conn))
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_authorization_checked_before_validation() {
        let (service, _) = service().await;

        assert_eq!(run(&service, "!addcarta", GUEST).await, render::INSERT_DENIED);
        assert_eq!(
            run(&service, "!addcarta", ADMIN).await,
            "Erro: Invalid card: name_pt must not be empty"
        );
    }

    #[tokio::test]
    async fn test_non_numeric_cost_is_stored_as_null() {
        let (service, catalog) = service().await;
        run(&service, "!addcarta Loki Loki abc 3x A B C", ADMIN).await;

        let loki = catalog.get("Loki").await.unwrap().unwrap();
        assert_eq!(loki.cost, None);
        assert_eq!(loki.power, Some(3));
    }

    #[tokio::test]
    async fn test_lookup_miss_and_empty_name() {
        let (service, _) = service().await;

        assert_eq!(run(&service, "!NonExistentCard", GUEST).await, render::NOT_FOUND);
        assert_eq!(run(&service, "!", GUEST).await, render::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_store_faults_split_by_path() {
        let service = CatalogService::new(Arc::new(FailingStore));

        // Read path hides the fault; write path is denied since auth fails closed.
        assert_eq!(run(&service, "!Thor", GUEST).await, render::NOT_FOUND);
        assert_eq!(
            run(&service, "!addcarta Thor Thor 1 1 A B C", ADMIN).await,
            render::INSERT_DENIED
        );
    }

    #[tokio::test]
    async fn test_write_fault_is_shown_to_requester() {
        let service = CatalogService::new(Arc::new(BrokenWritesStore));

        assert_eq!(
            run(&service, "!attcarta Thor Thor 1 1 A B C", ADMIN).await,
            "Erro: Connection error: database is locked"
        );
    }
}
