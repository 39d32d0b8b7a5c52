//! Write authorization.

use card_catalog_database::RecordStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Decides whether a sender may mutate the catalog.
///
/// Unknown identities are denied, and so is every identity when the store
/// cannot answer.
#[derive(Clone)]
pub struct AuthorizationGate {
    store: Arc<dyn RecordStore>,
}

impl AuthorizationGate {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn check_authorized(&self, identity: &str) -> bool {
        match self.store.is_authorized(identity).await {
            Ok(allowed) => {
                debug!(sender = %identity, allowed, "Authorization checked");
                allowed
            }
            Err(e) => {
                warn!(sender = %identity, error = %e, "Authorization check failed, denying");
                false
            }
        }
    }
}
