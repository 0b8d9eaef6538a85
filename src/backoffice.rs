//! Top-level handle wiring configuration, session and HTTP client together.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::auth::AuthService;
use crate::client::ApiClient;
use crate::config::BackofficeConfig;
use crate::controller::ListController;
use crate::endpoints::RestEndpoints;
use crate::entity::Entity;
use crate::error::Result;
use crate::session::Session;
use crate::storage::{CredentialStore, KeyringStore};

pub type RestController<T> = ListController<RestEndpoints<T>>;

#[derive(Debug, Clone)]
pub struct Backoffice {
    config: BackofficeConfig,
    client: ApiClient,
}

impl Backoffice {
    /// Restore the session from `store` and build the API client.
    pub fn new(config: BackofficeConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let session = Arc::new(Session::restore(store));
        let client = ApiClient::new(&config, session)?;
        info!(
            base_url = %config.base_url,
            signed_in = client.session().user().is_some(),
            "back-office client ready"
        );
        Ok(Self { config, client })
    }

    /// Environment configuration with credentials in the OS keyring.
    pub fn from_env() -> Result<Self> {
        Self::new(BackofficeConfig::from_env()?, Arc::new(KeyringStore))
    }

    pub fn config(&self) -> &BackofficeConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<Session> {
        self.client.session()
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.client.clone())
    }

    pub fn endpoints<T: Entity>(&self) -> RestEndpoints<T> {
        RestEndpoints::new(self.client.clone())
    }

    /// A list controller for `T` starting at page 1 with the configured
    /// page size. Nothing is fetched until `refresh`/`sync` is called.
    pub fn controller<T: Entity>(&self) -> RestController<T> {
        ListController::new(self.endpoints(), self.config.page_size)
    }

    /// A shared controller whose list follows query changes automatically,
    /// debounced by the configured search delay. Must be called inside a
    /// tokio runtime.
    pub fn live_controller<T: Entity>(&self) -> (Arc<RestController<T>>, JoinHandle<()>) {
        let controller = Arc::new(self.controller::<T>());
        let task = controller.spawn_auto_refresh(self.config.search_debounce);
        (controller, task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Category, Customer};
    use crate::session::tests::{jwt_with_exp, sample_user};
    use crate::session::AuthStatus;
    use crate::storage::{MemoryStore, KEY_ROLE, KEY_TOKEN, KEY_USER};

    fn config() -> BackofficeConfig {
        BackofficeConfig {
            page_size: 25,
            ..BackofficeConfig::default()
        }
        .with_base_url("pos.test/api/")
    }

    #[test]
    fn test_controller_uses_configured_page_size() {
        let backoffice = Backoffice::new(config(), Arc::new(MemoryStore::new())).unwrap();
        assert_eq!(backoffice.config().base_url, "https://pos.test/api");

        let customers = backoffice.controller::<Customer>();
        let query = customers.query();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 25);
        assert!(customers.snapshot().meta.is_none());

        let categories = backoffice.controller::<Category>();
        assert_eq!(categories.query().page_size, 25);
    }

    #[test]
    fn test_restores_persisted_session() {
        let store = Arc::new(MemoryStore::new());
        let user = sample_user();
        store
            .set(KEY_TOKEN, &jwt_with_exp(chrono::Utc::now().timestamp() + 600))
            .unwrap();
        store
            .set(KEY_USER, &serde_json::to_string(&user).unwrap())
            .unwrap();
        store.set(KEY_ROLE, &user.role).unwrap();

        let backoffice = Backoffice::new(config(), store).unwrap();
        assert_eq!(backoffice.session().status(), AuthStatus::SignedIn);
        assert!(backoffice.session().is_authenticated());

        backoffice.auth().logout();
        assert_eq!(backoffice.session().status(), AuthStatus::SignedOut);
    }

    #[tokio::test]
    async fn test_live_controller_task_is_abortable() {
        let backoffice = Backoffice::new(config(), Arc::new(MemoryStore::new())).unwrap();
        let (controller, task) = backoffice.live_controller::<Customer>();
        assert_eq!(controller.query().page_size, 25);
        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
    }
}
