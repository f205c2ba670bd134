pub mod api;
pub mod config;
pub mod error;
pub mod router;
pub mod session;
pub mod stores;

use std::sync::Arc;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use api::{ApiClient, AuthFailureGuard, BearerAuth, RequestTracing};
pub use router::{Navigator, Router};
pub use session::{FileStorage, MemoryStorage, Session, SessionState, SessionStorage};
pub use stores::{AuthStore, DepartmentStore, EmployeeStore, JobPositionStore};

/// Builds the client with the standard pipeline: tracing, bearer token,
/// then forced logout on rejected tokens.
pub fn build_api_client(
    config: &config::ApiConfig,
    session: &SessionState,
    navigator: Arc<dyn Navigator>,
) -> std::result::Result<ApiClient, error::ApiError> {
    ApiClient::builder(config)
        .with(RequestTracing)
        .with(BearerAuth::new(session.clone()))
        .with(AuthFailureGuard::new(session.clone(), navigator))
        .build()
}

/// Every component of the dashboard core, wired to one shared session.
#[derive(Clone)]
pub struct App {
    pub config: Arc<Settings>,
    pub session: SessionState,
    pub router: Arc<Router>,
    pub api: ApiClient,
    pub auth: AuthStore,
    pub employees: EmployeeStore,
    pub departments: DepartmentStore,
    pub job_positions: JobPositionStore,
}

impl App {
    pub fn new(config: Settings) -> Result<Self> {
        let storage: Arc<dyn SessionStorage> = match &config.session.storage_path {
            Some(path) => Arc::new(FileStorage::new(path)),
            None => Arc::new(MemoryStorage::default()),
        };

        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: Settings, storage: Arc<dyn SessionStorage>) -> Result<Self> {
        let session = SessionState::restore(storage);
        let router = Arc::new(Router::new(session.clone()));
        let api = build_api_client(&config.api, &session, router.clone())?;

        Ok(Self {
            config: Arc::new(config),
            auth: AuthStore::new(api.clone(), session.clone()),
            employees: EmployeeStore::new(api.clone()),
            departments: DepartmentStore::new(api.clone()),
            job_positions: JobPositionStore::new(api.clone()),
            session,
            router,
            api,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_app_creation() {
        let config = Settings::new_for_test().expect("Failed to load test config");
        let app = App::new(config).expect("Failed to build app");

        assert!(!app.auth.is_authenticated().await);
        assert_eq!(app.api.base_url().as_str(), "http://127.0.0.1:8000/");
        assert_eq!(app.router.current_path().await, "/");
    }

    #[tokio::test]
    async fn test_app_creation_with_invalid_base_url() {
        let mut config = Settings::new_for_test().expect("Failed to load test config");
        config.api.base_url = "not a url".into();

        let app = App::new(config);
        assert!(app.is_err());
        if let Err(e) = app {
            assert!(matches!(e, AppError::ApiError(_)));
        }
    }

    #[tokio::test]
    async fn test_app_shares_one_session() {
        let storage = Arc::new(MemoryStorage::default());
        storage
            .save(&Session {
                token: "T1".into(),
                ..Default::default()
            })
            .unwrap();

        let config = Settings::new_for_test().expect("Failed to load test config");
        let app = App::with_storage(config, storage).expect("Failed to build app");

        assert!(app.session.is_authenticated().await);
        app.auth.clear_user().await;
        assert!(!app.session.is_authenticated().await);
    }
}
