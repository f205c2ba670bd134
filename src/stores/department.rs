use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::api::types::{Department, ResourceResponse};
use crate::api::ApiClient;
use crate::error::ApiError;

const DEPARTMENT_LIST_ENDPOINT: &str = "api/departement/list";

#[derive(Clone)]
pub struct DepartmentStore {
    api: ApiClient,
    departments: Arc<RwLock<Vec<Department>>>,
}

impl DepartmentStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            departments: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Last fetched list; empty until [`get_departments`](Self::get_departments) succeeds.
    pub async fn departments(&self) -> Vec<Department> {
        self.departments.read().await.clone()
    }

    pub async fn get_departments(&self) -> Result<Vec<Department>, ApiError> {
        let response: ResourceResponse<Vec<Department>> = self
            .api
            .get(DEPARTMENT_LIST_ENDPOINT)
            .await
            .map_err(|e| {
                warn!("Fetching departments failed: {}", e);
                e
            })?;
        let departments = response.into_data()?;
        debug!("Fetched {} departments", departments.len());

        *self.departments.write().await = departments.clone();
        Ok(departments)
    }
}
