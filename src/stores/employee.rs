use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::api::types::{Employee, EmployeePage, EmployeePayload, Filters, ResourceResponse};
use crate::api::ApiClient;
use crate::error::ApiError;

const EMPLOYEE_ENDPOINT: &str = "api/employee";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub total: u64,
    pub total_page: u32,
}

#[derive(Debug, Clone, Default)]
struct EmployeeState {
    employees: Vec<Employee>,
    meta: PageMeta,
}

/// Employee list and CRUD actions.
#[derive(Clone)]
pub struct EmployeeStore {
    api: ApiClient,
    state: Arc<RwLock<EmployeeState>>,
}

impl EmployeeStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(EmployeeState::default())),
        }
    }

    pub async fn employees(&self) -> Vec<Employee> {
        self.state.read().await.employees.clone()
    }

    pub async fn meta(&self) -> PageMeta {
        self.state.read().await.meta
    }

    /// Fetches one page. `page` is zero-based.
    pub async fn get_employees(
        &self,
        page: u32,
        limit: u32,
        search: &str,
    ) -> Result<EmployeePage, ApiError> {
        let filters = Filters {
            page,
            limit,
            search: search.to_string(),
        };
        let response: ResourceResponse<EmployeePage> = self
            .api
            .get_with_query(EMPLOYEE_ENDPOINT, &filters.query())
            .await
            .map_err(|e| {
                warn!("Fetching employees failed: {}", e);
                e
            })?;
        let page = response.into_data()?;

        let mut state = self.state.write().await;
        state.employees = page.list.clone();
        state.meta = PageMeta {
            total: page.total,
            total_page: page.total_page,
        };

        Ok(page)
    }

    pub async fn add_employee(
        &self,
        payload: &EmployeePayload,
    ) -> Result<ResourceResponse<Value>, ApiError> {
        let response = self.api.post(EMPLOYEE_ENDPOINT, payload).await.map_err(|e| {
            warn!("Adding employee {} failed: {}", payload.email, e);
            e
        })?;
        info!("Added employee {}", payload.email);
        Ok(response)
    }

    pub async fn update_employee(
        &self,
        payload: &EmployeePayload,
    ) -> Result<ResourceResponse<Value>, ApiError> {
        let response = self.api.put(EMPLOYEE_ENDPOINT, payload).await.map_err(|e| {
            warn!("Updating employee {:?} failed: {}", payload.id, e);
            e
        })?;
        info!("Updated employee {:?}", payload.id);
        Ok(response)
    }

    pub async fn delete_employee(&self, id: i64) -> Result<ResourceResponse<Value>, ApiError> {
        let response = self
            .api
            .delete(EMPLOYEE_ENDPOINT, &json!({ "id": id }))
            .await
            .map_err(|e| {
                warn!("Deleting employee {} failed: {}", id, e);
                e
            })?;
        info!("Deleted employee {}", id);
        Ok(response)
    }
}
