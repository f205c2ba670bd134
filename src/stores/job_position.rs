use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::api::types::{JobPosition, ResourceResponse};
use crate::api::ApiClient;
use crate::error::ApiError;

const POSITION_LIST_ENDPOINT: &str = "api/position/list";

#[derive(Clone)]
pub struct JobPositionStore {
    api: ApiClient,
    job_positions: Arc<RwLock<Vec<JobPosition>>>,
}

impl JobPositionStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            job_positions: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn job_positions(&self) -> Vec<JobPosition> {
        self.job_positions.read().await.clone()
    }

    pub async fn get_job_positions(&self) -> Result<Vec<JobPosition>, ApiError> {
        let response: ResourceResponse<Vec<JobPosition>> = self
            .api
            .get(POSITION_LIST_ENDPOINT)
            .await
            .map_err(|e| {
                warn!("Fetching job positions failed: {}", e);
                e
            })?;
        let job_positions = response.into_data()?;
        debug!("Fetched {} job positions", job_positions.len());

        *self.job_positions.write().await = job_positions.clone();
        Ok(job_positions)
    }
}
