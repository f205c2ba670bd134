use serde_json::Value;
use tracing::{error, info, warn};

use crate::api::types::{AuthLoginReturn, LoginRequest, ResourceResponse, UserData};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::session::SessionState;

const LOGIN_ENDPOINT: &str = "api/auth/login";
const LOGOUT_ENDPOINT: &str = "api/auth/logout";

/// Login/logout actions over the shared session.
#[derive(Clone)]
pub struct AuthStore {
    api: ApiClient,
    session: SessionState,
}

impl AuthStore {
    pub fn new(api: ApiClient, session: SessionState) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.is_authenticated().await
    }

    pub async fn user(&self) -> Option<UserData> {
        self.session.user().await
    }

    pub async fn token(&self) -> String {
        self.session.token().await
    }

    /// Signs in and returns the server's response as received.
    ///
    /// Failures are returned untouched and leave the session as it was.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ResourceResponse<AuthLoginReturn>, ApiError> {
        info!("Received login request for email: {}", email);

        let response: ResourceResponse<AuthLoginReturn> = match self
            .api
            .post(LOGIN_ENDPOINT, &LoginRequest { email, password })
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Login failed for email: {}: {}", email, e);
                return Err(e);
            }
        };

        let login = response.data.as_ref().ok_or(ApiError::MissingData)?;
        self.session.sign_in(login).await;
        info!("Login successful for email: {}", email);

        Ok(response)
    }

    /// Calls the logout endpoint and clears the session.
    ///
    /// The session is cleared even when the endpoint call fails; the failure
    /// is still returned.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.api.post_empty::<Value>(LOGOUT_ENDPOINT).await;
        self.clear_user().await;

        match result {
            Ok(_) => {
                info!("Successfully logged out");
                Ok(())
            }
            Err(e) => {
                warn!("Logout endpoint failed, session cleared locally: {}", e);
                Err(e)
            }
        }
    }

    pub async fn clear_user(&self) {
        self.session.clear_user().await;
    }
}
