use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Request, Response};
use tracing::{debug, info, warn};

use super::middleware::{Middleware, Next, RequestContext};
use crate::error::ApiError;
use crate::router::{Navigator, LOGIN_PATH};
use crate::session::SessionState;

/// Attaches `Authorization: Bearer <token>` while a session token is held.
pub struct BearerAuth {
    session: SessionState,
}

impl BearerAuth {
    pub fn new(session: SessionState) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Middleware for BearerAuth {
    async fn handle(
        &self,
        mut req: Request,
        ctx: &mut RequestContext,
        next: Next<'_>,
    ) -> Result<Response, ApiError> {
        let token = self.session.token().await;
        if !token.is_empty() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    req.headers_mut().insert(AUTHORIZATION, value);
                }
                Err(_) => {
                    warn!(request_id = %ctx.request_id, "Session token is not a valid header value; sending request without it");
                }
            }
        }

        next.run(req, ctx).await
    }
}

/// Turns a rejected token into a forced logout.
///
/// When a call fails with 401, or with one of the known token messages, the
/// session is cleared and the navigator is sent to the login page with the
/// current path as `redirect`. The original error is always returned.
pub struct AuthFailureGuard {
    session: SessionState,
    navigator: Arc<dyn Navigator>,
}

impl AuthFailureGuard {
    pub fn new(session: SessionState, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    async fn force_logout(&self, ctx: &RequestContext) {
        warn!(request_id = %ctx.request_id, path = %ctx.path, "Authentication rejected by server, clearing session");
        self.session.clear_user().await;

        let current = self.navigator.current_path().await;
        if current != LOGIN_PATH {
            let location = format!("{}?redirect={}", LOGIN_PATH, current);
            info!("Redirecting to {}", location);
            self.navigator.assign(&location).await;
        }
    }
}

#[async_trait]
impl Middleware for AuthFailureGuard {
    async fn handle(
        &self,
        req: Request,
        ctx: &mut RequestContext,
        next: Next<'_>,
    ) -> Result<Response, ApiError> {
        let snapshot = ctx.clone();
        let result = next.run(req, ctx).await;

        let rejected = matches!(&result, Err(err) if err.is_auth_failure());
        if rejected {
            self.force_logout(&snapshot).await;
        }

        result
    }
}

/// Logs one line per request with its id, status and latency.
pub struct RequestTracing;

#[async_trait]
impl Middleware for RequestTracing {
    async fn handle(
        &self,
        req: Request,
        ctx: &mut RequestContext,
        next: Next<'_>,
    ) -> Result<Response, ApiError> {
        let snapshot = ctx.clone();
        debug!(request_id = %snapshot.request_id, method = %snapshot.method, path = %snapshot.path, "Sending request");

        let result = next.run(req, ctx).await;
        let elapsed_ms = snapshot.started_at.elapsed().as_millis() as u64;

        match &result {
            Ok(response) => {
                info!(
                    request_id = %snapshot.request_id,
                    method = %snapshot.method,
                    path = %snapshot.path,
                    status = response.status().as_u16(),
                    elapsed_ms,
                    "Request completed"
                );
            }
            Err(e) => {
                warn!(
                    request_id = %snapshot.request_id,
                    method = %snapshot.method,
                    path = %snapshot.path,
                    elapsed_ms,
                    "Request failed: {}", e
                );
            }
        }

        result
    }
}
