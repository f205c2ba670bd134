//! Request/response pipeline.
//!
//! Every call made through [`ApiClient`](super::ApiClient) runs through an
//! ordered list of [`Middleware`] stages. A stage receives the outgoing
//! request, the per-request [`RequestContext`] and a [`Next`] continuation;
//! it may rewrite the request before calling `next.run(..)` and inspect or
//! act on the result afterwards. The last stage is the transport itself.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::future::BoxFuture;
use reqwest::{Client, Method, Request, Response};
use uuid::Uuid;

use crate::error::{ApiError, ErrorEnvelope};

/// Per-request data shared by every stage of the pipeline.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub method: Method,
    pub path: String,
    pub started_at: Instant,
}

impl RequestContext {
    pub fn new(request: &Request) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            method: request.method().clone(),
            path: request.url().path().to_string(),
            started_at: Instant::now(),
        }
    }
}

#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    async fn handle(
        &self,
        req: Request,
        ctx: &mut RequestContext,
        next: Next<'_>,
    ) -> Result<Response, ApiError>;
}

/// Continuation over the stages that have not run yet.
#[derive(Clone)]
pub struct Next<'a> {
    client: &'a Client,
    middleware: &'a [Arc<dyn Middleware>],
}

impl<'a> Next<'a> {
    pub(crate) fn new(client: &'a Client, middleware: &'a [Arc<dyn Middleware>]) -> Self {
        Self { client, middleware }
    }

    pub fn run(
        mut self,
        req: Request,
        ctx: &'a mut RequestContext,
    ) -> BoxFuture<'a, Result<Response, ApiError>> {
        if let Some((current, rest)) = self.middleware.split_first() {
            self.middleware = rest;
            current.handle(req, ctx, self)
        } else {
            Box::pin(send(self.client, req))
        }
    }
}

/// Innermost stage: performs the request and turns any non-2xx status into
/// [`ApiError::Status`] carrying the server's error body.
async fn send(client: &Client, req: Request) -> Result<Response, ApiError> {
    let response = client.execute(req).await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await?;
    Err(ApiError::Status {
        status,
        envelope: ErrorEnvelope::from_body(&body),
    })
}
