use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::middleware::{Middleware, Next, RequestContext};
use crate::config::ApiConfig;
use crate::error::ApiError;

/// HTTP client for the dashboard API.
///
/// Cheap to clone; clones share the connection pool and middleware stack.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    middleware: Arc<[Arc<dyn Middleware>]>,
}

impl ApiClient {
    pub fn builder(config: &ApiConfig) -> ApiClientBuilder {
        ApiClientBuilder {
            config: config.clone(),
            middleware: Vec::new(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.call(Method::GET, path, |req| req).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.call(Method::GET, path, |req| req.query(query)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(Method::POST, path, |req| req.json(body)).await
    }

    /// POST without a request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.call(Method::POST, path, |req| req).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(Method::PUT, path, |req| req.json(body)).await
    }

    /// DELETE with a JSON body; the API takes the id in the body, not the path.
    pub async fn delete<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(Method::DELETE, path, |req| req.json(body)).await
    }

    async fn call<T, F>(&self, method: Method, path: &str, build: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = self.base_url.join(path)?;
        let request = build(self.http.request(method, url)).build()?;
        let response = self.execute(request).await?;

        let bytes = response.bytes().await?;
        // An empty body decodes as JSON `null`.
        let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Runs an already built request through the middleware stack.
    pub async fn execute(&self, request: reqwest::Request) -> Result<Response, ApiError> {
        let mut ctx = RequestContext::new(&request);
        Next::new(&self.http, &self.middleware)
            .run(request, &mut ctx)
            .await
    }
}

pub struct ApiClientBuilder {
    config: ApiConfig,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl ApiClientBuilder {
    /// Appends a stage. Stages run in the order they are added on the way
    /// out, and in reverse on the way back.
    pub fn with<M: Middleware>(mut self, middleware: M) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(self.config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        Ok(ApiClient {
            http,
            base_url: normalize_base_url(&self.config.base_url)?,
            middleware: self.middleware.into(),
        })
    }
}

/// Ensures a trailing slash so relative joins append instead of replacing
/// the last path segment.
fn normalize_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
