//! ServeRest API client.
//!
//! Thin per-endpoint wrappers over one shared `reqwest::Client`. Every call is
//! a single request: no retries, no backoff, no timeout beyond the HTTP
//! client's default. Each exchange is logged and returned as an
//! [`ApiResponse`] whatever its status, so tests decide what counts as
//! success.
//!
//! # Endpoints
//!
//! ```text
//! POST   /login                       - Login
//! GET    /usuarios[?filters]          - Users::search
//! POST   /usuarios                    - Users::create
//! GET    /usuarios/{id}               - Users::get
//! PUT    /usuarios/{id}               - Users::update
//! DELETE /usuarios/{id}               - Users::delete
//! GET    /produtos[?filters]          - Products::search
//! POST   /produtos                    - Products::create (admin token)
//! GET    /produtos/{id}               - Products::get
//! PUT    /produtos/{id}               - Products::update (admin token)
//! DELETE /produtos/{id}               - Products::delete (admin token)
//! GET    /carrinhos[?filters]         - Carts::search
//! POST   /carrinhos                   - Carts::create (token)
//! GET    /carrinhos/{id}              - Carts::get
//! DELETE /carrinhos/concluir-compra   - Carts::checkout (token)
//! DELETE /carrinhos/cancelar-compra   - Carts::cancel (token)
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod carts;
pub mod config;
mod error;
pub mod filter;
mod login;
mod products;
mod request;
mod users;

pub use carts::Carts;
pub use config::{ApiConfig, ConfigError, DataLimits};
pub use error::ClientError;
pub use filter::{CartFilter, ProductFilter, QueryFilter, UserFilter};
pub use login::Login;
pub use products::Products;
pub use request::ApiResponse;
pub use users::Users;

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use serverest_core::AuthToken;
use tracing::{debug, info, instrument};
use url::Url;

/// Client for one ServeRest deployment.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ServeRestClient {
    inner: Arc<ServeRestClientInner>,
}

struct ServeRestClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ServeRestClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if `base_url` cannot carry a path or the HTTP client
    /// fails to build.
    pub fn new(base_url: Url) -> Result<Self, ClientError> {
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ServeRestClientInner { client, base_url }),
        })
    }

    /// Create a client from the suite configuration.
    ///
    /// # Errors
    ///
    /// See [`ServeRestClient::new`].
    pub fn from_config(config: &ApiConfig) -> Result<Self, ClientError> {
        Self::new(config.base_url.clone())
    }

    /// The API root this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Users endpoints.
    #[must_use]
    pub const fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    /// Products endpoints.
    #[must_use]
    pub const fn products(&self) -> Products<'_> {
        Products::new(self)
    }

    /// Carts endpoints.
    #[must_use]
    pub const fn carts(&self) -> Carts<'_> {
        Carts::new(self)
    }

    /// Login endpoint.
    #[must_use]
    pub const fn login(&self) -> Login<'_> {
        Login::new(self)
    }

    /// Build the URL for `segments` below the API root.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue a request without a body.
    pub(crate) async fn execute(
        &self,
        method: Method,
        url: Url,
        token: Option<&AuthToken>,
    ) -> Result<ApiResponse, ClientError> {
        self.send(method, url, None, token).await
    }

    /// Issue a request with a JSON body.
    pub(crate) async fn execute_json<B: Serialize + Sync>(
        &self,
        method: Method,
        url: Url,
        body: &B,
        token: Option<&AuthToken>,
    ) -> Result<ApiResponse, ClientError> {
        let payload = serde_json::to_string(body)?;
        self.send(method, url, Some(payload), token).await
    }

    /// Send one request, logging both directions.
    #[instrument(skip_all, fields(method = %method, url = %url))]
    async fn send(
        &self,
        method: Method,
        url: Url,
        payload: Option<String>,
        token: Option<&AuthToken>,
    ) -> Result<ApiResponse, ClientError> {
        let mut builder = self.inner.client.request(method.clone(), url.clone());
        if let Some(token) = token {
            let value = HeaderValue::from_str(token.expose())
                .map_err(|_| ClientError::InvalidHeader("Authorization"))?;
            builder = builder.header(AUTHORIZATION, value);
        }
        if let Some(payload) = &payload {
            builder = builder.body(payload.clone());
        }

        let outgoing = builder.build()?;
        info!("HTTP {method} Request: {url}");
        debug!(
            headers = %request::redacted_headers(outgoing.headers()),
            "Request headers"
        );
        if let Some(payload) = &payload {
            debug!(body = %request::preview(payload), "Request body");
        }

        let response = self.inner.client.execute(outgoing).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;

        info!(status = status.as_u16(), "HTTP Response: {status} - {url}");
        debug!(body = %request::preview(&text), "Response body");

        Ok(ApiResponse::from_parts(status, headers, text))
    }
}

impl std::fmt::Debug for ServeRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServeRestClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}
