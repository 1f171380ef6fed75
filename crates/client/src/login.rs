//! Login endpoint (`/login`).

use reqwest::Method;
use serverest_core::Credentials;

use crate::{ApiResponse, ClientError, ServeRestClient};

/// Wrapper for the login endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Login<'a> {
    client: &'a ServeRestClient,
}

impl<'a> Login<'a> {
    pub(crate) const fn new(client: &'a ServeRestClient) -> Self {
        Self { client }
    }

    /// POST credentials. A successful response carries an `authorization` token.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent.
    pub async fn login(&self, credentials: &Credentials) -> Result<ApiResponse, ClientError> {
        let url = self.client.endpoint(&["login"])?;
        self.client
            .execute_json(Method::POST, url, credentials, None)
            .await
    }
}
