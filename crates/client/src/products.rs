//! Products endpoints (`/produtos`).
//!
//! Writes require an administrator's token.

use reqwest::Method;
use serverest_core::{AuthToken, NewProduct, ProductId};

use crate::filter::{ProductFilter, QueryFilter};
use crate::{ApiResponse, ClientError, ServeRestClient};

const PRODUCTS_PATH: &str = "produtos";

/// Wrapper for the product endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Products<'a> {
    client: &'a ServeRestClient,
}

impl<'a> Products<'a> {
    pub(crate) const fn new(client: &'a ServeRestClient) -> Self {
        Self { client }
    }

    /// POST a new product as an administrator.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent.
    pub async fn create(
        &self,
        product: &NewProduct,
        token: &AuthToken,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.client.endpoint(&[PRODUCTS_PATH])?;
        self.client
            .execute_json(Method::POST, url, product, Some(token))
            .await
    }

    /// GET products matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent.
    pub async fn search(&self, filter: &ProductFilter) -> Result<ApiResponse, ClientError> {
        let mut url = self.client.endpoint(&[PRODUCTS_PATH])?;
        filter.apply(&mut url);
        self.client.execute(Method::GET, url, None).await
    }

    /// GET a product by id.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent.
    pub async fn get(&self, id: &ProductId) -> Result<ApiResponse, ClientError> {
        let url = self.client.endpoint(&[PRODUCTS_PATH, id.as_str()])?;
        self.client.execute(Method::GET, url, None).await
    }

    /// PUT replacement details for a product as an administrator.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent.
    pub async fn update(
        &self,
        id: &ProductId,
        product: &NewProduct,
        token: &AuthToken,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.client.endpoint(&[PRODUCTS_PATH, id.as_str()])?;
        self.client
            .execute_json(Method::PUT, url, product, Some(token))
            .await
    }

    /// DELETE a product as an administrator.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent.
    pub async fn delete(&self, id: &ProductId, token: &AuthToken) -> Result<ApiResponse, ClientError> {
        let url = self.client.endpoint(&[PRODUCTS_PATH, id.as_str()])?;
        self.client.execute(Method::DELETE, url, Some(token)).await
    }
}
