//! Carts endpoints (`/carrinhos`).
//!
//! A user owns at most one cart; checkout and cancel act on the cart of the
//! user whose token is sent, so they take no id.

use reqwest::Method;
use serverest_core::{AuthToken, CartId, NewCart};

use crate::filter::{CartFilter, QueryFilter};
use crate::{ApiResponse, ClientError, ServeRestClient};

const CARTS_PATH: &str = "carrinhos";

/// Wrapper for the cart endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Carts<'a> {
    client: &'a ServeRestClient,
}

impl<'a> Carts<'a> {
    pub(crate) const fn new(client: &'a ServeRestClient) -> Self {
        Self { client }
    }

    /// POST a cart for the user owning `token`.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent.
    pub async fn create(&self, cart: &NewCart, token: &AuthToken) -> Result<ApiResponse, ClientError> {
        let url = self.client.endpoint(&[CARTS_PATH])?;
        self.client
            .execute_json(Method::POST, url, cart, Some(token))
            .await
    }

    /// GET carts matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent.
    pub async fn search(&self, filter: &CartFilter) -> Result<ApiResponse, ClientError> {
        let mut url = self.client.endpoint(&[CARTS_PATH])?;
        filter.apply(&mut url);
        self.client.execute(Method::GET, url, None).await
    }

    /// GET a cart by id.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent.
    pub async fn get(&self, id: &CartId) -> Result<ApiResponse, ClientError> {
        let url = self.client.endpoint(&[CARTS_PATH, id.as_str()])?;
        self.client.execute(Method::GET, url, None).await
    }

    /// Complete the purchase, deleting the cart.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent.
    pub async fn checkout(&self, token: &AuthToken) -> Result<ApiResponse, ClientError> {
        let url = self.client.endpoint(&[CARTS_PATH, "concluir-compra"])?;
        self.client.execute(Method::DELETE, url, Some(token)).await
    }

    /// Cancel the purchase, deleting the cart and restocking its products.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent.
    pub async fn cancel(&self, token: &AuthToken) -> Result<ApiResponse, ClientError> {
        let url = self.client.endpoint(&[CARTS_PATH, "cancelar-compra"])?;
        self.client.execute(Method::DELETE, url, Some(token)).await
    }
}
