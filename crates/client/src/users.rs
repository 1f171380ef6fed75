//! Users endpoints (`/usuarios`).

use reqwest::Method;
use serverest_core::{NewUser, UserId};

use crate::filter::{QueryFilter, UserFilter};
use crate::{ApiResponse, ClientError, ServeRestClient};

const USERS_PATH: &str = "usuarios";

/// Wrapper for the user endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Users<'a> {
    client: &'a ServeRestClient,
}

impl<'a> Users<'a> {
    pub(crate) const fn new(client: &'a ServeRestClient) -> Self {
        Self { client }
    }

    /// POST a new user.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent.
    pub async fn create(&self, user: &NewUser) -> Result<ApiResponse, ClientError> {
        let url = self.client.endpoint(&[USERS_PATH])?;
        self.client.execute_json(Method::POST, url, user, None).await
    }

    /// GET users matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent.
    pub async fn search(&self, filter: &UserFilter) -> Result<ApiResponse, ClientError> {
        let mut url = self.client.endpoint(&[USERS_PATH])?;
        filter.apply(&mut url);
        self.client.execute(Method::GET, url, None).await
    }

    /// GET a user by id.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent.
    pub async fn get(&self, id: &UserId) -> Result<ApiResponse, ClientError> {
        let url = self.client.endpoint(&[USERS_PATH, id.as_str()])?;
        self.client.execute(Method::GET, url, None).await
    }

    /// PUT replacement details for a user.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent.
    pub async fn update(&self, id: &UserId, user: &NewUser) -> Result<ApiResponse, ClientError> {
        let url = self.client.endpoint(&[USERS_PATH, id.as_str()])?;
        self.client.execute_json(Method::PUT, url, user, None).await
    }

    /// DELETE a user by id.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent.
    pub async fn delete(&self, id: &UserId) -> Result<ApiResponse, ClientError> {
        let url = self.client.endpoint(&[USERS_PATH, id.as_str()])?;
        self.client.execute(Method::DELETE, url, None).await
    }
}
