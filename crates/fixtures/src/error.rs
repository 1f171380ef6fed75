//! Setup failures.
//!
//! A failed fixture aborts the test that requested it. Nothing here is
//! retried.

use serverest_client::{ClientError, ConfigError};
use serverest_core::{CalculatorError, EmailError, ProductId, UserId};
use thiserror::Error;

use crate::store::StoreError;

/// A precondition of a setup step is missing from the context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("No users found in context. Ensure create_user runs first.")]
    NoUsers,

    #[error("User with id {0} not found")]
    UserNotFound(UserId),

    #[error("User with id {0} is missing authorization token. Ensure login_user runs first.")]
    MissingToken(UserId),

    #[error("User data missing email or password: {0}")]
    MissingCredentials(String),

    #[error("No admin users found. Ensure at least one admin user is created.")]
    NoAdmins,

    #[error("No products found in context. Ensure create_product runs first.")]
    NoProducts,

    #[error("Product with id {0} not found")]
    ProductNotFound(ProductId),

    #[error("No products in stock to build a cart from")]
    NoStock,

    #[error("No carts found in context. Ensure create_cart runs first.")]
    NoCarts,

    #[error("Context key '{0}' is already set")]
    AlreadySet(&'static str),
}

/// The API answered, but without a field the next step depends on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseShapeError {
    #[error("Failed to create {entity} (status {status}): response has no '_id': {body}")]
    MissingId {
        entity: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to login user {email} (status {status}): response has no 'authorization': {body}")]
    MissingToken {
        email: String,
        status: u16,
        body: String,
    },
}

/// Any failure while building test data.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    ResponseShape(#[from] ResponseShapeError),

    #[error("request failed: {0}")]
    Client(#[from] ClientError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("fixture file error: {0}")]
    Store(#[from] StoreError),

    #[error("generated an invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("cart arithmetic failed: {0}")]
    Calculator(#[from] CalculatorError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_errors_name_the_missing_step() {
        assert!(SetupError::NoUsers.to_string().contains("create_user"));
        assert!(
            SetupError::MissingToken(UserId::new("u1"))
                .to_string()
                .contains("login_user")
        );
        assert!(SetupError::NoProducts.to_string().contains("create_product"));
    }

    #[test]
    fn test_fixture_error_is_transparent_for_setup() {
        let err = FixtureError::from(SetupError::NoAdmins);
        assert_eq!(err.to_string(), SetupError::NoAdmins.to_string());
        assert!(matches!(err, FixtureError::Setup(SetupError::NoAdmins)));
    }

    #[test]
    fn test_malformed_fixture_json_is_a_store_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FixtureError::from(StoreError::from(json_err));
        assert!(matches!(err, FixtureError::Store(StoreError::Json(_))));
        assert!(err.to_string().starts_with("fixture file error"));
    }

    #[test]
    fn test_missing_id_message_includes_body() {
        let err = ResponseShapeError::MissingId {
            entity: "user",
            status: 400,
            body: r#"{"email":"Este email já está sendo usado"}"#.to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("400"));
        assert!(message.contains("já está sendo usado"));
    }
}
