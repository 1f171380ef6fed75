//! Core types for the ServeRest test suite.
//!
//! This module provides type-safe wrappers for the entities exchanged with the
//! API. Field names on the wire are the service's Portuguese keys; the Rust
//! names are English and mapped with `#[serde(rename)]`.

pub mod cart;
pub mod email;
pub mod flag;
pub mod id;
pub mod product;
pub mod token;
pub mod user;

pub use cart::{Cart, CartItem, CartLine, NewCart};
pub use email::{Email, EmailError};
pub use id::*;
pub use product::{NewProduct, Product};
pub use token::AuthToken;
pub use user::{Credentials, NewUser, User};
