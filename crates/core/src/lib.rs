//! ServeRest Core - Shared domain types.
//!
//! This crate provides the types exchanged with the ServeRest e-commerce API
//! and used across the test suite:
//! - `client` - HTTP wrappers for the users, products, carts and login endpoints
//! - `fixtures` - Ordered test-data setup chain and data generation
//! - `cli` - Command-line entry point for generating data and running scenarios
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, tokens and the user/product/cart records
//! - [`calculator`] - Cart quantity and price totals

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod calculator;
pub mod types;

pub use calculator::CalculatorError;
pub use types::*;
