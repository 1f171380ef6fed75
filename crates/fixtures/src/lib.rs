//! ServeRest Fixtures - Ordered test-data setup.
//!
//! Every test that needs data on the API builds it through a [`Setup`]. The
//! chain mirrors the dependencies between entities:
//!
//! ```text
//! Setup<Empty> --create_users--> Setup<UsersCreated>
//!              --login_users---> Setup<LoggedIn>
//!              --create_products-> Setup<ProductsCreated>
//!              --create_carts--> Setup<CartsCreated>
//! ```
//!
//! A stage is only reachable from its predecessor, so "log in before
//! creating products" is checked by the compiler. Each stage stores what it
//! created in the [`Context`] and keeps the raw API responses in
//! [`StageResponses`] for assertions.
//!
//! The free functions [`create_user`], [`login_user`], [`create_product`] and
//! [`create_cart`] run the whole chain up to their stage, generating payloads
//! with [`DataGenerator`] and round-tripping them through the
//! [`FixtureStore`] on the way.
//!
//! # Example
//!
//! ```rust,ignore
//! let config = ApiConfig::from_env()?;
//! let client = ServeRestClient::from_config(&config)?;
//! let setup = serverest_fixtures::create_cart(&client, &config).await?;
//! for cart in setup.context().carts()? {
//!     let response = client.carts().get(&cart.id).await?;
//!     assert_eq!(response.status(), 200);
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod chain;
pub mod context;
mod error;
pub mod generator;
pub mod setup;
pub mod store;

pub use chain::{
    create_cart, create_product, create_user, login_user, product_updates, user_updates,
};
pub use context::Context;
pub use error::{FixtureError, ResponseShapeError, SetupError};
pub use generator::DataGenerator;
pub use setup::{
    CartsCreated, Empty, LoggedIn, ProductsCreated, Setup, StageResponses, UsersCreated,
    delete_users,
};
pub use store::{FixtureFile, FixtureStore, StoreError};
