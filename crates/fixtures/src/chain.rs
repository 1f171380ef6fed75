//! Whole chains from scratch.
//!
//! Each function generates fresh payloads sized by the configured limits,
//! writes them to their fixture file, reads them back, and runs the setup
//! steps up to its own. A test asks for the last step it needs and gets every
//! step before it.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serverest_client::{ApiConfig, ServeRestClient};
use serverest_core::{NewCart, NewProduct, NewUser};
use tracing::instrument;

use crate::error::FixtureError;
use crate::generator::DataGenerator;
use crate::setup::{CartsCreated, LoggedIn, ProductsCreated, Setup, UsersCreated};
use crate::store::{FixtureFile, FixtureStore};

fn generator() -> DataGenerator<StdRng> {
    DataGenerator::new(StdRng::from_os_rng())
}

/// Write `items` to `file` and return what the file now holds.
fn round_trip<T>(config: &ApiConfig, file: FixtureFile, items: &[T]) -> Result<Vec<T>, FixtureError>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    let store = FixtureStore::new(&config.fixture_dir);
    store.write_list(file, items)?;
    Ok(store.read_list(file)?)
}

/// Create `max_users` users.
///
/// # Errors
///
/// See [`Setup::create_users`]; also fails if the fixture file cannot be
/// written or read.
#[instrument(skip_all)]
pub async fn create_user(
    client: &ServeRestClient,
    config: &ApiConfig,
) -> Result<Setup<UsersCreated>, FixtureError> {
    let users = generator().users_for_create(config.limits.max_users)?;
    let users: Vec<NewUser> = round_trip(config, FixtureFile::CreateUser, &users)?;
    Setup::new(client).create_users(users).await
}

/// Create users and log them all in.
///
/// # Errors
///
/// See [`create_user`] and [`Setup::login_users`].
#[instrument(skip_all)]
pub async fn login_user(
    client: &ServeRestClient,
    config: &ApiConfig,
) -> Result<Setup<LoggedIn>, FixtureError> {
    create_user(client, config).await?.login_users().await
}

/// Create logged-in users and `max_products` products.
///
/// # Errors
///
/// See [`login_user`] and [`Setup::create_products`].
#[instrument(skip_all)]
pub async fn create_product(
    client: &ServeRestClient,
    config: &ApiConfig,
) -> Result<Setup<ProductsCreated>, FixtureError> {
    let setup = login_user(client, config).await?;

    let products = generator().products_for_create(config.limits.max_products);
    let products: Vec<NewProduct> = round_trip(config, FixtureFile::CreateProduct, &products)?;

    let mut rng = StdRng::from_os_rng();
    setup.create_products(products, &mut rng).await
}

/// Create users, products and one cart per user.
///
/// # Errors
///
/// See [`create_product`] and [`Setup::create_carts`].
#[instrument(skip_all)]
pub async fn create_cart(
    client: &ServeRestClient,
    config: &ApiConfig,
) -> Result<Setup<CartsCreated>, FixtureError> {
    let setup = create_product(client, config).await?;

    let limits = config.limits;
    let stock = setup.context().product_stock()?;
    let carts = generator().carts_for_create(
        setup.context().product_ids()?,
        &stock,
        limits.max_carts,
        limits.max_products_per_cart,
        limits.max_quantity_per_product,
    )?;
    let carts: Vec<NewCart> = round_trip(config, FixtureFile::CreateCart, &carts)?;

    setup.create_carts(carts).await
}

/// Replacement payloads for `max_users` users.
///
/// # Errors
///
/// Fails if the fixture file cannot be written or read.
pub fn user_updates(config: &ApiConfig) -> Result<Vec<NewUser>, FixtureError> {
    let users = generator().users_for_update(config.limits.max_users)?;
    round_trip(config, FixtureFile::UpdateUser, &users)
}

/// Replacement payloads for `max_products` products.
///
/// # Errors
///
/// Fails if the fixture file cannot be written or read.
pub fn product_updates(config: &ApiConfig) -> Result<Vec<NewProduct>, FixtureError> {
    let products = generator().products_for_update(config.limits.max_products);
    round_trip(config, FixtureFile::UpdateProduct, &products)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn config(dir: &tempfile::TempDir) -> ApiConfig {
        let mut config = ApiConfig::for_base_url("http://127.0.0.1:9").unwrap();
        config.fixture_dir = PathBuf::from(dir.path());
        config
    }

    #[test]
    fn test_user_updates_written_to_fixture_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);

        let updates = user_updates(&config).unwrap();
        assert_eq!(updates.len(), config.limits.max_users);

        let stored: Vec<NewUser> = FixtureStore::new(dir.path())
            .read_list(FixtureFile::UpdateUser)
            .unwrap();
        assert_eq!(stored, updates);
    }

    #[test]
    fn test_product_updates_written_to_fixture_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);

        let updates = product_updates(&config).unwrap();
        assert_eq!(updates.len(), config.limits.max_products);
        assert!(dir.path().join("update_product_data.json").exists());
    }
}
