//! Fixture payload generation.
//!
//! # Usage
//!
//! ```bash
//! serverest generate users
//! serverest generate products --update --count 10
//! ```
//!
//! Files land in `FIXTURE_DATA_DIR` (default `tests/data`) and are overwritten
//! on every run.

use std::path::PathBuf;

use clap::ValueEnum;
use serverest_client::ApiConfig;
use serverest_fixtures::{DataGenerator, FixtureError, FixtureFile, FixtureStore};
use tracing::info;

/// Entities the generator can write payloads for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Entity {
    Users,
    Products,
}

impl Entity {
    const fn file(self, update: bool) -> FixtureFile {
        match (self, update) {
            (Self::Users, false) => FixtureFile::CreateUser,
            (Self::Users, true) => FixtureFile::UpdateUser,
            (Self::Products, false) => FixtureFile::CreateProduct,
            (Self::Products, true) => FixtureFile::UpdateProduct,
        }
    }

    const fn default_count(self, config: &ApiConfig) -> usize {
        match self {
            Self::Users => config.limits.max_users,
            Self::Products => config.limits.max_products,
        }
    }
}

/// Load the configuration and write the requested fixture file.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the file cannot be
/// written.
pub fn run(
    entity: Entity,
    update: bool,
    count: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ApiConfig::from_env()?;
    let path = generate(&config, entity, update, count)?;
    info!(path = %path.display(), "Fixture file written");
    Ok(())
}

/// Generate `count` payloads (or the configured maximum) and store them.
///
/// # Errors
///
/// Returns an error if a generated email is rejected or the file cannot be
/// written.
pub fn generate(
    config: &ApiConfig,
    entity: Entity,
    update: bool,
    count: Option<usize>,
) -> Result<PathBuf, FixtureError> {
    let count = count.unwrap_or_else(|| entity.default_count(config));
    let file = entity.file(update);
    let store = FixtureStore::new(&config.fixture_dir);
    let mut generator = DataGenerator::default();

    info!(?entity, update, count, "Generating payloads");
    let path = match entity {
        Entity::Users => {
            let users = if update {
                generator.users_for_update(count)?
            } else {
                generator.users_for_create(count)?
            };
            store.write_list(file, &users)?
        }
        Entity::Products => {
            let products = if update {
                generator.products_for_update(count)
            } else {
                generator.products_for_create(count)
            };
            store.write_list(file, &products)?
        }
    };
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serverest_core::{NewProduct, NewUser};

    use super::*;

    fn config(dir: &tempfile::TempDir) -> ApiConfig {
        let mut config = ApiConfig::for_base_url("http://localhost:3000").unwrap();
        config.fixture_dir = dir.path().to_path_buf();
        config
    }

    #[test]
    fn test_generate_users_uses_configured_count() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);

        let path = generate(&config, Entity::Users, false, None).unwrap();
        assert!(path.ends_with("create_user_data.json"));

        let users: Vec<NewUser> = FixtureStore::new(dir.path())
            .read_list(FixtureFile::CreateUser)
            .unwrap();
        assert_eq!(users.len(), config.limits.max_users);
        assert!(users[0].is_admin);
    }

    #[test]
    fn test_generate_product_updates_with_explicit_count() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);

        generate(&config, Entity::Products, true, Some(2)).unwrap();

        let products: Vec<NewProduct> = FixtureStore::new(dir.path())
            .read_list(FixtureFile::UpdateProduct)
            .unwrap();
        assert_eq!(products.len(), 2);
        assert!(products.iter().all(|p| p.price > 0 && p.quantity > 0));
    }

    #[test]
    fn test_generate_overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);

        generate(&config, Entity::Users, true, Some(5)).unwrap();
        generate(&config, Entity::Users, true, Some(1)).unwrap();

        let users: Vec<NewUser> = FixtureStore::new(dir.path())
            .read_list(FixtureFile::UpdateUser)
            .unwrap();
        assert_eq!(users.len(), 1);
    }
}
