//! Integration tests for the ServeRest API suite.
//!
//! # Running Tests
//!
//! ```bash
//! # Against the in-process fake (default, no network needed)
//! cargo test -p serverest-integration-tests
//!
//! # Against the service configured by BASE_URI / .env
//! SERVEREST_LIVE=1 cargo test -p serverest-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `users` - Create, search, fetch, update and delete users
//! - `login` - Token issue for created users
//! - `products` - Admin-only product CRUD
//! - `carts` - Cart creation, totals, checkout and cancel
//! - `scenario` - The whole purchase flow end to end
//!
//! Each test builds its own [`TestApi`]: a fresh fake server (or the live
//! URL), a client, and a temporary fixture directory.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod fake;

use std::sync::Once;

use serverest_client::{ApiConfig, ServeRestClient};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

pub use fake::FakeServeRest;

/// Environment variable switching the suites to the configured live API.
pub const LIVE_ENV: &str = "SERVEREST_LIVE";

/// Boxed error for harness setup.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Whether the suites target the live service.
#[must_use]
pub fn is_live() -> bool {
    std::env::var(LIVE_ENV).is_ok_and(|value| value == "1" || value.eq_ignore_ascii_case("true"))
}

/// Install a test-friendly subscriber once per test binary.
///
/// Honors `RUST_LOG`; defaults to `info`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_test_writer()
            .try_init();
    });
}

/// Everything one test needs to talk to the API.
#[derive(Debug)]
pub struct TestApi {
    pub client: ServeRestClient,
    pub config: ApiConfig,
    fixtures: TempDir,
    server: Option<FakeServeRest>,
}

impl TestApi {
    /// Start a fresh fake, or point at the live service when
    /// `SERVEREST_LIVE` is set.
    ///
    /// # Errors
    ///
    /// Returns error if the fake cannot bind, the configuration is invalid, or
    /// the temporary fixture directory cannot be created.
    pub async fn start() -> Result<Self, BoxError> {
        init_tracing();

        let (mut config, server) = if is_live() {
            (ApiConfig::from_env()?, None)
        } else {
            let server = FakeServeRest::start().await?;
            (ApiConfig::for_base_url(&server.base_url())?, Some(server))
        };

        let fixtures = tempfile::tempdir()?;
        config.fixture_dir = fixtures.path().to_path_buf();

        let client = ServeRestClient::from_config(&config)?;
        Ok(Self {
            client,
            config,
            fixtures,
            server,
        })
    }

    /// Whether this harness talks to the in-process fake.
    #[must_use]
    pub const fn is_fake(&self) -> bool {
        self.server.is_some()
    }

    /// Directory the fixture files of this test are written to.
    #[must_use]
    pub fn fixture_dir(&self) -> &std::path::Path {
        self.fixtures.path()
    }
}
