//! A ServeRest stand-in served from the test process.
//!
//! # Routes
//!
//! ```text
//! GET    /usuarios                    - List users (query filters)
//! POST   /usuarios                    - Create user
//! GET    /usuarios/{id}               - Get user
//! PUT    /usuarios/{id}               - Update user (creates if unknown)
//! DELETE /usuarios/{id}               - Delete user
//! POST   /login                       - Issue "Bearer ..." token
//! GET    /produtos                    - List products (query filters)
//! POST   /produtos                    - Create product (admin)
//! GET    /produtos/{id}               - Get product
//! PUT    /produtos/{id}               - Update product (admin)
//! DELETE /produtos/{id}               - Delete product (admin)
//! GET    /carrinhos                   - List carts (query filters)
//! POST   /carrinhos                   - Create cart, reserving stock
//! GET    /carrinhos/{id}              - Get cart
//! DELETE /carrinhos/concluir-compra   - Delete caller's cart
//! DELETE /carrinhos/cancelar-compra   - Delete caller's cart and restock
//! ```

mod store;

use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub use store::FakeStore;
use store::Reply;

type SharedStore = Arc<Mutex<FakeStore>>;

/// A running fake, stopped when dropped.
#[derive(Debug)]
pub struct FakeServeRest {
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl FakeServeRest {
    /// Bind an ephemeral local port and start serving.
    ///
    /// # Errors
    ///
    /// Returns error if the port cannot be bound.
    pub async fn start() -> io::Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;

        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router()).await {
                error!("Fake ServeRest stopped: {e}");
            }
        });

        info!(%addr, "Fake ServeRest listening");
        Ok(Self { addr, task })
    }

    /// Root URL of the fake, e.g. `http://127.0.0.1:41234`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for FakeServeRest {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// All ServeRest routes over a fresh, empty store.
pub fn router() -> Router {
    Router::new()
        .route("/usuarios", get(list_users).post(create_user))
        .route(
            "/usuarios/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/login", post(login))
        .route("/produtos", get(list_products).post(create_product))
        .route(
            "/produtos/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/carrinhos", get(list_carts).post(create_cart))
        .route("/carrinhos/concluir-compra", delete(checkout))
        .route("/carrinhos/cancelar-compra", delete(cancel))
        .route("/carrinhos/{id}", get(get_cart))
        .with_state(SharedStore::default())
}

/// Run `op` under the store lock and render its reply.
fn with_store(state: &SharedStore, op: impl FnOnce(&mut FakeStore) -> Reply) -> Response {
    let mut store = state.lock().unwrap_or_else(PoisonError::into_inner);
    let (status, body) = op(&mut store);
    (status, Json(body)).into_response()
}

fn token(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok())
}

// =============================================================================
// Users
// =============================================================================

async fn list_users(
    State(state): State<SharedStore>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    with_store(&state, |store| store.list_users(&query))
}

async fn create_user(State(state): State<SharedStore>, Json(body): Json<Value>) -> Response {
    with_store(&state, |store| store.create_user(body))
}

async fn get_user(State(state): State<SharedStore>, Path(id): Path<String>) -> Response {
    with_store(&state, |store| store.get_user(&id))
}

async fn update_user(
    State(state): State<SharedStore>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    with_store(&state, |store| store.update_user(&id, body))
}

async fn delete_user(State(state): State<SharedStore>, Path(id): Path<String>) -> Response {
    with_store(&state, |store| store.delete_user(&id))
}

async fn login(State(state): State<SharedStore>, Json(body): Json<Value>) -> Response {
    with_store(&state, |store| store.login(body))
}

// =============================================================================
// Products
// =============================================================================

async fn list_products(
    State(state): State<SharedStore>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    with_store(&state, |store| store.list_products(&query))
}

async fn create_product(
    State(state): State<SharedStore>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    with_store(&state, |store| store.create_product(token(&headers), body))
}

async fn get_product(State(state): State<SharedStore>, Path(id): Path<String>) -> Response {
    with_store(&state, |store| store.get_product(&id))
}

async fn update_product(
    State(state): State<SharedStore>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    with_store(&state, |store| {
        store.update_product(token(&headers), &id, body)
    })
}

async fn delete_product(
    State(state): State<SharedStore>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    with_store(&state, |store| store.delete_product(token(&headers), &id))
}

// =============================================================================
// Carts
// =============================================================================

async fn list_carts(
    State(state): State<SharedStore>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    with_store(&state, |store| store.list_carts(&query))
}

async fn create_cart(
    State(state): State<SharedStore>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    with_store(&state, |store| store.create_cart(token(&headers), body))
}

async fn get_cart(State(state): State<SharedStore>, Path(id): Path<String>) -> Response {
    with_store(&state, |store| store.get_cart(&id))
}

async fn checkout(State(state): State<SharedStore>, headers: HeaderMap) -> Response {
    with_store(&state, |store| store.close_cart(token(&headers), false))
}

async fn cancel(State(state): State<SharedStore>, headers: HeaderMap) -> Response {
    with_store(&state, |store| store.close_cart(token(&headers), true))
}
