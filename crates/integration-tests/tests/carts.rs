//! Integration tests for the carts endpoints.
//!
//! Every logged-in user owns at most one cart. Closing it either keeps the
//! reserved stock (checkout) or returns it to the products (cancel).

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serverest_client::CartFilter;
use serverest_core::{Cart, CartLine, NewCart, Product, ProductId, calculator};
use serverest_fixtures::{self as fixtures, CartsCreated, Setup};
use serverest_integration_tests::TestApi;

async fn api() -> TestApi {
    TestApi::start().await.expect("Failed to start test API")
}

/// Units each product lost to the recorded carts.
fn reserved_units(carts: &[Cart]) -> BTreeMap<ProductId, u64> {
    let mut reserved = BTreeMap::new();
    for item in carts.iter().flat_map(|cart| &cart.items) {
        *reserved.entry(item.product_id.clone()).or_insert(0) += item.quantity;
    }
    reserved
}

async fn current_stock(api: &TestApi, product_id: &ProductId) -> u64 {
    let response = api
        .client
        .products()
        .get(product_id)
        .await
        .expect("request failed");
    let product: Product = response.json().expect("product body");
    product.quantity
}

async fn setup(api: &TestApi) -> Setup<CartsCreated> {
    fixtures::create_cart(&api.client, &api.config)
        .await
        .expect("create_cart fixture failed")
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_cart_can_be_created() {
    let api = api().await;
    let setup = setup(&api).await;

    let responses = &setup.responses().carts;
    assert_eq!(
        responses.len(),
        api.config.limits.max_carts.min(api.config.limits.max_users)
    );

    for response in responses {
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(
            response
                .message()
                .is_some_and(|m| m.contains("Cadastro realizado com sucesso"))
        );
        assert!(response.id().is_some());
    }
}

#[tokio::test]
async fn test_second_cart_for_same_user_is_rejected() {
    let api = api().await;
    let setup = setup(&api).await;
    let context = setup.context();
    let cart = &context.carts().expect("carts recorded")[0];
    let token = context.user_token(&cart.user_id).expect("owner token");

    let payload = NewCart {
        lines: vec![CartLine {
            product_id: cart.items[0].product_id.clone(),
            quantity: 1,
        }],
    };
    let response = api
        .client
        .carts()
        .create(&payload, token)
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.id().is_none());
}

// ============================================================================
// Fetch
// ============================================================================

#[tokio::test]
async fn test_cart_can_be_fetched_with_filters() {
    let api = api().await;
    let setup = setup(&api).await;

    for cart in setup.context().carts().expect("carts recorded") {
        let filter = CartFilter {
            id: Some(cart.id.clone()),
            total_price: Some(cart.total_price),
            total_quantity: Some(cart.total_quantity),
            user_id: Some(cart.user_id.clone()),
        };
        let response = api
            .client
            .carts()
            .search(&filter)
            .await
            .expect("request failed");

        assert_eq!(response.status(), StatusCode::OK);
        let found: Vec<Cart> = response.list("carrinhos").expect("carrinhos list");
        assert_eq!(found, vec![cart.clone()]);
    }
}

#[tokio::test]
async fn test_cart_can_be_fetched_by_id() {
    let api = api().await;
    let setup = setup(&api).await;

    for cart in setup.context().carts().expect("carts recorded") {
        let response = api
            .client
            .carts()
            .get(&cart.id)
            .await
            .expect("request failed");

        assert_eq!(response.status(), StatusCode::OK);
        let record: Cart = response.json().expect("cart body");
        assert_eq!(record.user_id, cart.user_id);
        assert_eq!(record.items, cart.items);
        assert_eq!(record.total_price, cart.total_price);
        assert_eq!(record.total_quantity, cart.total_quantity);
    }
}

#[tokio::test]
async fn test_cart_totals_match_calculator() {
    let api = api().await;
    let setup = setup(&api).await;
    let context = setup.context();

    for cart in context.carts().expect("carts recorded") {
        let response = api
            .client
            .carts()
            .get(&cart.id)
            .await
            .expect("request failed");
        let record: Cart = response.json().expect("cart body");

        let mut expected_price = 0;
        for item in &record.items {
            let price = context
                .product_price(&item.product_id)
                .expect("product recorded");
            assert_eq!(item.unit_price, price);
            expected_price += calculator::line_price(price, item.quantity).expect("line price");
        }
        let expected_quantity: u64 = record.items.iter().map(|item| item.quantity).sum();

        assert_eq!(record.total_price, expected_price);
        assert_eq!(record.total_quantity, expected_quantity);
    }
}

// ============================================================================
// Close
// ============================================================================

#[tokio::test]
async fn test_cart_checkout_keeps_stock_reserved() {
    let api = api().await;
    let setup = setup(&api).await;
    let context = setup.context();
    let carts = context.carts().expect("carts recorded");
    let reserved = reserved_units(carts);

    for cart in carts {
        let token = context.user_token(&cart.user_id).expect("owner token");
        let response = api
            .client
            .carts()
            .checkout(token)
            .await
            .expect("request failed");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.message(), Some("Registro excluído com sucesso"));

        let response = api
            .client
            .carts()
            .get(&cart.id)
            .await
            .expect("request failed");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    for (product_id, units) in &reserved {
        let product = context.product(product_id).expect("product recorded");
        assert_eq!(
            current_stock(&api, product_id).await,
            product.quantity - units
        );
    }
}

#[tokio::test]
async fn test_cart_cancel_restocks_products() {
    let api = api().await;
    let setup = setup(&api).await;
    let context = setup.context();
    let carts = context.carts().expect("carts recorded");

    for cart in carts {
        let token = context.user_token(&cart.user_id).expect("owner token");
        let response = api
            .client
            .carts()
            .cancel(token)
            .await
            .expect("request failed");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .message()
                .is_some_and(|m| m.contains("Estoque dos produtos reabastecido"))
        );
    }

    for product_id in reserved_units(carts).keys() {
        let product = context.product(product_id).expect("product recorded");
        assert_eq!(current_stock(&api, product_id).await, product.quantity);
    }
}
