//! Integration tests for the products endpoints.
//!
//! Writes go through a randomly chosen administrator's token.

use reqwest::StatusCode;
use serverest_client::ProductFilter;
use serverest_core::{AuthToken, Product};
use serverest_fixtures::{self as fixtures, DataGenerator};
use serverest_integration_tests::TestApi;

async fn api() -> TestApi {
    TestApi::start().await.expect("Failed to start test API")
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_product_can_be_created() {
    let api = api().await;
    let setup = fixtures::create_product(&api.client, &api.config)
        .await
        .expect("create_product fixture failed");

    let responses = &setup.responses().products;
    assert_eq!(responses.len(), api.config.limits.max_products);

    for response in responses {
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(
            response
                .message()
                .is_some_and(|m| m.contains("Cadastro realizado com sucesso"))
        );
        assert!(response.id().is_some());
    }

    let context = setup.context();
    assert_eq!(
        context.product_ids().expect("ids recorded").len(),
        api.config.limits.max_products
    );
}

#[tokio::test]
async fn test_non_admin_cannot_create_products() {
    let api = api().await;

    let mut generator = DataGenerator::default();
    let mut shopper = generator
        .users_for_create(1)
        .expect("user payload")
        .remove(0);
    shopper.is_admin = false;
    let product = generator.products_for_create(1).remove(0);

    let created = api
        .client
        .users()
        .create(&shopper)
        .await
        .expect("request failed");
    assert_eq!(created.status(), StatusCode::CREATED);

    let login = api
        .client
        .login()
        .login(&shopper.credentials())
        .await
        .expect("request failed");
    let token = AuthToken::new(login.str_field("authorization").expect("token issued"));

    let response = api
        .client
        .products()
        .create(&product, &token)
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.id().is_none());
}

// ============================================================================
// Fetch
// ============================================================================

#[tokio::test]
async fn test_product_can_be_fetched_with_filters() {
    let api = api().await;
    let setup = fixtures::create_product(&api.client, &api.config)
        .await
        .expect("create_product fixture failed");

    for product in setup.context().products().expect("products recorded") {
        let filter = ProductFilter {
            id: Some(product.id.clone()),
            name: Some(product.name.clone()),
            price: Some(product.price),
            description: Some(product.description.clone()),
            quantity: Some(product.quantity),
        };
        let response = api
            .client
            .products()
            .search(&filter)
            .await
            .expect("request failed");

        assert_eq!(response.status(), StatusCode::OK);
        let found: Vec<Product> = response.list("produtos").expect("produtos list");
        assert_eq!(found, vec![product.clone()]);
    }
}

#[tokio::test]
async fn test_product_can_be_fetched_by_id() {
    let api = api().await;
    let setup = fixtures::create_product(&api.client, &api.config)
        .await
        .expect("create_product fixture failed");

    for product in setup.context().products().expect("products recorded") {
        let response = api
            .client
            .products()
            .get(&product.id)
            .await
            .expect("request failed");

        assert_eq!(response.status(), StatusCode::OK);
        let record: Product = response.json().expect("product body");
        assert_eq!(&record, product);
    }
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_product_can_be_updated() {
    let api = api().await;
    let mut setup = fixtures::create_product(&api.client, &api.config)
        .await
        .expect("create_product fixture failed");
    let updates = fixtures::product_updates(&api.config).expect("update payloads");
    let token = setup
        .context()
        .random_admin_token(&mut rand::rng())
        .expect("admin token")
        .clone();

    let products = setup.context_mut().products_mut().expect("products recorded");
    for (index, product) in products.iter_mut().enumerate() {
        let update = updates.get(index).expect("update data available");

        let response = api
            .client
            .products()
            .update(&product.id, update, &token)
            .await
            .expect("request failed");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .message()
                .is_some_and(|m| m.contains("Registro alterado com sucesso"))
        );
        product.apply(update);
    }

    for product in setup.context().products().expect("products recorded") {
        let response = api
            .client
            .products()
            .get(&product.id)
            .await
            .expect("request failed");
        let record: Product = response.json().expect("product body");
        assert_eq!(&record, product);
    }
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_product_can_be_deleted() {
    let api = api().await;
    let setup = fixtures::create_product(&api.client, &api.config)
        .await
        .expect("create_product fixture failed");
    let context = setup.context();
    let token = context
        .random_admin_token(&mut rand::rng())
        .expect("admin token")
        .clone();

    for product_id in context.product_ids().expect("ids recorded") {
        let response = api
            .client
            .products()
            .delete(product_id, &token)
            .await
            .expect("request failed");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .message()
                .is_some_and(|m| m.contains("Registro excluído com sucesso"))
        );

        let response = api
            .client
            .products()
            .get(product_id)
            .await
            .expect("request failed");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
