//! The full purchase flow: users, login, products, carts, checkout.

use reqwest::StatusCode;
use serverest_client::CartFilter;
use serverest_core::{Cart, NewCart, NewUser, User};
use serverest_fixtures::{self as fixtures, FixtureFile, FixtureStore};
use serverest_integration_tests::TestApi;

async fn api() -> TestApi {
    TestApi::start().await.expect("Failed to start test API")
}

#[tokio::test]
async fn test_purchase_flow_end_to_end() {
    let api = api().await;
    let setup = fixtures::create_cart(&api.client, &api.config)
        .await
        .expect("create_cart fixture failed");
    let (context, responses) = setup.into_parts();
    let limits = api.config.limits;

    assert_eq!(responses.users.len(), limits.max_users);
    assert_eq!(responses.logins.len(), limits.max_users);
    assert_eq!(responses.products.len(), limits.max_products);
    assert!(
        responses
            .users
            .iter()
            .chain(&responses.products)
            .chain(&responses.carts)
            .all(|response| response.status() == StatusCode::CREATED)
    );

    let carts = context.carts().expect("carts recorded");
    for cart in carts {
        let filter = CartFilter {
            user_id: Some(cart.user_id.clone()),
            ..CartFilter::default()
        };
        let response = api
            .client
            .carts()
            .search(&filter)
            .await
            .expect("request failed");
        let found: Vec<Cart> = response.list("carrinhos").expect("carrinhos list");
        assert_eq!(found, vec![cart.clone()]);
    }

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

    let responses = fixtures::delete_users(&api.client, context.users_or_empty())
        .await
        .expect("delete failed");
    assert!(
        responses
            .iter()
            .all(|response| response.status() == StatusCode::OK)
    );
}

#[tokio::test]
async fn test_fixture_files_record_the_generated_payloads() {
    let api = api().await;
    let setup = fixtures::create_cart(&api.client, &api.config)
        .await
        .expect("create_cart fixture failed");
    let store = FixtureStore::new(api.fixture_dir());

    let users: Vec<NewUser> = store
        .read_list(FixtureFile::CreateUser)
        .expect("users fixture");
    let recorded: Vec<&User> = setup.context().users().expect("users").iter().collect();
    assert_eq!(users.len(), recorded.len());
    for (payload, user) in users.iter().zip(recorded) {
        assert_eq!(payload.email, user.email);
        assert_eq!(payload.is_admin, user.is_admin);
    }

    let carts: Vec<NewCart> = store
        .read_list(FixtureFile::CreateCart)
        .expect("carts fixture");
    assert_eq!(carts.len(), setup.responses().carts.len());

    assert!(store.path(FixtureFile::CreateProduct.name()).exists());
}
