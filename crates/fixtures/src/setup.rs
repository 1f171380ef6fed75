//! The ordered setup chain.
//!
//! [`Setup`] carries a stage marker. Each step consumes the setup at its
//! predecessor stage and returns it at the next one, so steps cannot run out
//! of order or twice:
//!
//! | Step | From | To | Records |
//! |---|---|---|---|
//! | [`create_users`](Setup::create_users) | [`Empty`] | [`UsersCreated`] | users |
//! | [`login_users`](Setup::login_users) | [`UsersCreated`] | [`LoggedIn`] | tokens on users |
//! | [`create_products`](Setup::create_products) | [`LoggedIn`] | [`ProductsCreated`] | products, product ids |
//! | [`create_carts`](Setup::create_carts) | [`ProductsCreated`] | [`CartsCreated`] | carts with totals |
//!
//! Any missing precondition or malformed response aborts the chain.

use std::marker::PhantomData;

use rand::Rng;
use serverest_client::{ApiResponse, ClientError, ServeRestClient};
use serverest_core::calculator;
use serverest_core::{
    AuthToken, Cart, CartId, CartItem, CalculatorError, NewCart, NewProduct, NewUser, Product,
    ProductId, User, UserId,
};
use tracing::{debug, info, instrument, warn};

use crate::context::Context;
use crate::error::{FixtureError, ResponseShapeError, SetupError};

/// Nothing has been created yet.
#[derive(Debug)]
pub struct Empty;

/// Users exist but hold no tokens.
#[derive(Debug)]
pub struct UsersCreated;

/// Every user holds a login token.
#[derive(Debug)]
pub struct LoggedIn;

/// Products exist, created by an administrator.
#[derive(Debug)]
pub struct ProductsCreated;

/// Every user that had a cart payload owns a cart.
#[derive(Debug)]
pub struct CartsCreated;

/// Raw API responses of every step run so far, in request order.
#[derive(Debug, Clone, Default)]
pub struct StageResponses {
    pub users: Vec<ApiResponse>,
    pub logins: Vec<ApiResponse>,
    pub products: Vec<ApiResponse>,
    pub carts: Vec<ApiResponse>,
}

/// Test data setup at stage `S`.
#[derive(Debug)]
pub struct Setup<S> {
    client: ServeRestClient,
    context: Context,
    responses: StageResponses,
    stage: PhantomData<S>,
}

impl<S> Setup<S> {
    fn advance<T>(self) -> Setup<T> {
        Setup {
            client: self.client,
            context: self.context,
            responses: self.responses,
            stage: PhantomData,
        }
    }

    #[must_use]
    pub const fn client(&self) -> &ServeRestClient {
        &self.client
    }

    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Mutable context, for tests that update records in place.
    pub const fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    #[must_use]
    pub const fn responses(&self) -> &StageResponses {
        &self.responses
    }

    #[must_use]
    pub fn into_parts(self) -> (Context, StageResponses) {
        (self.context, self.responses)
    }
}

impl Setup<Empty> {
    #[must_use]
    pub fn new(client: &ServeRestClient) -> Self {
        Self {
            client: client.clone(),
            context: Context::new(),
            responses: StageResponses::default(),
            stage: PhantomData,
        }
    }

    /// POST every user and record it with its assigned id.
    ///
    /// # Errors
    ///
    /// Fails on a transport error or a response without `_id`.
    #[instrument(skip_all, fields(count = users.len()))]
    pub async fn create_users(
        mut self,
        users: Vec<NewUser>,
    ) -> Result<Setup<UsersCreated>, FixtureError> {
        let mut created = Vec::with_capacity(users.len());

        for payload in users {
            let response = self.client.users().create(&payload).await?;
            let id = require_id(&response, "user")?;
            self.responses.users.push(response);

            debug!(user_id = %id, email = %payload.email, "Created user");
            created.push(User::created(UserId::new(id), payload));
        }

        info!("Created {} user(s)", created.len());
        self.context.set_users(created)?;
        Ok(self.advance())
    }
}

impl Setup<UsersCreated> {
    /// Log every user in and attach the returned token.
    ///
    /// # Errors
    ///
    /// Fails if a user lacks email or password, on a transport error, or on a
    /// response without `authorization`.
    #[instrument(skip_all)]
    pub async fn login_users(mut self) -> Result<Setup<LoggedIn>, FixtureError> {
        for user in self.context.users_mut()? {
            let credentials = user.credentials();
            if !credentials.is_complete() {
                return Err(SetupError::MissingCredentials(user.email.to_string()).into());
            }

            let response = self.client.login().login(&credentials).await?;
            let Some(token) = response.str_field("authorization") else {
                return Err(ResponseShapeError::MissingToken {
                    email: credentials.email,
                    status: response.status().as_u16(),
                    body: response.text().to_string(),
                }
                .into());
            };

            user.token = Some(AuthToken::new(token));
            debug!(user_id = %user.id, "Logged in user");
            self.responses.logins.push(response);
        }

        info!("Logged in {} user(s)", self.responses.logins.len());
        Ok(self.advance())
    }
}

impl Setup<LoggedIn> {
    /// POST every product with the token of a randomly chosen administrator.
    ///
    /// # Errors
    ///
    /// Fails if `products` is empty, if no logged-in administrator exists, on a
    /// transport error, or on a response without `_id`.
    #[instrument(skip_all, fields(count = products.len()))]
    pub async fn create_products<R: Rng + ?Sized>(
        mut self,
        products: Vec<NewProduct>,
        rng: &mut R,
    ) -> Result<Setup<ProductsCreated>, FixtureError> {
        if products.is_empty() {
            return Err(SetupError::NoProducts.into());
        }
        let token = self.context.random_admin_token(rng)?.clone();
        let mut created = Vec::with_capacity(products.len());

        for payload in products {
            let response = self.client.products().create(&payload, &token).await?;
            let id = require_id(&response, "product")?;
            self.responses.products.push(response);

            debug!(product_id = %id, name = %payload.name, "Created product");
            created.push(Product::created(ProductId::new(id), payload));
        }

        info!("Created {} product(s)", created.len());
        self.context.set_products(created)?;
        Ok(self.advance())
    }
}

impl Setup<ProductsCreated> {
    /// POST one cart per user, pairing users and payloads in order.
    ///
    /// Surplus payloads or users are left unpaired. Each recorded cart carries
    /// its owner and the totals derived from the prices recorded at product
    /// creation.
    ///
    /// # Errors
    ///
    /// Fails if no products are recorded, a user has no token, a line names a
    /// product missing from the context, on a transport error, or on a
    /// response without `_id`. Payloads are priced before they are sent, so
    /// an unknown product never reaches the server.
    #[instrument(skip_all, fields(count = carts.len()))]
    pub async fn create_carts(
        mut self,
        carts: Vec<NewCart>,
    ) -> Result<Setup<CartsCreated>, FixtureError> {
        self.context.products()?;
        let mut created = Vec::new();

        for (user, payload) in self.context.users()?.iter().zip(carts) {
            let token = user
                .token
                .as_ref()
                .ok_or_else(|| SetupError::MissingToken(user.id.clone()))?;
            let priced = price_cart(&self.context, &payload)?;

            let response = self.client.carts().create(&payload, token).await?;
            let id = require_id(&response, "cart")?;
            self.responses.carts.push(response);

            let cart = priced.into_cart(CartId::new(id), user.id.clone());
            debug!(
                cart_id = %cart.id,
                user_id = %cart.user_id,
                total_price = cart.total_price,
                total_quantity = cart.total_quantity,
                "Created cart"
            );
            created.push(cart);
        }

        info!("Created {} cart(s)", created.len());
        self.context.set_carts(created)?;
        Ok(self.advance())
    }
}

/// DELETE every user in `users`.
///
/// An empty slice is not an error: a warning is logged and no request is
/// made.
///
/// # Errors
///
/// Fails on the first transport error.
pub async fn delete_users(
    client: &ServeRestClient,
    users: &[User],
) -> Result<Vec<ApiResponse>, ClientError> {
    if users.is_empty() {
        warn!("No users found in context for deletion");
        return Ok(Vec::new());
    }

    info!("Deleting {} user(s)", users.len());
    let mut responses = Vec::with_capacity(users.len());
    for user in users {
        responses.push(client.users().delete(&user.id).await?);
    }
    Ok(responses)
}

/// The `_id` of a creation response.
fn require_id(response: &ApiResponse, entity: &'static str) -> Result<String, ResponseShapeError> {
    response
        .id()
        .map(str::to_string)
        .ok_or_else(|| ResponseShapeError::MissingId {
            entity,
            status: response.status().as_u16(),
            body: response.text().to_string(),
        })
}

/// Items and totals of a cart payload, priced from the context.
#[derive(Debug)]
struct PricedCart {
    items: Vec<CartItem>,
    total_price: u64,
    total_quantity: u64,
}

impl PricedCart {
    fn into_cart(self, id: CartId, user_id: UserId) -> Cart {
        Cart {
            id,
            items: self.items,
            total_price: self.total_price,
            total_quantity: self.total_quantity,
            user_id,
        }
    }
}

/// Price `payload` with the prices recorded at product creation.
fn price_cart(context: &Context, payload: &NewCart) -> Result<PricedCart, FixtureError> {
    let total_quantity = calculator::total_quantity(&payload.lines)?;

    let mut items = Vec::with_capacity(payload.lines.len());
    let mut total_price = 0_u64;
    for line in &payload.lines {
        let unit_price = context.product_price(&line.product_id)?;
        total_price = total_price
            .checked_add(calculator::line_price(unit_price, line.quantity)?)
            .ok_or(CalculatorError::Overflow)?;
        items.push(CartItem {
            product_id: line.product_id.clone(),
            quantity: line.quantity,
            unit_price,
        });
    }

    Ok(PricedCart {
        items,
        total_price,
        total_quantity,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::StatusCode;
    use reqwest::header::HeaderMap;
    use serverest_core::{CartLine, Email};
    use url::Url;

    use super::*;

    fn client() -> ServeRestClient {
        ServeRestClient::new(Url::parse("http://127.0.0.1:9").unwrap()).unwrap()
    }

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse::from_parts(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            body.to_string(),
        )
    }

    fn context_with_products() -> Context {
        let mut context = Context::new();
        context
            .set_products(vec![
                Product::created(
                    ProductId::new("p1"),
                    NewProduct {
                        name: "Mouse".to_string(),
                        price: 470,
                        description: "Mouse".to_string(),
                        quantity: 10,
                    },
                ),
                Product::created(
                    ProductId::new("p2"),
                    NewProduct {
                        name: "Monitor".to_string(),
                        price: 5240,
                        description: "Monitor".to_string(),
                        quantity: 10,
                    },
                ),
            ])
            .unwrap();
        context
    }

    #[test]
    fn test_require_id() {
        let ok = response(201, r#"{"message":"Cadastro realizado com sucesso","_id":"abc"}"#);
        assert_eq!(require_id(&ok, "user").unwrap(), "abc");

        let rejected = response(400, r#"{"email":"Este email já está sendo usado"}"#);
        let err = require_id(&rejected, "user").unwrap_err();
        assert!(matches!(
            err,
            ResponseShapeError::MissingId { entity: "user", status: 400, .. }
        ));
    }

    #[test]
    fn test_price_cart_totals() {
        let context = context_with_products();
        let payload = NewCart {
            lines: vec![
                CartLine {
                    product_id: ProductId::new("p1"),
                    quantity: 1,
                },
                CartLine {
                    product_id: ProductId::new("p2"),
                    quantity: 3,
                },
            ],
        };

        let cart = price_cart(&context, &payload)
            .unwrap()
            .into_cart(CartId::new("c1"), UserId::new("u1"));
        assert_eq!(cart.total_quantity, 4);
        assert_eq!(cart.total_price, 470 + 3 * 5240);
        assert_eq!(cart.user_id.as_str(), "u1");
        assert_eq!(cart.items[1].unit_price, 5240);
    }

    #[test]
    fn test_price_cart_unknown_product() {
        let context = context_with_products();
        let payload = NewCart {
            lines: vec![CartLine {
                product_id: ProductId::new("missing"),
                quantity: 1,
            }],
        };

        let err = price_cart(&context, &payload).unwrap_err();
        assert!(matches!(
            err,
            FixtureError::Setup(SetupError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_price_cart_rejects_empty_payload() {
        let context = context_with_products();
        let err = price_cart(&context, &NewCart { lines: vec![] }).unwrap_err();
        assert!(matches!(
            err,
            FixtureError::Calculator(CalculatorError::EmptyItems)
        ));
    }

    fn at_stage<S>(context: Context) -> Setup<S> {
        Setup {
            client: client(),
            context,
            responses: StageResponses::default(),
            stage: PhantomData,
        }
    }

    fn logged_in_admin() -> Context {
        let mut context = Context::new();
        let mut admin = User::created(
            UserId::new("u1"),
            NewUser {
                name: "Fulano".to_string(),
                email: Email::parse("fulano@qa.com").unwrap(),
                password: "teste".to_string(),
                is_admin: true,
            },
        );
        admin.token = Some(AuthToken::new("Bearer t"));
        context.set_users(vec![admin]).unwrap();
        context
    }

    #[test]
    fn test_new_setup_is_empty() {
        let setup = Setup::new(&client());
        assert!(setup.context().users().is_err());
        assert!(setup.responses().users.is_empty());
    }

    #[tokio::test]
    async fn test_delete_users_with_no_users_makes_no_requests() {
        // Nothing listens on the discard port; any request would fail.
        let responses = delete_users(&client(), &[]).await.unwrap();
        assert!(responses.is_empty());
    }

    #[tokio::test]
    async fn test_create_users_with_no_payloads_records_nothing_and_stops() {
        let setup = Setup::new(&client()).create_users(vec![]).await.unwrap();
        assert!(setup.responses().users.is_empty());
        // An empty user list is recorded, so later steps see "no users".
        let err = setup.login_users().await.unwrap_err();
        assert!(matches!(err, FixtureError::Setup(SetupError::NoUsers)));
    }

    #[tokio::test]
    async fn test_create_products_with_no_payloads_fails_before_any_request() {
        let setup: Setup<LoggedIn> = at_stage(logged_in_admin());
        let err = setup
            .create_products(vec![], &mut rand::rng())
            .await
            .unwrap_err();
        assert!(matches!(err, FixtureError::Setup(SetupError::NoProducts)));
    }

    #[tokio::test]
    async fn test_create_carts_without_products_fails() {
        let mut context = logged_in_admin();
        context.set_products(vec![]).unwrap();
        let setup: Setup<ProductsCreated> = at_stage(context);

        let err = setup.create_carts(vec![]).await.unwrap_err();
        assert!(matches!(err, FixtureError::Setup(SetupError::NoProducts)));
    }

    #[tokio::test]
    async fn test_create_carts_rejects_unknown_product_before_any_request() {
        let mut context = logged_in_admin();
        context.set_products(context_with_products().products().unwrap().to_vec()).unwrap();
        let setup: Setup<ProductsCreated> = at_stage(context);
        let payload = NewCart {
            lines: vec![CartLine {
                product_id: ProductId::new("elsewhere"),
                quantity: 1,
            }],
        };

        // The client points at a dead port: reaching it would be a Client error.
        let err = setup.create_carts(vec![payload]).await.unwrap_err();
        assert!(matches!(
            err,
            FixtureError::Setup(SetupError::ProductNotFound(_))
        ));
    }
}
