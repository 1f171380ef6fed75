//! The purchase flow against a live ServeRest.
//!
//! # Usage
//!
//! ```bash
//! serverest scenario            # check out every cart
//! serverest scenario --cancel   # cancel every cart and restock
//! serverest scenario --keep     # leave users and products behind
//! ```

use serverest_client::{ApiConfig, ServeRestClient};
use serverest_core::Cart;
use serverest_fixtures::{self as fixtures, Context};
use tracing::{info, warn};

/// How every cart is closed at the end of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Close {
    Checkout,
    Cancel,
}

/// Run the scenario against the service configured in the environment.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or [`run_with`] fails.
pub async fn run(close: Close, keep: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = ApiConfig::from_env()?;
    let client = ServeRestClient::from_config(&config)?;
    run_with(&client, &config, close, keep).await?;
    Ok(())
}

/// Run the full chain, verify the carts, close them and clean up.
///
/// Returns the context the chain recorded.
///
/// # Errors
///
/// Returns an error if any setup step fails, a re-fetched cart differs from
/// the recorded one, or a close request is not accepted.
pub async fn run_with(
    client: &ServeRestClient,
    config: &ApiConfig,
    close: Close,
    keep: bool,
) -> Result<Context, Box<dyn std::error::Error>> {
    info!(base_url = %client.base_url(), "Running purchase scenario");

    let setup = fixtures::create_cart(client, config).await?;
    let (context, _) = setup.into_parts();
    summarize(&context);

    verify_carts(client, &context).await?;
    close_carts(client, &context, close).await?;

    if keep {
        info!("Keeping created users and products");
    } else {
        clean_up(client, &context).await?;
    }

    info!("Scenario complete");
    Ok(context)
}

fn summarize(context: &Context) {
    info!("Users:");
    for user in context.users_or_empty() {
        info!(
            "  {} <{}> admin={} id={}",
            user.name, user.email, user.is_admin, user.id
        );
    }

    if let Ok(products) = context.products() {
        info!("Products:");
        for product in products {
            info!(
                "  {} price={} stock={} id={}",
                product.name, product.price, product.quantity, product.id
            );
        }
    }

    if let Ok(carts) = context.carts() {
        info!("Carts:");
        for cart in carts {
            info!(
                "  {} user={} items={} total_quantity={} total_price={}",
                cart.id,
                cart.user_id,
                cart.items.len(),
                cart.total_quantity,
                cart.total_price
            );
        }
    }
}

/// Re-fetch every cart and compare it with the locally derived record.
async fn verify_carts(
    client: &ServeRestClient,
    context: &Context,
) -> Result<(), Box<dyn std::error::Error>> {
    for cart in context.carts()? {
        let response = client.carts().get(&cart.id).await?;
        let fetched: Cart = response.json()?;
        check_cart(cart, &fetched)?;
        info!(cart_id = %cart.id, "Cart totals verified");
    }
    Ok(())
}

/// Compare a re-fetched cart with the recorded one.
fn check_cart(expected: &Cart, fetched: &Cart) -> Result<(), String> {
    if fetched.total_price != expected.total_price
        || fetched.total_quantity != expected.total_quantity
    {
        return Err(format!(
            "Cart {} totals differ: expected {}/{}, server has {}/{}",
            expected.id,
            expected.total_quantity,
            expected.total_price,
            fetched.total_quantity,
            fetched.total_price
        ));
    }
    if fetched.items != expected.items {
        return Err(format!(
            "Cart {} items differ from the recorded payload",
            expected.id
        ));
    }
    Ok(())
}

async fn close_carts(
    client: &ServeRestClient,
    context: &Context,
    close: Close,
) -> Result<(), Box<dyn std::error::Error>> {
    for cart in context.carts()? {
        let token = context.user_token(&cart.user_id)?;
        let response = match close {
            Close::Checkout => client.carts().checkout(token).await?,
            Close::Cancel => client.carts().cancel(token).await?,
        };

        if !response.status().is_success() {
            return Err(format!(
                "Closing cart {} failed with {}: {}",
                cart.id,
                response.status(),
                response.text()
            )
            .into());
        }
        info!(
            cart_id = %cart.id,
            ?close,
            message = response.message().unwrap_or_default(),
            "Cart closed"
        );
    }
    Ok(())
}

/// Delete the created products, then the users.
async fn clean_up(
    client: &ServeRestClient,
    context: &Context,
) -> Result<(), Box<dyn std::error::Error>> {
    let token = context.random_admin_token(&mut rand::rng())?.clone();
    for product_id in context.product_ids()? {
        let response = client.products().delete(product_id, &token).await?;
        if !response.status().is_success() {
            warn!(%product_id, status = %response.status(), "Product not deleted");
        }
    }

    let responses = fixtures::delete_users(client, context.users_or_empty()).await?;
    info!("Deleted {} user(s)", responses.len());
    Ok(())
}
