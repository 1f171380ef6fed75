//! Entities accumulated by a setup chain.
//!
//! Each collection is set once by the step that creates it. Later steps and
//! test bodies read it back through the lookups below, which fail with a
//! [`SetupError`] naming the step that should have run.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::IndexedRandom;
use serverest_core::{AuthToken, Cart, Product, ProductId, User, UserId};

use crate::error::SetupError;

/// Users, products and carts created for one test.
#[derive(Debug, Clone, Default)]
pub struct Context {
    users: Option<Vec<User>>,
    products: Option<Vec<Product>>,
    product_ids: Option<Vec<ProductId>>,
    carts: Option<Vec<Cart>>,
}

/// Store `value` under `slot` unless it already holds something.
fn set_once<T>(slot: &mut Option<T>, key: &'static str, value: T) -> Result<(), SetupError> {
    if slot.is_some() {
        return Err(SetupError::AlreadySet(key));
    }
    *slot = Some(value);
    Ok(())
}

/// A non-empty collection, or `missing`.
fn non_empty<T>(slot: Option<&Vec<T>>, missing: SetupError) -> Result<&[T], SetupError> {
    match slot {
        Some(items) if !items.is_empty() => Ok(items.as_slice()),
        _ => Err(missing),
    }
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Writers
    // =========================================================================

    /// Record the created users.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::AlreadySet`] if users were already recorded.
    pub fn set_users(&mut self, users: Vec<User>) -> Result<(), SetupError> {
        set_once(&mut self.users, "users", users)
    }

    /// Record the created products and their ids.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::AlreadySet`] if products were already recorded.
    pub fn set_products(&mut self, products: Vec<Product>) -> Result<(), SetupError> {
        let ids = products.iter().map(|product| product.id.clone()).collect();
        set_once(&mut self.products, "products", products)?;
        set_once(&mut self.product_ids, "productIds", ids)
    }

    /// Record the created carts.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::AlreadySet`] if carts were already recorded.
    pub fn set_carts(&mut self, carts: Vec<Cart>) -> Result<(), SetupError> {
        set_once(&mut self.carts, "carts", carts)
    }

    /// Mutable access to the users, e.g. to attach tokens or apply updates.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::NoUsers`] if no users were recorded.
    pub fn users_mut(&mut self) -> Result<&mut [User], SetupError> {
        match self.users.as_mut() {
            Some(users) if !users.is_empty() => Ok(users.as_mut_slice()),
            _ => Err(SetupError::NoUsers),
        }
    }

    /// Mutable access to the products, e.g. to apply updates.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::NoProducts`] if no products were recorded.
    pub fn products_mut(&mut self) -> Result<&mut [Product], SetupError> {
        match self.products.as_mut() {
            Some(products) if !products.is_empty() => Ok(products.as_mut_slice()),
            _ => Err(SetupError::NoProducts),
        }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// # Errors
    ///
    /// Returns [`SetupError::NoUsers`] if no users were recorded.
    pub fn users(&self) -> Result<&[User], SetupError> {
        non_empty(self.users.as_ref(), SetupError::NoUsers)
    }

    /// # Errors
    ///
    /// Returns [`SetupError::NoProducts`] if no products were recorded.
    pub fn products(&self) -> Result<&[Product], SetupError> {
        non_empty(self.products.as_ref(), SetupError::NoProducts)
    }

    /// # Errors
    ///
    /// Returns [`SetupError::NoProducts`] if no products were recorded.
    pub fn product_ids(&self) -> Result<&[ProductId], SetupError> {
        non_empty(self.product_ids.as_ref(), SetupError::NoProducts)
    }

    /// # Errors
    ///
    /// Returns [`SetupError::NoCarts`] if no carts were recorded.
    pub fn carts(&self) -> Result<&[Cart], SetupError> {
        non_empty(self.carts.as_ref(), SetupError::NoCarts)
    }

    /// Users recorded so far, possibly none.
    #[must_use]
    pub fn users_or_empty(&self) -> &[User] {
        self.users.as_deref().unwrap_or_default()
    }

    /// A recorded user by id.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::NoUsers`] or [`SetupError::UserNotFound`].
    pub fn user(&self, id: &UserId) -> Result<&User, SetupError> {
        self.users()?
            .iter()
            .find(|user| &user.id == id)
            .ok_or_else(|| SetupError::UserNotFound(id.clone()))
    }

    /// The login token of a recorded user.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::NoUsers`], [`SetupError::UserNotFound`], or
    /// [`SetupError::MissingToken`] if the user never logged in.
    pub fn user_token(&self, id: &UserId) -> Result<&AuthToken, SetupError> {
        self.user(id)?
            .token
            .as_ref()
            .ok_or_else(|| SetupError::MissingToken(id.clone()))
    }

    /// The token of an administrator picked at random.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::NoUsers`], [`SetupError::NoAdmins`], or
    /// [`SetupError::MissingToken`] if the chosen admin never logged in.
    pub fn random_admin_token<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&AuthToken, SetupError> {
        let admins: Vec<&User> = self.users()?.iter().filter(|user| user.is_admin).collect();
        let admin = admins.choose(rng).copied().ok_or(SetupError::NoAdmins)?;
        admin
            .token
            .as_ref()
            .ok_or_else(|| SetupError::MissingToken(admin.id.clone()))
    }

    /// A recorded product by id.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::NoProducts`] or [`SetupError::ProductNotFound`].
    pub fn product(&self, id: &ProductId) -> Result<&Product, SetupError> {
        self.products()?
            .iter()
            .find(|product| &product.id == id)
            .ok_or_else(|| SetupError::ProductNotFound(id.clone()))
    }

    /// The price a product was created with.
    ///
    /// # Errors
    ///
    /// Same as [`Context::product`].
    pub fn product_price(&self, id: &ProductId) -> Result<u64, SetupError> {
        self.product(id).map(|product| product.price)
    }

    /// Units in stock per product id, as recorded at creation.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::NoProducts`] if no products were recorded.
    pub fn product_stock(&self) -> Result<BTreeMap<ProductId, u64>, SetupError> {
        Ok(self
            .products()?
            .iter()
            .map(|product| (product.id.clone(), product.quantity))
            .collect())
    }
}
