//! Random, schema-valid payloads.
//!
//! Values are random but always accepted by the API's validation: emails and
//! product names carry a UUID so they never collide with existing records,
//! and cart lines never ask for more units than a product has in stock.
//! Rejections are not retried; the fixture that sent the payload fails.

use std::collections::BTreeMap;

use rand::Rng;
use rand::distr::Alphanumeric;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use serverest_core::{CartLine, Email, EmailError, NewCart, NewProduct, NewUser, ProductId};
use uuid::Uuid;

use crate::error::SetupError;

const FIRST_NAMES: &[&str] = &[
    "Ana", "Bruno", "Carla", "Diego", "Elisa", "Fulano", "Gabriela", "Heitor", "Isabela", "Joao",
    "Larissa", "Marcos", "Natalia", "Otavio", "Paula", "Rafael",
];

const LAST_NAMES: &[&str] = &[
    "Almeida", "Barbosa", "Cardoso", "Costa", "Ferreira", "Gomes", "Lima", "Martins", "Oliveira",
    "Pereira", "Ribeiro", "Santos", "Silva", "Souza",
];

const PRODUCT_ADJECTIVES: &[&str] = &[
    "Compact", "Ergonomic", "Portable", "Rugged", "Sleek", "Smart", "Wireless", "Vintage",
];

const PRODUCT_NOUNS: &[&str] = &[
    "Keyboard", "Mouse", "Monitor", "Headset", "Speaker", "Webcam", "Charger", "Lamp", "Backpack",
];

const EMAIL_DOMAIN: &str = "qa.serverest.dev";
const PASSWORD_LEN: usize = 12;
const MIN_PRICE: u64 = 1;
const MAX_PRICE: u64 = 1000;
const MIN_STOCK: u64 = 10;
const MAX_STOCK: u64 = 100;

/// Payload generator over any random source.
///
/// Seed it with a `rand::rngs::StdRng` for reproducible output.
#[derive(Debug)]
pub struct DataGenerator<R = ThreadRng> {
    rng: R,
}

impl Default for DataGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new(rand::rng())
    }
}

impl<R: Rng> DataGenerator<R> {
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Users for `POST /usuarios`. The first is always an administrator, so a
    /// product fixture always has someone to act as.
    ///
    /// # Errors
    ///
    /// Returns the validation error if a generated address is rejected.
    pub fn users_for_create(&mut self, count: usize) -> Result<Vec<NewUser>, EmailError> {
        (0..count)
            .map(|index| {
                let is_admin = index == 0 || self.rng.random_bool(0.5);
                self.user(is_admin)
            })
            .collect()
    }

    /// Replacement users for `PUT /usuarios/{id}`.
    ///
    /// # Errors
    ///
    /// Returns the validation error if a generated address is rejected.
    pub fn users_for_update(&mut self, count: usize) -> Result<Vec<NewUser>, EmailError> {
        (0..count)
            .map(|_| {
                let is_admin = self.rng.random_bool(0.5);
                self.user(is_admin)
            })
            .collect()
    }

    /// Products for `POST /produtos`.
    pub fn products_for_create(&mut self, count: usize) -> Vec<NewProduct> {
        (0..count).map(|_| self.product()).collect()
    }

    /// Replacement products for `PUT /produtos/{id}`.
    pub fn products_for_update(&mut self, count: usize) -> Vec<NewProduct> {
        (0..count).map(|_| self.product()).collect()
    }

    /// Cart payloads drawn from existing products.
    ///
    /// Each cart holds between one and `max_products_per_cart` distinct
    /// products, each with between one and `max_quantity_per_product` units,
    /// capped by the stock recorded in `stock`. Products without stock are
    /// never picked; a product missing from `stock` is capped only by
    /// `max_quantity_per_product`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::NoProducts`] if `product_ids` is empty and
    /// [`SetupError::NoStock`] if none of them has units left.
    pub fn carts_for_create(
        &mut self,
        product_ids: &[ProductId],
        stock: &BTreeMap<ProductId, u64>,
        count: usize,
        max_products_per_cart: usize,
        max_quantity_per_product: u64,
    ) -> Result<Vec<NewCart>, SetupError> {
        if product_ids.is_empty() {
            return Err(SetupError::NoProducts);
        }

        let available: Vec<(&ProductId, u64)> = product_ids
            .iter()
            .map(|id| {
                let units = stock.get(id).copied().unwrap_or(max_quantity_per_product);
                (id, units.min(max_quantity_per_product))
            })
            .filter(|(_, cap)| *cap > 0)
            .collect();

        if available.is_empty() {
            return Err(SetupError::NoStock);
        }

        let per_cart = max_products_per_cart.clamp(1, available.len());

        let carts = (0..count)
            .map(|_| {
                let size = self.rng.random_range(1..=per_cart);
                let lines = available
                    .choose_multiple(&mut self.rng, size)
                    .map(|&(id, cap)| CartLine {
                        product_id: id.clone(),
                        quantity: self.rng.random_range(1..=cap),
                    })
                    .collect();
                NewCart { lines }
            })
            .collect();

        Ok(carts)
    }

    fn user(&mut self, is_admin: bool) -> Result<NewUser, EmailError> {
        let first = FIRST_NAMES.choose(&mut self.rng).copied().unwrap_or("Fulano");
        let last = LAST_NAMES.choose(&mut self.rng).copied().unwrap_or("Silva");
        let password: String = (&mut self.rng)
            .sample_iter(Alphanumeric)
            .take(PASSWORD_LEN)
            .map(char::from)
            .collect();

        Ok(NewUser {
            name: format!("{first} {last}"),
            email: unique_email(first)?,
            password,
            is_admin,
        })
    }

    fn product(&mut self) -> NewProduct {
        let adjective = PRODUCT_ADJECTIVES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or("Smart");
        let noun = PRODUCT_NOUNS.choose(&mut self.rng).copied().unwrap_or("Mouse");

        NewProduct {
            name: format!("{adjective} {noun} {}", Uuid::new_v4().simple()),
            price: self.rng.random_range(MIN_PRICE..=MAX_PRICE),
            description: format!("{adjective} {} for everyday use", noun.to_lowercase()),
            quantity: self.rng.random_range(MIN_STOCK..=MAX_STOCK),
        }
    }
}

/// A never-before-seen address under the QA domain.
fn unique_email(first_name: &str) -> Result<Email, EmailError> {
    Email::parse(&format!(
        "{}.{}@{EMAIL_DOMAIN}",
        first_name.to_lowercase(),
        Uuid::new_v4().simple()
    ))
}
