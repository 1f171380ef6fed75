//! Cart records.
//!
//! A cart is created from a list of product lines; the server prices each
//! line and derives the totals. The suite recomputes those totals locally
//! from the prices it recorded when the products were created.

use serde::{Deserialize, Serialize};

use super::id::{CartId, ProductId, UserId};

/// One product line of a cart payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "idProduto")]
    pub product_id: ProductId,
    #[serde(rename = "quantidade")]
    pub quantity: u64,
}

/// Payload for `POST /carrinhos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCart {
    #[serde(rename = "produtos")]
    pub lines: Vec<CartLine>,
}

/// A priced line of a cart, as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "idProduto")]
    pub product_id: ProductId,
    #[serde(rename = "quantidade")]
    pub quantity: u64,
    #[serde(rename = "precoUnitario")]
    pub unit_price: u64,
}

impl CartItem {
    /// Price of the whole line.
    #[must_use]
    pub const fn line_total(&self) -> Option<u64> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// A cart known to exist on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(rename = "_id")]
    pub id: CartId,
    #[serde(rename = "produtos")]
    pub items: Vec<CartItem>,
    #[serde(rename = "precoTotal")]
    pub total_price: u64,
    #[serde(rename = "quantidadeTotal")]
    pub total_quantity: u64,
    #[serde(rename = "idUsuario")]
    pub user_id: UserId,
}

impl Cart {
    /// Whether the cart references the given product.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|item| &item.product_id == product_id)
    }
}
