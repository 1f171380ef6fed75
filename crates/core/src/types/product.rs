//! Product records.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Payload for creating or replacing a product (`POST`/`PUT /produtos`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "preco")]
    pub price: u64,
    #[serde(rename = "descricao")]
    pub description: String,
    /// Units in stock.
    #[serde(rename = "quantidade")]
    pub quantity: u64,
}

/// A product known to exist on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "preco")]
    pub price: u64,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "quantidade")]
    pub quantity: u64,
}

impl Product {
    /// Record a freshly created product under the id the server assigned.
    #[must_use]
    pub fn created(id: ProductId, payload: NewProduct) -> Self {
        Self {
            id,
            name: payload.name,
            price: payload.price,
            description: payload.description,
            quantity: payload.quantity,
        }
    }

    /// Overwrite every replaceable field with an update payload.
    pub fn apply(&mut self, update: &NewProduct) {
        self.name.clone_from(&update.name);
        self.price = update.price;
        self.description.clone_from(&update.description);
        self.quantity = update.quantity;
    }
}
