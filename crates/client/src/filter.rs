//! Query filters for the list endpoints.
//!
//! Each filter is a struct of optional fields. Only fields that are set become
//! `key=value` query pairs, in field declaration order.

use serverest_core::types::flag;
use serverest_core::{CartId, Email, ProductId, UserId};
use url::Url;

/// A set of optional query parameters.
pub trait QueryFilter {
    /// The `(key, value)` pairs of every field that is set, in declaration order.
    fn pairs(&self) -> Vec<(&'static str, String)>;

    /// Append the set pairs to `url`. Leaves `url` untouched when none are set.
    fn apply(&self, url: &mut Url) {
        let pairs = self.pairs();
        if pairs.is_empty() {
            return;
        }
        let mut query = url.query_pairs_mut();
        for (key, value) in &pairs {
            query.append_pair(key, value);
        }
    }
}

/// Push `(key, value)` when `value` is set.
fn push<T: ToString>(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&T>) {
    if let Some(value) = value {
        pairs.push((key, value.to_string()));
    }
}

/// Filter for `GET /usuarios`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub id: Option<UserId>,
    pub name: Option<String>,
    pub email: Option<Email>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

impl QueryFilter for UserFilter {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "_id", self.id.as_ref());
        push(&mut pairs, "nome", self.name.as_ref());
        push(&mut pairs, "email", self.email.as_ref());
        push(&mut pairs, "password", self.password.as_ref());
        if let Some(is_admin) = self.is_admin {
            pairs.push(("administrador", flag::as_str(is_admin).to_string()));
        }
        pairs
    }
}

/// Filter for `GET /produtos`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub id: Option<ProductId>,
    pub name: Option<String>,
    pub price: Option<u64>,
    pub description: Option<String>,
    pub quantity: Option<u64>,
}

impl QueryFilter for ProductFilter {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "_id", self.id.as_ref());
        push(&mut pairs, "nome", self.name.as_ref());
        push(&mut pairs, "preco", self.price.as_ref());
        push(&mut pairs, "descricao", self.description.as_ref());
        push(&mut pairs, "quantidade", self.quantity.as_ref());
        pairs
    }
}

/// Filter for `GET /carrinhos`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartFilter {
    pub id: Option<CartId>,
    pub total_price: Option<u64>,
    pub total_quantity: Option<u64>,
    pub user_id: Option<UserId>,
}

impl QueryFilter for CartFilter {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "_id", self.id.as_ref());
        push(&mut pairs, "precoTotal", self.total_price.as_ref());
        push(&mut pairs, "quantidadeTotal", self.total_quantity.as_ref());
        push(&mut pairs, "idUsuario", self.user_id.as_ref());
        pairs
    }
}
