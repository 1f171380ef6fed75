//! In-memory ServeRest state and business rules.
//!
//! Every operation returns the status and JSON body the real service answers
//! with, including its Portuguese messages.

use std::collections::{HashMap, HashSet};

use axum::http::StatusCode;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use serverest_core::{
    Cart, CartId, CartItem, Credentials, NewCart, NewProduct, NewUser, Product, ProductId, User,
    UserId, calculator,
};

pub type Reply = (StatusCode, Value);

const ID_LEN: usize = 16;
const TOKEN_LEN: usize = 32;

const MSG_CREATED: &str = "Cadastro realizado com sucesso";
const MSG_UPDATED: &str = "Registro alterado com sucesso";
const MSG_DELETED: &str = "Registro excluído com sucesso";
const MSG_NOTHING_DELETED: &str = "Nenhum registro excluído";
const MSG_RESTOCKED: &str = "Registro excluído com sucesso. Estoque dos produtos reabastecido";
const MSG_LOGIN: &str = "Login realizado com sucesso";
const MSG_BAD_LOGIN: &str = "Email e/ou senha inválidos";
const MSG_BAD_TOKEN: &str =
    "Token de acesso ausente, inválido, expirado ou usuário utilizado no token não existe mais";
const MSG_ADMIN_ONLY: &str = "Rota exclusiva para administradores";
const MSG_EMAIL_TAKEN: &str = "Este email já está sendo usado";
const MSG_NAME_TAKEN: &str = "Já existe produto com esse nome";
const MSG_NO_USER: &str = "Usuário não encontrado";
const MSG_NO_PRODUCT: &str = "Produto não encontrado";
const MSG_NO_CART: &str = "Carrinho não encontrado";
const MSG_NO_CART_FOR_USER: &str = "Não foi encontrado carrinho para esse usuário";
const MSG_ONE_CART: &str = "Não é permitido ter mais de 1 carrinho";
const MSG_DUPLICATE_PRODUCT: &str = "Não é permitido possuir produto duplicado";
const MSG_LOW_STOCK: &str = "Produto não possui quantidade suficiente";
const MSG_USER_HAS_CART: &str = "Não é permitido excluir usuário com carrinho cadastrado";
const MSG_PRODUCT_IN_CART: &str = "Não é permitido excluir produto que faz parte de carrinho";

fn message(status: StatusCode, text: &str) -> Reply {
    (status, json!({ "message": text }))
}

fn created(id: &str) -> Reply {
    (
        StatusCode::CREATED,
        json!({ "message": MSG_CREATED, "_id": id }),
    )
}

fn random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn to_json<T: Serialize>(value: &T) -> Reply {
    match serde_json::to_value(value) {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => message(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

fn parse<T: DeserializeOwned>(body: Value) -> Result<T, Reply> {
    serde_json::from_value(body).map_err(|e| message(StatusCode::BAD_REQUEST, &e.to_string()))
}

/// Whether every query pair equals the record's field of the same name.
pub fn matches_query<T: Serialize>(record: &T, query: &HashMap<String, String>) -> bool {
    let Ok(Value::Object(fields)) = serde_json::to_value(record) else {
        return false;
    };
    query.iter().all(|(key, expected)| match fields.get(key) {
        Some(Value::String(actual)) => actual == expected,
        Some(Value::Number(actual)) => actual.to_string() == *expected,
        _ => false,
    })
}

fn listing<T: Serialize>(key: &str, records: &[&T]) -> Reply {
    let items = match serde_json::to_value(records) {
        Ok(items) => items,
        Err(e) => return message(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    };
    let mut body = Map::new();
    body.insert("quantidade".to_string(), json!(records.len()));
    body.insert(key.to_string(), items);
    (StatusCode::OK, Value::Object(body))
}

/// The whole fake database.
#[derive(Debug, Default)]
pub struct FakeStore {
    users: Vec<User>,
    products: Vec<Product>,
    carts: Vec<Cart>,
    sessions: HashMap<String, UserId>,
}

impl FakeStore {
    // =========================================================================
    // Users
    // =========================================================================

    pub fn create_user(&mut self, body: Value) -> Reply {
        let payload: NewUser = match parse(body) {
            Ok(payload) => payload,
            Err(reply) => return reply,
        };
        if self.users.iter().any(|user| user.email == payload.email) {
            return message(StatusCode::BAD_REQUEST, MSG_EMAIL_TAKEN);
        }

        let id = random_string(ID_LEN);
        self.users.push(User::created(UserId::new(id.clone()), payload));
        created(&id)
    }

    pub fn list_users(&self, query: &HashMap<String, String>) -> Reply {
        let users: Vec<&User> = self
            .users
            .iter()
            .filter(|user| matches_query(user, query))
            .collect();
        listing("usuarios", &users)
    }

    pub fn get_user(&self, id: &str) -> Reply {
        self.users
            .iter()
            .find(|user| user.id.as_str() == id)
            .map_or_else(|| message(StatusCode::BAD_REQUEST, MSG_NO_USER), to_json)
    }

    pub fn update_user(&mut self, id: &str, body: Value) -> Reply {
        let payload: NewUser = match parse(body) {
            Ok(payload) => payload,
            Err(reply) => return reply,
        };
        if self
            .users
            .iter()
            .any(|user| user.email == payload.email && user.id.as_str() != id)
        {
            return message(StatusCode::BAD_REQUEST, MSG_EMAIL_TAKEN);
        }

        if let Some(user) = self.users.iter_mut().find(|user| user.id.as_str() == id) {
            user.apply(&payload);
            return message(StatusCode::OK, MSG_UPDATED);
        }

        self.users.push(User::created(UserId::new(id), payload));
        created(id)
    }

    pub fn delete_user(&mut self, id: &str) -> Reply {
        if let Some(cart) = self.carts.iter().find(|cart| cart.user_id.as_str() == id) {
            return (
                StatusCode::BAD_REQUEST,
                json!({ "message": MSG_USER_HAS_CART, "idCarrinho": cart.id }),
            );
        }

        let before = self.users.len();
        self.users.retain(|user| user.id.as_str() != id);
        if self.users.len() == before {
            return message(StatusCode::OK, MSG_NOTHING_DELETED);
        }
        self.sessions.retain(|_, user_id| user_id.as_str() != id);
        message(StatusCode::OK, MSG_DELETED)
    }

    // =========================================================================
    // Login
    // =========================================================================

    pub fn login(&mut self, body: Value) -> Reply {
        let credentials: Credentials = match parse(body) {
            Ok(credentials) => credentials,
            Err(reply) => return reply,
        };
        let Some(user) = self.users.iter().find(|user| {
            user.email.as_str() == credentials.email && user.password == credentials.password
        }) else {
            return message(StatusCode::UNAUTHORIZED, MSG_BAD_LOGIN);
        };

        let token = format!("Bearer {}", random_string(TOKEN_LEN));
        self.sessions.insert(token.clone(), user.id.clone());
        (
            StatusCode::OK,
            json!({ "message": MSG_LOGIN, "authorization": token }),
        )
    }

    fn authenticate(&self, token: Option<&str>) -> Result<User, Reply> {
        token
            .and_then(|token| self.sessions.get(token))
            .and_then(|id| self.users.iter().find(|user| &user.id == id))
            .cloned()
            .ok_or_else(|| message(StatusCode::UNAUTHORIZED, MSG_BAD_TOKEN))
    }

    fn authenticate_admin(&self, token: Option<&str>) -> Result<User, Reply> {
        let user = self.authenticate(token)?;
        if user.is_admin {
            Ok(user)
        } else {
            Err(message(StatusCode::FORBIDDEN, MSG_ADMIN_ONLY))
        }
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub fn create_product(&mut self, token: Option<&str>, body: Value) -> Reply {
        if let Err(reply) = self.authenticate_admin(token) {
            return reply;
        }
        let payload: NewProduct = match parse(body) {
            Ok(payload) => payload,
            Err(reply) => return reply,
        };
        if self.products.iter().any(|product| product.name == payload.name) {
            return message(StatusCode::BAD_REQUEST, MSG_NAME_TAKEN);
        }

        let id = random_string(ID_LEN);
        self.products
            .push(Product::created(ProductId::new(id.clone()), payload));
        created(&id)
    }

    pub fn list_products(&self, query: &HashMap<String, String>) -> Reply {
        let products: Vec<&Product> = self
            .products
            .iter()
            .filter(|product| matches_query(product, query))
            .collect();
        listing("produtos", &products)
    }

    pub fn get_product(&self, id: &str) -> Reply {
        self.products
            .iter()
            .find(|product| product.id.as_str() == id)
            .map_or_else(|| message(StatusCode::BAD_REQUEST, MSG_NO_PRODUCT), to_json)
    }

    pub fn update_product(&mut self, token: Option<&str>, id: &str, body: Value) -> Reply {
        if let Err(reply) = self.authenticate_admin(token) {
            return reply;
        }
        let payload: NewProduct = match parse(body) {
            Ok(payload) => payload,
            Err(reply) => return reply,
        };
        if self
            .products
            .iter()
            .any(|product| product.name == payload.name && product.id.as_str() != id)
        {
            return message(StatusCode::BAD_REQUEST, MSG_NAME_TAKEN);
        }

        if let Some(product) = self
            .products
            .iter_mut()
            .find(|product| product.id.as_str() == id)
        {
            product.apply(&payload);
            return message(StatusCode::OK, MSG_UPDATED);
        }

        self.products.push(Product::created(ProductId::new(id), payload));
        created(id)
    }

    pub fn delete_product(&mut self, token: Option<&str>, id: &str) -> Reply {
        if let Err(reply) = self.authenticate_admin(token) {
            return reply;
        }
        let product_id = ProductId::new(id);
        if let Some(cart) = self.carts.iter().find(|cart| cart.contains(&product_id)) {
            return (
                StatusCode::BAD_REQUEST,
                json!({ "message": MSG_PRODUCT_IN_CART, "idCarrinhos": [cart.id] }),
            );
        }

        let before = self.products.len();
        self.products.retain(|product| product.id != product_id);
        if self.products.len() == before {
            message(StatusCode::OK, MSG_NOTHING_DELETED)
        } else {
            message(StatusCode::OK, MSG_DELETED)
        }
    }

    // =========================================================================
    // Carts
    // =========================================================================

    pub fn create_cart(&mut self, token: Option<&str>, body: Value) -> Reply {
        let user = match self.authenticate(token) {
            Ok(user) => user,
            Err(reply) => return reply,
        };
        if self.carts.iter().any(|cart| cart.user_id == user.id) {
            return message(StatusCode::BAD_REQUEST, MSG_ONE_CART);
        }
        let payload: NewCart = match parse(body) {
            Ok(payload) => payload,
            Err(reply) => return reply,
        };

        let mut seen = HashSet::new();
        if !payload.lines.iter().all(|line| seen.insert(&line.product_id)) {
            return message(StatusCode::BAD_REQUEST, MSG_DUPLICATE_PRODUCT);
        }

        let mut items = Vec::with_capacity(payload.lines.len());
        for line in &payload.lines {
            let Some(product) = self.products.iter().find(|p| p.id == line.product_id) else {
                return (
                    StatusCode::BAD_REQUEST,
                    json!({ "message": MSG_NO_PRODUCT, "item": { "idProduto": line.product_id } }),
                );
            };
            if product.quantity < line.quantity {
                return message(StatusCode::BAD_REQUEST, MSG_LOW_STOCK);
            }
            items.push(CartItem {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                unit_price: product.price,
            });
        }

        let Ok(total_quantity) = calculator::total_quantity(&payload.lines) else {
            return message(StatusCode::BAD_REQUEST, "produtos não pode ficar em branco");
        };
        let Some(total_price) = items
            .iter()
            .try_fold(0_u64, |total, item| total.checked_add(item.line_total()?))
        else {
            return message(StatusCode::BAD_REQUEST, "precoTotal excede o limite");
        };

        self.move_stock(&items, Direction::Reserve);

        let id = random_string(ID_LEN);
        self.carts.push(Cart {
            id: CartId::new(id.clone()),
            items,
            total_price,
            total_quantity,
            user_id: user.id,
        });
        created(&id)
    }

    pub fn list_carts(&self, query: &HashMap<String, String>) -> Reply {
        let carts: Vec<&Cart> = self
            .carts
            .iter()
            .filter(|cart| matches_query(cart, query))
            .collect();
        listing("carrinhos", &carts)
    }

    pub fn get_cart(&self, id: &str) -> Reply {
        self.carts
            .iter()
            .find(|cart| cart.id.as_str() == id)
            .map_or_else(|| message(StatusCode::BAD_REQUEST, MSG_NO_CART), to_json)
    }

    /// Remove the caller's cart; `restock` returns its units to the products.
    pub fn close_cart(&mut self, token: Option<&str>, restock: bool) -> Reply {
        let user = match self.authenticate(token) {
            Ok(user) => user,
            Err(reply) => return reply,
        };
        let Some(position) = self.carts.iter().position(|cart| cart.user_id == user.id) else {
            return message(StatusCode::OK, MSG_NO_CART_FOR_USER);
        };

        let cart = self.carts.remove(position);
        if restock {
            self.move_stock(&cart.items, Direction::Release);
            message(StatusCode::OK, MSG_RESTOCKED)
        } else {
            message(StatusCode::OK, MSG_DELETED)
        }
    }

    fn move_stock(&mut self, items: &[CartItem], direction: Direction) {
        for item in items {
            if let Some(product) = self
                .products
                .iter_mut()
                .find(|product| product.id == item.product_id)
            {
                product.quantity = match direction {
                    Direction::Reserve => product.quantity.saturating_sub(item.quantity),
                    Direction::Release => product.quantity.saturating_add(item.quantity),
                };
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Reserve,
    Release,
}
