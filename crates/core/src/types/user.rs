//! User records.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::UserId;
use super::token::AuthToken;

/// Payload for creating or replacing a user (`POST`/`PUT /usuarios`).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: Email,
    pub password: String,
    #[serde(rename = "administrador", with = "crate::types::flag")]
    pub is_admin: bool,
}

impl NewUser {
    /// Login payload for this user.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.as_str().to_owned(),
            password: self.password.clone(),
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

/// A user known to exist on the server.
///
/// `token` is never part of the wire format; it is attached locally once the
/// user has logged in.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: Email,
    pub password: String,
    #[serde(rename = "administrador", with = "crate::types::flag")]
    pub is_admin: bool,
    #[serde(skip)]
    pub token: Option<AuthToken>,
}

impl User {
    /// Record a freshly created user under the id the server assigned.
    #[must_use]
    pub fn created(id: UserId, payload: NewUser) -> Self {
        Self {
            id,
            name: payload.name,
            email: payload.email,
            password: payload.password,
            is_admin: payload.is_admin,
            token: None,
        }
    }

    /// Overwrite every replaceable field with an update payload.
    ///
    /// Updates are full replacements, so nothing from the previous record
    /// survives except the id and the login token.
    pub fn apply(&mut self, update: &NewUser) {
        self.name.clone_from(&update.name);
        self.email = update.email.clone();
        self.password.clone_from(&update.password);
        self.is_admin = update.is_admin;
    }

    /// Login payload for this user.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.as_str().to_owned(),
            password: self.password.clone(),
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("is_admin", &self.is_admin)
            .field("token", &self.token)
            .finish()
    }
}

/// Body of `POST /login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Both fields must be present before a login is attempted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
