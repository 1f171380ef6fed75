//! JSON fixture files.
//!
//! Generated payloads are written to disk before a setup chain consumes them,
//! so a failing run leaves the exact data it sent behind. Each file holds one
//! object whose list lives under the API's own key:
//!
//! ```json
//! { "usuarios": [ { "nome": "...", "email": "...", ... } ] }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

const JSON_EXTENSION: &str = ".json";

/// Errors from reading or writing fixture files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("File {} not found. Ensure the file is created first.", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File {} does not hold a JSON object", .0.display())]
    NotAnObject(PathBuf),
}

/// The fixture files a suite run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureFile {
    CreateUser,
    UpdateUser,
    CreateProduct,
    UpdateProduct,
    CreateCart,
}

impl FixtureFile {
    /// File name without extension.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateUser => "create_user_data",
            Self::UpdateUser => "update_user_data",
            Self::CreateProduct => "create_product_data",
            Self::UpdateProduct => "update_product_data",
            Self::CreateCart => "create_cart_data",
        }
    }

    /// Top-level key the list is stored under.
    #[must_use]
    pub const fn list_key(self) -> &'static str {
        match self {
            Self::CreateUser | Self::UpdateUser => "usuarios",
            Self::CreateProduct | Self::UpdateProduct => "produtos",
            Self::CreateCart => "carrinhos",
        }
    }
}

/// Reads and writes fixture files below one directory.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    dir: PathBuf,
}

impl FixtureStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of `name`, with `.json` appended unless already present.
    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        if name.ends_with(JSON_EXTENSION) {
            self.dir.join(name)
        } else {
            self.dir.join(format!("{name}{JSON_EXTENSION}"))
        }
    }

    /// Read a file's JSON content.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] naming the path when the file does not
    /// exist, or an I/O or JSON error otherwise.
    pub fn read(&self, name: &str) -> Result<Value, StoreError> {
        let path = self.path(name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(path));
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Overwrite a file with `value`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory or file cannot be written.
    pub fn write(&self, name: &str, value: &Value) -> Result<PathBuf, StoreError> {
        let path = self.path(name);
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let body = serde_json::to_string_pretty(value)?;
        fs::write(&path, body).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), "Wrote fixture file");
        Ok(path)
    }

    /// Merge the top-level keys of `patch` into a file.
    ///
    /// A missing file is treated as `{}`. Keys in `patch` replace existing
    /// keys wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotAnObject`] if the existing file is not a JSON
    /// object, or an I/O or JSON error.
    pub fn update(&self, name: &str, patch: Map<String, Value>) -> Result<PathBuf, StoreError> {
        let mut current = match self.read(name) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(StoreError::NotAnObject(self.path(name))),
            Err(StoreError::NotFound(_)) => Map::new(),
            Err(e) => return Err(e),
        };
        current.extend(patch);
        self.write(name, &Value::Object(current))
    }

    /// Overwrite a file with `{}`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn clear(&self, name: &str) -> Result<PathBuf, StoreError> {
        self.write(name, &Value::Object(Map::new()))
    }

    /// Write `items` under the file's list key.
    ///
    /// # Errors
    ///
    /// Returns an error if `items` cannot be encoded or the file written.
    pub fn write_list<T: Serialize>(
        &self,
        file: FixtureFile,
        items: &[T],
    ) -> Result<PathBuf, StoreError> {
        let mut body = Map::new();
        body.insert(file.list_key().to_string(), serde_json::to_value(items)?);
        self.write(file.name(), &Value::Object(body))
    }

    /// Read the list stored under the file's list key.
    ///
    /// A file without the key yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or an element does not decode
    /// as `T`.
    pub fn read_list<T: DeserializeOwned>(&self, file: FixtureFile) -> Result<Vec<T>, StoreError> {
        let mut body = self.read(file.name())?;
        match body.get_mut(file.list_key()) {
            Some(items) => Ok(serde_json::from_value(items.take())?),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use serverest_core::{Email, NewUser};

    use super::*;

    fn store() -> (tempfile::TempDir, FixtureStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FixtureStore::new(dir.path().join("data"));
        (dir, store)
    }

    #[test]
    fn test_path_appends_extension_once() {
        let store = FixtureStore::new("tests/data");
        assert_eq!(
            store.path("create_user_data"),
            PathBuf::from("tests/data/create_user_data.json")
        );
        assert_eq!(
            store.path("create_user_data.json"),
            PathBuf::from("tests/data/create_user_data.json")
        );
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let (_dir, store) = store();
        let err = store.read("absent").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref path) if path.ends_with("absent.json")));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_write_creates_directory_and_reads_back() {
        let (_dir, store) = store();
        let value = json!({ "produtos": [{ "nome": "Mouse", "preco": 10 }] });

        let path = store.write("create_product_data", &value).unwrap();
        assert!(path.exists());
        assert_eq!(store.read("create_product_data").unwrap(), value);
    }

    #[test]
    fn test_update_merges_top_level_keys() {
        let (_dir, store) = store();
        store
            .write("update_user_data", &json!({ "a": 1, "b": { "x": 1 } }))
            .unwrap();

        let mut patch = Map::new();
        patch.insert("b".to_string(), json!({ "y": 2 }));
        patch.insert("c".to_string(), json!(3));
        store.update("update_user_data", patch).unwrap();

        assert_eq!(
            store.read("update_user_data").unwrap(),
            json!({ "a": 1, "b": { "y": 2 }, "c": 3 })
        );
    }

    #[test]
    fn test_update_missing_file_starts_empty() {
        let (_dir, store) = store();
        let mut patch = Map::new();
        patch.insert("carrinhos".to_string(), json!([]));

        store.update("create_cart_data", patch).unwrap();
        assert_eq!(store.read("create_cart_data").unwrap(), json!({ "carrinhos": [] }));
    }

    #[test]
    fn test_update_rejects_non_object() {
        let (_dir, store) = store();
        store.write("list", &json!([1, 2])).unwrap();
        let err = store.update("list", Map::new()).unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject(_)));
    }

    #[test]
    fn test_clear_writes_empty_object() {
        let (_dir, store) = store();
        store.write("create_user_data", &json!({ "usuarios": [1] })).unwrap();
        store.clear("create_user_data").unwrap();
        assert_eq!(store.read("create_user_data").unwrap(), json!({}));
    }

    #[test]
    fn test_list_uses_wire_key() {
        let (_dir, store) = store();
        let users = vec![NewUser {
            name: "Fulano da Silva".to_string(),
            email: Email::parse("fulano@qa.com").unwrap(),
            password: "teste".to_string(),
            is_admin: true,
        }];

        store.write_list(FixtureFile::CreateUser, &users).unwrap();
        let raw = store.read("create_user_data").unwrap();
        assert_eq!(raw["usuarios"][0]["administrador"], json!("true"));

        let back: Vec<NewUser> = store.read_list(FixtureFile::CreateUser).unwrap();
        assert_eq!(back, users);
    }

    #[test]
    fn test_read_list_without_key_is_empty() {
        let (_dir, store) = store();
        store.clear(FixtureFile::CreateCart.name()).unwrap();
        let carts: Vec<Value> = store.read_list(FixtureFile::CreateCart).unwrap();
        assert!(carts.is_empty());
    }
}
