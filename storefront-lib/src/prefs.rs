//! Per-user preference storage.
//!
//! Filter, sort, and search state and the cart are kept as one JSON file
//! per key, named `<namespace>_<key>.json`, so several storefronts can
//! share a directory without clobbering each other.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use storefront_catalog::{FilterState, SortState};
use thiserror::Error;

use crate::cart::Cart;

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Malformed preference file {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

const KEYS: [&str; 4] = ["filters", "sort", "search", "cart"];

#[derive(Debug, Clone)]
pub struct PreferencesStore {
    dir: PathBuf,
    namespace: String,
}

impl PreferencesStore {
    pub fn new(dir: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            namespace: namespace.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn save_filters(&self, filters: &FilterState) -> Result<(), PrefsError> {
        self.save("filters", filters)
    }

    pub fn load_filters(&self) -> Result<Option<FilterState>, PrefsError> {
        self.load("filters")
    }

    pub fn save_sort(&self, sort: &SortState) -> Result<(), PrefsError> {
        self.save("sort", sort)
    }

    pub fn load_sort(&self) -> Result<Option<SortState>, PrefsError> {
        self.load("sort")
    }

    /// A blank term is stored as "no search".
    pub fn save_search_term(&self, term: &str) -> Result<(), PrefsError> {
        if term.trim().is_empty() {
            return self.remove("search");
        }
        self.save("search", &term)
    }

    pub fn load_search_term(&self) -> Result<Option<String>, PrefsError> {
        self.load("search")
    }

    pub fn save_cart(&self, cart: &Cart) -> Result<(), PrefsError> {
        self.save("cart", cart)
    }

    pub fn load_cart(&self) -> Result<Option<Cart>, PrefsError> {
        self.load("cart")
    }

    /// Remove every stored key for this namespace.
    pub fn clear(&self) -> Result<(), PrefsError> {
        for key in KEYS {
            self.remove(key)?;
        }
        Ok(())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}_{key}.json", self.namespace))
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PrefsError> {
        let path = self.path_for(key);
        let io_err = |source| PrefsError::Io {
            path: path.display().to_string(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(io_err)?;
        let json = serde_json::to_string_pretty(value).map_err(|source| PrefsError::Json {
            path: path.display().to_string(),
            source,
        })?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &path).map_err(io_err)?;
        log::debug!("Saved {key} preferences to {}", path.display());
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PrefsError> {
        let path = self.path_for(key);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PrefsError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| PrefsError::Json {
                path: path.display().to_string(),
                source,
            })
    }

    fn remove(&self, key: &str) -> Result<(), PrefsError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PrefsError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}
