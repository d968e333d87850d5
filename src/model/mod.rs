//! Models - Typed records the repository queries over.
//!
//! A model is any serializable type with a collection name and an id. Stores
//! persist models; a [`ModelRef`] is the unbound handle a repository starts
//! every query from.
//!
//! ## Example
//!
//! ```ignore
//! use criteria_repository::{InMemoryModelStore, Model, ModelRef, ModelStore};
//!
//! #[derive(Serialize, Deserialize, Clone, Model)]
//! #[model(collection = "users")]
//! struct User {
//!     pub id: String,
//!     pub active: bool,
//! }
//!
//! let store = InMemoryModelStore::new();
//! store.save_model(&user)?;
//! let active = ModelRef::<User>::new(store).new_query().where_eq("active", true).get()?;
//! ```

mod in_memory;
mod model_ref;
mod store;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Trait for types that can be stored and queried as models.
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection name for this model type (e.g., "users", "invoices").
    /// Maps to a table in SQL, a collection in MongoDB, a key prefix in KV stores, etc.
    const COLLECTION: &'static str;

    /// Returns the unique identifier for this model instance.
    fn id(&self) -> &str;
}

/// Error type for model store and query operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Serialization/deserialization error.
    #[error("model serialization error: {0}")]
    Serde(String),
    /// Storage-level error.
    #[error("model storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Serde(err.to_string())
    }
}

pub use in_memory::InMemoryModelStore;
pub use model_ref::{ModelRef, ModelSource};
pub use store::ModelStore;
