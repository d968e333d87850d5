//! ModelRef - The unbound handle a query starts from.

use std::fmt;
use std::sync::Arc;

use super::{Model, ModelError, ModelStore};
use crate::query::Query;

/// Object-safe read access to the records of one model type.
///
/// Blanket-implemented for every [`ModelStore`], so queries can hold a store
/// behind `Arc<dyn ModelSource<M>>` without naming its concrete type.
pub trait ModelSource<M: Model>: Send + Sync {
    /// Load every record accepted by `predicate`, in insertion order.
    fn scan(&self, predicate: &dyn Fn(&M) -> bool) -> Result<Vec<M>, ModelError>;
}

impl<S: ModelStore, M: Model> ModelSource<M> for S {
    fn scan(&self, predicate: &dyn Fn(&M) -> bool) -> Result<Vec<M>, ModelError> {
        self.find_models(predicate)
    }
}

/// A fresh, un-queried handle onto the records of model `M`.
///
/// This is what a model factory produces. Calling [`ModelRef::new_query`]
/// upgrades it to a [`Query`] builder.
pub struct ModelRef<M: Model> {
    source: Arc<dyn ModelSource<M>>,
}

impl<M: Model> ModelRef<M> {
    /// Create a handle over the given store.
    pub fn new<S: ModelStore + 'static>(store: S) -> Self {
        Self {
            source: Arc::new(store),
        }
    }

    /// Start a new query with no clauses.
    pub fn new_query(&self) -> Query<M> {
        Query::new(Arc::clone(&self.source))
    }
}

impl<M: Model> Clone for ModelRef<M> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<M: Model> fmt::Debug for ModelRef<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRef")
            .field("collection", &M::COLLECTION)
            .finish()
    }
}
