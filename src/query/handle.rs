//! Handle - Either an unbound model reference or a query in progress.

use super::Query;
use crate::model::{Model, ModelRef};

/// The repository's current queryable handle.
///
/// Criteria receive and return handles, so they must cope with both states.
/// Most criteria simply call [`Handle::into_query`] and add clauses.
#[derive(Debug)]
pub enum Handle<M: Model> {
    /// A fresh model reference with no query started.
    Unbound(ModelRef<M>),
    /// A query builder carrying the clauses applied so far.
    Bound(Query<M>),
}

impl<M: Model> Handle<M> {
    pub fn is_bound(&self) -> bool {
        matches!(self, Handle::Bound(_))
    }

    /// Upgrade to a query builder in place and return it.
    pub fn ensure_bound(&mut self) -> &mut Query<M> {
        if let Handle::Unbound(model) = self {
            *self = Handle::Bound(model.new_query());
        }

        match self {
            Handle::Bound(query) => query,
            Handle::Unbound(_) => unreachable!("handle was bound above"),
        }
    }

    /// Consume the handle, starting a query if none is in progress.
    pub fn into_query(self) -> Query<M> {
        match self {
            Handle::Unbound(model) => model.new_query(),
            Handle::Bound(query) => query,
        }
    }
}

impl<M: Model> From<ModelRef<M>> for Handle<M> {
    fn from(model: ModelRef<M>) -> Self {
        Handle::Unbound(model)
    }
}

impl<M: Model> From<Query<M>> for Handle<M> {
    fn from(query: Query<M>) -> Self {
        Handle::Bound(query)
    }
}
