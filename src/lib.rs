//! Repositories with criteria and scopes.
//!
//! A [`Repository`] composes a query from two kinds of deferred modifiers:
//!
//! * **criteria**: reusable [`Criterion`] values, either persistent (every
//!   query until removed) or transient (the next query only);
//! * **scopes**: inline closures over the [`Query`] builder, applied once.
//!
//! Every query-producing call applies the active criteria, then the scopes,
//! runs the operation and resets all one-shot state, so the next call starts
//! from an unfiltered model handle.

mod container;
mod criteria;
mod error;
mod model;
mod query;
mod repository;

pub use container::{Container, ModelFactory, StaticRepository};
pub use criteria::{
    CriteriaStore, Criterion, CriterionEntry, CriterionTag, MaybeCriterion, RemovalRequest,
};
pub use error::RepositoryError;
pub use model::{InMemoryModelStore, Model, ModelError, ModelRef, ModelSource, ModelStore};
pub use query::{Direction, Handle, Op, Query};
pub use repository::{Presenter, Repository, RepositoryDefinition, Scope};

// Derive macro for `Model`.
pub use criteria_repository_macros::Model;
