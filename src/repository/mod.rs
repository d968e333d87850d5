//! Repositories - Criteria and scopes layered over model queries.
//!
//! A [`Repository`] owns a model handle, a [`CriteriaStore`](crate::CriteriaStore)
//! and a list of scopes. Every query-producing call runs the same pipeline:
//! criteria, then scopes, then the operation, then a reset of everything
//! one-shot.

mod definition;
mod presenter;
mod repository;

pub use definition::RepositoryDefinition;
pub use presenter::Presenter;
pub use repository::{Repository, Scope};
