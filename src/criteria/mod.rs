//! Criteria - Reusable, typed query modifiers.
//!
//! A [`Criterion`] takes the repository's handle and returns it with extra
//! constraints. Every stored criterion carries a [`CriterionTag`] naming its
//! concrete type, which is what removal matches on.
//!
//! ```ignore
//! struct ActiveUsers;
//!
//! impl Criterion<User> for ActiveUsers {
//!     fn apply(&self, handle: Handle<User>) -> Handle<User> {
//!         let mut query = handle.into_query();
//!         query.where_eq("active", true);
//!         query.into()
//!     }
//! }
//! ```

mod input;
mod store;

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::model::Model;
use crate::query::Handle;

pub use input::{MaybeCriterion, RemovalRequest};
pub use store::CriteriaStore;

/// A unit of predicate logic applied to a model handle.
///
/// Implementations must accept either handle state and should not have
/// effects outside the handle.
pub trait Criterion<M: Model>: Send + Sync + 'static {
    fn apply(&self, handle: Handle<M>) -> Handle<M>;
}

/// Identity of a criterion's concrete type.
#[derive(Clone, Copy)]
pub struct CriterionTag {
    id: TypeId,
    name: &'static str,
}

impl CriterionTag {
    pub fn of<C: 'static>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: type_name::<C>(),
        }
    }

    /// Tag of the type of `value`, for removing "anything like this instance".
    pub fn of_val<C: 'static>(_value: &C) -> Self {
        Self::of::<C>()
    }
}

impl PartialEq for CriterionTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CriterionTag {}

impl Hash for CriterionTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for CriterionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CriterionTag").field(&self.name).finish()
    }
}

/// A criterion paired with its tag, as held by the criteria store.
pub struct CriterionEntry<M: Model> {
    tag: CriterionTag,
    criterion: Arc<dyn Criterion<M>>,
}

impl<M: Model> CriterionEntry<M> {
    pub fn new<C: Criterion<M>>(criterion: C) -> Self {
        Self {
            tag: CriterionTag::of::<C>(),
            criterion: Arc::new(criterion),
        }
    }

    pub fn tag(&self) -> CriterionTag {
        self.tag
    }

    /// Whether this entry holds a `C`.
    pub fn is<C: 'static>(&self) -> bool {
        self.tag == CriterionTag::of::<C>()
    }

    pub fn apply(&self, handle: Handle<M>) -> Handle<M> {
        self.criterion.apply(handle)
    }
}

impl<M: Model> Clone for CriterionEntry<M> {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag,
            criterion: Arc::clone(&self.criterion),
        }
    }
}

impl<M: Model> fmt::Debug for CriterionEntry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CriterionEntry")
            .field("tag", &self.tag.name)
            .finish()
    }
}
