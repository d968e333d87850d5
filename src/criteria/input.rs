use std::any::Any;

use super::{CriterionEntry, CriterionTag};
use crate::model::Model;

/// Trait for values that may hold a criterion.
///
/// Criteria lists are often assembled from optional or loosely typed parts;
/// items that do not hold a criterion are dropped by the store, never
/// reported as errors.
///
/// Type-erased input must box a [`CriterionEntry`], not the criterion
/// itself: `Box::new(ActiveUsers)` is dropped, while
/// `Box::new(CriterionEntry::<User>::new(ActiveUsers))` is kept.
pub trait MaybeCriterion<M: Model> {
    fn into_criterion(self) -> Option<CriterionEntry<M>>;
}

impl<M: Model> MaybeCriterion<M> for CriterionEntry<M> {
    fn into_criterion(self) -> Option<CriterionEntry<M>> {
        Some(self)
    }
}

impl<M: Model> MaybeCriterion<M> for Option<CriterionEntry<M>> {
    fn into_criterion(self) -> Option<CriterionEntry<M>> {
        self
    }
}

// Valid only when it boxes a `CriterionEntry<M>`; a boxed bare criterion is dropped.
impl<M: Model> MaybeCriterion<M> for Box<dyn Any + Send> {
    fn into_criterion(self) -> Option<CriterionEntry<M>> {
        self.downcast::<CriterionEntry<M>>().ok().map(|entry| *entry)
    }
}

/// Trait for values naming which stored criteria to remove.
///
/// A request matches every stored criterion with the same tag. Requests
/// without a tag match nothing.
pub trait RemovalRequest {
    fn removal_tag(&self) -> Option<CriterionTag>;
}

impl RemovalRequest for CriterionTag {
    fn removal_tag(&self) -> Option<CriterionTag> {
        Some(*self)
    }
}

impl RemovalRequest for &CriterionTag {
    fn removal_tag(&self) -> Option<CriterionTag> {
        Some(**self)
    }
}

impl RemovalRequest for Option<CriterionTag> {
    fn removal_tag(&self) -> Option<CriterionTag> {
        *self
    }
}

impl<M: Model> RemovalRequest for CriterionEntry<M> {
    fn removal_tag(&self) -> Option<CriterionTag> {
        Some(self.tag())
    }
}

impl<M: Model> RemovalRequest for &CriterionEntry<M> {
    fn removal_tag(&self) -> Option<CriterionTag> {
        Some(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Criterion;
    use crate::query::Handle;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, Serialize, Deserialize)]
    struct Row {
        id: String,
    }

    impl Model for Row {
        const COLLECTION: &'static str = "rows";
        fn id(&self) -> &str {
            &self.id
        }
    }

    struct Noop;

    impl Criterion<Row> for Noop {
        fn apply(&self, handle: Handle<Row>) -> Handle<Row> {
            handle
        }
    }

    #[test]
    fn entries_and_options() {
        assert!(CriterionEntry::<Row>::new(Noop).into_criterion().is_some());
        assert!(Some(CriterionEntry::<Row>::new(Noop)).into_criterion().is_some());
        assert!(Option::<CriterionEntry<Row>>::None.into_criterion().is_none());
    }

    #[test]
    fn boxed_values_must_hold_an_entry() {
        let valid: Box<dyn Any + Send> = Box::new(CriterionEntry::<Row>::new(Noop));
        let invalid: Box<dyn Any + Send> = Box::new("invalid");
        // The bare criterion is not an entry either.
        let bare: Box<dyn Any + Send> = Box::new(Noop);

        assert!(MaybeCriterion::<Row>::into_criterion(valid).is_some());
        assert!(MaybeCriterion::<Row>::into_criterion(invalid).is_none());
        assert!(MaybeCriterion::<Row>::into_criterion(bare).is_none());
    }

    #[test]
    fn removal_tags() {
        let entry = CriterionEntry::<Row>::new(Noop);
        assert_eq!(entry.removal_tag(), Some(CriterionTag::of::<Noop>()));
        assert_eq!((&entry).removal_tag(), Some(CriterionTag::of::<Noop>()));
        assert_eq!(CriterionTag::of_val(&Noop).removal_tag(), Some(CriterionTag::of::<Noop>()));
        assert_eq!(Option::<CriterionTag>::None.removal_tag(), None);
    }
}
