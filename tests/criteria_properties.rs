//! Property tests for criteria bookkeeping.

mod support;

use std::any::Any;

use criteria_repository::{CriteriaStore, Criterion, CriterionEntry, CriterionTag, Handle};
use proptest::prelude::*;
use support::users::User;

#[derive(Debug, Clone, Copy)]
struct KindA;
#[derive(Debug, Clone, Copy)]
struct KindB;
#[derive(Debug, Clone, Copy)]
struct KindC;

impl Criterion<User> for KindA {
    fn apply(&self, handle: Handle<User>) -> Handle<User> {
        handle
    }
}

impl Criterion<User> for KindB {
    fn apply(&self, handle: Handle<User>) -> Handle<User> {
        handle
    }
}

impl Criterion<User> for KindC {
    fn apply(&self, handle: Handle<User>) -> Handle<User> {
        handle
    }
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    A,
    B,
    C,
}

impl Kind {
    fn entry(self) -> CriterionEntry<User> {
        match self {
            Kind::A => CriterionEntry::new(KindA),
            Kind::B => CriterionEntry::new(KindB),
            Kind::C => CriterionEntry::new(KindC),
        }
    }

    fn tag(self) -> CriterionTag {
        match self {
            Kind::A => CriterionTag::of::<KindA>(),
            Kind::B => CriterionTag::of::<KindB>(),
            Kind::C => CriterionTag::of::<KindC>(),
        }
    }
}

#[derive(Debug, Clone)]
enum Step {
    Push(Vec<Kind>),
    With(Vec<Kind>),
    Remove(Kind),
}

fn kind() -> impl Strategy<Value = Kind> {
    prop_oneof![Just(Kind::A), Just(Kind::B), Just(Kind::C)]
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        prop::collection::vec(kind(), 0..4).prop_map(Step::Push),
        prop::collection::vec(kind(), 0..4).prop_map(Step::With),
        kind().prop_map(Step::Remove),
    ]
}

proptest! {
    #[test]
    fn get_criteria_is_persistent_then_transient(steps in prop::collection::vec(step(), 0..24)) {
        let mut store = CriteriaStore::<User>::new();
        let mut persistent: Vec<CriterionTag> = Vec::new();
        let mut transient: Vec<CriterionTag> = Vec::new();

        for step in steps {
            match step {
                Step::Push(kinds) => {
                    store.push_criteria(kinds.iter().map(|kind| kind.entry()));
                    persistent.extend(kinds.iter().map(|kind| kind.tag()));
                }
                Step::With(kinds) => {
                    store.with_criteria(kinds.iter().map(|kind| kind.entry()));
                    transient = kinds.iter().map(|kind| kind.tag()).collect();
                }
                Step::Remove(kind) => {
                    store.remove_criteria([kind.tag()]);
                    persistent.retain(|tag| *tag != kind.tag());
                    transient.retain(|tag| *tag != kind.tag());
                }
            }
        }

        let actual: Vec<CriterionTag> = store.get_criteria().iter().map(|entry| entry.tag()).collect();
        let expected: Vec<CriterionTag> = persistent.into_iter().chain(transient).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn only_valid_items_are_kept(valid in 0usize..8, invalid in 0usize..8) {
        let mut items: Vec<Box<dyn Any + Send>> = Vec::new();
        for index in 0..valid.max(invalid) {
            if index < valid {
                items.push(Box::new(Kind::A.entry()));
            }
            if index < invalid {
                items.push(Box::new(format!("invalid {index}")));
            }
        }

        let mut store = CriteriaStore::<User>::new();
        store.push_criteria(items);

        prop_assert_eq!(store.get_criteria().len(), valid);
    }
}
