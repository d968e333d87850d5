//! CriteriaStore - Persistent and one-shot criteria plus the flags deciding
//! which of them reach the next query.

use tracing::{debug, trace};

use super::{CriterionEntry, MaybeCriterion, RemovalRequest};
use crate::model::Model;
use crate::query::Handle;

/// Criteria lifecycle for a single repository.
///
/// Persistent criteria apply to every query until removed. Transient criteria
/// apply to the next query only. Three flags steer application:
///
/// * `disabled` turns persistent criteria off until re-enabled;
/// * `skip_next` bypasses every criterion for the next query;
/// * `force_use_next` applies persistent criteria on the next query even
///   while disabled.
///
/// `skip_next` wins over `force_use_next`. Both are cleared by [`apply`](Self::apply).
pub struct CriteriaStore<M: Model> {
    persistent: Vec<CriterionEntry<M>>,
    transient: Vec<CriterionEntry<M>>,
    disabled: bool,
    skip_next: bool,
    force_use_next: bool,
}

impl<M: Model> Default for CriteriaStore<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> CriteriaStore<M> {
    pub fn new() -> Self {
        Self {
            persistent: Vec::new(),
            transient: Vec::new(),
            disabled: false,
            skip_next: false,
            force_use_next: false,
        }
    }

    /// Replace the transient criteria and force criteria on for the next query.
    pub fn with_criteria<I>(&mut self, criteria: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: MaybeCriterion<M>,
    {
        self.transient = sanitize(criteria);
        self.use_criteria()
    }

    /// Append criteria that apply to every query until removed.
    pub fn push_criteria<I>(&mut self, criteria: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: MaybeCriterion<M>,
    {
        self.persistent.extend(sanitize(criteria));
        self
    }

    /// Remove every persistent or transient criterion matching any request.
    pub fn remove_criteria<I>(&mut self, requests: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: RemovalRequest,
    {
        let tags: Vec<_> = requests
            .into_iter()
            .filter_map(|request| request.removal_tag())
            .collect();

        let before = self.persistent.len() + self.transient.len();
        self.persistent.retain(|entry| !tags.contains(&entry.tag()));
        self.transient.retain(|entry| !tags.contains(&entry.tag()));

        trace!(
            removed = before - (self.persistent.len() + self.transient.len()),
            "criteria removed"
        );
        self
    }

    /// Persistent criteria followed by transient criteria.
    pub fn get_criteria(&self) -> Vec<&CriterionEntry<M>> {
        self.persistent.iter().chain(self.transient.iter()).collect()
    }

    pub fn persistent(&self) -> &[CriterionEntry<M>] {
        &self.persistent
    }

    pub fn transient(&self) -> &[CriterionEntry<M>] {
        &self.transient
    }

    pub fn enable_criteria(&mut self) -> &mut Self {
        self.disabled = false;
        self
    }

    pub fn disable_criteria(&mut self) -> &mut Self {
        self.disabled = true;
        self
    }

    /// Apply persistent criteria on the next query even if disabled.
    pub fn use_criteria(&mut self) -> &mut Self {
        self.skip_next = false;
        self.force_use_next = true;
        self
    }

    /// Bypass all criteria on the next query.
    pub fn skip_criteria(&mut self) -> &mut Self {
        self.skip_next = true;
        self
    }

    /// Drop every criterion. Flags are left as they are.
    pub fn reset_criteria(&mut self) -> &mut Self {
        self.persistent.clear();
        self.transient.clear();
        self
    }

    pub fn reset_transient(&mut self) -> &mut Self {
        self.transient.clear();
        self
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_skipping(&self) -> bool {
        self.skip_next
    }

    pub fn is_forcing(&self) -> bool {
        self.force_use_next
    }

    /// Apply the active criteria to `handle` and settle the one-shot state.
    pub fn apply(&mut self, mut handle: Handle<M>) -> Handle<M> {
        if self.skip_next {
            debug!(
                collection = M::COLLECTION,
                discarded = self.transient.len(),
                "criteria skipped"
            );
            self.skip_next = false;
            self.force_use_next = false;
            self.transient.clear();
            return handle;
        }

        let transient = std::mem::take(&mut self.transient);
        for criterion in &transient {
            handle = criterion.apply(handle);
        }

        let use_persistent = self.force_use_next || !self.disabled;
        if use_persistent {
            for criterion in &self.persistent {
                handle = criterion.apply(handle);
            }
        }

        debug!(
            collection = M::COLLECTION,
            transient = transient.len(),
            persistent = if use_persistent { self.persistent.len() } else { 0 },
            forced = self.force_use_next,
            "criteria applied"
        );

        self.force_use_next = false;
        handle
    }
}

fn sanitize<M, I>(criteria: I) -> Vec<CriterionEntry<M>>
where
    M: Model,
    I: IntoIterator,
    I::Item: MaybeCriterion<M>,
{
    let mut dropped = 0usize;
    let entries = criteria
        .into_iter()
        .filter_map(|item| {
            let entry = item.into_criterion();
            if entry.is_none() {
                dropped += 1;
            }
            entry
        })
        .collect();

    if dropped > 0 {
        trace!(dropped, "ignored values that are not criteria");
    }
    entries
}
