use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::{Presenter, RepositoryDefinition};
use crate::container::ModelFactory;
use crate::criteria::{
    CriteriaStore, Criterion, CriterionEntry, CriterionTag, MaybeCriterion, RemovalRequest,
};
use crate::error::RepositoryError;
use crate::model::{ModelError, ModelRef};
use crate::query::{Handle, Query};

/// A one-shot modification applied to the query after criteria.
pub type Scope<M> = Box<dyn FnOnce(&mut Query<M>) + Send>;

type ModelOf<D> = <D as RepositoryDefinition>::Model;

/// Repository for the model described by `D`.
///
/// State is per instance and mutated through `&mut self`; share a container,
/// not a repository.
pub struct Repository<D: RepositoryDefinition> {
    definition: D,
    factory: Arc<dyn ModelFactory>,
    handle: Option<Handle<ModelOf<D>>>,
    criteria: CriteriaStore<ModelOf<D>>,
    scopes: Vec<Scope<ModelOf<D>>>,
}

impl<D: RepositoryDefinition> Repository<D> {
    /// Build a repository, resolve its model handle and run the boot hook.
    ///
    /// Fails if the factory cannot produce a `ModelRef` for the model.
    pub fn new(definition: D, factory: Arc<dyn ModelFactory>) -> Result<Self, RepositoryError> {
        let mut repository = Self {
            definition,
            factory,
            handle: None,
            criteria: CriteriaStore::new(),
            scopes: Vec::new(),
        };

        repository.make_model()?;
        D::boot(&mut repository);

        Ok(repository)
    }

    pub fn definition(&self) -> &D {
        &self.definition
    }

    pub fn definition_mut(&mut self) -> &mut D {
        &mut self.definition
    }

    /// Identifier of the model this repository resolves.
    pub fn model(&self) -> &str {
        self.definition.model()
    }

    // ------------------------------------------------------------------
    // Model handle
    // ------------------------------------------------------------------

    /// Resolve a fresh model handle and make it current.
    pub fn make_model(&mut self) -> Result<ModelRef<ModelOf<D>>, RepositoryError> {
        let model = self.resolve_model()?;
        self.handle = Some(Handle::Unbound(model.clone()));
        Ok(model)
    }

    pub fn reset_model(&mut self) -> Result<(), RepositoryError> {
        self.make_model().map(|_| ())
    }

    /// The current handle, recreated if it was discarded.
    pub fn get_model(&mut self) -> Result<&Handle<ModelOf<D>>, RepositoryError> {
        let handle = self.take_handle()?;
        let handle: &Handle<ModelOf<D>> = self.handle.insert(handle);
        Ok(handle)
    }

    /// Drop the current handle; the next access resolves a new one.
    pub fn discard_model(&mut self) -> &mut Self {
        self.handle = None;
        self
    }

    fn resolve_model(&self) -> Result<ModelRef<ModelOf<D>>, RepositoryError> {
        let name = self.definition.model();
        let made = self.factory.make(name)?;

        match made.downcast::<ModelRef<ModelOf<D>>>() {
            Ok(model) => Ok(*model),
            Err(_) => {
                let expected = type_name::<ModelOf<D>>();
                warn!(model = name, expected, "factory produced a value of the wrong kind");
                Err(RepositoryError::InvalidModel {
                    model: name.to_string(),
                    expected,
                })
            }
        }
    }

    fn take_handle(&mut self) -> Result<Handle<ModelOf<D>>, RepositoryError> {
        match self.handle.take() {
            Some(handle) => Ok(handle),
            None => {
                debug!(model = self.definition.model(), "recovering missing model handle");
                Ok(Handle::Unbound(self.resolve_model()?))
            }
        }
    }

    // ------------------------------------------------------------------
    // Criteria
    // ------------------------------------------------------------------

    /// The criteria store, for inspecting criteria and flags.
    pub fn criteria(&self) -> &CriteriaStore<ModelOf<D>> {
        &self.criteria
    }

    /// Apply `criteria` to the next query only.
    pub fn with_criteria<I>(&mut self, criteria: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: MaybeCriterion<ModelOf<D>>,
    {
        self.criteria.with_criteria(criteria);
        self
    }

    pub fn with_criterion<C: Criterion<ModelOf<D>>>(&mut self, criterion: C) -> &mut Self {
        self.with_criteria([CriterionEntry::new(criterion)])
    }

    /// Apply `criteria` to every query until removed.
    pub fn push_criteria<I>(&mut self, criteria: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: MaybeCriterion<ModelOf<D>>,
    {
        self.criteria.push_criteria(criteria);
        self
    }

    pub fn push_criterion<C: Criterion<ModelOf<D>>>(&mut self, criterion: C) -> &mut Self {
        self.push_criteria([CriterionEntry::new(criterion)])
    }

    pub fn remove_criteria<I>(&mut self, requests: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: RemovalRequest,
    {
        self.criteria.remove_criteria(requests);
        self
    }

    /// Remove every criterion of type `C`.
    pub fn remove_criterion<C: 'static>(&mut self) -> &mut Self {
        self.remove_criteria([CriterionTag::of::<C>()])
    }

    pub fn get_criteria(&self) -> Vec<&CriterionEntry<ModelOf<D>>> {
        self.criteria.get_criteria()
    }

    pub fn enable_criteria(&mut self) -> &mut Self {
        self.criteria.enable_criteria();
        self
    }

    pub fn disable_criteria(&mut self) -> &mut Self {
        self.criteria.disable_criteria();
        self
    }

    pub fn use_criteria(&mut self) -> &mut Self {
        self.criteria.use_criteria();
        self
    }

    pub fn skip_criteria(&mut self) -> &mut Self {
        self.criteria.skip_criteria();
        self
    }

    pub fn reset_criteria(&mut self) -> &mut Self {
        self.criteria.reset_criteria();
        self
    }

    // ------------------------------------------------------------------
    // Scopes
    // ------------------------------------------------------------------

    pub fn add_scope<F>(&mut self, scope: F) -> &mut Self
    where
        F: FnOnce(&mut Query<ModelOf<D>>) + Send + 'static,
    {
        self.scopes.push(Box::new(scope));
        self
    }

    pub fn reset_scopes(&mut self) -> &mut Self {
        self.scopes.clear();
        self
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    // ------------------------------------------------------------------
    // Query pipeline
    // ------------------------------------------------------------------

    /// Build the query with every active criterion and scope applied.
    ///
    /// Transient criteria and scopes are consumed and the model handle is
    /// reset, so the next call starts clean.
    pub fn query(&mut self) -> Result<Query<ModelOf<D>>, RepositoryError> {
        let query = self.prepare()?;
        self.reset_and_return(query)
    }

    /// Alias of [`query`](Self::query).
    pub fn new_query(&mut self) -> Result<Query<ModelOf<D>>, RepositoryError> {
        self.query()
    }

    /// Run `operation` against the prepared query, then reset.
    ///
    /// The reset happens even when `operation` fails; its error is returned
    /// afterwards.
    pub fn call<T, F>(&mut self, operation: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(Query<ModelOf<D>>) -> Result<T, ModelError>,
    {
        let query = self.prepare()?;
        let result = operation(query);
        Ok(self.reset_and_return(result)??)
    }

    pub fn get(&mut self) -> Result<Vec<ModelOf<D>>, RepositoryError> {
        self.call(|query| query.get())
    }

    /// Alias of [`get`](Self::get).
    pub fn all(&mut self) -> Result<Vec<ModelOf<D>>, RepositoryError> {
        self.get()
    }

    pub fn first(&mut self) -> Result<Option<ModelOf<D>>, RepositoryError> {
        self.call(|query| query.first())
    }

    pub fn find(&mut self, id: &str) -> Result<Option<ModelOf<D>>, RepositoryError> {
        self.call(|query| query.find(id))
    }

    pub fn count(&mut self) -> Result<usize, RepositoryError> {
        self.call(|query| query.count())
    }

    pub fn exists(&mut self) -> Result<bool, RepositoryError> {
        self.call(|query| query.exists())
    }

    pub fn pluck(&mut self, field: &str) -> Result<Vec<Value>, RepositoryError> {
        self.call(|query| query.pluck(field))
    }

    /// Fetch every matching model and pass it through `presenter`.
    pub fn present<P>(&mut self, presenter: &P) -> Result<Vec<P::Output>, RepositoryError>
    where
        P: Presenter<ModelOf<D>>,
    {
        Ok(self
            .get()?
            .into_iter()
            .map(|model| presenter.present(model))
            .collect())
    }

    fn prepare(&mut self) -> Result<Query<ModelOf<D>>, RepositoryError> {
        self.apply_criteria()?;
        self.apply_scopes()?;
        Ok(self.take_handle()?.into_query())
    }

    fn apply_criteria(&mut self) -> Result<&mut Self, RepositoryError> {
        let handle = self.take_handle()?;
        self.handle = Some(self.criteria.apply(handle));
        Ok(self)
    }

    fn apply_scopes(&mut self) -> Result<&mut Self, RepositoryError> {
        let mut handle = self.take_handle()?;
        let query = handle.ensure_bound();
        for scope in self.scopes.drain(..) {
            scope(&mut *query);
        }
        self.handle = Some(handle);
        Ok(self)
    }

    fn reset_and_return<T>(&mut self, result: T) -> Result<T, RepositoryError> {
        self.criteria.reset_transient();
        self.scopes.clear();
        self.reset_model()?;
        Ok(result)
    }
}

impl<D: RepositoryDefinition> fmt::Debug for Repository<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("model", &self.definition.model())
            .field("persistent_criteria", &self.criteria.persistent().len())
            .field("transient_criteria", &self.criteria.transient().len())
            .field("criteria_disabled", &self.criteria.is_disabled())
            .field("skip_criteria", &self.criteria.is_skipping())
            .field("force_use_criteria", &self.criteria.is_forcing())
            .field("scopes", &self.scopes.len())
            .field("bound", &self.handle.as_ref().map(Handle::is_bound))
            .finish()
    }
}
