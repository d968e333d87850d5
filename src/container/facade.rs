//! StaticRepository - Call a repository without keeping one around.

use std::marker::PhantomData;
use std::sync::Weak;

use serde_json::Value;
use tracing::debug;

use super::Container;
use crate::error::RepositoryError;
use crate::repository::{Repository, RepositoryDefinition};

/// Resolves a fresh `Repository<D>` from its container for every call.
///
/// Holds the container weakly: once the application drops its container,
/// calls fail with [`RepositoryError::ContainerUnavailable`].
pub struct StaticRepository<D> {
    container: Weak<Container>,
    _definition: PhantomData<fn() -> D>,
}

impl<D> Clone for StaticRepository<D> {
    fn clone(&self) -> Self {
        Self {
            container: Weak::clone(&self.container),
            _definition: PhantomData,
        }
    }
}

type ModelOf<D> = <D as RepositoryDefinition>::Model;

impl<D> StaticRepository<D>
where
    D: RepositoryDefinition + Default,
{
    pub fn new(container: Weak<Container>) -> Self {
        Self {
            container,
            _definition: PhantomData,
        }
    }

    /// Forward `operation` to a freshly resolved repository.
    pub fn call<T, F>(&self, operation: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut Repository<D>) -> Result<T, RepositoryError>,
    {
        let container = self
            .container
            .upgrade()
            .ok_or(RepositoryError::ContainerUnavailable)?;

        let mut repository = container.resolve::<D>()?;
        debug!(model = repository.model(), "static repository call");
        operation(&mut repository)
    }

    pub fn get(&self) -> Result<Vec<ModelOf<D>>, RepositoryError> {
        self.call(|repository| repository.get())
    }

    pub fn first(&self) -> Result<Option<ModelOf<D>>, RepositoryError> {
        self.call(|repository| repository.first())
    }

    pub fn find(&self, id: &str) -> Result<Option<ModelOf<D>>, RepositoryError> {
        self.call(|repository| repository.find(id))
    }

    pub fn count(&self) -> Result<usize, RepositoryError> {
        self.call(|repository| repository.count())
    }

    pub fn exists(&self) -> Result<bool, RepositoryError> {
        self.call(|repository| repository.exists())
    }

    pub fn pluck(&self, field: &str) -> Result<Vec<Value>, RepositoryError> {
        self.call(|repository| repository.pluck(field))
    }
}
