//! Container - Resolves model identifiers to model handles.
//!
//! Repositories never reach for a global registry. They are handed a
//! [`ModelFactory`], usually an `Arc<Container>`, at construction.
//!
//! ```ignore
//! let container = Arc::new(Container::new());
//! container.bind_model::<User, _>("users", store.clone())?;
//!
//! let mut users = container.resolve::<UserRepository>()?;
//! let active = users.with_criterion(ActiveUsers).get()?;
//!
//! // Static-style calls resolve a fresh repository every time.
//! let count = container.repository::<UserRepository>().count()?;
//! ```

mod facade;

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::RepositoryError;
use crate::model::{Model, ModelRef, ModelStore};
use crate::repository::{Repository, RepositoryDefinition};

pub use facade::StaticRepository;

/// Produces the value bound to a model identifier.
///
/// The repository checks that the value is a `ModelRef` of its model type;
/// the factory itself only has to resolve the name.
pub trait ModelFactory: Send + Sync {
    fn make(&self, model: &str) -> Result<Box<dyn Any + Send>, RepositoryError>;
}

impl<F> ModelFactory for F
where
    F: Fn(&str) -> Result<Box<dyn Any + Send>, RepositoryError> + Send + Sync,
{
    fn make(&self, model: &str) -> Result<Box<dyn Any + Send>, RepositoryError> {
        self(model)
    }
}

type Binding = Arc<dyn Fn() -> Box<dyn Any + Send> + Send + Sync>;

/// Registry of named bindings.
#[derive(Default)]
pub struct Container {
    bindings: RwLock<HashMap<String, Binding>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to a closure producing a fresh value on every resolution.
    pub fn bind<T, F>(&self, name: &str, factory: F) -> Result<(), RepositoryError>
    where
        T: Any + Send,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let binding: Binding = Arc::new(move || Box::new(factory()) as Box<dyn Any + Send>);

        self.bindings
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("bind"))?
            .insert(name.to_string(), binding);

        debug!(binding = name, "container binding registered");
        Ok(())
    }

    /// Bind `name` to model handles for `M` over `store`.
    pub fn bind_model<M, S>(&self, name: &str, store: S) -> Result<(), RepositoryError>
    where
        M: Model,
        S: ModelStore + Clone + 'static,
    {
        self.bind(name, move || ModelRef::<M>::new(store.clone()))
    }

    pub fn is_bound(&self, name: &str) -> Result<bool, RepositoryError> {
        Ok(self
            .bindings
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("is_bound"))?
            .contains_key(name))
    }

    /// Build a fresh repository whose model handles come from this container.
    pub fn resolve<D>(self: &Arc<Self>) -> Result<Repository<D>, RepositoryError>
    where
        D: RepositoryDefinition + Default,
    {
        let factory: Arc<dyn ModelFactory> = Arc::clone(self) as Arc<dyn ModelFactory>;
        Repository::new(D::default(), factory)
    }

    /// Static-style access to `D` that holds only a weak reference.
    pub fn repository<D>(self: &Arc<Self>) -> StaticRepository<D>
    where
        D: RepositoryDefinition + Default,
    {
        StaticRepository::new(Arc::downgrade(self))
    }
}

impl ModelFactory for Container {
    fn make(&self, model: &str) -> Result<Box<dyn Any + Send>, RepositoryError> {
        let binding = self
            .bindings
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("make"))?
            .get(model)
            .cloned()
            .ok_or_else(|| RepositoryError::UnboundModel {
                model: model.to_string(),
            })?;

        Ok(binding())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_fresh_values_per_call() {
        let container = Container::new();
        container.bind("answer", || 42u32).unwrap();

        let first = container.make("answer").unwrap();
        let second = container.make("answer").unwrap();
        assert_eq!(first.downcast_ref::<u32>(), Some(&42));
        assert_eq!(second.downcast_ref::<u32>(), Some(&42));
        assert!(container.is_bound("answer").unwrap());
    }

    #[test]
    fn unknown_names_fail() {
        let container = Container::new();
        let err = container.make("missing").err().unwrap();
        assert_eq!(
            err,
            RepositoryError::UnboundModel {
                model: "missing".into()
            }
        );
    }

    #[test]
    fn rebinding_replaces_the_previous_binding() {
        let container = Container::new();
        container.bind("name", || "first").unwrap();
        container.bind("name", || "second").unwrap();

        let value = container.make("name").unwrap();
        assert_eq!(value.downcast_ref::<&str>(), Some(&"second"));
    }
}
