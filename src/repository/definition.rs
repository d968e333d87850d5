use super::Repository;
use crate::model::Model;

/// Describes a concrete repository: which model it serves and how it boots.
///
/// ```ignore
/// #[derive(Default)]
/// struct UserRepository;
///
/// impl RepositoryDefinition for UserRepository {
///     type Model = User;
///
///     fn model(&self) -> &str {
///         "users"
///     }
///
///     fn boot(repository: &mut Repository<Self>) {
///         repository.push_criterion(ActiveUsers);
///     }
/// }
/// ```
pub trait RepositoryDefinition: Send + Sized + 'static {
    type Model: Model;

    /// Identifier the model factory resolves to a `ModelRef<Self::Model>`.
    fn model(&self) -> &str;

    /// Runs once at the end of construction, after the model handle exists.
    fn boot(_repository: &mut Repository<Self>) {}
}
