use criteria_repository::{Repository, RepositoryDefinition};

use super::User;

/// Repository that records whether its boot hook ran.
#[derive(Default)]
pub struct UserRepository {
    pub booted: bool,
}

impl RepositoryDefinition for UserRepository {
    type Model = User;

    fn model(&self) -> &str {
        "users"
    }

    fn boot(repository: &mut Repository<Self>) {
        repository.definition_mut().booted = true;
    }
}

/// Repository relying on the default boot hook.
#[derive(Default)]
pub struct PlainUserRepository;

impl RepositoryDefinition for PlainUserRepository {
    type Model = User;

    fn model(&self) -> &str {
        "users"
    }
}
