//! Users fixture shared by the repository integration tests.

mod criteria;
mod model;
mod repository;

use std::sync::Arc;

use criteria_repository::{Container, InMemoryModelStore, Repository};

pub use criteria::{ActiveUsers, NamedUsers};
pub use model::User;
pub use repository::{PlainUserRepository, UserRepository};

/// Alice (active), Bob (inactive), Carol (active).
pub fn seeded_store() -> InMemoryModelStore {
    InMemoryModelStore::seeded([
        User::new("1", "Alice", true),
        User::new("2", "Bob", false),
        User::new("3", "Carol", true),
    ])
    .expect("seed users")
}

pub fn container(store: InMemoryModelStore) -> Arc<Container> {
    let container = Arc::new(Container::new());
    container
        .bind_model::<User, _>("users", store)
        .expect("bind users");
    container
}

pub fn repository() -> Repository<UserRepository> {
    container(seeded_store())
        .resolve::<UserRepository>()
        .expect("resolve user repository")
}

pub fn ids(users: Vec<User>) -> Vec<String> {
    users.into_iter().map(|user| user.id).collect()
}
