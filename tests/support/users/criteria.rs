use criteria_repository::{Criterion, Handle};

use super::User;

/// Limits the query to active users.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActiveUsers;

impl Criterion<User> for ActiveUsers {
    fn apply(&self, handle: Handle<User>) -> Handle<User> {
        let mut query = handle.into_query();
        query.where_eq("active", true);
        query.into()
    }
}

/// Limits the query to users with a specific name.
#[derive(Clone, Debug)]
pub struct NamedUsers(pub String);

impl NamedUsers {
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl Criterion<User> for NamedUsers {
    fn apply(&self, mut handle: Handle<User>) -> Handle<User> {
        handle.ensure_bound().where_eq("name", self.0.as_str());
        handle
    }
}
