use criteria_repository::Model;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Model)]
#[model(collection = "test_users")]
pub struct User {
    #[model(id)]
    pub id: String,
    pub name: String,
    pub active: bool,
}

impl User {
    pub fn new(id: &str, name: &str, active: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            active,
        }
    }
}
