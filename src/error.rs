use thiserror::Error;

use crate::model::ModelError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The factory resolved the model identifier to a value of the wrong kind.
    #[error("{model} must resolve to a model handle for {expected}")]
    InvalidModel { model: String, expected: &'static str },
    /// The factory has nothing registered under the model identifier.
    #[error("no model is bound to {model}")]
    UnboundModel { model: String },
    /// A static-style call was made after its container was dropped.
    #[error("static repository calls require an initialized container")]
    ContainerUnavailable,
    #[error("repository lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}
