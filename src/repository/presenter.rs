use crate::model::Model;

/// Turns models into the shape handed to callers (API views, DTOs, ...).
pub trait Presenter<M: Model> {
    type Output;

    fn present(&self, model: M) -> Self::Output;
}
