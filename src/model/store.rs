//! ModelStore - Storage the query layer reads models from.

use super::{Model, ModelError};

/// Storage for models, as seen by queries.
///
/// Writes are upserts keyed by collection and id. Reads are predicate scans
/// returning models in insertion order, so unordered queries are
/// deterministic. Records that no longer deserialize as `M` are skipped by
/// scans rather than failing the whole query.
pub trait ModelStore: Send + Sync {
    /// Insert or replace a model. An update keeps the model's original
    /// position in scan order.
    fn save_model<M: Model>(&self, model: &M) -> Result<(), ModelError>;

    /// Find models matching a predicate, in insertion order.
    fn find_models<M: Model>(&self, predicate: &dyn Fn(&M) -> bool) -> Result<Vec<M>, ModelError>;
}
