//! InMemoryModelStore - HashMap-backed model store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::trace;

use super::{Model, ModelError, ModelStore};

/// Internal stored representation of a model.
struct StoredModel {
    bytes: Vec<u8>,
    sequence: u64,
}

#[derive(Default)]
struct Storage {
    models: HashMap<String, StoredModel>,
    next_sequence: u64,
}

impl Storage {
    /// Writes `bytes` under `key`, keeping the original insertion slot on update.
    fn put(&mut self, key: String, bytes: Vec<u8>) {
        let sequence = match self.models.get(&key) {
            Some(existing) => existing.sequence,
            None => {
                self.next_sequence += 1;
                self.next_sequence
            }
        };

        self.models.insert(key, StoredModel { bytes, sequence });
    }
}

/// In-memory model store backed by a HashMap.
///
/// Storage key is `"COLLECTION:id"`. Clone-friendly via Arc: clones share the
/// same records.
#[derive(Clone)]
pub struct InMemoryModelStore {
    storage: Arc<RwLock<Storage>>,
}

impl Default for InMemoryModelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryModelStore {
    /// Create a new empty model store.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(Storage::default())),
        }
    }

    /// Create a store seeded with the given models, saved in order.
    pub fn seeded<M: Model>(models: impl IntoIterator<Item = M>) -> Result<Self, ModelError> {
        let store = Self::new();
        for model in models {
            store.save_model(&model)?;
        }
        Ok(store)
    }

    fn make_key(collection: &str, id: &str) -> String {
        format!("{}:{}", collection, id)
    }
}

impl ModelStore for InMemoryModelStore {
    fn save_model<M: Model>(&self, model: &M) -> Result<(), ModelError> {
        let key = Self::make_key(M::COLLECTION, model.id());
        let bytes = serde_json::to_vec(model)?;

        self.storage
            .write()
            .map_err(|_| ModelError::Storage("lock poisoned".into()))?
            .put(key, bytes);

        Ok(())
    }

    fn find_models<M: Model>(&self, predicate: &dyn Fn(&M) -> bool) -> Result<Vec<M>, ModelError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| ModelError::Storage("lock poisoned".into()))?;

        let prefix = format!("{}:", M::COLLECTION);
        let mut matched = Vec::new();

        for (key, stored) in storage.models.iter() {
            if !key.starts_with(&prefix) {
                continue;
            }
            match serde_json::from_slice::<M>(&stored.bytes) {
                Ok(data) if predicate(&data) => matched.push((stored.sequence, data)),
                Ok(_) => {}
                Err(err) => trace!(key = key.as_str(), %err, "skipping undecodable record"),
            }
        }

        matched.sort_by_key(|(sequence, _)| *sequence);
        Ok(matched.into_iter().map(|(_, model)| model).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct TestModel {
        id: String,
        value: i32,
    }

    impl Model for TestModel {
        const COLLECTION: &'static str = "test_models";
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn model(id: &str, value: i32) -> TestModel {
        TestModel {
            id: id.into(),
            value,
        }
    }

    fn values(store: &InMemoryModelStore) -> Vec<i32> {
        store
            .find_models::<TestModel>(&|_| true)
            .unwrap()
            .into_iter()
            .map(|m| m.value)
            .collect()
    }

    #[test]
    fn save_replaces_existing_models() {
        let store = InMemoryModelStore::new();

        store.save_model(&model("1", 1)).unwrap();
        store.save_model(&model("1", 2)).unwrap();

        assert_eq!(values(&store), vec![2]);
    }

    #[test]
    fn find_models_keeps_insertion_order() {
        let store = InMemoryModelStore::seeded([
            model("10", 10),
            model("2", 20),
            model("3", 5),
            model("1", 30),
        ])
        .unwrap();

        // Updating a record must not move it.
        store.save_model(&model("2", 25)).unwrap();

        let ids: Vec<String> = store
            .find_models::<TestModel>(&|m| m.value > 8)
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["10", "2", "1"]);
    }

    #[test]
    fn find_models_skips_undecodable_records() {
        let store = InMemoryModelStore::seeded([model("1", 1), model("2", 2)]).unwrap();
        store
            .storage
            .write()
            .unwrap()
            .put("test_models:broken".into(), b"not json".to_vec());

        assert_eq!(values(&store), vec![1, 2]);
    }

    #[test]
    fn collections_do_not_mix() {
        #[derive(Clone, Serialize, Deserialize)]
        struct Other {
            id: String,
        }

        impl Model for Other {
            const COLLECTION: &'static str = "others";
            fn id(&self) -> &str {
                &self.id
            }
        }

        let store = InMemoryModelStore::seeded([model("1", 1)]).unwrap();
        store.save_model(&Other { id: "1".into() }).unwrap();

        assert_eq!(values(&store), vec![1]);
        assert_eq!(store.find_models::<Other>(&|_| true).unwrap().len(), 1);
    }

    #[test]
    fn clone_shares_storage() {
        let store = InMemoryModelStore::new();
        let clone = store.clone();

        store.save_model(&model("1", 42)).unwrap();

        assert_eq!(values(&clone), vec![42]);
    }
}
