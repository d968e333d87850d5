//! Query - A chainable builder over a model source.
//!
//! Builders are mutated in place (`&mut self -> &mut Self`) so that scopes,
//! which receive `&mut Query<M>`, and criteria, which own their handle, use
//! the same calls:
//!
//! ```ignore
//! let mut query = model_ref.new_query();
//! query
//!     .where_eq("active", true)
//!     .where_op("name", Op::Ne, "Carol")
//!     .order_by("name", Direction::Asc);
//! let users = query.get()?;
//! ```

mod clause;
mod handle;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::model::{Model, ModelError, ModelSource};
use clause::{lookup, sort_order, Clause};

pub use clause::{Direction, Op};
pub use handle::Handle;

/// A query in progress against the records of model `M`.
pub struct Query<M: Model> {
    source: Arc<dyn ModelSource<M>>,
    clauses: Vec<Clause<M>>,
    orders: Vec<(String, Direction)>,
    limit: Option<usize>,
    offset: usize,
}

impl<M: Model> Query<M> {
    pub fn new(source: Arc<dyn ModelSource<M>>) -> Self {
        Self {
            source,
            clauses: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: 0,
        }
    }

    /// `field = value`
    pub fn where_eq(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.where_op(field, Op::Eq, value)
    }

    pub fn where_op(&mut self, field: &str, op: Op, value: impl Into<Value>) -> &mut Self {
        self.clauses.push(Clause::Compare {
            field: field.to_string(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn where_in<V: Into<Value>>(
        &mut self,
        field: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.clauses.push(Clause::In {
            field: field.to_string(),
            values: values.into_iter().map(Into::into).collect(),
            negated: false,
        });
        self
    }

    pub fn where_not_in<V: Into<Value>>(
        &mut self,
        field: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.clauses.push(Clause::In {
            field: field.to_string(),
            values: values.into_iter().map(Into::into).collect(),
            negated: true,
        });
        self
    }

    /// Matches records where the field is null or absent.
    pub fn where_null(&mut self, field: &str) -> &mut Self {
        self.clauses.push(Clause::Null {
            field: field.to_string(),
            negated: false,
        });
        self
    }

    pub fn where_not_null(&mut self, field: &str) -> &mut Self {
        self.clauses.push(Clause::Null {
            field: field.to_string(),
            negated: true,
        });
        self
    }

    /// Filter with an arbitrary predicate over the typed model.
    pub fn filter<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&M) -> bool + Send + Sync + 'static,
    {
        self.clauses.push(Clause::Predicate(Arc::new(predicate)));
        self
    }

    pub fn order_by(&mut self, field: &str, direction: Direction) -> &mut Self {
        self.orders.push((field.to_string(), direction));
        self
    }

    pub fn limit(&mut self, limit: usize) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: usize) -> &mut Self {
        self.offset = offset;
        self
    }

    /// Number of conditions applied so far.
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Execute the query and return every matching model.
    pub fn get(&self) -> Result<Vec<M>, ModelError> {
        Ok(self.fetch()?.into_iter().map(|(_, model)| model).collect())
    }

    pub fn first(&self) -> Result<Option<M>, ModelError> {
        let mut query = self.clone();
        query.limit(1);
        Ok(query.get()?.into_iter().next())
    }

    /// Find a model by id within the current query's constraints.
    pub fn find(&self, id: &str) -> Result<Option<M>, ModelError> {
        let id = id.to_string();
        let mut query = self.clone();
        query.filter(move |model: &M| model.id() == id);
        query.first()
    }

    pub fn count(&self) -> Result<usize, ModelError> {
        Ok(self.fetch()?.len())
    }

    pub fn exists(&self) -> Result<bool, ModelError> {
        Ok(self.first()?.is_some())
    }

    /// Collect a single field from every matching model. Missing fields yield `null`.
    pub fn pluck(&self, field: &str) -> Result<Vec<Value>, ModelError> {
        Ok(self
            .fetch()?
            .into_iter()
            .map(|(row, _)| lookup(&row, field).cloned().unwrap_or(Value::Null))
            .collect())
    }

    fn fetch(&self) -> Result<Vec<(Value, M)>, ModelError> {
        let candidates = self
            .source
            .scan(&|model| self.clauses.iter().all(|c| c.accepts_model(model)))?;

        let mut rows = Vec::with_capacity(candidates.len());
        for model in candidates {
            let row = serde_json::to_value(&model)?;
            if self.clauses.iter().all(|c| c.accepts_row(&row)) {
                rows.push((row, model));
            }
        }

        if !self.orders.is_empty() {
            rows.sort_by(|(a, _), (b, _)| {
                self.orders
                    .iter()
                    .map(|(field, direction)| {
                        let left = lookup(a, field).unwrap_or(&Value::Null);
                        let right = lookup(b, field).unwrap_or(&Value::Null);
                        match direction {
                            Direction::Asc => sort_order(left, right),
                            Direction::Desc => sort_order(right, left),
                        }
                    })
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        let rows = rows.into_iter().skip(self.offset);
        Ok(match self.limit {
            Some(limit) => rows.take(limit).collect(),
            None => rows.collect(),
        })
    }
}

impl<M: Model> Clone for Query<M> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            clauses: self.clauses.clone(),
            orders: self.orders.clone(),
            limit: self.limit,
            offset: self.offset,
        }
    }
}

impl<M: Model> fmt::Debug for Query<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("collection", &M::COLLECTION)
            .field("clauses", &self.clauses)
            .field("orders", &self.orders)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish()
    }
}
