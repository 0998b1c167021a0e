//! Bound parameter storage.

use crate::value::Value;

/// Parameters of a rendered statement, in placeholder order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamList {
    params: Vec<Value>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter and return its 1-based index.
    pub fn push(&mut self, value: Value) -> usize {
        self.params.push(value);
        self.params.len()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.params.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.params.iter()
    }

    pub fn values(&self) -> &[Value] {
        &self.params
    }

    pub fn into_values(self) -> Vec<Value> {
        self.params
    }

    /// Get all parameters as references for tokio-postgres.
    #[cfg(feature = "postgres")]
    pub fn as_refs(&self) -> Vec<&(dyn tokio_postgres::types::ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p as &(dyn tokio_postgres::types::ToSql + Sync))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ParamList {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}
