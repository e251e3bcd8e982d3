//! Key-value records for logging.
use crate::error::SacAeError;
use chrono::prelude::{DateTime, Local};
use std::collections::{
    hash_map::{Iter, Keys},
    HashMap,
};

/// Value types that can be stored in a [`Record`].
#[derive(Debug, Clone)]
pub enum RecordValue {
    /// A single floating-point value, typically a metric.
    Scalar(f32),

    /// A timestamp with local timezone.
    DateTime(DateTime<Local>),

    /// A text value.
    String(String),
}

/// A set of key-value pairs produced during training or evaluation.
#[derive(Debug, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record holding a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Inserts a key-value pair, replacing any previous value for the key.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns the value for a key, if present.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Returns the scalar value for a key.
    ///
    /// Fails if the key is missing or holds a non-scalar value.
    pub fn get_scalar(&self, k: &str) -> Result<f32, SacAeError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(SacAeError::RecordValueType(k.to_string())),
            None => Err(SacAeError::RecordKeyNotFound(k.to_string())),
        }
    }

    /// Merges another record into this one, consuming both.
    ///
    /// Keys in `other` win on collision.
    pub fn merge(self, other: Record) -> Self {
        Self(self.0.into_iter().chain(other.0).collect())
    }

    /// Iterates over the key-value pairs.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Iterates over the keys.
    pub fn keys(&self) -> Keys<'_, String, RecordValue> {
        self.0.keys()
    }

    /// Returns if the record holds no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_scalar_checks_type_and_presence() {
        let mut record = Record::from_scalar("reward", 1.5);
        record.insert("note", RecordValue::String("stuck".to_string()));

        assert_eq!(record.get_scalar("reward").unwrap(), 1.5);
        assert!(matches!(
            record.get_scalar("note"),
            Err(SacAeError::RecordValueType(_))
        ));
        assert!(matches!(
            record.get_scalar("missing"),
            Err(SacAeError::RecordKeyNotFound(_))
        ));
    }

    #[test]
    fn merge_prefers_right_hand_side() {
        let a = Record::from_scalar("x", 1.0);
        let b = Record::from_scalar("x", 2.0);
        assert_eq!(a.merge(b).get_scalar("x").unwrap(), 2.0);
    }
}
