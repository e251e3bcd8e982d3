//! Record storage with aggregation.
use super::{Record, RecordValue};
use std::collections::HashSet;

/// Buffers records and aggregates them on demand.
///
/// Scalar values sharing a key are aggregated to their mean; for other
/// value types the latest occurrence wins. Backends such as the
/// tensorboard recorder keep one of these and write out the aggregate at
/// every flush.
#[derive(Default)]
pub struct RecordStorage {
    data: Vec<Record>,
}

fn mean(vs: &[f32]) -> f32 {
    vs.iter().sum::<f32>() / vs.len() as f32
}

impl RecordStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Stores a record.
    pub fn store(&mut self, record: Record) {
        self.data.push(record);
    }

    /// Returns the aggregate of all stored records and clears the storage.
    pub fn aggregate(&mut self) -> Record {
        let keys: HashSet<String> = self
            .data
            .iter()
            .flat_map(|r| r.keys().cloned())
            .collect();

        let mut record = Record::empty();
        for key in keys {
            let scalars: Vec<f32> = self
                .data
                .iter()
                .filter_map(|r| match r.get(&key) {
                    Some(RecordValue::Scalar(v)) => Some(*v),
                    _ => None,
                })
                .collect();

            let value = if scalars.is_empty() {
                // Non-scalar key: keep the latest occurrence.
                self.data
                    .iter()
                    .rev()
                    .find_map(|r| r.get(&key))
                    .cloned()
            } else {
                Some(RecordValue::Scalar(mean(&scalars)))
            };

            if let Some(value) = value {
                record.insert(key, value);
            }
        }

        self.data.clear();
        record
    }
}
