//! Recorder trait.
use super::Record;

/// Accepts records and writes aggregated values to some backend.
pub trait Recorder {
    /// Stores a record for later aggregation.
    fn store(&mut self, record: Record);

    /// Writes values aggregated from the stored records, tagged with the
    /// given global step, and clears the stored records.
    fn flush(&mut self, step: i64);
}
