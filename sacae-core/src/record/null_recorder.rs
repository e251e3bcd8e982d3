//! A recorder that discards everything.
use super::{Record, Recorder};

/// Discards all records. Useful for tests and for runs where metric
/// logging is disabled.
#[derive(Default)]
pub struct NullRecorder;

impl Recorder for NullRecorder {
    fn store(&mut self, _record: Record) {}

    fn flush(&mut self, _step: i64) {}
}
