//! Tensorboard backend for training metrics.
use sacae_core::record::{Record, RecordStorage, RecordValue, Recorder};
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Writes aggregated records as tensorboard event files.
///
/// Stored records are buffered; on flush, scalar values sharing a key are
/// aggregated to their mean and written at the given global step.
/// Non-scalar values are discarded.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    storage: RecordStorage,
}

impl TensorboardRecorder {
    /// Constructs a [`TensorboardRecorder`].
    ///
    /// Event files will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            storage: RecordStorage::new(),
        }
    }
}

impl Recorder for TensorboardRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        let record = self.storage.aggregate();
        for (k, v) in record.iter() {
            if let RecordValue::Scalar(v) = v {
                self.writer.add_scalar(k, *v, step as usize);
            }
        }
        self.writer.flush();
    }
}
