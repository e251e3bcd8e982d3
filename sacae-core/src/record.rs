//! Types and traits for recording training metrics.
//!
//! A [`Record`] is a set of key-value pairs produced during training or
//! evaluation (episode reward, durations, losses from the agent). Records
//! are handed to a [`Recorder`], which buffers them and writes aggregated
//! values to its backend when flushed at a global step. [`NullRecorder`]
//! discards everything and is useful in tests; a tensorboard backend lives
//! in the `sacae-tensorboard` crate.
mod base;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
pub use storage::RecordStorage;
