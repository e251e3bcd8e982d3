//! Errors in the crate.
use thiserror::Error;

/// Errors produced by the core components.
///
/// Programming errors (sampling an empty buffer, composing a short frame
/// window) are not represented here; those abort via assertions. This type
/// covers failures the caller can meaningfully observe, such as mismatched
/// on-disk buffer chunks or ill-typed record lookups.
#[derive(Debug, Error)]
pub enum SacAeError {
    /// A record value had a type other than the one requested.
    #[error("record value for key '{0}' has an unexpected type")]
    RecordValueType(String),

    /// A key was not found in a record.
    #[error("key '{0}' not found in record")]
    RecordKeyNotFound(String),

    /// A buffer chunk file name did not parse as `{start}_{end}.bincode`.
    #[error("invalid buffer chunk file name: {0}")]
    ChunkFileName(String),

    /// The write cursor wrapped past the previous save point, so the
    /// unsaved range no longer forms one contiguous slice.
    #[error(
        "buffer cursor ({idx}) wrapped past the previous save point ({last_save}); \
         save at least once per capacity lap"
    )]
    SaveSpansWrap {
        /// Cursor position at the previous save.
        last_save: usize,
        /// Current cursor position.
        idx: usize,
    },

    /// A buffer chunk did not start at the buffer's write cursor.
    #[error("buffer chunk starts at {found}, but the write cursor is at {expected}")]
    ChunkGap {
        /// The buffer's current write cursor.
        expected: usize,
        /// The start index encoded in the chunk file.
        found: usize,
    },

    /// A buffer chunk did not fit the buffer it is being loaded into.
    #[error("buffer chunk [{start}, {end}) exceeds capacity {capacity}")]
    ChunkOutOfRange {
        /// Start index of the chunk.
        start: usize,
        /// End index of the chunk (exclusive).
        end: usize,
        /// Capacity of the receiving buffer.
        capacity: usize,
    },

    /// A buffer chunk was recorded with a different observation layout.
    #[error("buffer chunk layout does not match the receiving buffer ({0})")]
    ChunkLayout(String),
}
