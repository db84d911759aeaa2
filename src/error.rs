/// Errors reported by the fallible parts of the crate.
///
/// Contract violations (KDF output sizes, empty ranges, empty seed arrays)
/// are not represented here; they panic.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The name does not match any supported digest algorithm.
    #[error("unknown digest algorithm: {0}")]
    UnknownAlgorithm(String),
    /// A serialized generator state has the wrong size.
    #[error("invalid generator state length: expected {expected} bytes, got {actual}")]
    StateLength {
        /// Required length in bytes.
        expected: usize,
        /// Length of the rejected buffer.
        actual: usize,
    },
    /// A serialized generator state carries an extraction index past the word array.
    #[error("generator state index {index} out of range 0..={max}")]
    StateIndex {
        /// Index found in the buffer.
        index: usize,
        /// Largest valid index.
        max: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
