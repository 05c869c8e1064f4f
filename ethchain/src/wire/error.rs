use thiserror::Error;

/// The error type for parsing and emitting layers.
///
/// I/O failures are not part of this type. They belong to the sender and are
/// returned as a plain `std::io::Error` from the operations that touch one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Error {
    /// A buffer could not be parsed because it was shorter than the fixed header.
    ///
    /// Construction fails as a whole in this case, no partially filled header is ever returned.
    #[error("truncated packet: {len} bytes, header needs {needed}")]
    Format {
        /// The length of the buffer that was provided.
        len: usize,
        /// The minimum length required by the layer.
        needed: usize,
    },

    /// A destination buffer was smaller than the serialized size of the chain.
    ///
    /// Size the buffer with the `size()` of the outermost layer before writing.
    #[error("buffer of {available} bytes too small for a chain of {needed} bytes")]
    Serialization {
        /// The serialized size of the chain that was to be written.
        needed: usize,
        /// The length of the buffer that was provided.
        available: usize,
    },
}

/// The result type for parsing and emitting layers.
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Query whether this is a parse failure on a short buffer.
    pub fn is_format(&self) -> bool {
        match self {
            Error::Format { .. } => true,
            _ => false,
        }
    }

    /// Query whether this is a write failure on a short destination buffer.
    pub fn is_serialization(&self) -> bool {
        match self {
            Error::Serialization { .. } => true,
            _ => false,
        }
    }
}
