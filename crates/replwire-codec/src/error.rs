/// Errors that can occur during bencode encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The value has no bencode representation (floats, nulls, out-of-range integers).
    #[error("unsupported value for bencode: {0}")]
    Unsupported(String),

    /// A request was structurally unusable (not a map, no `op`).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The byte stream is not valid bencode.
    #[error("malformed bencode at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: &'static str },

    /// A byte string declares a length beyond the configured maximum, or an
    /// unfinished object has buffered more than the pending limit.
    #[error("input too large ({size} bytes, max {max})")]
    TooLarge { size: usize, max: usize },

    /// Lists/dicts are nested deeper than the configured maximum.
    #[error("nesting deeper than {max} levels")]
    TooDeep { max: usize },

    /// An I/O error occurred while reading or writing objects.
    #[error("codec I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
