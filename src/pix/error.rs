/// Errors from building or reading a BR Code payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PixError {
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
    #[error("field {tag} is {len} characters long (max 99)")]
    FieldTooLong { tag: &'static str, len: usize },
    #[error("field {tag} contains non-ASCII text")]
    NonAsciiField { tag: &'static str },
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("checksum mismatch: expected {expected:04X}, found {found:04X}")]
    ChecksumMismatch { expected: u16, found: u16 },
    #[error("no PIX integration for bank {0}")]
    UnsupportedBank(String),
}

pub type Result<T> = std::result::Result<T, PixError>;
