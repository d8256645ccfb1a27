use thiserror::Error;

use super::tag::TagError;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed record at byte {offset}: {reason}")]
    MalformedRecord { offset: u64, reason: String },

    #[error("Stream ended mid-record at byte {offset}")]
    TruncatedInput { offset: u64 },

    #[error("Invalid UTF-8 in title at byte {offset}")]
    InvalidUtf8 { offset: u64 },

    #[error("Close marker at the synthetic root at byte {offset}")]
    UnbalancedClose { offset: u64 },

    #[error("Tag error: {0}")]
    Tag(#[from] TagError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
