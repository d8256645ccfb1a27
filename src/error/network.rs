use thiserror::Error;

use super::decode::DecodeError;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
