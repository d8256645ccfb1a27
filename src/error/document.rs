use std::path::PathBuf;

use thiserror::Error;

use super::{decode::DecodeError, encode::EncodeError, value::ValueError};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Cannot open `{path}`: {source}")]
    StreamUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Tag `{title}` carries no value")]
    NoValue { title: String },

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Value error: {0}")]
    Value(#[from] ValueError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
