use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Tag title is {len} bytes, maximum is 255")]
    TitleTooLong { len: usize },

    #[error("Tag title is empty")]
    EmptyTitle,

    #[error("Tag value is {len} bytes, maximum is 65535")]
    ValueTooLong { len: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
