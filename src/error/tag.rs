use thiserror::Error;

/// Ошибки структурных операций над деревом тегов.
#[derive(Debug, Error)]
pub enum TagError {
    #[error("Parent tag `{title}` is inactive and cannot take new children")]
    InactiveParent { title: String },

    #[error("Tag is already attached to a parent")]
    AlreadyAttached,

    #[error("Close at the synthetic root")]
    UnbalancedClose,
}
