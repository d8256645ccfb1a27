use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValueError {
    /// Оптимизированное число занимает 1, 2 или 4 байта; любая другая
    /// ширина считается повреждёнными данными.
    #[error("Unsupported optimized integer width: {len} bytes")]
    MalformedValue { len: usize },

    #[error("Value is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}
