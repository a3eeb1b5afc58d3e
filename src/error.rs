use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("not an ordered numeric container: {0}")]
    /// The input is not something we can treat as ordered numeric series,
    /// for example a text column or a malformed timestamp column
    TypeMismatch(String),
    #[error("invalid argument: {0}")]
    /// An argument was recognized but its value is not acceptable, for
    /// example a negative stride or a zero-length resample period
    InvalidArgument(String),
    #[error("insufficient data: {0}")]
    /// There are not enough samples to produce a meaningful answer
    InsufficientData(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}
