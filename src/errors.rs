use thiserror::Error;

pub type Result<T> = std::result::Result<T, MiningError>;

#[derive(Error, Debug)]
pub enum MiningError {
    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("unsupported types: {0}")]
    UnsupportedTypes(String),

    #[error("missing option: {0}")]
    MissingOption(String),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("invalid state for this call: {0}")]
    StateError(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("operation cancelled")]
    Cancelled,
}
