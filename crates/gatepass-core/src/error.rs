use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatepassError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("crypto error: {0}")]
    Crypto(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type GatepassResult<T> = Result<T, GatepassError>;
