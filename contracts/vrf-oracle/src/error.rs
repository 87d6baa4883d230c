use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("request {correlation_id} already initialized")]
    AlreadyInitialized { correlation_id: u64 },

    #[error("request {correlation_id} not found")]
    RequestNotFound { correlation_id: u64 },

    #[error("request {correlation_id} already fulfilled")]
    AlreadyFulfilled { correlation_id: u64 },

    #[error("word count {count} out of range (1..=255)")]
    CountOutOfRange { count: u16 },

    #[error("word count mismatch: request wants {expected}, got {got}")]
    CountMismatch { expected: u16, got: usize },

    #[error("invalid hex input: {field}")]
    InvalidHex { field: String },
}
