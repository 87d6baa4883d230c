use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("participant {address} is not registered")]
    NotRegistered { address: String },

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("quota exceeded for {tier} crates: {requested} requested, {available} releasable")]
    QuotaExceeded {
        tier: String,
        requested: u64,
        available: u64,
    },

    #[error("daily purchase limit exceeded for {what} (cap {cap})")]
    UserDailyLimitExceeded { what: String, cap: u32 },

    #[error("window limit exceeded for merch type {type_id}: {requested} requested, {available} releasable in window {window}")]
    WindowLimitExceeded {
        type_id: u8,
        requested: u64,
        available: u64,
        window: u64,
    },

    #[error("supply exceeded for merch type {type_id} (total supply {total_supply})")]
    SupplyExceeded { type_id: u8, total_supply: u64 },

    #[error("insufficient funds: need {needed} {denom}, got {sent}")]
    InsufficientFunds {
        needed: Uint128,
        sent: Uint128,
        denom: String,
    },

    #[error("outside permitted time window: {reason}")]
    OutOfSeasonWindow { reason: String },

    #[error("sender does not own {what} {id}")]
    NotOwner { what: String, id: u64 },

    #[error("crate {crate_id} is already opened")]
    AlreadyOpened { crate_id: u64 },

    #[error("crate {crate_id} is not opened yet")]
    NotYetOpened { crate_id: u64 },

    #[error("prize for crate {crate_id} already claimed")]
    AlreadyClaimed { crate_id: u64 },

    #[error("unknown correlation id {correlation_id}")]
    UnknownCorrelation { correlation_id: u64 },

    #[error("correlation id {correlation_id} already fulfilled")]
    AlreadyFulfilled { correlation_id: u64 },

    #[error("randomness proof verification failed: {reason}")]
    VerificationFailed { reason: String },

    #[error("{subject} already initialized")]
    AlreadyInitialized { subject: String },

    #[error("crate {crate_id} not found")]
    CrateNotFound { crate_id: u64 },

    #[error("raffle entry {entry_id} not found")]
    RaffleEntryNotFound { entry_id: u64 },

    #[error("merch type {type_id} not found")]
    MerchTypeNotFound { type_id: u8 },

    #[error("merch type {type_id} already purchased this season")]
    MerchAlreadyPurchased { type_id: u8 },

    #[error("draw {draw_id} not found")]
    DrawNotFound { draw_id: u64 },

    #[error("crate {crate_id} already has a randomness request pending")]
    RandomnessPending { crate_id: u64 },

    #[error("id sequence exhausted for class {class}")]
    SequenceExhausted { class: u8 },

    #[error("invalid hex input: {field}")]
    InvalidHex { field: String },
}
