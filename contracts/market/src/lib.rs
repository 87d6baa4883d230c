pub mod contract;
pub mod error;
pub mod execute;
pub mod ident;
pub mod msg;
pub mod prize;
pub mod query;
pub mod quota;
pub mod randomness;
pub mod state;
pub mod winners;

pub use crate::error::ContractError;
