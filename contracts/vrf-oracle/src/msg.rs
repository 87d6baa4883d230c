use cosmwasm_schema::{cw_serde, QueryResponses};

use crate::state::{OracleConfig, RandomnessRequest};

#[cw_serde]
pub struct InstantiateMsg {
    pub operators: Vec<String>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Register a randomness request. The sender becomes the consumer that
    /// will receive the delivery callback.
    RegisterRequest {
        correlation_id: u64,
        seed_hex: String,
        /// Number of random words wanted, at most 255 per request.
        count: u16,
        confirmations: u32,
        /// Address that triggered the request on the consumer side.
        origin: String,
    },
    /// Fulfil a pending request with random words. Operator only; pushes a
    /// `Deliver` callback to the consumer carrying the request digest.
    Fulfill {
        correlation_id: u64,
        words: Vec<u64>,
    },
    /// Update operator list (admin only).
    UpdateOperators {
        add: Vec<String>,
        remove: Vec<String>,
    },
}

/// Delivery callback pushed to the consumer contract. Mirrors the consumer's
/// `Deliver` execute variant.
#[cw_serde]
pub enum ConsumerExecuteMsg {
    Deliver {
        correlation_id: u64,
        words: Vec<u64>,
        proof_hex: String,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(OracleConfig)]
    Config {},

    #[returns(Option<RandomnessRequest>)]
    Request { correlation_id: u64 },

    #[returns(RequestsResponse)]
    Requests {
        start_after: Option<u64>,
        limit: Option<u32>,
    },

    #[returns(u64)]
    TotalFulfilled {},
}

#[cw_serde]
pub struct RequestsResponse {
    pub requests: Vec<RandomnessRequest>,
}
