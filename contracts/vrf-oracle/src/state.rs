use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<OracleConfig> = Item::new("config");
/// Request registry keyed by the consumer-chosen correlation id.
pub const REQUESTS: Map<u64, RandomnessRequest> = Map::new("requests");
pub const TOTAL_FULFILLED: Item<u64> = Item::new("total_fulfilled");

#[cw_serde]
pub struct OracleConfig {
    pub admin: Addr,
    /// Addresses allowed to fulfil requests.
    pub operators: Vec<Addr>,
}

#[cw_serde]
pub struct RandomnessRequest {
    pub correlation_id: u64,
    /// Contract that registered the request and receives the delivery.
    pub consumer: Addr,
    /// Address that triggered the request on the consumer side; part of the
    /// delivery proof digest.
    pub origin: String,
    pub seed: Vec<u8>,
    pub count: u16,
    pub confirmations: u32,
    pub registered_at: Timestamp,
    pub fulfilled: bool,
    pub fulfilled_at: Option<Timestamp>,
    pub fulfilled_by: Option<Addr>,
}
