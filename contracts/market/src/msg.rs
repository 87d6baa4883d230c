use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;
use lootcrate_common::{CrateTier, MonthSlot};

use crate::state::{
    Config, CrateRecord, DailyCounters, DrawRecord, MerchHolding, MerchItem, PendingRequest,
    RaffleEntry, RaffleTierPrice, TierQuota, WinnerEntry,
};

#[cw_serde]
pub struct InstantiateMsg {
    pub operator: String,
    pub oracle: String,
    pub treasury: String,
    pub credit_denom: String,
    pub credit_decimals: u32,
    /// Season window, unix seconds. `season_start <= season_end` is enforced.
    pub season_start: u64,
    pub season_end: u64,
    /// Per-slot crate unlock times, unix seconds.
    pub slot_unlock_times: [u64; 3],
    /// Crate price by [tier][slot], in credit base units.
    pub crate_prices: [[Uint128; 3]; 3],
    pub tier_quotas: [TierQuota; 3],
    pub raffle_prices: Vec<RaffleTierPrice>,
    pub raffle_daily_cap: u32,
    /// Ceiling on a single crate payout, in whole credits.
    pub max_crate_payout: u64,
    pub request_confirmations: u32,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Register a participant. Admin only (on-boarding boundary).
    Register { address: String },
    /// Buy crates of one tier/slot. Send the credit denom in funds.
    BuyCrates {
        tier: CrateTier,
        slot: MonthSlot,
        quantity: u32,
    },
    /// Buy raffle entries of one type. Send the credit denom in funds.
    BuyRaffleEntries { raffle_type: u8, quantity: u32 },
    /// Buy one unit of a merch type. Quantity other than 1 is rejected.
    BuyMerch { type_id: u8, quantity: u32 },
    /// Request randomness to open an owned, unlocked crate.
    OpenCrate { crate_id: u64, seed_hex: String },
    /// Pay out the resolved prize of an opened crate.
    ClaimPrize { crate_id: u64 },
    /// Start a winner draw for a raffle type. Operator only.
    StartDraw {
        raffle_type: u8,
        winner_count: u32,
        seed_hex: String,
    },
    /// Randomness callback. Oracle only; verified against the request digest.
    Deliver {
        correlation_id: u64,
        words: Vec<u64>,
        proof_hex: String,
    },
    /// Move the season window. Admin only.
    UpdateSeason {
        season_start: Option<u64>,
        season_end: Option<u64>,
    },
    /// Set one crate price cell. Admin only.
    SetCratePrice {
        tier: CrateTier,
        slot: MonthSlot,
        price: Uint128,
    },
    /// Replace one tier's quota parameters. Admin only.
    SetTierQuota { tier: CrateTier, quota: TierQuota },
    /// Set one slot's unlock time. Admin only.
    SetSlotUnlock { slot: MonthSlot, unlock_time: u64 },
    /// Set or add a raffle tier price. Admin only.
    SetRafflePrice { tier: u8, price: Uint128 },
    /// Register a merch type with its season supply. Admin only.
    AddMerchType {
        type_id: u8,
        name: String,
        price: Uint128,
        total_supply: u64,
    },
    /// Update roles and scalar parameters. Admin only.
    UpdateConfig {
        admin: Option<String>,
        operator: Option<String>,
        oracle: Option<String>,
        treasury: Option<String>,
        raffle_daily_cap: Option<u32>,
        max_crate_payout: Option<u64>,
        request_confirmations: Option<u32>,
    },
}

/// Message sent to the VRF oracle to register a randomness request.
#[cw_serde]
pub enum OracleExecuteMsg {
    RegisterRequest {
        correlation_id: u64,
        seed_hex: String,
        count: u16,
        confirmations: u32,
        origin: String,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(QuotaStatusResponse)]
    QuotaStatus { tier: CrateTier },
    #[returns(MerchWindowResponse)]
    MerchWindow { type_id: u8 },
    #[returns(InventoryResponse)]
    Inventory { address: String },
    #[returns(CrateRecord)]
    CrateInfo { crate_id: u64 },
    #[returns(RaffleEntry)]
    RaffleEntryInfo { entry_id: u64 },
    #[returns(MerchItem)]
    MerchType { type_id: u8 },
    #[returns(Option<MerchHolding>)]
    MerchHolding { address: String, type_id: u8 },
    #[returns(DailyCounters)]
    DailyCounters { address: String, day: u64 },
    #[returns(Option<PendingRequest>)]
    PendingRequest { correlation_id: u64 },
    #[returns(DrawRecord)]
    Draw { draw_id: u64 },
    #[returns(DrawsResponse)]
    Draws {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(Vec<WinnerEntry>)]
    TierWinners { tier: u8 },
    #[returns(Vec<WinnerEntry>)]
    TypeWinners { raffle_type: u8 },
    /// Ordered sold entry ids for one raffle type.
    #[returns(Vec<u64>)]
    RafflePool { raffle_type: u8 },
    #[returns(bool)]
    IsRegistered { address: String },
}

#[cw_serde]
pub struct QuotaStatusResponse {
    pub tier: String,
    pub cumulative_sold: u64,
    pub season_total: u64,
    pub per_day_rate: u64,
    pub user_daily_cap: u32,
    pub day_index: u64,
    /// Carry-forward releasable amount at the current day.
    pub allowed_now: u64,
    pub sold_today: u64,
}

#[cw_serde]
pub struct MerchWindowResponse {
    pub type_id: u8,
    pub total_supply: u64,
    pub total_sold: u64,
    pub window_index: u64,
    pub window_limit: u64,
    /// Carry-forward releasable amount at the current window.
    pub released_now: u64,
    pub sold_in_window: u64,
    /// Informational only; no cap is enforced on this bucket.
    pub sold_today: u64,
}

#[cw_serde]
pub struct InventoryResponse {
    pub address: String,
    pub crates: Vec<u64>,
    pub raffle_entries: Vec<u64>,
    pub merch_types: Vec<u8>,
}

#[cw_serde]
pub struct DrawsResponse {
    pub draws: Vec<DrawRecord>,
}
