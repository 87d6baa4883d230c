use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};
use lootcrate_common::{CrateTier, MonthSlot};

pub const CONFIG: Item<Config> = Item::new("config");
/// Strictly increasing allocation sequence per id class. See `ident`.
pub const SEQUENCES: Map<u8, u64> = Map::new("sequences");
pub const REGISTERED: Map<&Addr, ()> = Map::new("registered");

/// Global release pool per crate tier, keyed by tier tag.
pub const QUOTA_POOLS: Map<u8, QuotaPool> = Map::new("quota_pools");
/// Per-tier, per-day sold counts. Informational; the enforced cap is the
/// carry-forward `(day+1) * per_day_rate` bound on the cumulative total.
pub const SOLD_PER_DAY: Map<(u8, u64), u64> = Map::new("sold_per_day");
/// Per-participant purchase counters, keyed by day index.
pub const DAILY_COUNTERS: Map<(&Addr, u64), DailyCounters> = Map::new("daily_counters");

pub const CRATES: Map<u64, CrateRecord> = Map::new("crates");
pub const CRATES_BY_OWNER: Map<&Addr, Vec<u64>> = Map::new("crates_by_owner");
pub const RAFFLE_ENTRIES: Map<u64, RaffleEntry> = Map::new("raffle_entries");
pub const RAFFLES_BY_OWNER: Map<&Addr, Vec<u64>> = Map::new("raffles_by_owner");
/// Ordered sold entry ids per raffle type: the sampling pool for draws.
pub const RAFFLE_POOLS: Map<u8, Vec<u64>> = Map::new("raffle_pools");

pub const MERCH_TYPES: Map<u8, MerchItem> = Map::new("merch_types");
pub const MERCH_SOLD_PER_WINDOW: Map<(u8, u64), u64> = Map::new("merch_sold_window");
/// Tracked for reporting only. The purchase path enforces the 6-hour window
/// cap, never this bucket.
pub const MERCH_SOLD_PER_DAY: Map<(u8, u64), u64> = Map::new("merch_sold_day");
pub const MERCH_HOLDINGS: Map<(&Addr, u8), MerchHolding> = Map::new("merch_holdings");
pub const MERCH_BY_OWNER: Map<&Addr, Vec<u8>> = Map::new("merch_by_owner");

pub const PENDING_REQUESTS: Map<u64, PendingRequest> = Map::new("pending_requests");
/// Correlation id of the in-flight open request per crate; cleared on delivery.
pub const CRATE_PENDING: Map<u64, u64> = Map::new("crate_pending");

pub const NEXT_DRAW_ID: Item<u64> = Item::new("next_draw_id");
pub const DRAWS: Map<u64, DrawRecord> = Map::new("draws");
/// Append-only winner records per raffle tier (coarse grouping).
pub const TIER_WINNERS: Map<u8, Vec<WinnerEntry>> = Map::new("tier_winners");
/// Append-only winner records per raffle type.
pub const TYPE_WINNERS: Map<u8, Vec<WinnerEntry>> = Map::new("type_winners");

#[cw_serde]
pub struct Config {
    pub admin: Addr,
    pub operator: Addr,
    /// The VRF oracle contract; the only address allowed to call `Deliver`.
    pub oracle: Addr,
    pub treasury: Addr,
    /// Native denom participants pay with and prizes pay out in.
    pub credit_denom: String,
    /// Prize table values are whole credits; payouts scale by 10^decimals.
    pub credit_decimals: u32,
    pub season_start: Timestamp,
    pub season_end: Timestamp,
    /// When crates of each month slot become openable.
    pub slot_unlock_times: [Timestamp; 3],
    /// Crate price by [tier][slot], in credit base units.
    pub crate_prices: [[Uint128; 3]; 3],
    pub tier_quotas: [TierQuota; 3],
    pub raffle_prices: Vec<RaffleTierPrice>,
    /// Per-participant daily cap across all raffle types.
    pub raffle_daily_cap: u32,
    /// Ceiling on a single crate payout, in whole credits.
    pub max_crate_payout: u64,
    /// Confirmations forwarded with every oracle request.
    pub request_confirmations: u32,
}

#[cw_serde]
pub struct TierQuota {
    pub season_total: u64,
    pub per_day_rate: u64,
    pub user_daily_cap: u32,
}

#[cw_serde]
pub struct RaffleTierPrice {
    pub tier: u8,
    pub price: Uint128,
}

#[cw_serde]
#[derive(Default)]
pub struct QuotaPool {
    pub cumulative_sold: u64,
}

#[cw_serde]
#[derive(Default)]
pub struct DailyCounters {
    pub raffles: u32,
    pub bronze: u32,
    pub silver: u32,
    pub gold: u32,
}

impl DailyCounters {
    pub fn tier_count(&self, tier: CrateTier) -> u32 {
        match tier {
            CrateTier::Bronze => self.bronze,
            CrateTier::Silver => self.silver,
            CrateTier::Gold => self.gold,
        }
    }

    pub fn bump_tier(&mut self, tier: CrateTier, quantity: u32) {
        match tier {
            CrateTier::Bronze => self.bronze += quantity,
            CrateTier::Silver => self.silver += quantity,
            CrateTier::Gold => self.gold += quantity,
        }
    }
}

#[cw_serde]
pub struct CrateRecord {
    pub id: u64,
    pub owner: Addr,
    pub tier: CrateTier,
    pub slot: MonthSlot,
    pub unlock_time: Timestamp,
    pub price: Uint128,
    pub purchased_at: Timestamp,
    pub opened: bool,
    pub opened_at: Option<Timestamp>,
    /// Resolved payout in whole credits; set exactly once by delivery.
    pub prize: Option<u64>,
    pub claimed: bool,
}

#[cw_serde]
pub struct RaffleEntry {
    pub id: u64,
    pub raffle_type: u8,
    pub owner: Addr,
    pub price: Uint128,
    pub purchased_at: Timestamp,
}

#[cw_serde]
pub struct MerchItem {
    pub type_id: u8,
    pub name: String,
    pub price: Uint128,
    pub total_supply: u64,
    pub total_sold: u64,
}

#[cw_serde]
pub struct MerchHolding {
    pub type_id: u8,
    /// Always exactly 1; the season-lifetime cap per participant and type.
    pub quantity: u32,
    pub price_paid: Uint128,
    pub purchased_at: Timestamp,
}

#[cw_serde]
pub enum RequestTarget {
    CrateOpen { crate_id: u64 },
    DrawPart { draw_id: u64, part: u32 },
}

#[cw_serde]
pub enum RequestStatus {
    Pending,
    Fulfilled,
}

/// One randomness request in the gateway state machine. A record that stays
/// Pending forever is a valid terminal state; fulfilment happens at most once.
#[cw_serde]
pub struct PendingRequest {
    pub correlation_id: u64,
    pub target: RequestTarget,
    pub seed: Vec<u8>,
    pub count: u16,
    pub confirmations: u32,
    /// Address that triggered the request; bound into the delivery proof.
    pub origin: Addr,
    pub status: RequestStatus,
    pub words: Option<Vec<u64>>,
    pub requested_at: Timestamp,
    pub fulfilled_at: Option<Timestamp>,
}

#[cw_serde]
pub enum DrawStatus {
    Pending,
    Completed,
}

#[cw_serde]
pub struct DrawRecord {
    pub id: u64,
    pub raffle_type: u8,
    pub tier: u8,
    pub winner_count: u32,
    /// Correlation ids of the sub-requests, in issue order; the random
    /// streams are concatenated in this order for winner selection.
    pub correlation_ids: Vec<u64>,
    pub parts_fulfilled: u32,
    pub status: DrawStatus,
    pub winners: Vec<WinnerEntry>,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

#[cw_serde]
pub struct WinnerEntry {
    pub address: Addr,
    pub entry_id: u64,
}
