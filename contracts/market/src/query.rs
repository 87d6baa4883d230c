use cosmwasm_std::{to_json_binary, Binary, Deps, Order, StdResult};
use cw_storage_plus::Bound;
use lootcrate_common::{day_index, window_index, CrateTier};

use crate::msg::{DrawsResponse, InventoryResponse, MerchWindowResponse, QuotaStatusResponse};
use crate::state::{
    CONFIG, CRATES, CRATES_BY_OWNER, DAILY_COUNTERS, DRAWS, MERCH_BY_OWNER, MERCH_HOLDINGS,
    MERCH_SOLD_PER_DAY, MERCH_SOLD_PER_WINDOW, MERCH_TYPES, PENDING_REQUESTS, QUOTA_POOLS,
    RAFFLES_BY_OWNER, RAFFLE_ENTRIES, RAFFLE_POOLS, REGISTERED, SOLD_PER_DAY, TIER_WINNERS,
    TYPE_WINNERS,
};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_quota_status(deps: Deps, tier: CrateTier, now_seconds: u64) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let quota = &config.tier_quotas[tier.index()];
    let day = day_index(now_seconds, config.season_start.seconds());
    let released = (day + 1).saturating_mul(quota.per_day_rate);
    let pool = QUOTA_POOLS
        .may_load(deps.storage, tier.as_u8())?
        .unwrap_or_default();
    let sold_today = SOLD_PER_DAY
        .may_load(deps.storage, (tier.as_u8(), day))?
        .unwrap_or(0);

    to_json_binary(&QuotaStatusResponse {
        tier: tier.as_str().to_string(),
        cumulative_sold: pool.cumulative_sold,
        season_total: quota.season_total,
        per_day_rate: quota.per_day_rate,
        user_daily_cap: quota.user_daily_cap,
        day_index: day,
        allowed_now: released.min(quota.season_total),
        sold_today,
    })
}

pub fn query_merch_window(deps: Deps, type_id: u8, now_seconds: u64) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let item = MERCH_TYPES.load(deps.storage, type_id)?;
    let window = window_index(now_seconds, config.season_start.seconds());
    let day = day_index(now_seconds, config.season_start.seconds());
    let window_limit = item.total_supply / 4;
    let sold_in_window = MERCH_SOLD_PER_WINDOW
        .may_load(deps.storage, (type_id, window))?
        .unwrap_or(0);
    let sold_today = MERCH_SOLD_PER_DAY
        .may_load(deps.storage, (type_id, day))?
        .unwrap_or(0);

    to_json_binary(&MerchWindowResponse {
        type_id,
        total_supply: item.total_supply,
        total_sold: item.total_sold,
        window_index: window,
        window_limit,
        released_now: window_limit.saturating_mul(window + 1),
        sold_in_window,
        sold_today,
    })
}

pub fn query_inventory(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let crates = CRATES_BY_OWNER
        .may_load(deps.storage, &addr)?
        .unwrap_or_default();
    let raffle_entries = RAFFLES_BY_OWNER
        .may_load(deps.storage, &addr)?
        .unwrap_or_default();
    let merch_types = MERCH_BY_OWNER
        .may_load(deps.storage, &addr)?
        .unwrap_or_default();

    to_json_binary(&InventoryResponse {
        address,
        crates,
        raffle_entries,
        merch_types,
    })
}

pub fn query_crate(deps: Deps, crate_id: u64) -> StdResult<Binary> {
    let record = CRATES.load(deps.storage, crate_id)?;
    to_json_binary(&record)
}

pub fn query_raffle_entry(deps: Deps, entry_id: u64) -> StdResult<Binary> {
    let entry = RAFFLE_ENTRIES.load(deps.storage, entry_id)?;
    to_json_binary(&entry)
}

pub fn query_merch_type(deps: Deps, type_id: u8) -> StdResult<Binary> {
    let item = MERCH_TYPES.load(deps.storage, type_id)?;
    to_json_binary(&item)
}

pub fn query_merch_holding(deps: Deps, address: String, type_id: u8) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let holding = MERCH_HOLDINGS.may_load(deps.storage, (&addr, type_id))?;
    to_json_binary(&holding)
}

pub fn query_daily_counters(deps: Deps, address: String, day: u64) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let counters = DAILY_COUNTERS
        .may_load(deps.storage, (&addr, day))?
        .unwrap_or_default();
    to_json_binary(&counters)
}

pub fn query_pending_request(deps: Deps, correlation_id: u64) -> StdResult<Binary> {
    let pending = PENDING_REQUESTS.may_load(deps.storage, correlation_id)?;
    to_json_binary(&pending)
}

pub fn query_draw(deps: Deps, draw_id: u64) -> StdResult<Binary> {
    let draw = DRAWS.load(deps.storage, draw_id)?;
    to_json_binary(&draw)
}

pub fn query_draws(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let draws: Vec<_> = DRAWS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, draw)| draw)
        .collect();

    to_json_binary(&DrawsResponse { draws })
}

pub fn query_tier_winners(deps: Deps, tier: u8) -> StdResult<Binary> {
    let winners = TIER_WINNERS
        .may_load(deps.storage, tier)?
        .unwrap_or_default();
    to_json_binary(&winners)
}

pub fn query_type_winners(deps: Deps, raffle_type: u8) -> StdResult<Binary> {
    let winners = TYPE_WINNERS
        .may_load(deps.storage, raffle_type)?
        .unwrap_or_default();
    to_json_binary(&winners)
}

pub fn query_raffle_pool(deps: Deps, raffle_type: u8) -> StdResult<Binary> {
    let pool = RAFFLE_POOLS
        .may_load(deps.storage, raffle_type)?
        .unwrap_or_default();
    to_json_binary(&pool)
}

pub fn query_is_registered(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    to_json_binary(&REGISTERED.has(deps.storage, &addr))
}
