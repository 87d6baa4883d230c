use cosmwasm_std::{Addr, Storage};
use lootcrate_common::{day_index, window_index, CrateTier};

use crate::error::ContractError;
use crate::state::{
    Config, MerchItem, DAILY_COUNTERS, MERCH_SOLD_PER_DAY, MERCH_SOLD_PER_WINDOW, MERCH_TYPES,
    QUOTA_POOLS, SOLD_PER_DAY,
};

/// What a participant's same-day counter is charged for.
#[derive(Clone, Copy)]
pub enum DailyKind {
    Crate(CrateTier),
    Raffle,
}

/// Reserve `quantity` crates of `tier` against the global carry-forward pool.
///
/// The releasable amount grows by `per_day_rate` each day and is capped by the
/// season total, so unused daily allowance carries forward. The per-day sold
/// bucket is recorded for reporting but carries no cap of its own.
pub fn reserve_pool(
    storage: &mut dyn Storage,
    config: &Config,
    tier: CrateTier,
    quantity: u64,
    now_seconds: u64,
) -> Result<(), ContractError> {
    let quota = &config.tier_quotas[tier.index()];
    let day = day_index(now_seconds, config.season_start.seconds());
    let released = (day + 1).saturating_mul(quota.per_day_rate);
    let allowed = released.min(quota.season_total);

    let mut pool = QUOTA_POOLS
        .may_load(storage, tier.as_u8())?
        .unwrap_or_default();
    if pool.cumulative_sold + quantity > allowed {
        return Err(ContractError::QuotaExceeded {
            tier: tier.as_str().to_string(),
            requested: quantity,
            available: allowed.saturating_sub(pool.cumulative_sold),
        });
    }
    pool.cumulative_sold += quantity;
    QUOTA_POOLS.save(storage, tier.as_u8(), &pool)?;

    let sold_today = SOLD_PER_DAY
        .may_load(storage, (tier.as_u8(), day))?
        .unwrap_or(0);
    SOLD_PER_DAY.save(storage, (tier.as_u8(), day), &(sold_today + quantity))?;
    Ok(())
}

/// Charge `quantity` against the participant's same-day counter for `kind`,
/// enforcing the configured per-participant daily cap.
pub fn reserve_user_daily(
    storage: &mut dyn Storage,
    config: &Config,
    participant: &Addr,
    kind: DailyKind,
    quantity: u32,
    day: u64,
) -> Result<(), ContractError> {
    let mut counters = DAILY_COUNTERS
        .may_load(storage, (participant, day))?
        .unwrap_or_default();

    let (current, cap, what) = match kind {
        DailyKind::Crate(tier) => (
            counters.tier_count(tier),
            config.tier_quotas[tier.index()].user_daily_cap,
            tier.as_str(),
        ),
        DailyKind::Raffle => (counters.raffles, config.raffle_daily_cap, "raffles"),
    };
    if current + quantity > cap {
        return Err(ContractError::UserDailyLimitExceeded {
            what: what.to_string(),
            cap,
        });
    }

    match kind {
        DailyKind::Crate(tier) => counters.bump_tier(tier, quantity),
        DailyKind::Raffle => counters.raffles += quantity,
    }
    DAILY_COUNTERS.save(storage, (participant, day), &counters)?;
    Ok(())
}

/// Reserve merchandise against the season supply and the 6-hour release
/// window. The window check is carry-forward over the cumulative total, with
/// a quarter of the supply released per window. The per-day bucket is
/// recorded but not enforced; only the window cap gates the purchase.
pub fn reserve_merch(
    storage: &mut dyn Storage,
    item: &mut MerchItem,
    quantity: u64,
    now_seconds: u64,
    season_start_seconds: u64,
) -> Result<(), ContractError> {
    if item.total_sold + quantity > item.total_supply {
        return Err(ContractError::SupplyExceeded {
            type_id: item.type_id,
            total_supply: item.total_supply,
        });
    }

    let window = window_index(now_seconds, season_start_seconds);
    let window_limit = item.total_supply / 4;
    let released = window_limit.saturating_mul(window + 1);
    if item.total_sold + quantity > released {
        return Err(ContractError::WindowLimitExceeded {
            type_id: item.type_id,
            requested: quantity,
            available: released.saturating_sub(item.total_sold),
            window,
        });
    }

    item.total_sold += quantity;
    MERCH_TYPES.save(storage, item.type_id, item)?;

    let sold_in_window = MERCH_SOLD_PER_WINDOW
        .may_load(storage, (item.type_id, window))?
        .unwrap_or(0);
    MERCH_SOLD_PER_WINDOW.save(storage, (item.type_id, window), &(sold_in_window + quantity))?;

    let day = day_index(now_seconds, season_start_seconds);
    let sold_today = MERCH_SOLD_PER_DAY
        .may_load(storage, (item.type_id, day))?
        .unwrap_or(0);
    MERCH_SOLD_PER_DAY.save(storage, (item.type_id, day), &(sold_today + quantity))?;
    Ok(())
}
