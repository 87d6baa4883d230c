use cosmwasm_schema::cw_serde;

/// Seconds per daily quota bucket.
pub const SECONDS_PER_DAY: u64 = 86_400;
/// Seconds per merchandise release window (6 hours).
pub const SECONDS_PER_WINDOW: u64 = 21_600;

/// The quality tier of a crate.
#[cw_serde]
#[derive(Copy)]
pub enum CrateTier {
    Bronze,
    Silver,
    Gold,
}

impl CrateTier {
    pub const ALL: [CrateTier; 3] = [CrateTier::Bronze, CrateTier::Silver, CrateTier::Gold];

    /// Storage/encoding tag, 1-based.
    pub fn as_u8(&self) -> u8 {
        match self {
            CrateTier::Bronze => 1,
            CrateTier::Silver => 2,
            CrateTier::Gold => 3,
        }
    }

    /// Index into per-tier lookup tables.
    pub fn index(&self) -> usize {
        self.as_u8() as usize - 1
    }

    pub fn from_u8(value: u8) -> Option<CrateTier> {
        match value {
            1 => Some(CrateTier::Bronze),
            2 => Some(CrateTier::Silver),
            3 => Some(CrateTier::Gold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CrateTier::Bronze => "bronze",
            CrateTier::Silver => "silver",
            CrateTier::Gold => "gold",
        }
    }
}

/// The monthly sales slot a crate belongs to.
#[cw_serde]
#[derive(Copy)]
pub enum MonthSlot {
    M1,
    M2,
    M3,
}

impl MonthSlot {
    /// Storage/encoding tag, 1-based.
    pub fn as_u8(&self) -> u8 {
        match self {
            MonthSlot::M1 => 1,
            MonthSlot::M2 => 2,
            MonthSlot::M3 => 3,
        }
    }

    /// Index into per-slot lookup tables.
    pub fn index(&self) -> usize {
        self.as_u8() as usize - 1
    }

    pub fn from_u8(value: u8) -> Option<MonthSlot> {
        match value {
            1 => Some(MonthSlot::M1),
            2 => Some(MonthSlot::M2),
            3 => Some(MonthSlot::M3),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MonthSlot::M1 => "m1",
            MonthSlot::M2 => "m2",
            MonthSlot::M3 => "m3",
        }
    }
}

/// Raffle types are grouped into tiers by their tens digit: types 11 and 12
/// share tier 1, type 23 is tier 2, and so on.
pub fn raffle_tier_of(raffle_type: u8) -> u8 {
    raffle_type / 10
}

/// Day bucket index since season start. Callers must have checked
/// `now >= season_start` already; saturates to day 0 otherwise.
pub fn day_index(now_seconds: u64, season_start_seconds: u64) -> u64 {
    now_seconds.saturating_sub(season_start_seconds) / SECONDS_PER_DAY
}

/// 6-hour merchandise window index since season start.
pub fn window_index(now_seconds: u64, season_start_seconds: u64) -> u64 {
    now_seconds.saturating_sub(season_start_seconds) / SECONDS_PER_WINDOW
}
