pub mod randomness;
pub mod types;

pub use randomness::request_digest;
pub use types::{
    day_index, raffle_tier_of, window_index, CrateTier, MonthSlot, SECONDS_PER_DAY,
    SECONDS_PER_WINDOW,
};
