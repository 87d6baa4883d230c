use cosmwasm_std::Storage;
use lootcrate_common::{CrateTier, MonthSlot};

use crate::error::ContractError;
use crate::state::SEQUENCES;

pub const CLASS_CRATE: u8 = 1;
pub const CLASS_RAFFLE: u8 = 2;
pub const CLASS_CORRELATION: u8 = 3;

/// Decimal field multipliers. Tags are three decimal digits wide; sequences
/// live below `SEQ_SPAN`, so a sequence can never spill into a tag field and
/// distinct classes can never collide.
const CLASS_MUL: u64 = 1_000_000_000_000_000;
const TAG1_MUL: u64 = 1_000_000_000_000;
const TAG2_MUL: u64 = 1_000_000_000;
const TAG_SPAN: u64 = 1_000;
const SEQ_SPAN: u64 = 1_000_000_000;

#[derive(Debug, PartialEq, Eq)]
pub struct DecodedId {
    pub class: u8,
    pub tag1: u16,
    pub tag2: u16,
    pub seq: u64,
}

/// Compose an id from its fields. Callers keep tags below 1000.
pub fn encode(class: u8, tag1: u16, tag2: u16, seq: u64) -> u64 {
    debug_assert!((tag1 as u64) < TAG_SPAN && (tag2 as u64) < TAG_SPAN && seq < SEQ_SPAN);
    class as u64 * CLASS_MUL + tag1 as u64 * TAG1_MUL + tag2 as u64 * TAG2_MUL + seq
}

/// Recover the exact fields an id was composed from.
pub fn decode(id: u64) -> DecodedId {
    DecodedId {
        class: (id / CLASS_MUL) as u8,
        tag1: ((id / TAG1_MUL) % TAG_SPAN) as u16,
        tag2: ((id / TAG2_MUL) % TAG_SPAN) as u16,
        seq: id % SEQ_SPAN,
    }
}

fn next_seq(storage: &mut dyn Storage, class: u8) -> Result<u64, ContractError> {
    let seq = SEQUENCES.may_load(storage, class)?.unwrap_or(0) + 1;
    if seq >= SEQ_SPAN {
        return Err(ContractError::SequenceExhausted { class });
    }
    SEQUENCES.save(storage, class, &seq)?;
    Ok(seq)
}

pub fn allocate_crate_id(
    storage: &mut dyn Storage,
    tier: CrateTier,
    slot: MonthSlot,
) -> Result<u64, ContractError> {
    let seq = next_seq(storage, CLASS_CRATE)?;
    Ok(encode(CLASS_CRATE, tier.as_u8() as u16, slot.as_u8() as u16, seq))
}

pub fn allocate_raffle_id(
    storage: &mut dyn Storage,
    raffle_type: u8,
) -> Result<u64, ContractError> {
    let seq = next_seq(storage, CLASS_RAFFLE)?;
    Ok(encode(CLASS_RAFFLE, raffle_type as u16, 0, seq))
}

pub fn allocate_correlation_id(storage: &mut dyn Storage) -> Result<u64, ContractError> {
    let seq = next_seq(storage, CLASS_CORRELATION)?;
    Ok(encode(CLASS_CORRELATION, 0, 0, seq))
}
