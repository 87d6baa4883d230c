use std::collections::BTreeSet;

use cosmwasm_std::Addr;

/// One accepted winner: the sampled entry and its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerPick {
    pub entry_id: u64,
    pub owner: Addr,
}

/// Sample up to `target` winners from `pool` (the ordered sold entries of one
/// raffle type, as `(entry_id, owner)` pairs) by walking `stream` in order.
///
/// Each random value maps to a pool index (`r` directly when it is already in
/// range, `r mod pool_len` otherwise). An owner already present in the
/// tier-level `tier_seen` set is skipped without consuming a winner slot;
/// accepted owners are added to the set. Selection stops when `target`
/// winners are accepted or the stream runs dry — a short stream simply yields
/// fewer winners.
pub fn select_winners(
    stream: &[u64],
    pool: &[(u64, Addr)],
    tier_seen: &mut BTreeSet<Addr>,
    target: usize,
) -> Vec<WinnerPick> {
    let mut picks = Vec::new();
    if pool.is_empty() || target == 0 {
        return picks;
    }
    let len = pool.len() as u64;

    for &value in stream {
        if picks.len() >= target {
            break;
        }
        let idx = if value < len { value } else { value % len };
        let (entry_id, owner) = &pool[idx as usize];
        if tier_seen.contains(owner) {
            continue;
        }
        tier_seen.insert(owner.clone());
        picks.push(WinnerPick {
            entry_id: *entry_id,
            owner: owner.clone(),
        });
    }
    picks
}
