use std::collections::BTreeSet;

use cosmwasm_std::{
    coins, to_json_binary, Addr, BankMsg, DepsMut, Env, Event, MessageInfo, Response, Timestamp,
    Uint128, WasmMsg,
};
use lootcrate_common::{day_index, raffle_tier_of, request_digest, CrateTier, MonthSlot};

use crate::error::ContractError;
use crate::ident;
use crate::msg::OracleExecuteMsg;
use crate::prize;
use crate::quota::{self, DailyKind};
use crate::randomness::{bucket_from_word, split_counts};
use crate::state::{
    Config, CrateRecord, DrawRecord, DrawStatus, MerchHolding, MerchItem, PendingRequest,
    RaffleEntry, RequestStatus, RequestTarget, TierQuota, WinnerEntry, CONFIG, CRATES,
    CRATES_BY_OWNER, CRATE_PENDING, DRAWS, MERCH_BY_OWNER, MERCH_HOLDINGS, MERCH_TYPES,
    NEXT_DRAW_ID, PENDING_REQUESTS, RAFFLES_BY_OWNER, RAFFLE_ENTRIES, RAFFLE_POOLS, REGISTERED,
    TIER_WINNERS, TYPE_WINNERS,
};
use crate::winners::select_winners;

fn ensure_registered(
    storage: &dyn cosmwasm_std::Storage,
    participant: &Addr,
) -> Result<(), ContractError> {
    if !REGISTERED.has(storage, participant) {
        return Err(ContractError::NotRegistered {
            address: participant.to_string(),
        });
    }
    Ok(())
}

fn ensure_in_season(config: &Config, now: Timestamp) -> Result<(), ContractError> {
    if now < config.season_start || now >= config.season_end {
        return Err(ContractError::OutOfSeasonWindow {
            reason: format!(
                "season runs [{}, {})",
                config.season_start.seconds(),
                config.season_end.seconds()
            ),
        });
    }
    Ok(())
}

/// Validate the payment funds and build the settlement messages: the price
/// goes to the treasury, any excess returns to the sender. Underpayment fails
/// the whole transaction, so no quota or inventory effect survives it.
fn take_payment(
    info: &MessageInfo,
    config: &Config,
    total: Uint128,
) -> Result<Vec<BankMsg>, ContractError> {
    let sent = match info.funds.len() {
        0 => Uint128::zero(),
        1 if info.funds[0].denom == config.credit_denom => info.funds[0].amount,
        _ => {
            return Err(ContractError::InvalidArgument {
                reason: format!("payment must be a single {} coin", config.credit_denom),
            })
        }
    };
    if sent < total {
        return Err(ContractError::InsufficientFunds {
            needed: total,
            sent,
            denom: config.credit_denom.clone(),
        });
    }

    let mut msgs = Vec::new();
    if !total.is_zero() {
        msgs.push(BankMsg::Send {
            to_address: config.treasury.to_string(),
            amount: coins(total.u128(), &config.credit_denom),
        });
    }
    let excess = sent - total;
    if !excess.is_zero() {
        msgs.push(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: coins(excess.u128(), &config.credit_denom),
        });
    }
    Ok(msgs)
}

/// Register a participant. Admin only (stands in for the external
/// on-boarding collaborator). Idempotent.
pub fn register(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can register participants".to_string(),
        });
    }
    let addr = deps.api.addr_validate(&address)?;
    REGISTERED.save(deps.storage, &addr, &())?;

    Ok(Response::new()
        .add_attribute("action", "register")
        .add_attribute("participant", address))
}

/// Buy `quantity` crates of one tier/slot against the carry-forward pool and
/// the participant's daily cap.
pub fn buy_crates(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    tier: CrateTier,
    slot: MonthSlot,
    quantity: u32,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_registered(deps.storage, &info.sender)?;
    if quantity == 0 {
        return Err(ContractError::InvalidArgument {
            reason: "quantity must be at least 1".to_string(),
        });
    }
    ensure_in_season(&config, env.block.time)?;

    let price = config.crate_prices[tier.index()][slot.index()];
    let total = price * Uint128::from(quantity);
    let pay_msgs = take_payment(&info, &config, total)?;

    let now = env.block.time.seconds();
    quota::reserve_pool(deps.storage, &config, tier, quantity as u64, now)?;
    let day = day_index(now, config.season_start.seconds());
    quota::reserve_user_daily(
        deps.storage,
        &config,
        &info.sender,
        DailyKind::Crate(tier),
        quantity,
        day,
    )?;

    let unlock_time = config.slot_unlock_times[slot.index()];
    let mut owned = CRATES_BY_OWNER
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    let mut ids = Vec::with_capacity(quantity as usize);
    for _ in 0..quantity {
        let id = ident::allocate_crate_id(deps.storage, tier, slot)?;
        let record = CrateRecord {
            id,
            owner: info.sender.clone(),
            tier,
            slot,
            unlock_time,
            price,
            purchased_at: env.block.time,
            opened: false,
            opened_at: None,
            prize: None,
            claimed: false,
        };
        CRATES.save(deps.storage, id, &record)?;
        owned.push(id);
        ids.push(id.to_string());
    }
    CRATES_BY_OWNER.save(deps.storage, &info.sender, &owned)?;

    let mut response = Response::new()
        .add_attribute("action", "buy_crates")
        .add_attribute("buyer", info.sender.to_string())
        .add_attribute("tier", tier.as_str())
        .add_attribute("slot", slot.as_str())
        .add_attribute("quantity", quantity.to_string())
        .add_event(
            Event::new("lootcrate_crates_purchased")
                .add_attribute("buyer", info.sender.to_string())
                .add_attribute("tier", tier.as_str())
                .add_attribute("slot", slot.as_str())
                .add_attribute("ids", ids.join(","))
                .add_attribute("total_price", total.to_string()),
        );
    for msg in pay_msgs {
        response = response.add_message(msg);
    }
    Ok(response)
}

/// Buy `quantity` raffle entries of one type. Raffles carry no global pool;
/// only the per-participant daily cap applies.
pub fn buy_raffle_entries(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    raffle_type: u8,
    quantity: u32,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_registered(deps.storage, &info.sender)?;
    if quantity == 0 {
        return Err(ContractError::InvalidArgument {
            reason: "quantity must be at least 1".to_string(),
        });
    }
    ensure_in_season(&config, env.block.time)?;

    let tier = raffle_tier_of(raffle_type);
    let price = config
        .raffle_prices
        .iter()
        .find(|p| p.tier == tier)
        .map(|p| p.price)
        .ok_or_else(|| ContractError::InvalidArgument {
            reason: format!("no price configured for raffle tier {tier}"),
        })?;
    let total = price * Uint128::from(quantity);
    let pay_msgs = take_payment(&info, &config, total)?;

    let now = env.block.time.seconds();
    let day = day_index(now, config.season_start.seconds());
    quota::reserve_user_daily(
        deps.storage,
        &config,
        &info.sender,
        DailyKind::Raffle,
        quantity,
        day,
    )?;

    let mut owned = RAFFLES_BY_OWNER
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    let mut pool = RAFFLE_POOLS
        .may_load(deps.storage, raffle_type)?
        .unwrap_or_default();
    let mut ids = Vec::with_capacity(quantity as usize);
    for _ in 0..quantity {
        let id = ident::allocate_raffle_id(deps.storage, raffle_type)?;
        let entry = RaffleEntry {
            id,
            raffle_type,
            owner: info.sender.clone(),
            price,
            purchased_at: env.block.time,
        };
        RAFFLE_ENTRIES.save(deps.storage, id, &entry)?;
        owned.push(id);
        pool.push(id);
        ids.push(id.to_string());
    }
    RAFFLES_BY_OWNER.save(deps.storage, &info.sender, &owned)?;
    RAFFLE_POOLS.save(deps.storage, raffle_type, &pool)?;

    let mut response = Response::new()
        .add_attribute("action", "buy_raffle_entries")
        .add_attribute("buyer", info.sender.to_string())
        .add_attribute("raffle_type", raffle_type.to_string())
        .add_attribute("quantity", quantity.to_string())
        .add_event(
            Event::new("lootcrate_raffles_purchased")
                .add_attribute("buyer", info.sender.to_string())
                .add_attribute("raffle_type", raffle_type.to_string())
                .add_attribute("ids", ids.join(","))
                .add_attribute("total_price", total.to_string()),
        );
    for msg in pay_msgs {
        response = response.add_message(msg);
    }
    Ok(response)
}

/// Buy one unit of a merch type. Exactly one unit per participant per type
/// per season; the supply and 6-hour window caps gate the global release.
pub fn buy_merch(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    type_id: u8,
    quantity: u32,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_registered(deps.storage, &info.sender)?;
    if quantity != 1 {
        return Err(ContractError::InvalidArgument {
            reason: "merch purchase quantity must be exactly 1".to_string(),
        });
    }
    ensure_in_season(&config, env.block.time)?;

    let mut item = MERCH_TYPES
        .may_load(deps.storage, type_id)?
        .ok_or(ContractError::MerchTypeNotFound { type_id })?;
    if MERCH_HOLDINGS.has(deps.storage, (&info.sender, type_id)) {
        return Err(ContractError::MerchAlreadyPurchased { type_id });
    }

    let pay_msgs = take_payment(&info, &config, item.price)?;

    let now = env.block.time.seconds();
    quota::reserve_merch(
        deps.storage,
        &mut item,
        1,
        now,
        config.season_start.seconds(),
    )?;

    let holding = MerchHolding {
        type_id,
        quantity: 1,
        price_paid: item.price,
        purchased_at: env.block.time,
    };
    MERCH_HOLDINGS.save(deps.storage, (&info.sender, type_id), &holding)?;
    let mut owned = MERCH_BY_OWNER
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    owned.push(type_id);
    MERCH_BY_OWNER.save(deps.storage, &info.sender, &owned)?;

    let mut response = Response::new()
        .add_attribute("action", "buy_merch")
        .add_attribute("buyer", info.sender.to_string())
        .add_attribute("type_id", type_id.to_string())
        .add_event(
            Event::new("lootcrate_merch_purchased")
                .add_attribute("buyer", info.sender.to_string())
                .add_attribute("type_id", type_id.to_string())
                .add_attribute("price", item.price.to_string())
                .add_attribute("total_sold", item.total_sold.to_string()),
        );
    for msg in pay_msgs {
        response = response.add_message(msg);
    }
    Ok(response)
}

/// Request one random word to open an owned, unlocked crate. Fire-and-forget:
/// the request is registered with the oracle and the crate stays unopened
/// until a verified delivery arrives, which may be never.
pub fn open_crate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    crate_id: u64,
    seed_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let record = CRATES
        .may_load(deps.storage, crate_id)?
        .ok_or(ContractError::CrateNotFound { crate_id })?;
    if record.owner != info.sender {
        return Err(ContractError::NotOwner {
            what: "crate".to_string(),
            id: crate_id,
        });
    }
    if record.opened {
        return Err(ContractError::AlreadyOpened { crate_id });
    }
    if CRATE_PENDING.has(deps.storage, crate_id) {
        return Err(ContractError::RandomnessPending { crate_id });
    }
    if env.block.time < record.unlock_time {
        return Err(ContractError::OutOfSeasonWindow {
            reason: format!(
                "crate {crate_id} is locked until {}",
                record.unlock_time.seconds()
            ),
        });
    }

    let seed = hex::decode(&seed_hex).map_err(|_| ContractError::InvalidHex {
        field: "seed_hex".to_string(),
    })?;
    let correlation_id = ident::allocate_correlation_id(deps.storage)?;
    let pending = PendingRequest {
        correlation_id,
        target: RequestTarget::CrateOpen { crate_id },
        seed,
        count: 1,
        confirmations: config.request_confirmations,
        origin: info.sender.clone(),
        status: RequestStatus::Pending,
        words: None,
        requested_at: env.block.time,
        fulfilled_at: None,
    };
    PENDING_REQUESTS.save(deps.storage, correlation_id, &pending)?;
    CRATE_PENDING.save(deps.storage, crate_id, &correlation_id)?;

    let register_msg = WasmMsg::Execute {
        contract_addr: config.oracle.to_string(),
        msg: to_json_binary(&OracleExecuteMsg::RegisterRequest {
            correlation_id,
            seed_hex,
            count: 1,
            confirmations: config.request_confirmations,
            origin: info.sender.to_string(),
        })?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_message(register_msg)
        .add_attribute("action", "open_crate")
        .add_attribute("crate_id", crate_id.to_string())
        .add_attribute("correlation_id", correlation_id.to_string())
        .add_event(
            Event::new("lootcrate_open_requested")
                .add_attribute("crate_id", crate_id.to_string())
                .add_attribute("owner", info.sender.to_string())
                .add_attribute("correlation_id", correlation_id.to_string()),
        ))
}

/// Pay out the resolved prize of an opened crate, once.
pub fn claim_prize(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    crate_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut record = CRATES
        .may_load(deps.storage, crate_id)?
        .ok_or(ContractError::CrateNotFound { crate_id })?;
    if record.owner != info.sender {
        return Err(ContractError::NotOwner {
            what: "crate".to_string(),
            id: crate_id,
        });
    }
    if !record.opened {
        return Err(ContractError::NotYetOpened { crate_id });
    }
    if record.claimed {
        return Err(ContractError::AlreadyClaimed { crate_id });
    }
    let payout = record
        .prize
        .ok_or(ContractError::NotYetOpened { crate_id })?;

    record.claimed = true;
    CRATES.save(deps.storage, crate_id, &record)?;

    let amount = Uint128::from(payout) * Uint128::from(10u128.pow(config.credit_decimals));
    let mut response = Response::new()
        .add_attribute("action", "claim_prize")
        .add_attribute("crate_id", crate_id.to_string())
        .add_attribute("payout", payout.to_string())
        .add_event(
            Event::new("lootcrate_prize_claimed")
                .add_attribute("crate_id", crate_id.to_string())
                .add_attribute("owner", info.sender.to_string())
                .add_attribute("payout_credits", payout.to_string())
                .add_attribute("amount", amount.to_string()),
        );
    if !amount.is_zero() {
        response = response.add_message(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: coins(amount.u128(), &config.credit_denom),
        });
    }
    Ok(response)
}

/// Start a winner draw for one raffle type. Operator only. Requests
/// `2 * winner_count` words to leave slack for duplicate-owner skips.
pub fn start_draw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    raffle_type: u8,
    winner_count: u32,
    seed_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.operator {
        return Err(ContractError::Unauthorized {
            reason: "only operator can start draws".to_string(),
        });
    }
    if winner_count == 0 {
        return Err(ContractError::InvalidArgument {
            reason: "winner count must be at least 1".to_string(),
        });
    }
    let pool = RAFFLE_POOLS
        .may_load(deps.storage, raffle_type)?
        .unwrap_or_default();
    if pool.is_empty() {
        return Err(ContractError::InvalidArgument {
            reason: format!("no raffle entries sold for type {raffle_type}"),
        });
    }

    let seed = hex::decode(&seed_hex).map_err(|_| ContractError::InvalidHex {
        field: "seed_hex".to_string(),
    })?;
    let count = winner_count
        .checked_mul(2)
        .and_then(|c| u16::try_from(c).ok())
        .ok_or_else(|| ContractError::InvalidArgument {
            reason: format!("winner count {winner_count} is too large"),
        })?;
    let parts = split_counts(count)?;

    let draw_id = NEXT_DRAW_ID.load(deps.storage)?;
    NEXT_DRAW_ID.save(deps.storage, &(draw_id + 1))?;

    let mut correlation_ids = Vec::with_capacity(parts.len());
    let mut register_msgs = Vec::with_capacity(parts.len());
    for (part, part_count) in parts.iter().enumerate() {
        let correlation_id = ident::allocate_correlation_id(deps.storage)?;
        let pending = PendingRequest {
            correlation_id,
            target: RequestTarget::DrawPart {
                draw_id,
                part: part as u32,
            },
            seed: seed.clone(),
            count: *part_count,
            confirmations: config.request_confirmations,
            origin: info.sender.clone(),
            status: RequestStatus::Pending,
            words: None,
            requested_at: env.block.time,
            fulfilled_at: None,
        };
        PENDING_REQUESTS.save(deps.storage, correlation_id, &pending)?;
        correlation_ids.push(correlation_id);
        register_msgs.push(WasmMsg::Execute {
            contract_addr: config.oracle.to_string(),
            msg: to_json_binary(&OracleExecuteMsg::RegisterRequest {
                correlation_id,
                seed_hex: seed_hex.clone(),
                count: *part_count,
                confirmations: config.request_confirmations,
                origin: info.sender.to_string(),
            })?,
            funds: vec![],
        });
    }

    let draw = DrawRecord {
        id: draw_id,
        raffle_type,
        tier: raffle_tier_of(raffle_type),
        winner_count,
        correlation_ids: correlation_ids.clone(),
        parts_fulfilled: 0,
        status: DrawStatus::Pending,
        winners: Vec::new(),
        created_at: env.block.time,
        completed_at: None,
    };
    DRAWS.save(deps.storage, draw_id, &draw)?;

    let mut response = Response::new()
        .add_attribute("action", "start_draw")
        .add_attribute("draw_id", draw_id.to_string())
        .add_attribute("raffle_type", raffle_type.to_string())
        .add_attribute("winner_count", winner_count.to_string())
        .add_event(
            Event::new("lootcrate_draw_started")
                .add_attribute("draw_id", draw_id.to_string())
                .add_attribute("raffle_type", raffle_type.to_string())
                .add_attribute("winner_count", winner_count.to_string())
                .add_attribute(
                    "correlation_ids",
                    correlation_ids
                        .iter()
                        .map(|c| c.to_string())
                        .collect::<Vec<_>>()
                        .join(","),
                ),
        );
    for msg in register_msgs {
        response = response.add_message(msg);
    }
    Ok(response)
}

/// Randomness callback from the oracle. Verifies the proof against the
/// pending record (fail-closed: a bad proof leaves the record untouched),
/// stores the words, and drives prize resolution or winner selection.
pub fn deliver(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    correlation_id: u64,
    words: Vec<u64>,
    proof_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.oracle {
        return Err(ContractError::Unauthorized {
            reason: "only the randomness oracle can deliver".to_string(),
        });
    }

    let mut pending = PENDING_REQUESTS
        .may_load(deps.storage, correlation_id)?
        .ok_or(ContractError::UnknownCorrelation { correlation_id })?;
    if pending.status == RequestStatus::Fulfilled {
        return Err(ContractError::AlreadyFulfilled { correlation_id });
    }
    if words.len() != pending.count as usize {
        return Err(ContractError::InvalidArgument {
            reason: format!(
                "expected {} words, got {}",
                pending.count,
                words.len()
            ),
        });
    }

    let proof = hex::decode(&proof_hex).map_err(|_| ContractError::VerificationFailed {
        reason: "proof is not valid hex".to_string(),
    })?;
    let expected = request_digest(
        correlation_id,
        &pending.seed,
        pending.count,
        pending.origin.as_str(),
    );
    if proof != expected {
        return Err(ContractError::VerificationFailed {
            reason: "request digest mismatch".to_string(),
        });
    }

    pending.status = RequestStatus::Fulfilled;
    pending.words = Some(words.clone());
    pending.fulfilled_at = Some(env.block.time);
    PENDING_REQUESTS.save(deps.storage, correlation_id, &pending)?;

    match pending.target {
        RequestTarget::CrateOpen { crate_id } => {
            resolve_crate_open(deps, env, &config, correlation_id, crate_id, words[0])
        }
        RequestTarget::DrawPart { draw_id, part } => {
            advance_draw(deps, env, correlation_id, draw_id, part)
        }
    }
}

/// Derive the prize bucket from the delivered word and open the crate.
/// `opened`, `prize` and `opened_at` are set exactly once here.
fn resolve_crate_open(
    deps: DepsMut,
    env: Env,
    config: &Config,
    correlation_id: u64,
    crate_id: u64,
    word: u64,
) -> Result<Response, ContractError> {
    let mut record = CRATES
        .may_load(deps.storage, crate_id)?
        .ok_or(ContractError::CrateNotFound { crate_id })?;
    if record.opened {
        return Err(ContractError::AlreadyOpened { crate_id });
    }

    let bucket = bucket_from_word(word);
    let payout = prize::resolve(record.tier, bucket, config.max_crate_payout);
    record.opened = true;
    record.opened_at = Some(env.block.time);
    record.prize = Some(payout);
    CRATES.save(deps.storage, crate_id, &record)?;
    CRATE_PENDING.remove(deps.storage, crate_id);

    Ok(Response::new()
        .add_attribute("action", "deliver")
        .add_attribute("correlation_id", correlation_id.to_string())
        .add_attribute("crate_id", crate_id.to_string())
        .add_attribute("payout", payout.to_string())
        .add_event(
            Event::new("lootcrate_crate_opened")
                .add_attribute("crate_id", crate_id.to_string())
                .add_attribute("owner", record.owner.to_string())
                .add_attribute("tier", record.tier.as_str())
                .add_attribute("bucket", bucket.to_string())
                .add_attribute("payout_credits", payout.to_string()),
        ))
}

/// Record one fulfilled draw part; when the last part lands, concatenate the
/// part streams in issue order and run winner selection.
fn advance_draw(
    deps: DepsMut,
    env: Env,
    correlation_id: u64,
    draw_id: u64,
    part: u32,
) -> Result<Response, ContractError> {
    let mut draw = DRAWS
        .may_load(deps.storage, draw_id)?
        .ok_or(ContractError::DrawNotFound { draw_id })?;
    draw.parts_fulfilled += 1;

    let mut response = Response::new()
        .add_attribute("action", "deliver")
        .add_attribute("correlation_id", correlation_id.to_string())
        .add_attribute("draw_id", draw_id.to_string())
        .add_attribute("part", part.to_string());

    if (draw.parts_fulfilled as usize) < draw.correlation_ids.len() {
        DRAWS.save(deps.storage, draw_id, &draw)?;
        return Ok(response);
    }

    // All parts are in; concatenate the streams in issue order.
    let mut stream = Vec::new();
    for corr in &draw.correlation_ids {
        let req = PENDING_REQUESTS.load(deps.storage, *corr)?;
        let part_words = req.words.ok_or_else(|| {
            ContractError::Std(cosmwasm_std::StdError::generic_err(
                "fulfilled draw part has no words",
            ))
        })?;
        stream.extend(part_words);
    }

    let pool_ids = RAFFLE_POOLS
        .may_load(deps.storage, draw.raffle_type)?
        .unwrap_or_default();
    let mut pool = Vec::with_capacity(pool_ids.len());
    for entry_id in &pool_ids {
        let entry = RAFFLE_ENTRIES
            .may_load(deps.storage, *entry_id)?
            .ok_or(ContractError::RaffleEntryNotFound {
                entry_id: *entry_id,
            })?;
        pool.push((*entry_id, entry.owner));
    }

    let mut tier_record = TIER_WINNERS
        .may_load(deps.storage, draw.tier)?
        .unwrap_or_default();
    let mut type_record = TYPE_WINNERS
        .may_load(deps.storage, draw.raffle_type)?
        .unwrap_or_default();
    let mut tier_seen: BTreeSet<Addr> =
        tier_record.iter().map(|w| w.address.clone()).collect();

    let picks = select_winners(&stream, &pool, &mut tier_seen, draw.winner_count as usize);
    for pick in &picks {
        let entry = WinnerEntry {
            address: pick.owner.clone(),
            entry_id: pick.entry_id,
        };
        tier_record.push(entry.clone());
        type_record.push(entry.clone());
        draw.winners.push(entry);
    }
    TIER_WINNERS.save(deps.storage, draw.tier, &tier_record)?;
    TYPE_WINNERS.save(deps.storage, draw.raffle_type, &type_record)?;

    draw.status = DrawStatus::Completed;
    draw.completed_at = Some(env.block.time);
    DRAWS.save(deps.storage, draw_id, &draw)?;

    response = response.add_event(
        Event::new("lootcrate_draw_completed")
            .add_attribute("draw_id", draw_id.to_string())
            .add_attribute("raffle_type", draw.raffle_type.to_string())
            .add_attribute("winners", picks.len().to_string())
            .add_attribute(
                "winner_entry_ids",
                picks
                    .iter()
                    .map(|p| p.entry_id.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
    );
    Ok(response)
}

/// Move the season window. Admin only; `start <= end` is preserved.
pub fn update_season(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    season_start: Option<u64>,
    season_end: Option<u64>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update the season".to_string(),
        });
    }
    if let Some(start) = season_start {
        config.season_start = Timestamp::from_seconds(start);
    }
    if let Some(end) = season_end {
        config.season_end = Timestamp::from_seconds(end);
    }
    if config.season_start > config.season_end {
        return Err(ContractError::InvalidArgument {
            reason: "season start is after season end".to_string(),
        });
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_season")
        .add_attribute("season_start", config.season_start.seconds().to_string())
        .add_attribute("season_end", config.season_end.seconds().to_string()))
}

pub fn set_crate_price(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    tier: CrateTier,
    slot: MonthSlot,
    price: Uint128,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can set prices".to_string(),
        });
    }
    config.crate_prices[tier.index()][slot.index()] = price;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_crate_price")
        .add_attribute("tier", tier.as_str())
        .add_attribute("slot", slot.as_str())
        .add_attribute("price", price.to_string()))
}

pub fn set_tier_quota(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    tier: CrateTier,
    quota: TierQuota,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can set quotas".to_string(),
        });
    }
    config.tier_quotas[tier.index()] = quota;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_tier_quota")
        .add_attribute("tier", tier.as_str()))
}

pub fn set_slot_unlock(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    slot: MonthSlot,
    unlock_time: u64,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can set unlock times".to_string(),
        });
    }
    config.slot_unlock_times[slot.index()] = Timestamp::from_seconds(unlock_time);
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_slot_unlock")
        .add_attribute("slot", slot.as_str())
        .add_attribute("unlock_time", unlock_time.to_string()))
}

pub fn set_raffle_price(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    tier: u8,
    price: Uint128,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can set prices".to_string(),
        });
    }
    match config.raffle_prices.iter_mut().find(|p| p.tier == tier) {
        Some(entry) => entry.price = price,
        None => config
            .raffle_prices
            .push(crate::state::RaffleTierPrice { tier, price }),
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_raffle_price")
        .add_attribute("raffle_tier", tier.to_string())
        .add_attribute("price", price.to_string()))
}

/// Register a merch type with its season supply. Admin only; a type id can
/// only be initialized once.
pub fn add_merch_type(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    type_id: u8,
    name: String,
    price: Uint128,
    total_supply: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can add merch types".to_string(),
        });
    }
    if MERCH_TYPES.has(deps.storage, type_id) {
        return Err(ContractError::AlreadyInitialized {
            subject: format!("merch type {type_id}"),
        });
    }
    let item = MerchItem {
        type_id,
        name: name.clone(),
        price,
        total_supply,
        total_sold: 0,
    };
    MERCH_TYPES.save(deps.storage, type_id, &item)?;

    Ok(Response::new()
        .add_attribute("action", "add_merch_type")
        .add_attribute("type_id", type_id.to_string())
        .add_attribute("name", name)
        .add_attribute("total_supply", total_supply.to_string()))
}

/// Update roles and scalar parameters. Admin only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    admin: Option<String>,
    operator: Option<String>,
    oracle: Option<String>,
    treasury: Option<String>,
    raffle_daily_cap: Option<u32>,
    max_crate_payout: Option<u64>,
    request_confirmations: Option<u32>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update config".to_string(),
        });
    }
    if let Some(new_admin) = admin {
        config.admin = deps.api.addr_validate(&new_admin)?;
    }
    if let Some(new_operator) = operator {
        config.operator = deps.api.addr_validate(&new_operator)?;
    }
    if let Some(new_oracle) = oracle {
        config.oracle = deps.api.addr_validate(&new_oracle)?;
    }
    if let Some(new_treasury) = treasury {
        config.treasury = deps.api.addr_validate(&new_treasury)?;
    }
    if let Some(cap) = raffle_daily_cap {
        config.raffle_daily_cap = cap;
    }
    if let Some(cap) = max_crate_payout {
        config.max_crate_payout = cap;
    }
    if let Some(confirmations) = request_confirmations {
        config.request_confirmations = confirmations;
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("action", "update_config"))
}
