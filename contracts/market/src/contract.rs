use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult, Timestamp,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};
use crate::query;
use crate::state::{Config, CONFIG, NEXT_DRAW_ID};

const CONTRACT_NAME: &str = "crates.io:lootcrate-market";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.season_start > msg.season_end {
        return Err(ContractError::InvalidArgument {
            reason: "season start is after season end".to_string(),
        });
    }
    if msg.credit_decimals > 18 {
        return Err(ContractError::InvalidArgument {
            reason: "credit decimals must be at most 18".to_string(),
        });
    }

    let config = Config {
        admin: info.sender.clone(),
        operator: deps.api.addr_validate(&msg.operator)?,
        oracle: deps.api.addr_validate(&msg.oracle)?,
        treasury: deps.api.addr_validate(&msg.treasury)?,
        credit_denom: msg.credit_denom,
        credit_decimals: msg.credit_decimals,
        season_start: Timestamp::from_seconds(msg.season_start),
        season_end: Timestamp::from_seconds(msg.season_end),
        slot_unlock_times: msg.slot_unlock_times.map(Timestamp::from_seconds),
        crate_prices: msg.crate_prices,
        tier_quotas: msg.tier_quotas,
        raffle_prices: msg.raffle_prices,
        raffle_daily_cap: msg.raffle_daily_cap,
        max_crate_payout: msg.max_crate_payout,
        request_confirmations: msg.request_confirmations,
    };
    CONFIG.save(deps.storage, &config)?;
    NEXT_DRAW_ID.save(deps.storage, &1u64)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "lootcrate-market")
        .add_attribute("admin", info.sender.to_string())
        .add_attribute("season_start", msg.season_start.to_string())
        .add_attribute("season_end", msg.season_end.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Register { address } => execute::register(deps, env, info, address),
        ExecuteMsg::BuyCrates {
            tier,
            slot,
            quantity,
        } => execute::buy_crates(deps, env, info, tier, slot, quantity),
        ExecuteMsg::BuyRaffleEntries {
            raffle_type,
            quantity,
        } => execute::buy_raffle_entries(deps, env, info, raffle_type, quantity),
        ExecuteMsg::BuyMerch { type_id, quantity } => {
            execute::buy_merch(deps, env, info, type_id, quantity)
        }
        ExecuteMsg::OpenCrate { crate_id, seed_hex } => {
            execute::open_crate(deps, env, info, crate_id, seed_hex)
        }
        ExecuteMsg::ClaimPrize { crate_id } => execute::claim_prize(deps, env, info, crate_id),
        ExecuteMsg::StartDraw {
            raffle_type,
            winner_count,
            seed_hex,
        } => execute::start_draw(deps, env, info, raffle_type, winner_count, seed_hex),
        ExecuteMsg::Deliver {
            correlation_id,
            words,
            proof_hex,
        } => execute::deliver(deps, env, info, correlation_id, words, proof_hex),
        ExecuteMsg::UpdateSeason {
            season_start,
            season_end,
        } => execute::update_season(deps, env, info, season_start, season_end),
        ExecuteMsg::SetCratePrice { tier, slot, price } => {
            execute::set_crate_price(deps, env, info, tier, slot, price)
        }
        ExecuteMsg::SetTierQuota { tier, quota } => {
            execute::set_tier_quota(deps, env, info, tier, quota)
        }
        ExecuteMsg::SetSlotUnlock { slot, unlock_time } => {
            execute::set_slot_unlock(deps, env, info, slot, unlock_time)
        }
        ExecuteMsg::SetRafflePrice { tier, price } => {
            execute::set_raffle_price(deps, env, info, tier, price)
        }
        ExecuteMsg::AddMerchType {
            type_id,
            name,
            price,
            total_supply,
        } => execute::add_merch_type(deps, env, info, type_id, name, price, total_supply),
        ExecuteMsg::UpdateConfig {
            admin,
            operator,
            oracle,
            treasury,
            raffle_daily_cap,
            max_crate_payout,
            request_confirmations,
        } => execute::update_config(
            deps,
            env,
            info,
            admin,
            operator,
            oracle,
            treasury,
            raffle_daily_cap,
            max_crate_payout,
            request_confirmations,
        ),
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    let now_seconds = env.block.time.seconds();
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::QuotaStatus { tier } => query::query_quota_status(deps, tier, now_seconds),
        QueryMsg::MerchWindow { type_id } => {
            query::query_merch_window(deps, type_id, now_seconds)
        }
        QueryMsg::Inventory { address } => query::query_inventory(deps, address),
        QueryMsg::CrateInfo { crate_id } => query::query_crate(deps, crate_id),
        QueryMsg::RaffleEntryInfo { entry_id } => query::query_raffle_entry(deps, entry_id),
        QueryMsg::MerchType { type_id } => query::query_merch_type(deps, type_id),
        QueryMsg::MerchHolding { address, type_id } => {
            query::query_merch_holding(deps, address, type_id)
        }
        QueryMsg::DailyCounters { address, day } => {
            query::query_daily_counters(deps, address, day)
        }
        QueryMsg::PendingRequest { correlation_id } => {
            query::query_pending_request(deps, correlation_id)
        }
        QueryMsg::Draw { draw_id } => query::query_draw(deps, draw_id),
        QueryMsg::Draws { start_after, limit } => query::query_draws(deps, start_after, limit),
        QueryMsg::TierWinners { tier } => query::query_tier_winners(deps, tier),
        QueryMsg::TypeWinners { raffle_type } => query::query_type_winners(deps, raffle_type),
        QueryMsg::RafflePool { raffle_type } => query::query_raffle_pool(deps, raffle_type),
        QueryMsg::IsRegistered { address } => query::query_is_registered(deps, address),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident;
    use crate::msg::{InventoryResponse, OracleExecuteMsg, QuotaStatusResponse};
    use crate::state::{
        CrateRecord, DailyCounters, DrawStatus, RaffleTierPrice, RequestStatus, TierQuota,
        CRATES, CRATE_PENDING, DAILY_COUNTERS, DRAWS, PENDING_REQUESTS, QUOTA_POOLS,
        TIER_WINNERS, TYPE_WINNERS,
    };
    use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi};
    use cosmwasm_std::{
        coins, from_json, Addr, BankMsg, CosmosMsg, DepsMut, Uint128, WasmMsg,
    };
    use lootcrate_common::{request_digest, CrateTier, MonthSlot, SECONDS_PER_DAY};

    const DENOM: &str = "ucredit";

    fn default_instantiate_msg(api: &MockApi) -> InstantiateMsg {
        let start = mock_env().block.time.seconds();
        InstantiateMsg {
            operator: api.addr_make("operator").to_string(),
            oracle: api.addr_make("oracle").to_string(),
            treasury: api.addr_make("treasury").to_string(),
            credit_denom: DENOM.to_string(),
            credit_decimals: 6,
            season_start: start,
            season_end: start + 90 * SECONDS_PER_DAY,
            slot_unlock_times: [
                start,
                start + 30 * SECONDS_PER_DAY,
                start + 60 * SECONDS_PER_DAY,
            ],
            crate_prices: [
                [Uint128::new(100), Uint128::new(110), Uint128::new(120)],
                [Uint128::new(200), Uint128::new(210), Uint128::new(220)],
                [Uint128::new(400), Uint128::new(410), Uint128::new(420)],
            ],
            tier_quotas: [
                TierQuota {
                    season_total: 1000,
                    per_day_rate: 100,
                    user_daily_cap: 10,
                },
                TierQuota {
                    season_total: 500,
                    per_day_rate: 50,
                    user_daily_cap: 5,
                },
                TierQuota {
                    season_total: 100,
                    per_day_rate: 10,
                    user_daily_cap: 2,
                },
            ],
            raffle_prices: vec![
                RaffleTierPrice {
                    tier: 1,
                    price: Uint128::new(50),
                },
                RaffleTierPrice {
                    tier: 2,
                    price: Uint128::new(150),
                },
            ],
            raffle_daily_cap: 20,
            max_crate_payout: 50_000,
            request_confirmations: 3,
        }
    }

    fn setup_contract(deps: DepsMut) {
        let api = MockApi::default();
        let admin = api.addr_make("admin");
        let msg = default_instantiate_msg(&api);
        let info = message_info(&admin, &[]);
        instantiate(deps, mock_env(), info, msg).unwrap();
    }

    fn register_participant(deps: DepsMut, name: &str) -> Addr {
        let api = MockApi::default();
        let admin = api.addr_make("admin");
        let user = api.addr_make(name);
        let info = message_info(&admin, &[]);
        execute(
            deps,
            mock_env(),
            info,
            ExecuteMsg::Register {
                address: user.to_string(),
            },
        )
        .unwrap();
        user
    }

    #[test]
    fn test_instantiate() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());

        let admin = deps.api.addr_make("admin");
        let config = CONFIG.load(deps.as_ref().storage).unwrap();
        assert_eq!(config.admin, admin);
        assert_eq!(config.credit_denom, DENOM);
        assert_eq!(config.tier_quotas[0].season_total, 1000);
        assert!(config.season_start <= config.season_end);
        assert_eq!(NEXT_DRAW_ID.load(deps.as_ref().storage).unwrap(), 1);
    }

    #[test]
    fn test_instantiate_invalid_season() {
        let mut deps = mock_dependencies();
        let api = MockApi::default();
        let mut msg = default_instantiate_msg(&api);
        msg.season_end = msg.season_start - 1;
        let admin = api.addr_make("admin");
        let info = message_info(&admin, &[]);
        let err = instantiate(deps.as_mut(), mock_env(), info, msg).unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument { .. }));
    }

    #[test]
    fn test_purchase_requires_registration() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());

        let stranger = deps.api.addr_make("stranger");
        let info = message_info(&stranger, &coins(100, DENOM));
        let err = execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::BuyCrates {
                tier: CrateTier::Bronze,
                slot: MonthSlot::M1,
                quantity: 1,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::NotRegistered { .. }));
    }

    #[test]
    fn test_register_admin_only() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());

        let stranger = deps.api.addr_make("stranger");
        let info = message_info(&stranger, &[]);
        let err = execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::Register {
                address: stranger.to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::Unauthorized { .. }));
    }

    #[test]
    fn test_buy_crates() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());
        let user = register_participant(deps.as_mut(), "user1");

        let info = message_info(&user, &coins(200, DENOM));
        let res = execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::BuyCrates {
                tier: CrateTier::Bronze,
                slot: MonthSlot::M1,
                quantity: 2,
            },
        )
        .unwrap();

        // Exact payment: a single treasury transfer, no refund.
        assert_eq!(res.messages.len(), 1);
        let treasury = deps.api.addr_make("treasury");
        match &res.messages[0].msg {
            CosmosMsg::Bank(BankMsg::Send { to_address, amount }) => {
                assert_eq!(to_address, treasury.as_str());
                assert_eq!(amount, &coins(200, DENOM));
            }
            other => panic!("unexpected message: {other:?}"),
        }
        assert!(res
            .events
            .iter()
            .any(|e| e.ty == "lootcrate_crates_purchased"));

        // Ids are composite and decode back to tier/slot.
        let expected_first = ident::encode(ident::CLASS_CRATE, 1, 1, 1);
        let record = CRATES.load(deps.as_ref().storage, expected_first).unwrap();
        assert_eq!(record.owner, user);
        assert!(!record.opened && !record.claimed);

        let inventory: InventoryResponse = from_json(
            query(
                deps.as_ref(),
                mock_env(),
                QueryMsg::Inventory {
                    address: user.to_string(),
                },
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(inventory.crates.len(), 2);
        assert_eq!(inventory.crates[0], expected_first);

        // Pool and per-user counters moved.
        let pool = QUOTA_POOLS
            .load(deps.as_ref().storage, CrateTier::Bronze.as_u8())
            .unwrap();
        assert_eq!(pool.cumulative_sold, 2);
        let counters = DAILY_COUNTERS
            .load(deps.as_ref().storage, (&user, 0))
            .unwrap();
        assert_eq!(counters.bronze, 2);

        let status: QuotaStatusResponse = from_json(
            query(
                deps.as_ref(),
                mock_env(),
                QueryMsg::QuotaStatus {
                    tier: CrateTier::Bronze,
                },
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(status.cumulative_sold, 2);
        assert_eq!(status.sold_today, 2);
        assert_eq!(status.allowed_now, 100);
    }

    #[test]
    fn test_buy_crates_insufficient_funds_has_no_side_effects() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());
        let user = register_participant(deps.as_mut(), "user1");

        let info = message_info(&user, &coins(50, DENOM));
        let err = execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::BuyCrates {
                tier: CrateTier::Bronze,
                slot: MonthSlot::M1,
                quantity: 1,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InsufficientFunds { .. }));

        // Quota counters are bitwise identical to the pre-state.
        assert!(QUOTA_POOLS
            .may_load(deps.as_ref().storage, CrateTier::Bronze.as_u8())
            .unwrap()
            .is_none());
        assert!(DAILY_COUNTERS
            .may_load(deps.as_ref().storage, (&user, 0))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_buy_crates_refunds_excess() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());
        let user = register_participant(deps.as_mut(), "user1");

        let info = message_info(&user, &coins(130, DENOM));
        let res = execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::BuyCrates {
                tier: CrateTier::Bronze,
                slot: MonthSlot::M1,
                quantity: 1,
            },
        )
        .unwrap();
        assert_eq!(res.messages.len(), 2);
        match &res.messages[1].msg {
            CosmosMsg::Bank(BankMsg::Send { to_address, amount }) => {
                assert_eq!(to_address, user.as_str());
                assert_eq!(amount, &coins(30, DENOM));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_buy_crates_user_daily_cap() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());
        let user = register_participant(deps.as_mut(), "user1");

        // Gold cap is 2 per day.
        let info = message_info(&user, &coins(800, DENOM));
        execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::BuyCrates {
                tier: CrateTier::Gold,
                slot: MonthSlot::M1,
                quantity: 2,
            },
        )
        .unwrap();

        let info = message_info(&user, &coins(400, DENOM));
        let err = execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::BuyCrates {
                tier: CrateTier::Gold,
                slot: MonthSlot::M1,
                quantity: 1,
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ContractError::UserDailyLimitExceeded { cap: 2, .. }
        ));
    }

    #[test]
    fn test_buy_crates_out_of_season() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());
        let user = register_participant(deps.as_mut(), "user1");

        let mut env = mock_env();
        env.block.time = env.block.time.minus_seconds(100);
        let info = message_info(&user, &coins(100, DENOM));
        let err = execute(
            deps.as_mut(),
            env,
            info,
            ExecuteMsg::BuyCrates {
                tier: CrateTier::Bronze,
                slot: MonthSlot::M1,
                quantity: 1,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::OutOfSeasonWindow { .. }));

        let mut env = mock_env();
        env.block.time = env.block.time.plus_seconds(91 * SECONDS_PER_DAY);
        let info = message_info(&user, &coins(100, DENOM));
        let err = execute(
            deps.as_mut(),
            env,
            info,
            ExecuteMsg::BuyCrates {
                tier: CrateTier::Bronze,
                slot: MonthSlot::M1,
                quantity: 1,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::OutOfSeasonWindow { .. }));
    }

    #[test]
    fn test_buy_raffle_entries() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());
        let user = register_participant(deps.as_mut(), "user1");

        let info = message_info(&user, &coins(150, DENOM));
        execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::BuyRaffleEntries {
                raffle_type: 11,
                quantity: 3,
            },
        )
        .unwrap();

        let pool: Vec<u64> = from_json(
            query(
                deps.as_ref(),
                mock_env(),
                QueryMsg::RafflePool { raffle_type: 11 },
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(pool.len(), 3);
        let decoded = ident::decode(pool[0]);
        assert_eq!(decoded.class, ident::CLASS_RAFFLE);
        assert_eq!(decoded.tag1, 11);
        assert_eq!(decoded.seq, 1);

        let counters: DailyCounters = from_json(
            query(
                deps.as_ref(),
                mock_env(),
                QueryMsg::DailyCounters {
                    address: user.to_string(),
                    day: 0,
                },
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(counters.raffles, 3);

        // Unpriced tier is rejected.
        let info = message_info(&user, &coins(150, DENOM));
        let err = execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::BuyRaffleEntries {
                raffle_type: 31,
                quantity: 1,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument { .. }));
    }

    #[test]
    fn test_buy_raffle_entries_daily_cap() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());
        let user = register_participant(deps.as_mut(), "user1");

        let info = message_info(&user, &coins(1000, DENOM));
        execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::BuyRaffleEntries {
                raffle_type: 11,
                quantity: 20,
            },
        )
        .unwrap();

        let info = message_info(&user, &coins(50, DENOM));
        let err = execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::BuyRaffleEntries {
                raffle_type: 12,
                quantity: 1,
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ContractError::UserDailyLimitExceeded { cap: 20, .. }
        ));
    }

    #[test]
    fn test_buy_merch_once_per_season() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());
        let user = register_participant(deps.as_mut(), "user1");

        let admin = deps.api.addr_make("admin");
        execute(
            deps.as_mut(),
            mock_env(),
            message_info(&admin, &[]),
            ExecuteMsg::AddMerchType {
                type_id: 7,
                name: "cap".to_string(),
                price: Uint128::new(500),
                total_supply: 100,
            },
        )
        .unwrap();

        // Unknown type
        let info = message_info(&user, &coins(500, DENOM));
        let err = execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::BuyMerch {
                type_id: 8,
                quantity: 1,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::MerchTypeNotFound { type_id: 8 }));

        // Quantity other than 1 is always rejected.
        let info = message_info(&user, &coins(1000, DENOM));
        let err = execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::BuyMerch {
                type_id: 7,
                quantity: 2,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument { .. }));

        let info = message_info(&user, &coins(500, DENOM));
        execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::BuyMerch {
                type_id: 7,
                quantity: 1,
            },
        )
        .unwrap();

        // Second purchase of the same type, ever, is rejected.
        let info = message_info(&user, &coins(500, DENOM));
        let err = execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::BuyMerch {
                type_id: 7,
                quantity: 1,
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ContractError::MerchAlreadyPurchased { type_id: 7 }
        ));
    }

    #[test]
    fn test_open_crate_and_deliver() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());
        let user = register_participant(deps.as_mut(), "user1");
        let oracle = deps.api.addr_make("oracle");

        let info = message_info(&user, &coins(100, DENOM));
        execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::BuyCrates {
                tier: CrateTier::Bronze,
                slot: MonthSlot::M1,
                quantity: 1,
            },
        )
        .unwrap();
        let crate_id = ident::encode(ident::CLASS_CRATE, 1, 1, 1);

        // Not the owner
        let other = register_participant(deps.as_mut(), "user2");
        let err = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&other, &[]),
            ExecuteMsg::OpenCrate {
                crate_id,
                seed_hex: "aabbcc".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::NotOwner { .. }));

        let res = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&user, &[]),
            ExecuteMsg::OpenCrate {
                crate_id,
                seed_hex: "aabbcc".to_string(),
            },
        )
        .unwrap();

        // The request is registered with the oracle, fire-and-forget.
        assert_eq!(res.messages.len(), 1);
        let correlation_id = ident::encode(ident::CLASS_CORRELATION, 0, 0, 1);
        match &res.messages[0].msg {
            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr, msg, ..
            }) => {
                assert_eq!(contract_addr, oracle.as_str());
                let register: OracleExecuteMsg = from_json(msg).unwrap();
                match register {
                    OracleExecuteMsg::RegisterRequest {
                        correlation_id: corr,
                        count,
                        origin,
                        ..
                    } => {
                        assert_eq!(corr, correlation_id);
                        assert_eq!(count, 1);
                        assert_eq!(origin, user.to_string());
                    }
                }
            }
            other => panic!("unexpected message: {other:?}"),
        }
        assert_eq!(
            CRATE_PENDING.load(deps.as_ref().storage, crate_id).unwrap(),
            correlation_id
        );

        // A second request while one is pending is rejected.
        let err = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&user, &[]),
            ExecuteMsg::OpenCrate {
                crate_id,
                seed_hex: "aabbcc".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::RandomnessPending { .. }));

        // Delivery must come from the oracle.
        let seed = hex::decode("aabbcc").unwrap();
        let proof = hex::encode(request_digest(correlation_id, &seed, 1, user.as_str()));
        let err = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&user, &[]),
            ExecuteMsg::Deliver {
                correlation_id,
                words: vec![49],
                proof_hex: proof.clone(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::Unauthorized { .. }));

        // A bad proof is fail-closed: payload dropped, record untouched.
        let err = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&oracle, &[]),
            ExecuteMsg::Deliver {
                correlation_id,
                words: vec![49],
                proof_hex: hex::encode([0u8; 32]),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::VerificationFailed { .. }));
        let pending = PENDING_REQUESTS
            .load(deps.as_ref().storage, correlation_id)
            .unwrap();
        assert_eq!(pending.status, RequestStatus::Pending);
        assert!(pending.words.is_none());

        // Word 49 -> bucket 50 -> bronze pays 20 whole credits.
        let res = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&oracle, &[]),
            ExecuteMsg::Deliver {
                correlation_id,
                words: vec![49],
                proof_hex: proof.clone(),
            },
        )
        .unwrap();
        assert!(res.events.iter().any(|e| e.ty == "lootcrate_crate_opened"));

        let record: CrateRecord = from_json(
            query(deps.as_ref(), mock_env(), QueryMsg::CrateInfo { crate_id }).unwrap(),
        )
        .unwrap();
        assert!(record.opened);
        assert_eq!(record.prize, Some(20));
        assert!(!CRATE_PENDING.has(deps.as_ref().storage, crate_id));

        // A second delivery for the same correlation id is rejected.
        let err = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&oracle, &[]),
            ExecuteMsg::Deliver {
                correlation_id,
                words: vec![49],
                proof_hex: proof,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::AlreadyFulfilled { .. }));

        // Claim pays out 20 credits scaled by 10^6.
        let res = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&user, &[]),
            ExecuteMsg::ClaimPrize { crate_id },
        )
        .unwrap();
        assert_eq!(res.messages.len(), 1);
        match &res.messages[0].msg {
            CosmosMsg::Bank(BankMsg::Send { to_address, amount }) => {
                assert_eq!(to_address, user.as_str());
                assert_eq!(amount, &coins(20_000_000, DENOM));
            }
            other => panic!("unexpected message: {other:?}"),
        }

        let err = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&user, &[]),
            ExecuteMsg::ClaimPrize { crate_id },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::AlreadyClaimed { .. }));
    }

    #[test]
    fn test_open_locked_crate() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());
        let user = register_participant(deps.as_mut(), "user1");

        // Slot M2 unlocks 30 days in.
        let info = message_info(&user, &coins(110, DENOM));
        execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::BuyCrates {
                tier: CrateTier::Bronze,
                slot: MonthSlot::M2,
                quantity: 1,
            },
        )
        .unwrap();
        let crate_id = ident::encode(ident::CLASS_CRATE, 1, 2, 1);

        let err = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&user, &[]),
            ExecuteMsg::OpenCrate {
                crate_id,
                seed_hex: "ff".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::OutOfSeasonWindow { .. }));

        // After the unlock time the request goes through.
        let mut env = mock_env();
        env.block.time = env.block.time.plus_seconds(31 * SECONDS_PER_DAY);
        execute(
            deps.as_mut(),
            env,
            message_info(&user, &[]),
            ExecuteMsg::OpenCrate {
                crate_id,
                seed_hex: "ff".to_string(),
            },
        )
        .unwrap();
    }

    #[test]
    fn test_claim_before_open() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());
        let user = register_participant(deps.as_mut(), "user1");

        let info = message_info(&user, &coins(100, DENOM));
        execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::BuyCrates {
                tier: CrateTier::Bronze,
                slot: MonthSlot::M1,
                quantity: 1,
            },
        )
        .unwrap();
        let crate_id = ident::encode(ident::CLASS_CRATE, 1, 1, 1);

        let err = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&user, &[]),
            ExecuteMsg::ClaimPrize { crate_id },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::NotYetOpened { .. }));
    }

    #[test]
    fn test_deliver_unknown_correlation() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());
        let oracle = deps.api.addr_make("oracle");

        let err = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&oracle, &[]),
            ExecuteMsg::Deliver {
                correlation_id: 424242,
                words: vec![1],
                proof_hex: hex::encode([0u8; 32]),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ContractError::UnknownCorrelation {
                correlation_id: 424242
            }
        ));
        // The pending-request table is unchanged.
        assert!(PENDING_REQUESTS
            .may_load(deps.as_ref().storage, 424242)
            .unwrap()
            .is_none());
    }

    fn buy_raffles(deps: DepsMut, user: &Addr, raffle_type: u8, quantity: u32, total: u128) {
        let info = message_info(user, &coins(total, DENOM));
        execute(
            deps,
            mock_env(),
            info,
            ExecuteMsg::BuyRaffleEntries {
                raffle_type,
                quantity,
            },
        )
        .unwrap();
    }

    #[test]
    fn test_draw_flow_with_duplicate_owner_skip() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());
        let alice = register_participant(deps.as_mut(), "alice");
        let bob = register_participant(deps.as_mut(), "bob");
        let carol = register_participant(deps.as_mut(), "carol");
        let operator = deps.api.addr_make("operator");
        let oracle = deps.api.addr_make("oracle");

        // Pool order: alice, alice, bob, carol.
        buy_raffles(deps.as_mut(), &alice, 11, 2, 100);
        buy_raffles(deps.as_mut(), &bob, 11, 1, 50);
        buy_raffles(deps.as_mut(), &carol, 11, 1, 50);

        let res = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&operator, &[]),
            ExecuteMsg::StartDraw {
                raffle_type: 11,
                winner_count: 2,
                seed_hex: "0011".to_string(),
            },
        )
        .unwrap();
        // 2 * 2 = 4 words fit a single request.
        assert_eq!(res.messages.len(), 1);
        let draw = DRAWS.load(deps.as_ref().storage, 1).unwrap();
        assert_eq!(draw.correlation_ids.len(), 1);
        assert_eq!(draw.status, DrawStatus::Pending);
        let correlation_id = draw.correlation_ids[0];

        let seed = hex::decode("0011").unwrap();
        let proof = hex::encode(request_digest(correlation_id, &seed, 4, operator.as_str()));
        execute(
            deps.as_mut(),
            mock_env(),
            message_info(&oracle, &[]),
            ExecuteMsg::Deliver {
                correlation_id,
                // Indices: alice, alice again (skipped), bob -> 2 winners.
                words: vec![0, 1, 2, 3],
                proof_hex: proof,
            },
        )
        .unwrap();

        let draw = DRAWS.load(deps.as_ref().storage, 1).unwrap();
        assert_eq!(draw.status, DrawStatus::Completed);
        assert_eq!(draw.winners.len(), 2);
        assert_eq!(draw.winners[0].address, alice);
        assert_eq!(draw.winners[1].address, bob);

        let tier_winners = TIER_WINNERS.load(deps.as_ref().storage, 1).unwrap();
        assert_eq!(tier_winners.len(), 2);
        let type_winners = TYPE_WINNERS.load(deps.as_ref().storage, 11).unwrap();
        assert_eq!(type_winners.len(), 2);
    }

    #[test]
    fn test_tier_dedup_across_draws() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());
        let alice = register_participant(deps.as_mut(), "alice");
        let carol = register_participant(deps.as_mut(), "carol");
        let operator = deps.api.addr_make("operator");
        let oracle = deps.api.addr_make("oracle");

        buy_raffles(deps.as_mut(), &alice, 11, 1, 50);
        execute(
            deps.as_mut(),
            mock_env(),
            message_info(&operator, &[]),
            ExecuteMsg::StartDraw {
                raffle_type: 11,
                winner_count: 1,
                seed_hex: "aa".to_string(),
            },
        )
        .unwrap();
        let draw = DRAWS.load(deps.as_ref().storage, 1).unwrap();
        let corr = draw.correlation_ids[0];
        let seed = hex::decode("aa").unwrap();
        let proof = hex::encode(request_digest(corr, &seed, 2, operator.as_str()));
        execute(
            deps.as_mut(),
            mock_env(),
            message_info(&oracle, &[]),
            ExecuteMsg::Deliver {
                correlation_id: corr,
                words: vec![0, 0],
                proof_hex: proof,
            },
        )
        .unwrap();
        assert_eq!(
            TIER_WINNERS.load(deps.as_ref().storage, 1).unwrap().len(),
            1
        );

        // Type 12 shares tier 1: alice is excluded, carol wins.
        buy_raffles(deps.as_mut(), &alice, 12, 1, 50);
        buy_raffles(deps.as_mut(), &carol, 12, 1, 50);
        execute(
            deps.as_mut(),
            mock_env(),
            message_info(&operator, &[]),
            ExecuteMsg::StartDraw {
                raffle_type: 12,
                winner_count: 1,
                seed_hex: "bb".to_string(),
            },
        )
        .unwrap();
        let draw = DRAWS.load(deps.as_ref().storage, 2).unwrap();
        let corr = draw.correlation_ids[0];
        let seed = hex::decode("bb").unwrap();
        let proof = hex::encode(request_digest(corr, &seed, 2, operator.as_str()));
        execute(
            deps.as_mut(),
            mock_env(),
            message_info(&oracle, &[]),
            ExecuteMsg::Deliver {
                correlation_id: corr,
                words: vec![0, 1],
                proof_hex: proof,
            },
        )
        .unwrap();

        let draw = DRAWS.load(deps.as_ref().storage, 2).unwrap();
        assert_eq!(draw.winners.len(), 1);
        assert_eq!(draw.winners[0].address, carol);
        let tier_winners = TIER_WINNERS.load(deps.as_ref().storage, 1).unwrap();
        assert_eq!(tier_winners.len(), 2);
    }

    #[test]
    fn test_draw_splits_large_requests_into_four_parts() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());
        let alice = register_participant(deps.as_mut(), "alice");
        let bob = register_participant(deps.as_mut(), "bob");
        let operator = deps.api.addr_make("operator");
        let oracle = deps.api.addr_make("oracle");

        buy_raffles(deps.as_mut(), &alice, 21, 1, 150);
        buy_raffles(deps.as_mut(), &bob, 21, 1, 150);

        // 128 winners -> 256 words -> 4 sub-requests of 64 words each.
        let res = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&operator, &[]),
            ExecuteMsg::StartDraw {
                raffle_type: 21,
                winner_count: 128,
                seed_hex: "cc".to_string(),
            },
        )
        .unwrap();
        assert_eq!(res.messages.len(), 4);

        let draw = DRAWS.load(deps.as_ref().storage, 1).unwrap();
        assert_eq!(draw.correlation_ids.len(), 4);
        let seed = hex::decode("cc").unwrap();

        for (i, corr) in draw.correlation_ids.clone().into_iter().enumerate() {
            let proof = hex::encode(request_digest(corr, &seed, 64, operator.as_str()));
            execute(
                deps.as_mut(),
                mock_env(),
                message_info(&oracle, &[]),
                ExecuteMsg::Deliver {
                    correlation_id: corr,
                    words: (0..64u64).collect(),
                    proof_hex: proof,
                },
            )
            .unwrap();

            let draw = DRAWS.load(deps.as_ref().storage, 1).unwrap();
            assert_eq!(draw.parts_fulfilled, i as u32 + 1);
            if i < 3 {
                assert_eq!(draw.status, DrawStatus::Pending);
            }
        }

        // Only two distinct owners exist; the stream exhausts with 2 winners.
        let draw = DRAWS.load(deps.as_ref().storage, 1).unwrap();
        assert_eq!(draw.status, DrawStatus::Completed);
        assert_eq!(draw.winners.len(), 2);
    }

    #[test]
    fn test_start_draw_validation() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());
        let user = register_participant(deps.as_mut(), "user1");
        let operator = deps.api.addr_make("operator");

        let err = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&user, &[]),
            ExecuteMsg::StartDraw {
                raffle_type: 11,
                winner_count: 1,
                seed_hex: "aa".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::Unauthorized { .. }));

        // No entries sold yet.
        let err = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&operator, &[]),
            ExecuteMsg::StartDraw {
                raffle_type: 11,
                winner_count: 1,
                seed_hex: "aa".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument { .. }));

        buy_raffles(deps.as_mut(), &user, 11, 1, 50);
        let err = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&operator, &[]),
            ExecuteMsg::StartDraw {
                raffle_type: 11,
                winner_count: 0,
                seed_hex: "aa".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument { .. }));
    }

    #[test]
    fn test_admin_setters() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());
        let admin = deps.api.addr_make("admin");
        let stranger = deps.api.addr_make("stranger");

        // Season invariant is preserved on update.
        let start = mock_env().block.time.seconds();
        let err = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&admin, &[]),
            ExecuteMsg::UpdateSeason {
                season_start: Some(start + 100),
                season_end: Some(start + 50),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument { .. }));

        execute(
            deps.as_mut(),
            mock_env(),
            message_info(&admin, &[]),
            ExecuteMsg::UpdateSeason {
                season_end: Some(start + 100 * SECONDS_PER_DAY),
                season_start: None,
            },
        )
        .unwrap();

        let err = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&stranger, &[]),
            ExecuteMsg::SetCratePrice {
                tier: CrateTier::Bronze,
                slot: MonthSlot::M1,
                price: Uint128::new(999),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::Unauthorized { .. }));

        execute(
            deps.as_mut(),
            mock_env(),
            message_info(&admin, &[]),
            ExecuteMsg::SetCratePrice {
                tier: CrateTier::Bronze,
                slot: MonthSlot::M1,
                price: Uint128::new(999),
            },
        )
        .unwrap();
        let config = CONFIG.load(deps.as_ref().storage).unwrap();
        assert_eq!(config.crate_prices[0][0], Uint128::new(999));

        execute(
            deps.as_mut(),
            mock_env(),
            message_info(&admin, &[]),
            ExecuteMsg::AddMerchType {
                type_id: 3,
                name: "hoodie".to_string(),
                price: Uint128::new(800),
                total_supply: 40,
            },
        )
        .unwrap();
        let err = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&admin, &[]),
            ExecuteMsg::AddMerchType {
                type_id: 3,
                name: "hoodie again".to_string(),
                price: Uint128::new(900),
                total_supply: 50,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::AlreadyInitialized { .. }));
    }
}
