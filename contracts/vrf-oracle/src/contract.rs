use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};
use crate::query;
use crate::state::{OracleConfig, CONFIG, TOTAL_FULFILLED};

const CONTRACT_NAME: &str = "crates.io:lootcrate-vrf-oracle";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let mut operators = Vec::new();
    for op in &msg.operators {
        operators.push(deps.api.addr_validate(op)?);
    }

    let config = OracleConfig {
        admin: info.sender.clone(),
        operators,
    };
    CONFIG.save(deps.storage, &config)?;
    TOTAL_FULFILLED.save(deps.storage, &0u64)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "vrf-oracle")
        .add_attribute("admin", info.sender.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::RegisterRequest {
            correlation_id,
            seed_hex,
            count,
            confirmations,
            origin,
        } => execute::register_request(
            deps,
            env,
            info,
            correlation_id,
            seed_hex,
            count,
            confirmations,
            origin,
        ),
        ExecuteMsg::Fulfill {
            correlation_id,
            words,
        } => execute::fulfill(deps, env, info, correlation_id, words),
        ExecuteMsg::UpdateOperators { add, remove } => {
            execute::update_operators(deps, env, info, add, remove)
        }
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Request { correlation_id } => query::query_request(deps, correlation_id),
        QueryMsg::Requests { start_after, limit } => {
            query::query_requests(deps, start_after, limit)
        }
        QueryMsg::TotalFulfilled {} => query::query_total_fulfilled(deps),
    }
}
