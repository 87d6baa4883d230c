use cosmwasm_std::{to_json_binary, Binary, Deps, Order, StdResult};
use cw_storage_plus::Bound;

use crate::msg::RequestsResponse;
use crate::state::{CONFIG, REQUESTS, TOTAL_FULFILLED};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_request(deps: Deps, correlation_id: u64) -> StdResult<Binary> {
    let request = REQUESTS.may_load(deps.storage, correlation_id)?;
    to_json_binary(&request)
}

pub fn query_requests(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let requests: Vec<_> = REQUESTS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, request)| request)
        .collect();

    to_json_binary(&RequestsResponse { requests })
}

pub fn query_total_fulfilled(deps: Deps) -> StdResult<Binary> {
    let total = TOTAL_FULFILLED.may_load(deps.storage)?.unwrap_or(0);
    to_json_binary(&total)
}
