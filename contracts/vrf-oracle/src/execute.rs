use cosmwasm_std::{
    to_json_binary, DepsMut, Env, Event, MessageInfo, Response, WasmMsg,
};
use lootcrate_common::request_digest;

use crate::error::ContractError;
use crate::msg::ConsumerExecuteMsg;
use crate::state::{RandomnessRequest, CONFIG, REQUESTS, TOTAL_FULFILLED};

/// Maximum words a single request may ask for; consumers split above this.
const MAX_WORDS: u16 = 255;

/// Register a randomness request under a consumer-chosen correlation id.
/// The sender is recorded as the consumer and receives the delivery later.
pub fn register_request(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    correlation_id: u64,
    seed_hex: String,
    count: u16,
    confirmations: u32,
    origin: String,
) -> Result<Response, ContractError> {
    if count == 0 || count > MAX_WORDS {
        return Err(ContractError::CountOutOfRange { count });
    }
    let seed = hex::decode(&seed_hex).map_err(|_| ContractError::InvalidHex {
        field: "seed_hex".to_string(),
    })?;
    if REQUESTS.has(deps.storage, correlation_id) {
        return Err(ContractError::AlreadyInitialized { correlation_id });
    }

    let request = RandomnessRequest {
        correlation_id,
        consumer: info.sender.clone(),
        origin,
        seed,
        count,
        confirmations,
        registered_at: env.block.time,
        fulfilled: false,
        fulfilled_at: None,
        fulfilled_by: None,
    };
    REQUESTS.save(deps.storage, correlation_id, &request)?;

    Ok(Response::new()
        .add_attribute("action", "register_request")
        .add_attribute("correlation_id", correlation_id.to_string())
        .add_attribute("consumer", info.sender.to_string())
        .add_event(
            Event::new("lootcrate_vrf_registered")
                .add_attribute("correlation_id", correlation_id.to_string())
                .add_attribute("consumer", info.sender.to_string())
                .add_attribute("count", count.to_string())
                .add_attribute("confirmations", confirmations.to_string()),
        ))
}

/// Fulfil a pending request. Only operators can call this. The delivery is
/// pushed to the consumer with the request digest attached as proof, in the
/// same transaction; if the consumer rejects it, the fulfilment reverts too.
pub fn fulfill(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    correlation_id: u64,
    words: Vec<u64>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if !config.operators.contains(&info.sender) {
        return Err(ContractError::Unauthorized {
            reason: "only operators can fulfil requests".to_string(),
        });
    }

    let mut request = REQUESTS
        .may_load(deps.storage, correlation_id)?
        .ok_or(ContractError::RequestNotFound { correlation_id })?;
    if request.fulfilled {
        return Err(ContractError::AlreadyFulfilled { correlation_id });
    }
    if words.len() != request.count as usize {
        return Err(ContractError::CountMismatch {
            expected: request.count,
            got: words.len(),
        });
    }

    request.fulfilled = true;
    request.fulfilled_at = Some(env.block.time);
    request.fulfilled_by = Some(info.sender.clone());
    REQUESTS.save(deps.storage, correlation_id, &request)?;

    let total = TOTAL_FULFILLED.may_load(deps.storage)?.unwrap_or(0);
    TOTAL_FULFILLED.save(deps.storage, &(total + 1))?;

    let proof = request_digest(
        correlation_id,
        &request.seed,
        request.count,
        &request.origin,
    );
    let deliver_msg = WasmMsg::Execute {
        contract_addr: request.consumer.to_string(),
        msg: to_json_binary(&ConsumerExecuteMsg::Deliver {
            correlation_id,
            words,
            proof_hex: hex::encode(proof),
        })?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_message(deliver_msg)
        .add_attribute("action", "fulfill")
        .add_attribute("correlation_id", correlation_id.to_string())
        .add_attribute("fulfilled_by", info.sender.to_string())
        .add_event(
            Event::new("lootcrate_vrf_fulfilled")
                .add_attribute("correlation_id", correlation_id.to_string())
                .add_attribute("consumer", request.consumer.to_string())
                .add_attribute("fulfilled_by", info.sender.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Update the operator list. Admin only.
pub fn update_operators(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    add: Vec<String>,
    remove: Vec<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update operators".to_string(),
        });
    }

    for addr_str in &remove {
        let addr = deps.api.addr_validate(addr_str)?;
        config.operators.retain(|a| a != addr);
    }
    for addr_str in &add {
        let addr = deps.api.addr_validate(addr_str)?;
        if !config.operators.contains(&addr) {
            config.operators.push(addr);
        }
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_operators")
        .add_attribute("operators", config.operators.len().to_string()))
}
