//! Timelock handlers.
//!
//! Every operation lives in `TIMESTAMPS` as a single number: absent means
//! unset, `DONE_TIMESTAMP` means executed, anything else is the second at
//! which it becomes executable. The lifecycle is therefore
//! Unset -> Pending -> Ready -> Done, with Cancel returning a pending
//! operation to Unset.

use common::bytes32_to_hex;
use common::hash::{operation_batch_id, CallRef};
use common::Bytes32;
use cosmwasm_std::{
    coins, Binary, CosmosMsg, DepsMut, Env, MessageInfo, Response, StdResult, Storage, WasmMsg,
};

use super::{ensure_role, ensure_self, parse_bytes32, parse_optional_bytes32};
use crate::error::ContractError;
use crate::msg::Call;
use crate::state::{
    role_map, OperationState, Role, CONFIG, DONE_TIMESTAMP, GOVERNANCE, TIMESTAMPS,
};

// ============================================================================
// Shared State Machine
// ============================================================================

/// Derived state and raw timestamp of an operation.
pub fn operation_state(
    storage: &dyn Storage,
    id: &Bytes32,
    now: u64,
) -> StdResult<(OperationState, u64)> {
    let timestamp = TIMESTAMPS.may_load(storage, id)?.unwrap_or(0);
    Ok((OperationState::from_timestamp(timestamp, now), timestamp))
}

/// Record a new operation as pending until `now + delay`.
fn schedule_operation(
    storage: &mut dyn Storage,
    id: &Bytes32,
    now: u64,
    delay: u64,
) -> Result<u64, ContractError> {
    let config = CONFIG.load(storage)?;
    if delay < config.min_delay {
        return Err(ContractError::InsufficientDelay {
            delay,
            min_delay: config.min_delay,
        });
    }
    if TIMESTAMPS.has(storage, id) {
        return Err(ContractError::AlreadyScheduled {
            operation_id: bytes32_to_hex(id),
        });
    }

    let ready_at = now.checked_add(delay).ok_or(ContractError::DelayOverflow)?;
    TIMESTAMPS.save(storage, id, &ready_at)?;
    Ok(ready_at)
}

/// Check readiness and predecessor, then mark the operation done.
///
/// The forwarded calls run after this handler returns; if any of them fails
/// the whole transaction reverts, including this mark.
fn consume_operation(
    storage: &mut dyn Storage,
    id: &Bytes32,
    predecessor: &Bytes32,
    now: u64,
) -> Result<(), ContractError> {
    let (state, _) = operation_state(storage, id, now)?;
    if state != OperationState::Ready {
        return Err(ContractError::NotReady {
            operation_id: bytes32_to_hex(id),
            state,
        });
    }

    if *predecessor != Bytes32::default() {
        let (predecessor_state, _) = operation_state(storage, predecessor, now)?;
        if predecessor_state != OperationState::Done {
            return Err(ContractError::PredecessorNotDone {
                predecessor: bytes32_to_hex(predecessor),
            });
        }
    }

    TIMESTAMPS.save(storage, id, &DONE_TIMESTAMP)?;
    Ok(())
}

/// Message forwarding `call` with its value in the native denom.
fn call_message(call: &Call, denom: &str) -> CosmosMsg {
    let funds = if call.value.is_zero() {
        vec![]
    } else {
        coins(call.value.u128(), denom)
    };
    CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: call.target.clone(),
        msg: call.payload.clone(),
        funds,
    })
}

fn batch_id(calls: &[Call], predecessor: &Bytes32, salt: &Bytes32) -> Bytes32 {
    let refs: Vec<CallRef> = calls.iter().map(Call::call_ref).collect();
    operation_batch_id(&refs, predecessor, salt)
}

// ============================================================================
// Schedule
// ============================================================================

pub fn execute_schedule(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    call: Call,
    predecessor: Option<Binary>,
    salt: Option<Binary>,
    delay: u64,
) -> Result<Response, ContractError> {
    ensure_role(deps.storage, Role::Proposer, &info.sender)?;
    deps.api.addr_validate(&call.target)?;

    let predecessor = parse_optional_bytes32(predecessor.as_ref())?;
    let salt = parse_optional_bytes32(salt.as_ref())?;
    let id = call.operation_id(Some(predecessor), Some(salt));

    let ready_at = schedule_operation(deps.storage, &id, env.block.time.seconds(), delay)?;

    Ok(Response::new()
        .add_attribute("method", "schedule")
        .add_attribute("operation_id", bytes32_to_hex(&id))
        .add_attribute("target", call.target)
        .add_attribute("value", call.value.to_string())
        .add_attribute("predecessor", bytes32_to_hex(&predecessor))
        .add_attribute("delay", delay.to_string())
        .add_attribute("ready_at", ready_at.to_string()))
}

pub fn execute_schedule_batch(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    calls: Vec<Call>,
    predecessor: Option<Binary>,
    salt: Option<Binary>,
    delay: u64,
) -> Result<Response, ContractError> {
    ensure_role(deps.storage, Role::Proposer, &info.sender)?;
    if calls.is_empty() {
        return Err(ContractError::EmptyBatch);
    }
    for call in &calls {
        deps.api.addr_validate(&call.target)?;
    }

    let predecessor = parse_optional_bytes32(predecessor.as_ref())?;
    let salt = parse_optional_bytes32(salt.as_ref())?;
    let id = batch_id(&calls, &predecessor, &salt);

    let ready_at = schedule_operation(deps.storage, &id, env.block.time.seconds(), delay)?;

    Ok(Response::new()
        .add_attribute("method", "schedule_batch")
        .add_attribute("operation_id", bytes32_to_hex(&id))
        .add_attribute("call_count", calls.len().to_string())
        .add_attribute("predecessor", bytes32_to_hex(&predecessor))
        .add_attribute("delay", delay.to_string())
        .add_attribute("ready_at", ready_at.to_string()))
}

// ============================================================================
// Execute
// ============================================================================

pub fn execute_execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    call: Call,
    predecessor: Option<Binary>,
    salt: Option<Binary>,
) -> Result<Response, ContractError> {
    ensure_role(deps.storage, Role::Executor, &info.sender)?;

    let predecessor = parse_optional_bytes32(predecessor.as_ref())?;
    let salt = parse_optional_bytes32(salt.as_ref())?;
    let id = call.operation_id(Some(predecessor), Some(salt));

    consume_operation(deps.storage, &id, &predecessor, env.block.time.seconds())?;

    let config = CONFIG.load(deps.storage)?;
    Ok(Response::new()
        .add_message(call_message(&call, &config.native_denom))
        .add_attribute("method", "execute")
        .add_attribute("operation_id", bytes32_to_hex(&id))
        .add_attribute("target", call.target)
        .add_attribute("value", call.value.to_string()))
}

pub fn execute_execute_batch(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    calls: Vec<Call>,
    predecessor: Option<Binary>,
    salt: Option<Binary>,
) -> Result<Response, ContractError> {
    ensure_role(deps.storage, Role::Executor, &info.sender)?;
    if calls.is_empty() {
        return Err(ContractError::EmptyBatch);
    }

    let predecessor = parse_optional_bytes32(predecessor.as_ref())?;
    let salt = parse_optional_bytes32(salt.as_ref())?;
    let id = batch_id(&calls, &predecessor, &salt);

    consume_operation(deps.storage, &id, &predecessor, env.block.time.seconds())?;

    let config = CONFIG.load(deps.storage)?;
    let messages: Vec<CosmosMsg> = calls
        .iter()
        .map(|call| call_message(call, &config.native_denom))
        .collect();

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("method", "execute_batch")
        .add_attribute("operation_id", bytes32_to_hex(&id))
        .add_attribute("call_count", calls.len().to_string()))
}

// ============================================================================
// Cancel
// ============================================================================

pub fn execute_cancel(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    operation_id: Binary,
) -> Result<Response, ContractError> {
    ensure_role(deps.storage, Role::Proposer, &info.sender)?;
    let id = parse_bytes32(&operation_id)?;

    let (state, _) = operation_state(deps.storage, &id, env.block.time.seconds())?;
    if state != OperationState::Pending {
        return Err(ContractError::NotCancellable {
            operation_id: bytes32_to_hex(&id),
            state,
        });
    }
    TIMESTAMPS.remove(deps.storage, &id);

    Ok(Response::new()
        .add_attribute("method", "cancel")
        .add_attribute("operation_id", bytes32_to_hex(&id))
        .add_attribute("canceled_by", info.sender))
}

// ============================================================================
// Delay & Roles
// ============================================================================

/// Update the minimum delay. Only reachable through a timelocked call.
pub fn execute_update_delay(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    min_delay: u64,
) -> Result<Response, ContractError> {
    ensure_self(&env, &info)?;

    let mut config = CONFIG.load(deps.storage)?;
    let old_delay = config.min_delay;
    config.min_delay = min_delay;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "update_delay")
        .add_attribute("old_delay", old_delay.to_string())
        .add_attribute("new_delay", min_delay.to_string()))
}

/// Role management is open to the contract itself and, until governance is
/// handed over, to the bootstrap admin.
fn ensure_role_admin(deps: &DepsMut, env: &Env, info: &MessageInfo) -> Result<(), ContractError> {
    if info.sender == env.contract.address {
        return Ok(());
    }
    let governance = GOVERNANCE.load(deps.storage)?;
    if info.sender != governance.admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

pub fn execute_grant_role(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    role: Role,
    account: String,
) -> Result<Response, ContractError> {
    ensure_role_admin(&deps, &env, &info)?;

    let account = deps.api.addr_validate(&account)?;
    role_map(role).save(deps.storage, &account, &true)?;

    Ok(Response::new()
        .add_attribute("method", "grant_role")
        .add_attribute("role", role.to_string())
        .add_attribute("account", account))
}

pub fn execute_revoke_role(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    role: Role,
    account: String,
) -> Result<Response, ContractError> {
    ensure_role_admin(&deps, &env, &info)?;

    let account = deps.api.addr_validate(&account)?;
    role_map(role).remove(deps.storage, &account);

    Ok(Response::new()
        .add_attribute("method", "revoke_role")
        .add_attribute("role", role.to_string())
        .add_attribute("account", account))
}
