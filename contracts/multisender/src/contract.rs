//! Multisender Contract - Entry Points
//!
//! A timelock controller that owns an allocation manifest and distributes
//! native coins, CW20 tokens and CW721 NFTs from it. The implementation is
//! modularized into:
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers

use common::bytes32_to_hex;
use common::hash::domain_separator;
use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute::{
    execute_cancel, execute_drop_native_coin, execute_drop_nft721, execute_drop_token,
    execute_execute, execute_execute_batch, execute_grant_role, execute_revoke_role,
    execute_schedule, execute_schedule_batch, execute_seed_new_allocations,
    execute_transfer_governance, execute_update_delay,
};
use crate::msg::{Call, ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_allocated_token_ids, query_budgets, query_config, query_domain_separator,
    query_governance, query_has_role, query_hash_operation, query_hash_operation_batch,
    query_is_allocated, query_manifest, query_min_delay, query_operation_is,
    query_operation_state, query_roles, query_timestamp, query_verify_allocation,
};
use crate::state::{
    Config, Governance, OperationState, CONFIG, CONTRACT_NAME, CONTRACT_VERSION,
    DOMAIN_SEPARATOR, EXECUTORS, GOVERNANCE, PROPOSERS,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.native_denom.is_empty() {
        return Err(ContractError::InvalidConfig {
            reason: "native_denom must not be empty".to_string(),
        });
    }
    if msg.proposers.is_empty() || msg.executors.is_empty() {
        return Err(ContractError::InvalidConfig {
            reason: "At least one proposer and one executor required".to_string(),
        });
    }

    let admin = match msg.admin {
        Some(admin) => deps.api.addr_validate(&admin)?,
        None => info.sender,
    };

    let config = Config {
        name: msg.name,
        version: msg.version,
        native_denom: msg.native_denom,
        min_delay: msg.min_delay,
    };
    CONFIG.save(deps.storage, &config)?;

    GOVERNANCE.save(
        deps.storage,
        &Governance {
            admin: admin.clone(),
            transferred_at: None,
        },
    )?;

    for proposer in &msg.proposers {
        let proposer = deps.api.addr_validate(proposer)?;
        PROPOSERS.save(deps.storage, &proposer, &true)?;
    }
    for executor in &msg.executors {
        let executor = deps.api.addr_validate(executor)?;
        EXECUTORS.save(deps.storage, &executor, &true)?;
    }

    let domain = domain_separator(
        &config.name,
        &config.version,
        &env.block.chain_id,
        msg.deployment_salt,
        env.contract.address.as_str(),
    );
    DOMAIN_SEPARATOR.save(deps.storage, &domain)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", admin)
        .add_attribute("min_delay", config.min_delay.to_string())
        .add_attribute("proposer_count", msg.proposers.len().to_string())
        .add_attribute("executor_count", msg.executors.len().to_string())
        .add_attribute("domain_separator", bytes32_to_hex(&domain)))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Timelock
        ExecuteMsg::Schedule {
            target,
            value,
            payload,
            predecessor,
            salt,
            delay,
        } => execute_schedule(
            deps,
            env,
            info,
            Call::new(target, value, payload),
            predecessor,
            salt,
            delay,
        ),
        ExecuteMsg::ScheduleBatch {
            calls,
            predecessor,
            salt,
            delay,
        } => execute_schedule_batch(deps, env, info, calls, predecessor, salt, delay),
        ExecuteMsg::Execute {
            target,
            value,
            payload,
            predecessor,
            salt,
        } => execute_execute(
            deps,
            env,
            info,
            Call::new(target, value, payload),
            predecessor,
            salt,
        ),
        ExecuteMsg::ExecuteBatch {
            calls,
            predecessor,
            salt,
        } => execute_execute_batch(deps, env, info, calls, predecessor, salt),
        ExecuteMsg::Cancel { operation_id } => execute_cancel(deps, env, info, operation_id),
        ExecuteMsg::UpdateDelay { min_delay } => execute_update_delay(deps, env, info, min_delay),
        ExecuteMsg::GrantRole { role, account } => {
            execute_grant_role(deps, env, info, role, account)
        }
        ExecuteMsg::RevokeRole { role, account } => {
            execute_revoke_role(deps, env, info, role, account)
        }

        // Governance
        ExecuteMsg::TransferGovernance { new_admin } => {
            execute_transfer_governance(deps, env, info, new_admin)
        }

        // Allocation manifest
        ExecuteMsg::SeedNewAllocations {
            root,
            admin,
            token_asset,
            nft_asset,
            coin_budget,
            token_budget,
            nft_token_ids,
        } => execute_seed_new_allocations(
            deps,
            env,
            info,
            root,
            admin,
            token_asset,
            nft_asset,
            coin_budget,
            token_budget,
            nft_token_ids,
        ),

        // Distribution
        ExecuteMsg::DropNativeCoin { receivers, amounts } => {
            execute_drop_native_coin(deps, env, info, receivers, amounts)
        }
        ExecuteMsg::DropToken {
            receivers,
            token,
            amounts,
            proof,
        } => execute_drop_token(deps, env, info, receivers, token, amounts, proof),
        ExecuteMsg::DropNft721 {
            receivers,
            nft,
            token_ids,
            proof,
        } => execute_drop_nft721(deps, env, info, receivers, nft, token_ids, proof),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Governance {} => to_json_binary(&query_governance(deps)?),
        QueryMsg::HasRole { role, account } => to_json_binary(&query_has_role(deps, role, account)?),
        QueryMsg::Roles {} => to_json_binary(&query_roles(deps)?),

        QueryMsg::OperationState { operation_id } => {
            to_json_binary(&query_operation_state(deps, env, operation_id)?)
        }
        QueryMsg::Timestamp { operation_id } => {
            to_json_binary(&query_timestamp(deps, env, operation_id)?)
        }
        QueryMsg::IsOperation { operation_id } => to_json_binary(&query_operation_is(
            deps,
            env,
            operation_id,
            &[
                OperationState::Pending,
                OperationState::Ready,
                OperationState::Done,
            ],
        )?),
        QueryMsg::IsOperationPending { operation_id } => to_json_binary(&query_operation_is(
            deps,
            env,
            operation_id,
            &[OperationState::Pending],
        )?),
        QueryMsg::IsOperationReady { operation_id } => to_json_binary(&query_operation_is(
            deps,
            env,
            operation_id,
            &[OperationState::Ready],
        )?),
        QueryMsg::IsOperationDone { operation_id } => to_json_binary(&query_operation_is(
            deps,
            env,
            operation_id,
            &[OperationState::Done],
        )?),
        QueryMsg::MinDelay {} => to_json_binary(&query_min_delay(deps)?),
        QueryMsg::HashOperation {
            target,
            value,
            payload,
            predecessor,
            salt,
        } => to_json_binary(&query_hash_operation(
            Call::new(target, value, payload),
            predecessor,
            salt,
        )?),
        QueryMsg::HashOperationBatch {
            calls,
            predecessor,
            salt,
        } => to_json_binary(&query_hash_operation_batch(calls, predecessor, salt)?),

        QueryMsg::Manifest {} => to_json_binary(&query_manifest(deps)?),
        QueryMsg::Budgets {} => to_json_binary(&query_budgets(deps)?),
        QueryMsg::DomainSeparator {} => to_json_binary(&query_domain_separator(deps)?),
        QueryMsg::VerifyAllocation { asset, proof } => {
            to_json_binary(&query_verify_allocation(deps, asset, proof)?)
        }
        QueryMsg::IsAllocated { token_id } => to_json_binary(&query_is_allocated(deps, token_id)?),
        QueryMsg::AllocatedTokenIds { start_after, limit } => {
            to_json_binary(&query_allocated_token_ids(deps, start_after, limit)?)
        }
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("method", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
