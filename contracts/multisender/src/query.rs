//! Query handlers for the Multisender contract.

use common::hash::operation_batch_id;
use common::merkle::{allocation_leaf, verify};
use common::{AssetKind, Bytes32};
use cosmwasm_std::{Addr, Binary, Deps, Env, Order, StdError, StdResult};
use cw_storage_plus::Bound;

use crate::execute::operation_state;
use crate::msg::{
    AllocatedTokenIdsResponse, BudgetsResponse, Call, ConfigResponse, DomainSeparatorResponse,
    GovernanceResponse, HasRoleResponse, IsAllocatedResponse, ManifestResponse, MinDelayResponse,
    OperationIdResponse, OperationStateResponse, RolesResponse, TimestampResponse,
    VerifyAllocationResponse,
};
use crate::state::{
    role_map, OperationState, Role, ALLOCATED_NFTS, CONFIG, DOMAIN_SEPARATOR, GOVERNANCE,
    MANIFEST,
};

const DEFAULT_LIMIT: u32 = 30;
const MAX_LIMIT: u32 = 100;

fn parse_bytes32(value: &Binary) -> StdResult<Bytes32> {
    value.to_vec().try_into().map_err(|_| {
        StdError::generic_err(format!(
            "Invalid hash length: expected 32 bytes, got {}",
            value.len()
        ))
    })
}

fn parse_optional_bytes32(value: Option<&Binary>) -> StdResult<Bytes32> {
    value.map(parse_bytes32).transpose().map(Option::unwrap_or_default)
}

// ============================================================================
// Core Queries
// ============================================================================

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        name: config.name,
        version: config.version,
        native_denom: config.native_denom,
        min_delay: config.min_delay,
    })
}

pub fn query_governance(deps: Deps) -> StdResult<GovernanceResponse> {
    let governance = GOVERNANCE.load(deps.storage)?;
    Ok(GovernanceResponse {
        admin: governance.admin,
        transferred_at: governance.transferred_at,
    })
}

pub fn query_has_role(deps: Deps, role: Role, account: String) -> StdResult<HasRoleResponse> {
    let account = deps.api.addr_validate(&account)?;
    let has_role = role_map(role)
        .may_load(deps.storage, &account)?
        .unwrap_or(false);
    Ok(HasRoleResponse { has_role })
}

pub fn query_roles(deps: Deps) -> StdResult<RolesResponse> {
    let members = |role: Role| -> StdResult<Vec<Addr>> {
        role_map(role)
            .range(deps.storage, None, None, Order::Ascending)
            .filter_map(|item| match item {
                Ok((addr, true)) => Some(Ok(addr)),
                Ok(_) => None,
                Err(e) => Some(Err(e)),
            })
            .collect()
    };
    Ok(RolesResponse {
        proposers: members(Role::Proposer)?,
        executors: members(Role::Executor)?,
    })
}

// ============================================================================
// Timelock Queries
// ============================================================================

pub fn query_operation_state(
    deps: Deps,
    env: Env,
    operation_id: Binary,
) -> StdResult<OperationStateResponse> {
    let id = parse_bytes32(&operation_id)?;
    let (state, timestamp) = operation_state(deps.storage, &id, env.block.time.seconds())?;
    Ok(OperationStateResponse {
        operation_id,
        state,
        timestamp,
    })
}

pub fn query_timestamp(deps: Deps, env: Env, operation_id: Binary) -> StdResult<TimestampResponse> {
    let id = parse_bytes32(&operation_id)?;
    let (_, timestamp) = operation_state(deps.storage, &id, env.block.time.seconds())?;
    Ok(TimestampResponse { timestamp })
}

/// True if the operation's state is one of `states`.
pub fn query_operation_is(
    deps: Deps,
    env: Env,
    operation_id: Binary,
    states: &[OperationState],
) -> StdResult<bool> {
    let id = parse_bytes32(&operation_id)?;
    let (state, _) = operation_state(deps.storage, &id, env.block.time.seconds())?;
    Ok(states.contains(&state))
}

pub fn query_min_delay(deps: Deps) -> StdResult<MinDelayResponse> {
    Ok(MinDelayResponse {
        min_delay: CONFIG.load(deps.storage)?.min_delay,
    })
}

pub fn query_hash_operation(
    call: Call,
    predecessor: Option<Binary>,
    salt: Option<Binary>,
) -> StdResult<OperationIdResponse> {
    let predecessor = parse_optional_bytes32(predecessor.as_ref())?;
    let salt = parse_optional_bytes32(salt.as_ref())?;
    let id = call.operation_id(Some(predecessor), Some(salt));
    Ok(OperationIdResponse {
        operation_id: Binary::from(id.to_vec()),
    })
}

pub fn query_hash_operation_batch(
    calls: Vec<Call>,
    predecessor: Option<Binary>,
    salt: Option<Binary>,
) -> StdResult<OperationIdResponse> {
    let predecessor = parse_optional_bytes32(predecessor.as_ref())?;
    let salt = parse_optional_bytes32(salt.as_ref())?;
    if calls.is_empty() {
        return Err(StdError::generic_err("Batch must contain at least one call"));
    }
    let refs: Vec<_> = calls.iter().map(Call::call_ref).collect();
    let id = operation_batch_id(&refs, &predecessor, &salt);
    Ok(OperationIdResponse {
        operation_id: Binary::from(id.to_vec()),
    })
}

// ============================================================================
// Allocation Queries
// ============================================================================

pub fn query_manifest(deps: Deps) -> StdResult<Option<ManifestResponse>> {
    Ok(MANIFEST.may_load(deps.storage)?.map(|m| ManifestResponse {
        root: m.root,
        seeded_at: m.seeded_at,
        admin: m.admin,
        coin_budget: m.coin_budget,
        token_asset: m.token_asset,
        token_budget: m.token_budget,
        nft_asset: m.nft_asset,
        nft_remaining: m.nft_remaining,
    }))
}

pub fn query_budgets(deps: Deps) -> StdResult<BudgetsResponse> {
    let response = match MANIFEST.may_load(deps.storage)? {
        Some(m) => BudgetsResponse {
            coin_budget: m.coin_budget,
            token_budget: m.token_budget,
            nft_remaining: m.nft_remaining,
        },
        None => BudgetsResponse {
            coin_budget: Default::default(),
            token_budget: Default::default(),
            nft_remaining: 0,
        },
    };
    Ok(response)
}

pub fn query_domain_separator(deps: Deps) -> StdResult<DomainSeparatorResponse> {
    let domain = DOMAIN_SEPARATOR.load(deps.storage)?;
    Ok(DomainSeparatorResponse {
        domain_separator: Binary::from(domain.to_vec()),
    })
}

pub fn query_verify_allocation(
    deps: Deps,
    asset: String,
    proof: Vec<Binary>,
) -> StdResult<VerifyAllocationResponse> {
    let Some(manifest) = MANIFEST.may_load(deps.storage)? else {
        return Ok(VerifyAllocationResponse {
            valid: false,
            kind: None,
        });
    };

    let domain = DOMAIN_SEPARATOR.load(deps.storage)?;
    let root = parse_bytes32(&manifest.root)?;
    let proof = proof
        .iter()
        .map(parse_bytes32)
        .collect::<StdResult<Vec<_>>>()?;
    let valid = verify(&proof, &root, &allocation_leaf(&domain, &asset));

    let kind = if asset == manifest.token_asset.as_str() {
        Some(AssetKind::Cw20)
    } else if asset == manifest.nft_asset.as_str() {
        Some(AssetKind::Cw721)
    } else {
        None
    };
    Ok(VerifyAllocationResponse { valid, kind })
}

pub fn query_is_allocated(deps: Deps, token_id: String) -> StdResult<IsAllocatedResponse> {
    Ok(IsAllocatedResponse {
        allocated: ALLOCATED_NFTS.has(deps.storage, &token_id),
    })
}

pub fn query_allocated_token_ids(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<AllocatedTokenIdsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.as_deref().map(Bound::exclusive);

    let token_ids = ALLOCATED_NFTS
        .keys(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .collect::<StdResult<Vec<String>>>()?;
    Ok(AllocatedTokenIdsResponse { token_ids })
}

