//! Distribution handlers.
//!
//! Each drop is all-or-nothing: lengths, proofs and budgets are checked
//! before any transfer message is emitted, and a failing transfer reverts
//! the debit with the rest of the transaction.

use common::Asset;
use cosmwasm_std::{Addr, Api, Binary, CosmosMsg, DepsMut, Env, MessageInfo, Response, Uint128};

use super::{debit, ensure_self, load_manifest, verify_allocation, AllocationDebit};
use crate::error::ContractError;
use crate::state::CONFIG;

fn validate_receivers(
    api: &dyn Api,
    receivers: &[String],
    values: usize,
) -> Result<Vec<Addr>, ContractError> {
    if receivers.len() != values {
        return Err(ContractError::LengthMismatch {
            receivers: receivers.len(),
            values,
        });
    }
    if receivers.is_empty() {
        return Err(ContractError::EmptyDistribution);
    }
    receivers
        .iter()
        .map(|r| api.addr_validate(r).map_err(ContractError::from))
        .collect()
}

fn total_amount(amounts: &[Uint128]) -> Result<Uint128, ContractError> {
    amounts.iter().try_fold(Uint128::zero(), |acc, amount| {
        if amount.is_zero() {
            return Err(ContractError::InvalidAmount {
                reason: "Amount must be greater than zero".to_string(),
            });
        }
        Ok(acc.checked_add(*amount)?)
    })
}

// ============================================================================
// Native Coin
// ============================================================================

/// Native drops are not proof-gated: the coin budget was attached to the
/// timelocked seeding call itself.
pub fn execute_drop_native_coin(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    receivers: Vec<String>,
    amounts: Vec<Uint128>,
) -> Result<Response, ContractError> {
    ensure_self(&env, &info)?;
    let receivers = validate_receivers(deps.api, &receivers, amounts.len())?;
    let total = total_amount(&amounts)?;

    let manifest = debit(deps.storage, AllocationDebit::Coin(total))?;

    let denom = CONFIG.load(deps.storage)?.native_denom;
    let messages = receivers
        .iter()
        .zip(amounts)
        .map(|(receiver, amount)| {
            Asset::Native {
                denom: denom.clone(),
                amount,
            }
            .transfer_msg(receiver)
        })
        .collect::<Result<Vec<CosmosMsg>, _>>()?;

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("method", "drop_native_coin")
        .add_attribute("receiver_count", receivers.len().to_string())
        .add_attribute("total", total.to_string())
        .add_attribute("coin_budget_remaining", manifest.coin_budget.to_string()))
}

// ============================================================================
// CW20 Token
// ============================================================================

pub fn execute_drop_token(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    receivers: Vec<String>,
    token: String,
    amounts: Vec<Uint128>,
    proof: Vec<Binary>,
) -> Result<Response, ContractError> {
    ensure_self(&env, &info)?;
    let receivers = validate_receivers(deps.api, &receivers, amounts.len())?;
    let token = deps.api.addr_validate(&token)?;

    let manifest = load_manifest(deps.storage)?;
    if !verify_allocation(deps.storage, &manifest, token.as_str(), &proof)? {
        return Err(ContractError::ProofInvalid {
            asset: token.to_string(),
        });
    }
    if token != manifest.token_asset {
        return Err(ContractError::AssetMismatch {
            expected: manifest.token_asset.to_string(),
            got: token.to_string(),
        });
    }

    let total = total_amount(&amounts)?;
    let manifest = debit(deps.storage, AllocationDebit::Token(total))?;

    let messages = receivers
        .iter()
        .zip(amounts)
        .map(|(receiver, amount)| {
            Asset::Cw20 {
                contract_addr: token.clone(),
                amount,
            }
            .transfer_msg(receiver)
        })
        .collect::<Result<Vec<CosmosMsg>, _>>()?;

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("method", "drop_token")
        .add_attribute("token", token)
        .add_attribute("receiver_count", receivers.len().to_string())
        .add_attribute("total", total.to_string())
        .add_attribute("token_budget_remaining", manifest.token_budget.to_string()))
}

// ============================================================================
// CW721 NFT
// ============================================================================

pub fn execute_drop_nft721(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    receivers: Vec<String>,
    nft: String,
    token_ids: Vec<Vec<String>>,
    proof: Vec<Binary>,
) -> Result<Response, ContractError> {
    ensure_self(&env, &info)?;
    let receivers = validate_receivers(deps.api, &receivers, token_ids.len())?;
    let nft = deps.api.addr_validate(&nft)?;

    let manifest = load_manifest(deps.storage)?;
    if !verify_allocation(deps.storage, &manifest, nft.as_str(), &proof)? {
        return Err(ContractError::ProofInvalid {
            asset: nft.to_string(),
        });
    }
    if nft != manifest.nft_asset {
        return Err(ContractError::AssetMismatch {
            expected: manifest.nft_asset.to_string(),
            got: nft.to_string(),
        });
    }

    let flattened: Vec<String> = token_ids.iter().flatten().cloned().collect();
    if flattened.is_empty() {
        return Err(ContractError::EmptyDistribution);
    }
    let manifest = debit(deps.storage, AllocationDebit::Nft(&flattened))?;

    let mut messages = Vec::with_capacity(flattened.len());
    for (receiver, group) in receivers.iter().zip(token_ids) {
        for token_id in group {
            let asset = Asset::Cw721 {
                contract_addr: nft.clone(),
                token_id,
            };
            messages.push(asset.transfer_msg(receiver)?);
        }
    }

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("method", "drop_nft721")
        .add_attribute("nft", nft)
        .add_attribute("receiver_count", receivers.len().to_string())
        .add_attribute("token_count", flattened.len().to_string())
        .add_attribute("nft_remaining", manifest.nft_remaining.to_string()))
}
