//! Allocation manifest: seeding, proof checks and budget debits.

use std::collections::BTreeSet;

use common::merkle::{allocation_leaf, verify};
use common::{bytes32_to_hex, Asset, AssetKind, Bytes32};
use cosmwasm_std::{Binary, DepsMut, Env, MessageInfo, Response, Storage, Uint128};

use super::{ensure_self, parse_bytes32};
use crate::error::ContractError;
use crate::state::{AllocationManifest, ALLOCATED_NFTS, CONFIG, DOMAIN_SEPARATOR, MANIFEST};

// ============================================================================
// Seeding
// ============================================================================

/// Commit a new campaign and pull its budgets into custody.
///
/// The coin budget arrives as funds on this call; the token budget and the
/// NFTs are pulled from `admin`, who must have approved this contract.
#[allow(clippy::too_many_arguments)]
pub fn execute_seed_new_allocations(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    root: Binary,
    admin: String,
    token_asset: String,
    nft_asset: String,
    coin_budget: Uint128,
    token_budget: Uint128,
    nft_token_ids: Vec<String>,
) -> Result<Response, ContractError> {
    ensure_self(&env, &info)?;

    if let Some(existing) = MANIFEST.may_load(deps.storage)? {
        if existing.has_unspent_budget() {
            return Err(ContractError::AlreadySeeded);
        }
    }

    let root = parse_bytes32(&root)?;
    let admin = deps.api.addr_validate(&admin)?;
    let token_asset = deps.api.addr_validate(&token_asset)?;
    let nft_asset = deps.api.addr_validate(&nft_asset)?;

    let config = CONFIG.load(deps.storage)?;
    let received = info
        .funds
        .iter()
        .filter(|c| c.denom == config.native_denom)
        .try_fold(Uint128::zero(), |acc, c| acc.checked_add(c.amount))?;
    if received != coin_budget {
        return Err(ContractError::CoinBudgetMismatch {
            expected: coin_budget,
            received,
        });
    }

    let mut seen = BTreeSet::new();
    for token_id in &nft_token_ids {
        if !seen.insert(token_id.as_str()) {
            return Err(ContractError::DuplicateTokenId {
                token_id: token_id.clone(),
            });
        }
        ALLOCATED_NFTS.save(deps.storage, token_id, &true)?;
    }

    let manifest = AllocationManifest {
        root: Binary::from(root.to_vec()),
        seeded_at: env.block.time,
        admin: admin.clone(),
        coin_budget,
        token_asset: token_asset.clone(),
        token_budget,
        nft_asset: nft_asset.clone(),
        nft_remaining: nft_token_ids.len() as u64,
    };
    MANIFEST.save(deps.storage, &manifest)?;

    let this = env.contract.address;
    let mut messages = Vec::with_capacity(nft_token_ids.len() + 1);
    if !token_budget.is_zero() {
        let token = Asset::Cw20 {
            contract_addr: token_asset.clone(),
            amount: token_budget,
        };
        messages.push(token.transfer_from_msg(&admin, &this)?);
    }
    for token_id in &nft_token_ids {
        let nft = Asset::Cw721 {
            contract_addr: nft_asset.clone(),
            token_id: token_id.clone(),
        };
        messages.push(nft.transfer_from_msg(&admin, &this)?);
    }

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("method", "seed_new_allocations")
        .add_attribute("root", bytes32_to_hex(&root))
        .add_attribute("admin", admin)
        .add_attribute("coin_budget", coin_budget.to_string())
        .add_attribute("token_asset", token_asset)
        .add_attribute("token_budget", token_budget.to_string())
        .add_attribute("nft_asset", nft_asset)
        .add_attribute("nft_count", nft_token_ids.len().to_string()))
}

// ============================================================================
// Proofs
// ============================================================================

pub fn load_manifest(storage: &dyn Storage) -> Result<AllocationManifest, ContractError> {
    MANIFEST
        .may_load(storage)?
        .ok_or(ContractError::NotSeeded)
}

/// Check `proof` for `asset` against the current root.
///
/// Malformed proof elements are errors; a well-formed proof that does not
/// reach the root is `Ok(false)`.
pub fn verify_allocation(
    storage: &dyn Storage,
    manifest: &AllocationManifest,
    asset: &str,
    proof: &[Binary],
) -> Result<bool, ContractError> {
    let domain = DOMAIN_SEPARATOR.load(storage)?;
    let root = parse_bytes32(&manifest.root)?;
    let proof = proof
        .iter()
        .map(parse_bytes32)
        .collect::<Result<Vec<Bytes32>, _>>()?;
    Ok(verify(&proof, &root, &allocation_leaf(&domain, asset)))
}

// ============================================================================
// Debits
// ============================================================================

/// A withdrawal from one of the manifest budgets.
pub enum AllocationDebit<'a> {
    Coin(Uint128),
    Token(Uint128),
    Nft(&'a [String]),
}

/// Debit the manifest, all-or-nothing. Nothing is written on error.
pub fn debit(
    storage: &mut dyn Storage,
    debit: AllocationDebit,
) -> Result<AllocationManifest, ContractError> {
    let mut manifest = load_manifest(storage)?;

    match debit {
        AllocationDebit::Coin(amount) => {
            manifest.coin_budget = checked_debit(AssetKind::Native, manifest.coin_budget, amount)?;
        }
        AllocationDebit::Token(amount) => {
            manifest.token_budget = checked_debit(AssetKind::Cw20, manifest.token_budget, amount)?;
        }
        AllocationDebit::Nft(token_ids) => {
            let requested = token_ids.len() as u64;
            if requested > manifest.nft_remaining {
                return Err(ContractError::BudgetExceeded {
                    kind: AssetKind::Cw721,
                    requested: Uint128::from(requested),
                    remaining: Uint128::from(manifest.nft_remaining),
                });
            }
            let mut seen = BTreeSet::new();
            for token_id in token_ids {
                if !seen.insert(token_id.as_str()) || !ALLOCATED_NFTS.has(storage, token_id) {
                    return Err(ContractError::NotAllocated {
                        token_id: token_id.clone(),
                    });
                }
            }
            for token_id in token_ids {
                ALLOCATED_NFTS.remove(storage, token_id);
            }
            manifest.nft_remaining -= requested;
        }
    }

    MANIFEST.save(storage, &manifest)?;
    Ok(manifest)
}

fn checked_debit(
    kind: AssetKind,
    remaining: Uint128,
    requested: Uint128,
) -> Result<Uint128, ContractError> {
    remaining
        .checked_sub(requested)
        .map_err(|_| ContractError::BudgetExceeded {
            kind,
            requested,
            remaining,
        })
}
