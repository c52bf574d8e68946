//! Query handlers for the signature gate.

use cosmwasm_std::{Binary, Deps, Order, StdError, StdResult, Uint128};

use crate::execute::compute_transaction_hash;
use crate::msg::{
    ConfigResponse, DomainSeparatorResponse, NonceResponse, PendingTransactionResponse,
    SignaturesResponse, TransactionHashResponse,
};
use crate::state::{CONFIG, DOMAIN_SEPARATOR, NONCE, OWNERS, PENDING, SIGNATURES};

fn pending_key(pending_id: &Binary) -> StdResult<&[u8]> {
    if pending_id.len() != 32 {
        return Err(StdError::generic_err(format!(
            "Invalid hash length: expected 32 bytes, got {}",
            pending_id.len()
        )));
    }
    Ok(pending_id.as_slice())
}

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    let owners = OWNERS
        .keys(deps.storage, None, None, Order::Ascending)
        .map(|key| key.map(Binary::from))
        .collect::<StdResult<Vec<_>>>()?;
    Ok(ConfigResponse {
        owners,
        threshold: config.threshold,
        native_denom: config.native_denom,
    })
}

pub fn query_nonce(deps: Deps) -> StdResult<NonceResponse> {
    Ok(NonceResponse {
        nonce: NONCE.load(deps.storage)?,
    })
}

pub fn query_domain_separator(deps: Deps) -> StdResult<DomainSeparatorResponse> {
    Ok(DomainSeparatorResponse {
        domain_separator: Binary::from(DOMAIN_SEPARATOR.load(deps.storage)?.to_vec()),
    })
}

pub fn query_transaction_hash(
    deps: Deps,
    to: String,
    value: Uint128,
    data: Binary,
    nonce: Option<u64>,
) -> StdResult<TransactionHashResponse> {
    let to = deps.api.addr_validate(&to)?;
    let nonce = match nonce {
        Some(nonce) => nonce,
        None => NONCE.load(deps.storage)?,
    };
    let hash = compute_transaction_hash(deps, &to, value, &data, nonce)?;
    Ok(TransactionHashResponse {
        hash: Binary::from(hash.to_vec()),
    })
}

pub fn query_pending_transaction(
    deps: Deps,
    pending_id: Binary,
) -> StdResult<Option<PendingTransactionResponse>> {
    let key = pending_key(&pending_id)?;
    let Some(pending) = PENDING.may_load(deps.storage, key)? else {
        return Ok(None);
    };
    let signature_count = SIGNATURES
        .prefix(key)
        .keys(deps.storage, None, None, Order::Ascending)
        .count() as u32;

    Ok(Some(PendingTransactionResponse {
        pending_id,
        to: pending.to,
        value: pending.value,
        data: pending.data,
        nonce: pending.nonce,
        proposed_by: pending.proposed_by,
        signature_count,
    }))
}

pub fn query_signatures(deps: Deps, pending_id: Binary) -> StdResult<SignaturesResponse> {
    let key = pending_key(&pending_id)?;
    let signers = SIGNATURES
        .prefix(key)
        .keys(deps.storage, None, None, Order::Ascending)
        .map(|signer| signer.map(Binary::from))
        .collect::<StdResult<Vec<_>>>()?;
    Ok(SignaturesResponse {
        signers,
        threshold: CONFIG.load(deps.storage)?.threshold,
    })
}
