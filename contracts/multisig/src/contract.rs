//! Signature Gate Contract - Entry Points

use std::collections::BTreeSet;

use common::bytes32_to_hex;
use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute::{
    execute_exec_transaction, execute_propose_transaction, execute_submit_signature,
    execute_try_execute, gate_domain,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_config, query_domain_separator, query_nonce, query_pending_transaction,
    query_signatures, query_transaction_hash,
};
use crate::state::{
    Config, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, DOMAIN_SEPARATOR, NONCE, OWNERS, PUBKEY_LEN,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let owner_count = msg.owners.len() as u32;
    if msg.threshold == 0 || msg.threshold > owner_count {
        return Err(ContractError::InvalidThreshold {
            threshold: msg.threshold,
            owners: owner_count,
        });
    }
    if msg.native_denom.is_empty() {
        return Err(ContractError::InvalidConfig {
            reason: "native_denom must not be empty".to_string(),
        });
    }

    let mut seen = BTreeSet::new();
    for owner in &msg.owners {
        if owner.len() != PUBKEY_LEN {
            return Err(ContractError::InvalidOwner {
                reason: format!("expected {PUBKEY_LEN}-byte ed25519 key, got {}", owner.len()),
            });
        }
        if !seen.insert(owner.as_slice()) {
            return Err(ContractError::InvalidOwner {
                reason: format!("duplicate owner {}", hex::encode(owner.as_slice())),
            });
        }
        OWNERS.save(deps.storage, owner.as_slice(), &true)?;
    }

    CONFIG.save(
        deps.storage,
        &Config {
            threshold: msg.threshold,
            owner_count,
            native_denom: msg.native_denom,
        },
    )?;
    NONCE.save(deps.storage, &0u64)?;

    let domain = gate_domain(&env);
    DOMAIN_SEPARATOR.save(deps.storage, &domain)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("owner_count", owner_count.to_string())
        .add_attribute("threshold", msg.threshold.to_string())
        .add_attribute("domain_separator", bytes32_to_hex(&domain)))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::ProposeTransaction { to, value, data } => {
            execute_propose_transaction(deps, info, to, value, data)
        }
        ExecuteMsg::SubmitSignature {
            pending_id,
            signer,
            signature,
        } => execute_submit_signature(deps, pending_id, signer, signature),
        ExecuteMsg::TryExecute { pending_id } => execute_try_execute(deps, pending_id),
        ExecuteMsg::ExecTransaction {
            to,
            value,
            data,
            signatures,
        } => execute_exec_transaction(deps, to, value, data, signatures),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Nonce {} => to_json_binary(&query_nonce(deps)?),
        QueryMsg::DomainSeparator {} => to_json_binary(&query_domain_separator(deps)?),
        QueryMsg::TransactionHash {
            to,
            value,
            data,
            nonce,
        } => to_json_binary(&query_transaction_hash(deps, to, value, data, nonce)?),
        QueryMsg::PendingTransaction { pending_id } => {
            to_json_binary(&query_pending_transaction(deps, pending_id)?)
        }
        QueryMsg::Signatures { pending_id } => {
            to_json_binary(&query_signatures(deps, pending_id)?)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg::{NonceResponse, SignaturesResponse, TransactionHashResponse};
    use cosmwasm_std::testing::{mock_dependencies, mock_env, mock_info};
    use cosmwasm_std::{from_json, Uint128};
    use ed25519_dalek::{Signer, SigningKey};

    fn key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    fn pubkey(key: &SigningKey) -> Binary {
        Binary::from(key.verifying_key().to_bytes().to_vec())
    }

    fn sign(key: &SigningKey, hash: &Binary) -> Binary {
        Binary::from(key.sign(hash.as_slice()).to_bytes().to_vec())
    }

    fn setup(deps: DepsMut, threshold: u32) {
        instantiate(
            deps,
            mock_env(),
            mock_info("terra1deployer", &[]),
            InstantiateMsg {
                owners: vec![pubkey(&key(1)), pubkey(&key(2)), pubkey(&key(3))],
                threshold,
                native_denom: "uluna".to_string(),
            },
        )
        .unwrap();
    }

    fn propose(deps: DepsMut) -> Binary {
        let res = execute(
            deps,
            mock_env(),
            mock_info("terra1relayer", &[]),
            ExecuteMsg::ProposeTransaction {
                to: "terra1target".to_string(),
                value: Uint128::zero(),
                data: Binary::from(b"{\"ping\":{}}".to_vec()),
            },
        )
        .unwrap();
        let id = res
            .attributes
            .iter()
            .find(|a| a.key == "pending_id")
            .map(|a| a.value.clone())
            .unwrap();
        Binary::from(common::hex_to_bytes32(&id).unwrap().to_vec())
    }

    fn submit(deps: DepsMut, id: &Binary, signer: &SigningKey) -> Result<Response, ContractError> {
        execute(
            deps,
            mock_env(),
            mock_info("terra1relayer", &[]),
            ExecuteMsg::SubmitSignature {
                pending_id: id.clone(),
                signer: pubkey(signer),
                signature: sign(signer, id),
            },
        )
    }

    fn outcome(res: &Response) -> String {
        res.attributes
            .iter()
            .find(|a| a.key == "outcome")
            .map(|a| a.value.clone())
            .unwrap()
    }

    #[test]
    fn test_instantiate_rejects_bad_threshold() {
        for threshold in [0, 4] {
            let mut deps = mock_dependencies();
            let err = instantiate(
                deps.as_mut(),
                mock_env(),
                mock_info("terra1deployer", &[]),
                InstantiateMsg {
                    owners: vec![pubkey(&key(1)), pubkey(&key(2)), pubkey(&key(3))],
                    threshold,
                    native_denom: "uluna".to_string(),
                },
            )
            .unwrap_err();
            assert!(matches!(err, ContractError::InvalidThreshold { .. }));
        }
    }

    #[test]
    fn test_instantiate_rejects_duplicate_owner() {
        let mut deps = mock_dependencies();
        let err = instantiate(
            deps.as_mut(),
            mock_env(),
            mock_info("terra1deployer", &[]),
            InstantiateMsg {
                owners: vec![pubkey(&key(1)), pubkey(&key(1))],
                threshold: 1,
                native_denom: "uluna".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidOwner { .. }));
    }

    #[test]
    fn test_propose_is_idempotent_at_same_nonce() {
        let mut deps = mock_dependencies();
        setup(deps.as_mut(), 2);
        let first = propose(deps.as_mut());
        let second = propose(deps.as_mut());
        assert_eq!(first, second);

        let hash: TransactionHashResponse = from_json(
            query(
                deps.as_ref(),
                mock_env(),
                QueryMsg::TransactionHash {
                    to: "terra1target".to_string(),
                    value: Uint128::zero(),
                    data: Binary::from(b"{\"ping\":{}}".to_vec()),
                    nonce: None,
                },
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(hash.hash, first);
    }

    #[test]
    fn test_duplicate_signature_is_tolerated() {
        let mut deps = mock_dependencies();
        setup(deps.as_mut(), 2);
        let id = propose(deps.as_mut());

        let res = submit(deps.as_mut(), &id, &key(1)).unwrap();
        assert_eq!(outcome(&res), "accepted");
        let res = submit(deps.as_mut(), &id, &key(1)).unwrap();
        assert_eq!(outcome(&res), "duplicate");

        let sigs: SignaturesResponse = from_json(
            query(deps.as_ref(), mock_env(), QueryMsg::Signatures { pending_id: id.clone() })
                .unwrap(),
        )
        .unwrap();
        assert_eq!(sigs.signers.len(), 1);

        // One distinct signer is still below the threshold
        let err = execute(
            deps.as_mut(),
            mock_env(),
            mock_info("terra1relayer", &[]),
            ExecuteMsg::TryExecute { pending_id: id },
        )
        .unwrap_err();
        assert_eq!(
            err,
            ContractError::InsufficientSignatures {
                got: 1,
                required: 2
            }
        );
    }

    #[test]
    fn test_unknown_signer_rejected() {
        let mut deps = mock_dependencies();
        setup(deps.as_mut(), 2);
        let id = propose(deps.as_mut());
        let err = submit(deps.as_mut(), &id, &key(9)).unwrap_err();
        assert!(matches!(err, ContractError::UnknownSigner { .. }));
    }

    #[test]
    fn test_wrong_message_signature_rejected() {
        let mut deps = mock_dependencies();
        setup(deps.as_mut(), 2);
        let id = propose(deps.as_mut());

        let forged = sign(&key(1), &Binary::from(vec![0u8; 32]));
        let err = execute(
            deps.as_mut(),
            mock_env(),
            mock_info("terra1relayer", &[]),
            ExecuteMsg::SubmitSignature {
                pending_id: id,
                signer: pubkey(&key(1)),
                signature: forged,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidSignature { .. }));
    }

    #[test]
    fn test_signature_order_does_not_matter() {
        let mut deps = mock_dependencies();
        setup(deps.as_mut(), 2);
        let id = propose(deps.as_mut());

        submit(deps.as_mut(), &id, &key(3)).unwrap();
        submit(deps.as_mut(), &id, &key(1)).unwrap();

        let res = execute(
            deps.as_mut(),
            mock_env(),
            mock_info("terra1anyone", &[]),
            ExecuteMsg::TryExecute {
                pending_id: id.clone(),
            },
        )
        .unwrap();
        assert_eq!(res.messages.len(), 1);

        let nonce: NonceResponse =
            from_json(query(deps.as_ref(), mock_env(), QueryMsg::Nonce {}).unwrap()).unwrap();
        assert_eq!(nonce.nonce, 1);

        // The pending record is gone once executed
        let err = execute(
            deps.as_mut(),
            mock_env(),
            mock_info("terra1anyone", &[]),
            ExecuteMsg::TryExecute { pending_id: id },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::UnknownTransaction { .. }));
    }
}
