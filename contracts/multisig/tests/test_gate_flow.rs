//! Integration tests for the signature gate using cw-multi-test.
//!
//! A small recording contract stands in for the forwarded-to target.

use cosmwasm_std::{coins, to_json_binary, Addr, Binary, Empty, Uint128};
use cw_multi_test::{App, AppResponse, ContractWrapper, Executor};
use ed25519_dalek::{Signer, SigningKey};

use multisig::msg::{
    ExecuteMsg, InstantiateMsg, NonceResponse, PendingTransactionResponse, QueryMsg,
    SignatureEntry, TransactionHashResponse,
};
use multisig::ContractError;

// ============================================================================
// Target Contract
// ============================================================================

mod target {
    use cosmwasm_schema::cw_serde;
    use cosmwasm_std::{
        to_json_binary, Binary, Deps, DepsMut, Empty, Env, MessageInfo, Response, StdError,
        StdResult,
    };
    use cw_storage_plus::Item;

    pub const PINGS: Item<u64> = Item::new("pings");

    #[cw_serde]
    pub enum ExecuteMsg {
        Ping {},
        Fail {},
    }

    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        _msg: Empty,
    ) -> StdResult<Response> {
        PINGS.save(deps.storage, &0)?;
        Ok(Response::new())
    }

    pub fn execute(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: ExecuteMsg,
    ) -> StdResult<Response> {
        match msg {
            ExecuteMsg::Ping {} => {
                PINGS.update(deps.storage, |n| -> StdResult<u64> { Ok(n + 1) })?;
                Ok(Response::new().add_attribute("method", "ping"))
            }
            ExecuteMsg::Fail {} => Err(StdError::generic_err("target refused")),
        }
    }

    pub fn query(deps: Deps, _env: Env, _msg: Empty) -> StdResult<Binary> {
        to_json_binary(&PINGS.load(deps.storage)?)
    }
}

// ============================================================================
// Test Setup
// ============================================================================

fn contract_multisig() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        multisig::contract::execute,
        multisig::contract::instantiate,
        multisig::contract::query,
    );
    Box::new(contract)
}

fn contract_target() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(target::execute, target::instantiate, target::query);
    Box::new(contract)
}

struct TestEnv {
    app: App,
    gate: Addr,
    target: Addr,
    keys: Vec<SigningKey>,
    relayer: Addr,
}

fn owner_key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32])
}

fn pubkey(key: &SigningKey) -> Binary {
    Binary::from(key.verifying_key().to_bytes().to_vec())
}

fn sign(key: &SigningKey, hash: &Binary) -> Binary {
    Binary::from(key.sign(hash.as_slice()).to_bytes().to_vec())
}

fn setup() -> TestEnv {
    let mut app = App::default();
    let deployer = Addr::unchecked("terra1deployer");
    let relayer = Addr::unchecked("terra1relayer");
    let keys = vec![owner_key(11), owner_key(22), owner_key(33)];

    let gate_code = app.store_code(contract_multisig());
    let target_code = app.store_code(contract_target());

    let gate = app
        .instantiate_contract(
            gate_code,
            deployer.clone(),
            &InstantiateMsg {
                owners: keys.iter().map(pubkey).collect(),
                threshold: 2,
                native_denom: "uluna".to_string(),
            },
            &[],
            "multisig",
            None,
        )
        .unwrap();

    let target = app
        .instantiate_contract(target_code, deployer, &Empty {}, &[], "target", None)
        .unwrap();

    // The gate pays forwarded values from its own balance
    app.init_modules(|router, _, storage| {
        router
            .bank
            .init_balance(storage, &gate, coins(1_000_000, "uluna"))
            .unwrap();
    });

    TestEnv {
        app,
        gate,
        target,
        keys,
        relayer,
    }
}

impl TestEnv {
    fn tx_hash(&self, msg: &target::ExecuteMsg, value: u128) -> Binary {
        let res: TransactionHashResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.gate,
                &QueryMsg::TransactionHash {
                    to: self.target.to_string(),
                    value: Uint128::new(value),
                    data: to_json_binary(msg).unwrap(),
                    nonce: None,
                },
            )
            .unwrap();
        res.hash
    }

    fn propose(&mut self, msg: &target::ExecuteMsg, value: u128) -> Binary {
        let res = self
            .app
            .execute_contract(
                self.relayer.clone(),
                self.gate.clone(),
                &ExecuteMsg::ProposeTransaction {
                    to: self.target.to_string(),
                    value: Uint128::new(value),
                    data: to_json_binary(msg).unwrap(),
                },
                &[],
            )
            .unwrap();
        let id = wasm_attr(&res, "pending_id");
        let hash = self.tx_hash(msg, value);
        assert_eq!(id, format!("0x{}", hex::encode(hash.as_slice())));
        hash
    }

    fn submit(&mut self, pending_id: &Binary, key_index: usize) -> anyhow::Result<AppResponse> {
        let key = &self.keys[key_index];
        let msg = ExecuteMsg::SubmitSignature {
            pending_id: pending_id.clone(),
            signer: pubkey(key),
            signature: sign(key, pending_id),
        };
        self.app
            .execute_contract(self.relayer.clone(), self.gate.clone(), &msg, &[])
    }

    fn try_execute(&mut self, pending_id: &Binary) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            self.relayer.clone(),
            self.gate.clone(),
            &ExecuteMsg::TryExecute {
                pending_id: pending_id.clone(),
            },
            &[],
        )
    }

    fn nonce(&self) -> u64 {
        let res: NonceResponse = self
            .app
            .wrap()
            .query_wasm_smart(&self.gate, &QueryMsg::Nonce {})
            .unwrap();
        res.nonce
    }

    fn pings(&self) -> u64 {
        self.app
            .wrap()
            .query_wasm_smart(&self.target, &Empty {})
            .unwrap()
    }
}

fn wasm_attr(res: &AppResponse, key: &str) -> String {
    res.events
        .iter()
        .filter(|e| e.ty == "wasm")
        .flat_map(|e| e.attributes.iter())
        .find(|a| a.key == key)
        .map(|a| a.value.clone())
        .unwrap()
}

// ============================================================================
// Pending Transaction Flow
// ============================================================================

#[test]
fn test_two_of_three_forwards_call() {
    let mut env = setup();
    let id = env.propose(&target::ExecuteMsg::Ping {}, 0);

    env.submit(&id, 0).unwrap();
    env.submit(&id, 2).unwrap();
    env.try_execute(&id).unwrap();

    assert_eq!(env.pings(), 1);
    assert_eq!(env.nonce(), 1);

    let pending: Option<PendingTransactionResponse> = env
        .app
        .wrap()
        .query_wasm_smart(&env.gate, &QueryMsg::PendingTransaction { pending_id: id })
        .unwrap();
    assert!(pending.is_none());
}

#[test]
fn test_duplicate_submission_is_not_counted_twice() {
    let mut env = setup();
    let id = env.propose(&target::ExecuteMsg::Ping {}, 0);

    let res = env.submit(&id, 1).unwrap();
    assert_eq!(wasm_attr(&res, "outcome"), "accepted");
    let res = env.submit(&id, 1).unwrap();
    assert_eq!(wasm_attr(&res, "outcome"), "duplicate");
    assert_eq!(wasm_attr(&res, "signature_count"), "1");

    let err = env.try_execute(&id).unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        ContractError::InsufficientSignatures {
            got: 1,
            required: 2
        }
        .to_string()
    );
    assert_eq!(env.pings(), 0);
}

#[test]
fn test_unknown_signer_is_rejected() {
    let mut env = setup();
    let id = env.propose(&target::ExecuteMsg::Ping {}, 0);

    let stranger = owner_key(99);
    let err = env
        .app
        .execute_contract(
            env.relayer.clone(),
            env.gate.clone(),
            &ExecuteMsg::SubmitSignature {
                pending_id: id.clone(),
                signer: pubkey(&stranger),
                signature: sign(&stranger, &id),
            },
            &[],
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("Unknown signer"));
}

#[test]
fn test_stale_proposal_cannot_execute() {
    let mut env = setup();
    let first = env.propose(&target::ExecuteMsg::Ping {}, 0);
    let second = env.propose(&target::ExecuteMsg::Ping {}, 7);

    for id in [&first, &second] {
        env.submit(id, 0).unwrap();
        env.submit(id, 1).unwrap();
    }
    env.try_execute(&first).unwrap();

    let err = env.try_execute(&second).unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        ContractError::StaleNonce {
            proposed: 0,
            current: 1
        }
        .to_string()
    );
}

#[test]
fn test_downstream_failure_reverts_nonce() {
    let mut env = setup();
    let id = env.propose(&target::ExecuteMsg::Fail {}, 0);
    env.submit(&id, 0).unwrap();
    env.submit(&id, 1).unwrap();

    let err = env.try_execute(&id).unwrap_err();
    assert!(err.root_cause().to_string().contains("target refused"));

    // Nothing moved: the proposal is still pending at the same nonce
    assert_eq!(env.nonce(), 0);
    let pending: Option<PendingTransactionResponse> = env
        .app
        .wrap()
        .query_wasm_smart(&env.gate, &QueryMsg::PendingTransaction { pending_id: id })
        .unwrap();
    assert_eq!(pending.unwrap().signature_count, 2);
}

#[test]
fn test_value_is_forwarded() {
    let mut env = setup();
    let id = env.propose(&target::ExecuteMsg::Ping {}, 500);
    env.submit(&id, 1).unwrap();
    env.submit(&id, 2).unwrap();
    env.try_execute(&id).unwrap();

    let balance = env.app.wrap().query_balance(&env.target, "uluna").unwrap();
    assert_eq!(balance.amount, Uint128::new(500));
}

// ============================================================================
// Signature Bundle
// ============================================================================

#[test]
fn test_exec_transaction_counts_repeated_signer_once() {
    let mut env = setup();
    let msg = target::ExecuteMsg::Ping {};
    let hash = env.tx_hash(&msg, 0);

    let entry = |key: &SigningKey| SignatureEntry {
        signer: pubkey(key),
        signature: sign(key, &hash),
    };

    let err = env
        .app
        .execute_contract(
            env.relayer.clone(),
            env.gate.clone(),
            &ExecuteMsg::ExecTransaction {
                to: env.target.to_string(),
                value: Uint128::zero(),
                data: to_json_binary(&msg).unwrap(),
                signatures: vec![entry(&env.keys[0]), entry(&env.keys[0])],
            },
            &[],
        )
        .unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        ContractError::InsufficientSignatures {
            got: 1,
            required: 2
        }
        .to_string()
    );

    env.app
        .execute_contract(
            env.relayer.clone(),
            env.gate.clone(),
            &ExecuteMsg::ExecTransaction {
                to: env.target.to_string(),
                value: Uint128::zero(),
                data: to_json_binary(&msg).unwrap(),
                signatures: vec![entry(&env.keys[0]), entry(&env.keys[0]), entry(&env.keys[2])],
            },
            &[],
        )
        .unwrap();
    assert_eq!(env.pings(), 1);
    assert_eq!(env.nonce(), 1);

    // The same bundle is bound to the old nonce and no longer verifies
    let err = env
        .app
        .execute_contract(
            env.relayer.clone(),
            env.gate.clone(),
            &ExecuteMsg::ExecTransaction {
                to: env.target.to_string(),
                value: Uint128::zero(),
                data: to_json_binary(&msg).unwrap(),
                signatures: vec![entry(&env.keys[0]), entry(&env.keys[2])],
            },
            &[],
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("Invalid signature"));
}
