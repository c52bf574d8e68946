//! Shared cw-multi-test fixtures: contract wrappers, asset contracts and the
//! campaign data used across the distribution tests.

#![allow(dead_code)]

use common::{Bytes32, MerkleTree};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Empty, Uint128};
use cw20::{BalanceResponse, Cw20Coin, Cw20ExecuteMsg, Cw20QueryMsg};
use cw721::{Cw721ExecuteMsg, Cw721QueryMsg, OwnerOfResponse};
use cw_multi_test::{App, AppResponse, ContractWrapper, Executor};

use multisender::msg::{DomainSeparatorResponse, QueryMsg};

pub const DENOM: &str = "uluna";
pub const MIN_DELAY: u64 = 3600;

/// Per-receiver coin drops: 0.1, 0.2, 0.05, 0.6 and 0.3 LUNA
pub const COIN_AMOUNTS: [u128; 5] = [100_000, 200_000, 50_000, 600_000, 300_000];
pub const COIN_BUDGET: u128 = 1_250_000;

pub const TOKEN_AMOUNTS: [u128; 5] = [500, 800, 750, 1020, 670];
pub const TOKEN_BUDGET: u128 = 3740;

pub const NFT_GROUPS: [&[u32]; 5] = [&[1, 3, 5], &[2, 7, 9], &[4], &[8, 12], &[6, 10, 11, 13, 14]];

/// Minted to the admin but never allocated
pub const SPARE_NFTS: [u32; 2] = [15, 16];

// ============================================================================
// Contract Wrappers
// ============================================================================

pub fn contract_multisender() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        multisender::contract::execute,
        multisender::contract::instantiate,
        multisender::contract::query,
    );
    Box::new(contract)
}

pub fn contract_multisig() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        multisig::contract::execute,
        multisig::contract::instantiate,
        multisig::contract::query,
    );
    Box::new(contract)
}

pub fn contract_cw20() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    );
    Box::new(contract)
}

pub fn contract_cw721() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        cw721_base::entry::execute,
        cw721_base::entry::instantiate,
        cw721_base::entry::query,
    );
    Box::new(contract)
}

#[cw_serde]
struct Cw721InstantiateMsg {
    name: String,
    symbol: String,
    minter: String,
}

#[cw_serde]
enum Cw721MintMsg {
    Mint {
        token_id: String,
        owner: String,
        token_uri: Option<String>,
        extension: Option<Empty>,
    },
}

// ============================================================================
// Campaign Data
// ============================================================================

pub fn receivers() -> Vec<String> {
    (0..5).map(|i| format!("terra1receiver{i}")).collect()
}

pub fn coin_amounts() -> Vec<Uint128> {
    COIN_AMOUNTS.iter().copied().map(Uint128::new).collect()
}

pub fn token_amounts() -> Vec<Uint128> {
    TOKEN_AMOUNTS.iter().copied().map(Uint128::new).collect()
}

pub fn nft_groups() -> Vec<Vec<String>> {
    NFT_GROUPS
        .iter()
        .map(|group| group.iter().map(|id| id.to_string()).collect())
        .collect()
}

pub fn nft_ids() -> Vec<String> {
    nft_groups().into_iter().flatten().collect()
}

// ============================================================================
// Asset Contracts
// ============================================================================

/// Instantiate a CW20 and a CW721, both fully owned by `admin`.
pub fn setup_assets(app: &mut App, admin: &Addr) -> (Addr, Addr) {
    let cw20_code = app.store_code(contract_cw20());
    let cw721_code = app.store_code(contract_cw721());

    let token = app
        .instantiate_contract(
            cw20_code,
            admin.clone(),
            &cw20_base::msg::InstantiateMsg {
                name: "Drop Token".to_string(),
                symbol: "DROP".to_string(),
                decimals: 6,
                initial_balances: vec![Cw20Coin {
                    address: admin.to_string(),
                    amount: Uint128::new(1_000_000),
                }],
                mint: None,
                marketing: None,
            },
            &[],
            "drop-token",
            None,
        )
        .unwrap();

    let nft = app
        .instantiate_contract(
            cw721_code,
            admin.clone(),
            &Cw721InstantiateMsg {
                name: "Drop Collection".to_string(),
                symbol: "DROPNFT".to_string(),
                minter: admin.to_string(),
            },
            &[],
            "drop-nft",
            None,
        )
        .unwrap();

    let all_ids = NFT_GROUPS
        .iter()
        .flat_map(|group| group.iter())
        .chain(SPARE_NFTS.iter());
    for id in all_ids {
        app.execute_contract(
            admin.clone(),
            nft.clone(),
            &Cw721MintMsg::Mint {
                token_id: id.to_string(),
                owner: admin.to_string(),
                token_uri: None,
                extension: None,
            },
            &[],
        )
        .unwrap();
    }

    (token, nft)
}

/// Allowance and operator approval so `spender` can pull the budgets.
pub fn approve_assets(app: &mut App, admin: &Addr, token: &Addr, nft: &Addr, spender: &Addr) {
    app.execute_contract(
        admin.clone(),
        token.clone(),
        &Cw20ExecuteMsg::IncreaseAllowance {
            spender: spender.to_string(),
            amount: Uint128::new(TOKEN_BUDGET),
            expires: None,
        },
        &[],
    )
    .unwrap();
    app.execute_contract(
        admin.clone(),
        nft.clone(),
        &Cw721ExecuteMsg::ApproveAll {
            operator: spender.to_string(),
            expires: None,
        },
        &[],
    )
    .unwrap();
}

pub fn cw20_balance(app: &App, token: &Addr, address: &str) -> Uint128 {
    let res: BalanceResponse = app
        .wrap()
        .query_wasm_smart(
            token,
            &Cw20QueryMsg::Balance {
                address: address.to_string(),
            },
        )
        .unwrap();
    res.balance
}

pub fn nft_owner(app: &App, nft: &Addr, token_id: &str) -> String {
    let res: OwnerOfResponse = app
        .wrap()
        .query_wasm_smart(
            nft,
            &Cw721QueryMsg::OwnerOf {
                token_id: token_id.to_string(),
                include_expired: None,
            },
        )
        .unwrap();
    res.owner
}

pub fn native_balance(app: &App, address: &str) -> Uint128 {
    app.wrap().query_balance(address, DENOM).unwrap().amount
}

// ============================================================================
// Manifest
// ============================================================================

pub fn domain_separator(app: &App, timelock: &Addr) -> Bytes32 {
    let res: DomainSeparatorResponse = app
        .wrap()
        .query_wasm_smart(timelock, &QueryMsg::DomainSeparator {})
        .unwrap();
    res.domain_separator.to_vec().try_into().unwrap()
}

/// Manifest tree over the approved asset addresses.
pub fn manifest_tree(domain: &Bytes32, assets: &[&Addr]) -> MerkleTree {
    let assets: Vec<&str> = assets.iter().map(|a| a.as_str()).collect();
    MerkleTree::from_assets(domain, &assets)
}

pub fn proof_for(tree: &MerkleTree, domain: &Bytes32, asset: &Addr) -> Vec<Binary> {
    tree.asset_proof(domain, asset.as_str())
        .unwrap()
        .into_iter()
        .map(|node| Binary::from(node.to_vec()))
        .collect()
}

pub fn wasm_attr(res: &AppResponse, key: &str) -> String {
    res.events
        .iter()
        .filter(|e| e.ty == "wasm")
        .flat_map(|e| e.attributes.iter())
        .find(|a| a.key == key)
        .map(|a| a.value.clone())
        .unwrap()
}
