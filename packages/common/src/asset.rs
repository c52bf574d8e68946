//! Transferable assets.
//!
//! The three asset kinds the distribution engine moves form a closed set;
//! each kind has exactly one transfer handler.

use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Addr, BankMsg, Coin, CosmosMsg, StdError, StdResult, Uint128, WasmMsg};
use cw20::Cw20ExecuteMsg;
use cw721::Cw721ExecuteMsg;

/// Asset kind, used in budgets, attributes and errors.
#[cw_serde]
#[derive(Copy, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKind {
    Native,
    Cw20,
    Cw721,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Native => write!(f, "native"),
            AssetKind::Cw20 => write!(f, "cw20"),
            AssetKind::Cw721 => write!(f, "cw721"),
        }
    }
}

/// A concrete quantity of one asset.
#[cw_serde]
pub enum Asset {
    Native { denom: String, amount: Uint128 },
    Cw20 { contract_addr: Addr, amount: Uint128 },
    Cw721 { contract_addr: Addr, token_id: String },
}

impl Asset {
    pub fn kind(&self) -> AssetKind {
        match self {
            Asset::Native { .. } => AssetKind::Native,
            Asset::Cw20 { .. } => AssetKind::Cw20,
            Asset::Cw721 { .. } => AssetKind::Cw721,
        }
    }

    /// Message moving this asset from the contract's own holdings to `recipient`.
    pub fn transfer_msg(&self, recipient: &Addr) -> StdResult<CosmosMsg> {
        let msg = match self {
            Asset::Native { denom, amount } => CosmosMsg::Bank(BankMsg::Send {
                to_address: recipient.to_string(),
                amount: vec![Coin {
                    denom: denom.clone(),
                    amount: *amount,
                }],
            }),
            Asset::Cw20 {
                contract_addr,
                amount,
            } => CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: contract_addr.to_string(),
                msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                    recipient: recipient.to_string(),
                    amount: *amount,
                })?,
                funds: vec![],
            }),
            Asset::Cw721 {
                contract_addr,
                token_id,
            } => CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: contract_addr.to_string(),
                msg: to_json_binary(&Cw721ExecuteMsg::TransferNft {
                    recipient: recipient.to_string(),
                    token_id: token_id.clone(),
                })?,
                funds: vec![],
            }),
        };
        Ok(msg)
    }

    /// Message pulling this asset from `owner` into `recipient`.
    ///
    /// Requires a cw20 allowance or cw721 operator approval granted by
    /// `owner` to the calling contract. Native coins cannot be pulled; they
    /// must arrive as funds.
    pub fn transfer_from_msg(&self, owner: &Addr, recipient: &Addr) -> StdResult<CosmosMsg> {
        match self {
            Asset::Native { .. } => Err(StdError::generic_err(
                "native coins cannot be pulled; send them as funds",
            )),
            Asset::Cw20 {
                contract_addr,
                amount,
            } => Ok(CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: contract_addr.to_string(),
                msg: to_json_binary(&Cw20ExecuteMsg::TransferFrom {
                    owner: owner.to_string(),
                    recipient: recipient.to_string(),
                    amount: *amount,
                })?,
                funds: vec![],
            })),
            // cw721 transfers move the token from its current owner as long as
            // the sender is an approved operator.
            Asset::Cw721 { .. } => self.transfer_msg(recipient),
        }
    }
}
