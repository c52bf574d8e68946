//! Execute handlers for the Multisender contract.
//!
//! - `timelock` - Schedule, Execute, Cancel (single and batch), delay and roles
//! - `governance` - one-time governance hand-over
//! - `allocation` - seeding the manifest and debiting its budgets
//! - `distribution` - native, CW20 and CW721 drops

mod allocation;
mod distribution;
mod governance;
mod timelock;

pub use allocation::*;
pub use distribution::*;
pub use governance::*;
pub use timelock::*;

use common::Bytes32;
use cosmwasm_std::{Addr, Binary, Env, MessageInfo, Storage};

use crate::error::ContractError;
use crate::state::{role_map, Role};

/// Only the contract itself, i.e. a timelocked call, may proceed.
pub(crate) fn ensure_self(env: &Env, info: &MessageInfo) -> Result<(), ContractError> {
    if info.sender != env.contract.address {
        return Err(ContractError::OnlySelf);
    }
    Ok(())
}

pub(crate) fn ensure_role(
    storage: &dyn Storage,
    role: Role,
    account: &Addr,
) -> Result<(), ContractError> {
    if !role_map(role).may_load(storage, account)?.unwrap_or(false) {
        return Err(ContractError::MissingRole {
            role,
            account: account.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn parse_bytes32(value: &Binary) -> Result<Bytes32, ContractError> {
    value
        .to_vec()
        .try_into()
        .map_err(|_| ContractError::InvalidHashLength { got: value.len() })
}

/// Absent predecessor or salt encode as zero.
pub(crate) fn parse_optional_bytes32(value: Option<&Binary>) -> Result<Bytes32, ContractError> {
    value.map(parse_bytes32).transpose().map(Option::unwrap_or_default)
}
