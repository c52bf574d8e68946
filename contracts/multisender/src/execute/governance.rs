//! Governance hand-over.

use cosmwasm_std::{DepsMut, Env, MessageInfo, Response};

use crate::error::ContractError;
use crate::state::GOVERNANCE;

/// Hand the governance record to `new_admin`. Allowed exactly once; after the
/// hand-over to the contract itself, role changes must pass the timelock.
pub fn execute_transfer_governance(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    new_admin: String,
) -> Result<Response, ContractError> {
    let mut governance = GOVERNANCE.load(deps.storage)?;
    if info.sender != governance.admin {
        return Err(ContractError::Unauthorized);
    }
    if governance.transferred_at.is_some() {
        return Err(ContractError::GovernanceAlreadyTransferred);
    }

    let new_admin = deps.api.addr_validate(&new_admin)?;
    let old_admin = governance.admin;
    governance.admin = new_admin.clone();
    governance.transferred_at = Some(env.block.time);
    GOVERNANCE.save(deps.storage, &governance)?;

    Ok(Response::new()
        .add_attribute("method", "transfer_governance")
        .add_attribute("old_admin", old_admin)
        .add_attribute("new_admin", new_admin))
}
