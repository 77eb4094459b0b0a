//! Authorization engine: pure functions mapping (actor, ability, resource)
//! to allow/deny.
//!
//! Policies only answer yes or no. Turning a "no" into an outcome is done in
//! exactly one place, [`authorize`], so every caller denies the same way and
//! before any side effect.

pub mod resources;
pub mod role;
pub mod tenant_scoped;

pub use resources::*;
pub use role::{Actor, Role};
pub use tenant_scoped::{Ability, Rule, RoleGate, TenantOwned, TenantScopedPolicy};

use crate::error::{Error, Result};
use crate::models::WorkOrderType;

/// Maps a policy decision to `Ok(())` or the uniform `Forbidden` error.
pub fn authorize(allowed: bool) -> Result<()> {
    if allowed { Ok(()) } else { Err(Error::Forbidden) }
}

/// Operators may only report breakdowns; every other role may open any kind
/// of work order. Checked in addition to `WORK_ORDER.create`.
pub fn can_create_work_order_of_type(actor: &Actor, work_order_type: WorkOrderType) -> bool {
    if actor.role.is_operator() {
        work_order_type == WorkOrderType::Breakdown
    } else {
        true
    }
}
