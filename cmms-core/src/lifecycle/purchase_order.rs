use diesel::prelude::*;
use tracing::info;

use super::record;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::models::{PurchaseOrder, PurchaseOrderStatus};
use crate::orm::purchase_order::{get_purchase_order, mark_items_received, update_status};
use crate::policy::{Actor, PURCHASE_ORDER, authorize};
use crate::tenant::require;

fn transition(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    actor: &Actor,
    order_id: i32,
    target: PurchaseOrderStatus,
) -> Result<PurchaseOrder> {
    let order = require(get_purchase_order(conn, order_id)?, "purchase_order", order_id)?;
    authorize(PURCHASE_ORDER.update(actor, &order))?;

    let from = order.status().map_err(Error::Validation)?;
    if !from.can_transition_to(target) {
        return Err(Error::InvalidTransition {
            entity: "purchase_order",
            from: from.as_str().to_string(),
            to: target.as_str().to_string(),
        });
    }

    conn.transaction::<_, Error, _>(|conn| {
        let updated = update_status(conn, order.id, target)?;
        if target == PurchaseOrderStatus::Received {
            mark_items_received(conn, order.id)?;
        }
        record(conn, clock, actor, updated.company_id, "purchase_orders", updated.id, "update")?;
        info!(
            purchase_order_id = updated.id,
            from = from.as_str(),
            to = target.as_str(),
            actor_id = actor.id,
            "Purchase order status changed"
        );
        Ok(updated)
    })
}

pub fn send_purchase_order(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    actor: &Actor,
    order_id: i32,
) -> Result<PurchaseOrder> {
    transition(conn, clock, actor, order_id, PurchaseOrderStatus::Sent)
}

/// Marks a sent order as delivered in full.
pub fn receive_purchase_order(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    actor: &Actor,
    order_id: i32,
) -> Result<PurchaseOrder> {
    transition(conn, clock, actor, order_id, PurchaseOrderStatus::Received)
}

pub fn cancel_purchase_order(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    actor: &Actor,
    order_id: i32,
) -> Result<PurchaseOrder> {
    transition(conn, clock, actor, order_id, PurchaseOrderStatus::Cancelled)
}
