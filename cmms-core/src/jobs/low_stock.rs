//! Drafts purchase orders for spare parts that dropped below their reorder
//! point, one order per supplier.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use diesel::prelude::*;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, info, warn};

use super::JobControl;
use super::notify::{NotificationRequest, Notifier};
use crate::clock::Clock;
use crate::config::CmmsConfig;
use crate::error::{Error, Result};
use crate::models::{
    Company, NewPurchaseOrder, NewPurchaseOrderItem, NotificationKind, PurchaseOrder,
    PurchaseOrderStatus, SparePart, User,
};
use crate::orm::company::{get_all_companies, get_company_by_id};
use crate::orm::entity_activity::log_activity;
use crate::orm::purchase_order::{insert_purchase_order, insert_purchase_order_item, recompute_total};
use crate::orm::spare_part::{get_available_quantities, get_parts_on_pending_orders, get_reorderable_parts};
use crate::orm::user::{get_users_by_company, get_users_by_company_and_role};
use crate::policy::Role;

#[derive(Debug, Clone)]
pub struct LowStockOptions {
    pub company_id: Option<i32>,
    /// Lead time used when the group's first part has none recorded.
    pub default_lead_time_days: i64,
}

impl LowStockOptions {
    pub fn from_config(config: &CmmsConfig) -> Self {
        Self {
            company_id: None,
            default_lead_time_days: config.default_lead_time_days,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LowStockSummary {
    pub orders_created: usize,
    pub parts_ordered: usize,
    /// Groups left alone because the tenant has no user to own the order.
    pub groups_skipped: usize,
    /// Groups whose transaction failed and was rolled back.
    pub groups_failed: usize,
    /// Short parts with no supplier to order from.
    pub parts_without_supplier: usize,
    /// Short parts linked to an inactive supplier or one of another company.
    pub parts_with_invalid_supplier: usize,
    /// Companies whose shortages could not be read; nothing was ordered for them.
    pub companies_failed: usize,
    pub notifications_sent: usize,
    pub notifications_failed: usize,
    pub interrupted: bool,
}

/// A part below its reorder point and the quantity to order for it.
#[derive(Debug, Clone)]
pub struct Shortage {
    pub part: SparePart,
    pub available: i64,
    pub quantity: i32,
}

impl Shortage {
    /// Orders at least the configured reorder quantity, more when the gap
    /// to the reorder point is larger.
    pub fn new(part: SparePart, available: i64) -> Self {
        let gap = i64::from(part.reorder_point) - available;
        let quantity = gap.max(i64::from(part.reorder_quantity));
        let quantity = i32::try_from(quantity).unwrap_or(i32::MAX);
        Self { part, available, quantity }
    }
}

/// Finds short parts of one company, grouped by supplier. Parts that are
/// already on a draft or sent order are left out. Groups and their parts
/// are ordered by id.
pub fn find_shortages(
    conn: &mut SqliteConnection,
    company_id: i32,
    summary: &mut LowStockSummary,
) -> Result<BTreeMap<i32, Vec<Shortage>>> {
    let parts = get_reorderable_parts(conn, company_id)?;
    let part_ids: Vec<i32> = parts.iter().map(|(p, _)| p.id).collect();
    let available = get_available_quantities(conn, &part_ids)?;
    let pending = get_parts_on_pending_orders(conn, &part_ids)?;

    let mut groups: BTreeMap<i32, Vec<Shortage>> = BTreeMap::new();
    for (part, supplier) in parts {
        let on_hand = available.get(&part.id).copied().unwrap_or(0);
        if on_hand >= i64::from(part.reorder_point) {
            continue;
        }
        if pending.contains(&part.id) {
            debug!(part_id = part.id, "Part already on a pending purchase order");
            continue;
        }
        let Some(supplier) = supplier else {
            warn!(
                part_id = part.id,
                part_number = %part.part_number,
                company_id,
                "Part is below its reorder point but has no supplier"
            );
            summary.parts_without_supplier += 1;
            continue;
        };
        if supplier.company_id != company_id || !supplier.is_active {
            warn!(
                part_id = part.id,
                part_number = %part.part_number,
                supplier_id = supplier.id,
                company_id,
                "Part is below its reorder point but its supplier cannot be ordered from"
            );
            summary.parts_with_invalid_supplier += 1;
            continue;
        }
        groups.entry(supplier.id).or_default().push(Shortage::new(part, on_hand));
    }
    Ok(groups)
}

/// The user recorded as creator of generated orders: the tenant's first
/// manager, else its first user of any role.
fn resolve_creator(conn: &mut SqliteConnection, company_id: i32) -> Result<Option<User>> {
    let mut managers = get_users_by_company_and_role(conn, company_id, Role::Manager)?;
    if !managers.is_empty() {
        return Ok(Some(managers.remove(0)));
    }
    Ok(get_users_by_company(conn, company_id)?.into_iter().next())
}

/// Creates draft purchase orders for every (company, supplier) with an
/// outstanding shortage and notifies the company's managers.
///
/// Each supplier group is committed in its own transaction; a failing group
/// is rolled back, logged and counted, and the run continues. A stop
/// request ends the run before the next group and keeps what was committed.
pub fn generate_low_stock_purchase_orders(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    options: &LowStockOptions,
    notifier: &mut dyn Notifier,
    control: &JobControl,
) -> Result<LowStockSummary> {
    let companies: Vec<Company> = match options.company_id {
        Some(id) => vec![get_company_by_id(conn, id)?.ok_or_else(|| Error::not_found("company", id))?],
        None => get_all_companies(conn)?,
    };
    info!(companies = companies.len(), "Generating low-stock purchase orders");

    let mut summary = LowStockSummary::default();
    'companies: for company in &companies {
        let planned = find_shortages(conn, company.id, &mut summary).and_then(|groups| {
            let creator = if groups.is_empty() { None } else { resolve_creator(conn, company.id)? };
            Ok((groups, creator))
        });
        let (groups, creator) = match planned {
            Ok(planned) => planned,
            Err(e) => {
                error!(company_id = company.id, error = %e, "Failed to read shortages, skipping company");
                summary.companies_failed += 1;
                continue;
            }
        };
        if groups.is_empty() {
            continue;
        }

        let Some(creator) = creator else {
            warn!(
                company_id = company.id,
                groups = groups.len(),
                "No user to own purchase orders, skipping company"
            );
            summary.groups_skipped += groups.len();
            continue;
        };

        for (supplier_id, shortages) in &groups {
            if control.should_stop() {
                summary.interrupted = true;
                break 'companies;
            }

            let now = clock.now();
            let created = conn.transaction::<_, Error, _>(|conn| {
                create_order(conn, company.id, *supplier_id, shortages, &creator, options, now)
            });

            match created {
                Ok(order) => {
                    info!(
                        company_id = company.id,
                        supplier_id,
                        purchase_order_id = order.id,
                        lines = shortages.len(),
                        total_cost_cents = order.total_cost_cents,
                        "Created draft purchase order"
                    );
                    summary.orders_created += 1;
                    summary.parts_ordered += shortages.len();
                    notify_managers(conn, notifier, &order, shortages.len(), now, &mut summary);
                }
                Err(e) => {
                    error!(
                        company_id = company.id,
                        supplier_id,
                        error = %e,
                        "Failed to create purchase order, group rolled back"
                    );
                    summary.groups_failed += 1;
                }
            }
        }
    }

    if summary.interrupted {
        warn!("Low-stock generation interrupted, committed orders are kept");
    }
    info!(
        orders_created = summary.orders_created,
        parts_ordered = summary.parts_ordered,
        groups_skipped = summary.groups_skipped,
        groups_failed = summary.groups_failed,
        companies_failed = summary.companies_failed,
        notifications_sent = summary.notifications_sent,
        "Low-stock generation finished"
    );
    Ok(summary)
}

fn create_order(
    conn: &mut SqliteConnection,
    company_id: i32,
    supplier_id: i32,
    shortages: &[Shortage],
    creator: &User,
    options: &LowStockOptions,
    now: NaiveDateTime,
) -> Result<PurchaseOrder> {
    let lead_time_days = shortages
        .first()
        .and_then(|s| s.part.lead_time_days)
        .map(i64::from)
        .unwrap_or(options.default_lead_time_days);
    let expected_delivery_date = Duration::try_days(lead_time_days)
        .and_then(|lead_time| now.date().checked_add_signed(lead_time))
        .ok_or_else(|| {
            Error::Validation(format!(
                "lead time of {} days from {} is out of range",
                lead_time_days,
                now.date()
            ))
        })?;

    let order = insert_purchase_order(
        conn,
        NewPurchaseOrder {
            company_id,
            supplier_id,
            status: PurchaseOrderStatus::Draft.as_str().to_string(),
            created_by: Some(creator.id),
            expected_delivery_date: Some(expected_delivery_date),
            total_cost_cents: 0,
            created_at: now,
        },
    )?;

    for shortage in shortages {
        insert_purchase_order_item(
            conn,
            NewPurchaseOrderItem {
                purchase_order_id: order.id,
                spare_part_id: shortage.part.id,
                quantity: shortage.quantity,
                unit_cost_cents: shortage.part.unit_cost_cents,
                quantity_received: 0,
            },
        )?;
    }

    let total = recompute_total(conn, order.id)?;
    log_activity(conn, Some(company_id), "purchase_orders", order.id, "create", Some(creator.id), now)?;

    Ok(PurchaseOrder {
        total_cost_cents: total,
        ..order
    })
}

fn notify_managers(
    conn: &mut SqliteConnection,
    notifier: &mut dyn Notifier,
    order: &PurchaseOrder,
    lines: usize,
    now: NaiveDateTime,
    summary: &mut LowStockSummary,
) {
    let managers = match get_users_by_company_and_role(conn, order.company_id, Role::Manager) {
        Ok(managers) => managers,
        Err(e) => {
            error!(purchase_order_id = order.id, error = %e, "Failed to look up managers to notify");
            summary.notifications_failed += 1;
            return;
        }
    };
    for manager in managers {
        let request = NotificationRequest {
            company_id: order.company_id,
            recipient_id: manager.id,
            kind: NotificationKind::PurchaseOrderGenerated,
            subject_id: order.id,
            payload: json!({
                "purchase_order_id": order.id,
                "supplier_id": order.supplier_id,
                "lines": lines,
                "total_cost_cents": order.total_cost_cents,
                "expected_delivery_date": order.expected_delivery_date,
            }),
            at: now,
        };
        match notifier.notify(conn, &request) {
            Ok(true) => summary.notifications_sent += 1,
            Ok(false) => debug!(recipient_id = manager.id, "Manager already notified"),
            Err(e) => {
                error!(
                    purchase_order_id = order.id,
                    recipient_id = manager.id,
                    error = %e,
                    "Failed to notify manager"
                );
                summary.notifications_failed += 1;
            }
        }
    }
}
