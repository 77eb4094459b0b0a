use diesel::prelude::*;

use super::db::last_insert_id;
use crate::models::{
    NewPurchaseOrder, NewPurchaseOrderItem, PurchaseOrder, PurchaseOrderItem, PurchaseOrderStatus,
};

pub fn insert_purchase_order(
    conn: &mut SqliteConnection,
    new_order: NewPurchaseOrder,
) -> Result<PurchaseOrder, diesel::result::Error> {
    use crate::schema::purchase_orders::dsl::*;

    diesel::insert_into(purchase_orders).values(&new_order).execute(conn)?;

    let last_id = last_insert_id(conn)?;
    purchase_orders.filter(id.eq(last_id)).first::<PurchaseOrder>(conn)
}

pub fn insert_purchase_order_item(
    conn: &mut SqliteConnection,
    new_item: NewPurchaseOrderItem,
) -> Result<PurchaseOrderItem, diesel::result::Error> {
    use crate::schema::purchase_order_items::dsl::*;

    diesel::insert_into(purchase_order_items).values(&new_item).execute(conn)?;

    let last_id = last_insert_id(conn)?;
    purchase_order_items
        .filter(id.eq(last_id))
        .first::<PurchaseOrderItem>(conn)
}

pub fn get_purchase_order(
    conn: &mut SqliteConnection,
    order_id: i32,
) -> Result<Option<PurchaseOrder>, diesel::result::Error> {
    use crate::schema::purchase_orders::dsl::*;
    purchase_orders
        .filter(id.eq(order_id))
        .first::<PurchaseOrder>(conn)
        .optional()
}

pub fn get_purchase_order_items(
    conn: &mut SqliteConnection,
    order_id: i32,
) -> Result<Vec<PurchaseOrderItem>, diesel::result::Error> {
    use crate::schema::purchase_order_items::dsl::*;
    purchase_order_items
        .filter(purchase_order_id.eq(order_id))
        .order(id.asc())
        .load::<PurchaseOrderItem>(conn)
}

/// Purchase orders of one company, optionally restricted to one supplier.
pub fn get_purchase_orders_for_company(
    conn: &mut SqliteConnection,
    target_company_id: i32,
    supplier: Option<i32>,
) -> Result<Vec<PurchaseOrder>, diesel::result::Error> {
    use crate::schema::purchase_orders::dsl::*;

    let mut query = purchase_orders
        .filter(company_id.eq(target_company_id))
        .into_boxed();
    if let Some(target_supplier_id) = supplier {
        query = query.filter(supplier_id.eq(target_supplier_id));
    }
    query.order(id.asc()).load::<PurchaseOrder>(conn)
}

/// Sets `total_cost_cents` to the sum of the order's line totals and
/// returns the new total.
pub fn recompute_total(
    conn: &mut SqliteConnection,
    order_id: i32,
) -> Result<i64, diesel::result::Error> {
    use crate::schema::purchase_orders::dsl::*;

    let total: i64 = get_purchase_order_items(conn, order_id)?
        .iter()
        .map(PurchaseOrderItem::line_total_cents)
        .sum();

    diesel::update(purchase_orders.filter(id.eq(order_id)))
        .set(total_cost_cents.eq(total))
        .execute(conn)?;
    Ok(total)
}

pub fn update_status(
    conn: &mut SqliteConnection,
    order_id: i32,
    new_status: PurchaseOrderStatus,
) -> Result<PurchaseOrder, diesel::result::Error> {
    use crate::schema::purchase_orders::dsl::*;

    diesel::update(purchase_orders.filter(id.eq(order_id)))
        .set(status.eq(new_status.as_str()))
        .execute(conn)?;
    purchase_orders.filter(id.eq(order_id)).first::<PurchaseOrder>(conn)
}

/// Marks every line of the order as fully received.
pub fn mark_items_received(
    conn: &mut SqliteConnection,
    order_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::purchase_order_items::dsl::*;

    diesel::update(purchase_order_items.filter(purchase_order_id.eq(order_id)))
        .set(quantity_received.eq(quantity))
        .execute(conn)
}
