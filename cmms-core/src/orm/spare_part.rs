use std::collections::{HashMap, HashSet};

use diesel::prelude::*;

use super::db::last_insert_id;
use crate::models::{NewSparePart, NewStockLevel, PurchaseOrderStatus, SparePart, StockLevel, Supplier};

pub fn insert_spare_part(
    conn: &mut SqliteConnection,
    new_part: NewSparePart,
) -> Result<SparePart, diesel::result::Error> {
    use crate::schema::spare_parts::dsl::*;

    diesel::insert_into(spare_parts).values(&new_part).execute(conn)?;

    let last_id = last_insert_id(conn)?;
    spare_parts.filter(id.eq(last_id)).first::<SparePart>(conn)
}

pub fn insert_stock_level(
    conn: &mut SqliteConnection,
    new_stock: NewStockLevel,
) -> Result<StockLevel, diesel::result::Error> {
    use crate::schema::stock_levels::dsl::*;

    diesel::insert_into(stock_levels).values(&new_stock).execute(conn)?;

    let last_id = last_insert_id(conn)?;
    stock_levels.filter(id.eq(last_id)).first::<StockLevel>(conn)
}

/// Active parts of a company that take part in automatic reordering: a
/// positive reorder point and reorder quantity. Each part comes with its
/// linked supplier row, if any, so the caller can reject suppliers of
/// another company. Parts without a supplier are included so the caller
/// can report them. Ordered by id.
pub fn get_reorderable_parts(
    conn: &mut SqliteConnection,
    target_company_id: i32,
) -> Result<Vec<(SparePart, Option<Supplier>)>, diesel::result::Error> {
    use crate::schema::{spare_parts, suppliers};

    spare_parts::table
        .left_join(suppliers::table)
        .filter(spare_parts::company_id.eq(target_company_id))
        .filter(spare_parts::is_active.eq(true))
        .filter(spare_parts::reorder_point.gt(0))
        .filter(spare_parts::reorder_quantity.gt(0))
        .order(spare_parts::id.asc())
        .select((SparePart::as_select(), Option::<Supplier>::as_select()))
        .load::<(SparePart, Option<Supplier>)>(conn)
}

/// Unreserved stock per part, summed over locations. Each location
/// contributes at least zero, so over-reservation at one location never
/// hides stock held at another. Parts without stock rows map to 0.
pub fn get_available_quantities(
    conn: &mut SqliteConnection,
    part_ids: &[i32],
) -> Result<HashMap<i32, i64>, diesel::result::Error> {
    use crate::schema::stock_levels::dsl::*;

    let rows = stock_levels
        .filter(spare_part_id.eq_any(part_ids))
        .load::<StockLevel>(conn)?;

    let mut available: HashMap<i32, i64> = part_ids.iter().map(|part| (*part, 0)).collect();
    for row in rows {
        *available.entry(row.spare_part_id).or_insert(0) += row.available();
    }
    Ok(available)
}

/// Parts among `part_ids` that already appear on a draft or sent purchase
/// order.
pub fn get_parts_on_pending_orders(
    conn: &mut SqliteConnection,
    part_ids: &[i32],
) -> Result<HashSet<i32>, diesel::result::Error> {
    use crate::schema::{purchase_order_items, purchase_orders};

    let pending: Vec<&str> = PurchaseOrderStatus::PENDING.iter().map(|s| s.as_str()).collect();
    let ids = purchase_order_items::table
        .inner_join(purchase_orders::table)
        .filter(purchase_orders::status.eq_any(pending))
        .filter(purchase_order_items::spare_part_id.eq_any(part_ids))
        .select(purchase_order_items::spare_part_id)
        .distinct()
        .load::<i32>(conn)?;
    Ok(ids.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::*;

    #[test]
    fn test_available_is_clamped_per_location() {
        let mut conn = setup_test_db();
        let company = create_company(&mut conn, "Acme");
        let supplier = create_supplier(&mut conn, company.id, "Bearings Inc");
        let part = create_part(&mut conn, company.id, Some(supplier.id), "B-1", 50, 100, 250, None);
        let bare = create_part(&mut conn, company.id, Some(supplier.id), "B-2", 5, 10, 100, None);
        add_stock(&mut conn, part.id, 10, 5);
        add_stock(&mut conn, part.id, 2, 9);
        add_stock(&mut conn, part.id, 7, 0);

        let available = get_available_quantities(&mut conn, &[part.id, bare.id]).unwrap();
        assert_eq!(available[&part.id], 12);
        assert_eq!(available[&bare.id], 0);
    }

    #[test]
    fn test_reorderable_parts_exclude_inactive_and_unconfigured() {
        let mut conn = setup_test_db();
        let company = create_company(&mut conn, "Acme");
        let supplier = create_supplier(&mut conn, company.id, "Bearings Inc");
        let kept = create_part(&mut conn, company.id, Some(supplier.id), "K-1", 5, 10, 100, None);
        let orphan = create_part(&mut conn, company.id, None, "K-2", 5, 10, 100, None);
        create_part(&mut conn, company.id, Some(supplier.id), "K-3", 0, 10, 100, None);
        create_part(&mut conn, company.id, Some(supplier.id), "K-4", 5, 0, 100, None);
        let inactive = create_part(&mut conn, company.id, Some(supplier.id), "K-5", 5, 10, 100, None);
        diesel::update(crate::schema::spare_parts::table.find(inactive.id))
            .set(crate::schema::spare_parts::is_active.eq(false))
            .execute(&mut conn)
            .unwrap();

        let ids: Vec<i32> = get_reorderable_parts(&mut conn, company.id)
            .unwrap()
            .iter()
            .map(|(p, _)| p.id)
            .collect();
        assert_eq!(ids, vec![kept.id, orphan.id]);
    }

    #[test]
    fn test_reorderable_parts_carry_their_supplier() {
        let mut conn = setup_test_db();
        let acme = create_company(&mut conn, "Acme");
        let other = create_company(&mut conn, "Other");
        let own = create_supplier(&mut conn, acme.id, "Bearings Inc");
        let foreign = create_supplier(&mut conn, other.id, "Elsewhere Ltd");
        create_part(&mut conn, acme.id, Some(own.id), "S-1", 5, 10, 100, None);
        create_part(&mut conn, acme.id, Some(foreign.id), "S-2", 5, 10, 100, None);
        create_part(&mut conn, acme.id, None, "S-3", 5, 10, 100, None);

        let suppliers: Vec<Option<i32>> = get_reorderable_parts(&mut conn, acme.id)
            .unwrap()
            .into_iter()
            .map(|(_, supplier)| supplier.map(|s| s.company_id))
            .collect();
        assert_eq!(suppliers, vec![Some(acme.id), Some(other.id), None]);
    }

    #[test]
    fn test_lead_time_out_of_range_rejected() {
        let mut conn = setup_test_db();
        let company = create_company(&mut conn, "Acme");
        let result = insert_spare_part(
            &mut conn,
            NewSparePart {
                company_id: company.id,
                supplier_id: None,
                part_number: "L-1".to_string(),
                name: "Slow part".to_string(),
                reorder_point: 5,
                reorder_quantity: 10,
                unit_cost_cents: 100,
                lead_time_days: Some(200_000_000),
                is_active: true,
            },
        );
        assert!(result.is_err());
    }
}
