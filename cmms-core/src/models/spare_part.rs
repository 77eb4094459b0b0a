use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::schema::{spare_parts, stock_levels};

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = spare_parts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SparePart {
    pub id: i32,
    pub company_id: i32,
    pub supplier_id: Option<i32>,
    pub part_number: String,
    pub name: String,
    pub reorder_point: i32,
    pub reorder_quantity: i32,
    pub unit_cost_cents: i64,
    pub lead_time_days: Option<i32>,
    pub is_active: bool,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = spare_parts)]
pub struct NewSparePart {
    pub company_id: i32,
    pub supplier_id: Option<i32>,
    pub part_number: String,
    pub name: String,
    pub reorder_point: i32,
    pub reorder_quantity: i32,
    pub unit_cost_cents: i64,
    pub lead_time_days: Option<i32>,
    pub is_active: bool,
}

/// Quantity of one part held at one location.
#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, Serialize, Deserialize)]
#[diesel(belongs_to(SparePart))]
#[diesel(table_name = stock_levels)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StockLevel {
    pub id: i32,
    pub spare_part_id: i32,
    pub location: Option<String>,
    pub quantity_on_hand: i32,
    pub quantity_reserved: i32,
}

impl StockLevel {
    /// Unreserved quantity at this location, never negative.
    pub fn available(&self) -> i64 {
        (i64::from(self.quantity_on_hand) - i64::from(self.quantity_reserved)).max(0)
    }
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = stock_levels)]
pub struct NewStockLevel {
    pub spare_part_id: i32,
    pub location: Option<String>,
    pub quantity_on_hand: i32,
    pub quantity_reserved: i32,
}
