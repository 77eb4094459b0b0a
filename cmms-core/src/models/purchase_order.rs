use chrono::{NaiveDate, NaiveDateTime};
use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::schema::{purchase_order_items, purchase_orders};

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, Serialize, Deserialize)]
#[diesel(belongs_to(crate::models::supplier::Supplier))]
#[diesel(table_name = purchase_orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PurchaseOrder {
    pub id: i32,
    pub company_id: i32,
    pub supplier_id: i32,
    pub status: String,
    pub created_by: Option<i32>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub total_cost_cents: i64,
    pub created_at: NaiveDateTime,
}

impl PurchaseOrder {
    pub fn status(&self) -> Result<PurchaseOrderStatus, String> {
        self.status.parse()
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = purchase_orders)]
pub struct NewPurchaseOrder {
    pub company_id: i32,
    pub supplier_id: i32,
    pub status: String,
    pub created_by: Option<i32>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub total_cost_cents: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, Serialize, Deserialize)]
#[diesel(belongs_to(PurchaseOrder))]
#[diesel(table_name = purchase_order_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PurchaseOrderItem {
    pub id: i32,
    pub purchase_order_id: i32,
    pub spare_part_id: i32,
    pub quantity: i32,
    pub unit_cost_cents: i64,
    pub quantity_received: i32,
}

impl PurchaseOrderItem {
    pub fn line_total_cents(&self) -> i64 {
        i64::from(self.quantity) * self.unit_cost_cents
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = purchase_order_items)]
pub struct NewPurchaseOrderItem {
    pub purchase_order_id: i32,
    pub spare_part_id: i32,
    pub quantity: i32,
    pub unit_cost_cents: i64,
    pub quantity_received: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PurchaseOrderStatus {
    #[serde(rename = "draft")]
    Draft,
    #[serde(rename = "sent")]
    Sent,
    #[serde(rename = "received")]
    Received,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl std::str::FromStr for PurchaseOrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(PurchaseOrderStatus::Draft),
            "sent" => Ok(PurchaseOrderStatus::Sent),
            "received" => Ok(PurchaseOrderStatus::Received),
            "cancelled" => Ok(PurchaseOrderStatus::Cancelled),
            _ => Err(format!("Invalid purchase order status: {}", s)),
        }
    }
}

impl PurchaseOrderStatus {
    /// Statuses that mean a part is already on order.
    pub const PENDING: [PurchaseOrderStatus; 2] = [PurchaseOrderStatus::Draft, PurchaseOrderStatus::Sent];

    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Draft => "draft",
            PurchaseOrderStatus::Sent => "sent",
            PurchaseOrderStatus::Received => "received",
            PurchaseOrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(&self, next: PurchaseOrderStatus) -> bool {
        use PurchaseOrderStatus::*;
        matches!(
            (self, next),
            (Draft, Sent) | (Sent, Received) | (Draft, Cancelled) | (Sent, Cancelled)
        )
    }
}
