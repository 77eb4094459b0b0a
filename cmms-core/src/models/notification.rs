use chrono::{NaiveDate, NaiveDateTime};
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::schema::notifications;

/// A delivered alert. The `(kind, subject_id, recipient_id, notified_on)`
/// key is unique, so the row doubles as the marker that an alert for that
/// subject already went out today.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Notification {
    pub id: i32,
    pub company_id: i32,
    pub recipient_id: i32,
    pub kind: String,
    pub subject_id: i32,
    pub payload: String,
    pub notified_on: NaiveDate,
    pub created_at: NaiveDateTime,
    pub read_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub company_id: i32,
    pub recipient_id: i32,
    pub kind: String,
    pub subject_id: i32,
    pub payload: String,
    pub notified_on: NaiveDate,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    #[serde(rename = "purchase_order_generated")]
    PurchaseOrderGenerated,
    #[serde(rename = "preventive_task_overdue")]
    PreventiveTaskOverdue,
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "purchase_order_generated" => Ok(NotificationKind::PurchaseOrderGenerated),
            "preventive_task_overdue" => Ok(NotificationKind::PreventiveTaskOverdue),
            _ => Err(format!("Invalid notification kind: {}", s)),
        }
    }
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::PurchaseOrderGenerated => "purchase_order_generated",
            NotificationKind::PreventiveTaskOverdue => "preventive_task_overdue",
        }
    }
}
