use chrono::NaiveDateTime;
use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::schema::work_orders;

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, Serialize, Deserialize)]
#[diesel(belongs_to(crate::models::machine::Machine))]
#[diesel(belongs_to(crate::models::preventive_task::PreventiveTask))]
#[diesel(table_name = work_orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WorkOrder {
    pub id: i32,
    pub company_id: i32,
    pub machine_id: i32,
    pub preventive_task_id: Option<i32>,
    pub work_order_type: String,
    pub status: String,
    pub title: String,
    pub description: Option<String>,
    pub created_by: Option<i32>,
    pub assigned_to: Option<i32>,
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

impl WorkOrder {
    pub fn status(&self) -> Result<WorkOrderStatus, String> {
        self.status.parse()
    }

    pub fn work_order_type(&self) -> Result<WorkOrderType, String> {
        self.work_order_type.parse()
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = work_orders)]
pub struct NewWorkOrder {
    pub company_id: i32,
    pub machine_id: i32,
    pub preventive_task_id: Option<i32>,
    pub work_order_type: String,
    pub status: String,
    pub title: String,
    pub description: Option<String>,
    pub created_by: Option<i32>,
    pub assigned_to: Option<i32>,
    pub created_at: NaiveDateTime,
}

/// Caller-supplied fields for a manually created work order. Tenant,
/// creator, status and timestamps are filled in by the lifecycle layer.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct WorkOrderInput {
    pub machine_id: i32,
    pub work_order_type: WorkOrderType,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkOrderStatus {
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "in_progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl std::str::FromStr for WorkOrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(WorkOrderStatus::Open),
            "in_progress" => Ok(WorkOrderStatus::InProgress),
            "completed" => Ok(WorkOrderStatus::Completed),
            "cancelled" => Ok(WorkOrderStatus::Cancelled),
            _ => Err(format!("Invalid work order status: {}", s)),
        }
    }
}

impl WorkOrderStatus {
    /// Statuses that block generating another work order for the same task.
    pub const UNRESOLVED: [WorkOrderStatus; 2] = [WorkOrderStatus::Open, WorkOrderStatus::InProgress];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderStatus::Open => "open",
            WorkOrderStatus::InProgress => "in_progress",
            WorkOrderStatus::Completed => "completed",
            WorkOrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkOrderStatus::Completed | WorkOrderStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: WorkOrderStatus) -> bool {
        use WorkOrderStatus::*;
        matches!(
            (self, next),
            (Open, InProgress) | (Open, Completed) | (Open, Cancelled) | (InProgress, Completed) | (InProgress, Cancelled)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkOrderType {
    #[serde(rename = "preventive")]
    Preventive,
    #[serde(rename = "breakdown")]
    Breakdown,
    #[serde(rename = "corrective")]
    Corrective,
    #[serde(rename = "improvement")]
    Improvement,
}

impl std::str::FromStr for WorkOrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preventive" => Ok(WorkOrderType::Preventive),
            "breakdown" => Ok(WorkOrderType::Breakdown),
            "corrective" => Ok(WorkOrderType::Corrective),
            "improvement" => Ok(WorkOrderType::Improvement),
            _ => Err(format!("Invalid work order type: {}", s)),
        }
    }
}

impl WorkOrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderType::Preventive => "preventive",
            WorkOrderType::Breakdown => "breakdown",
            WorkOrderType::Corrective => "corrective",
            WorkOrderType::Improvement => "improvement",
        }
    }
}
