//! Core of the maintenance management system: tenant-scoped authorization,
//! persistence, work order and purchase order lifecycles, and the recurring
//! jobs that generate preventive work orders and low-stock purchase orders.

pub mod clock;
pub mod config;
pub mod error;
pub mod jobs;
pub mod lifecycle;
pub mod logging;
pub mod models;
pub mod orm;
pub mod policy;
pub mod schema;
pub mod tenant;

pub use error::{Error, Result};
pub use orm::MIGRATIONS;
