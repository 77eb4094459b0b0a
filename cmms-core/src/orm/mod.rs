pub mod company;
mod db;
pub mod entity_activity;
pub mod job_lock;
pub mod machine;
pub mod notification;
pub mod preventive_task;
pub mod purchase_order;
pub mod spare_part;
pub mod supplier;
pub mod technician_availability;
#[cfg(test)]
pub mod testing;
pub mod user;
pub mod work_order;

pub use db::*;
