pub mod company;
pub mod entity_activity;
pub mod job_lock;
pub mod machine;
pub mod notification;
pub mod preventive_task;
pub mod purchase_order;
pub mod spare_part;
pub mod supplier;
pub mod technician_availability;
pub mod user;
pub mod work_order;

// Re-export models for easier access
pub use company::*;
pub use entity_activity::*;
pub use job_lock::*;
pub use machine::*;
pub use notification::*;
pub use preventive_task::*;
pub use purchase_order::*;
pub use spare_part::*;
pub use supplier::*;
pub use technician_availability::*;
pub use user::*;
pub use work_order::*;
