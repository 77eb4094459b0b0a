pub mod company_commands;
pub mod job_commands;
pub mod user_commands;
pub mod utils;
