use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use clap::Subcommand;
use diesel::sqlite::SqliteConnection;

use cmms_core::config::CmmsConfig;
use cmms_core::jobs::{
    DatabaseNotifier, JobControl, LOW_STOCK_JOB, LowStockOptions, OVERDUE_JOB, PREVENTIVE_JOB,
    PreventiveOptions, generate_low_stock_purchase_orders, generate_preventive_work_orders,
    notify_overdue_tasks, with_job_lock,
};
use cmms_core::orm::job_lock::{force_release_lock, list_locks};

use super::utils::{job_clock, resolve_optional_company};

#[derive(Subcommand)]
pub enum JobAction {
    #[command(about = "Create work orders for preventive tasks that are coming due")]
    GeneratePreventive {
        #[arg(long, help = "Look-ahead window in days (default from CMMS_DAYS_AHEAD)")]
        days_ahead: Option<i64>,
        #[arg(long, help = "Only this company (ID or name)")]
        company: Option<String>,
        #[arg(long, help = "Assignee for unassigned tasks (default from CMMS_SYSTEM_USER_ID)")]
        system_user_id: Option<i32>,
        #[arg(long, help = "Run as if it were this date or time (UTC)")]
        as_of: Option<String>,
    },
    #[command(about = "Draft purchase orders for spare parts below their reorder point")]
    GenerateLowStock {
        #[arg(long, help = "Only this company (ID or name)")]
        company: Option<String>,
        #[arg(long, help = "Run as if it were this date or time (UTC)")]
        as_of: Option<String>,
    },
    #[command(about = "Remind assignees and managers about overdue preventive tasks")]
    NotifyOverdue {
        #[arg(long, help = "Only this company (ID or name)")]
        company: Option<String>,
        #[arg(long, help = "Run as if it were this date or time (UTC)")]
        as_of: Option<String>,
    },
    #[command(about = "List held job locks")]
    Locks,
    #[command(about = "Release a job lock left behind by a crashed run")]
    Unlock {
        #[arg(help = "Job name, e.g. generate-preventive")]
        name: String,
    },
}

pub fn handle_job_command_with_conn(
    conn: &mut SqliteConnection,
    config: &CmmsConfig,
    action: JobAction,
    cancel: Arc<AtomicBool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let control = JobControl::new(cancel, config.job_max_runtime);

    match action {
        JobAction::GeneratePreventive {
            days_ahead,
            company,
            system_user_id,
            as_of,
        } => {
            let clock = job_clock(as_of.as_deref())?;
            let options = PreventiveOptions {
                days_ahead: days_ahead.unwrap_or(config.days_ahead),
                company_id: resolve_optional_company(conn, company.as_deref())?,
                system_user_id: system_user_id.or(config.system_user_id),
            };
            let summary = with_job_lock(conn, &clock, PREVENTIVE_JOB, config.job_lock_stale_after, |conn| {
                generate_preventive_work_orders(conn, &clock, &options, &control)
            })?;
            println!(
                "Preventive work orders: generated={}, skipped={}, failed={}",
                summary.generated, summary.skipped, summary.failed
            );
        }
        JobAction::GenerateLowStock { company, as_of } => {
            let clock = job_clock(as_of.as_deref())?;
            let options = LowStockOptions {
                company_id: resolve_optional_company(conn, company.as_deref())?,
                ..LowStockOptions::from_config(config)
            };
            let summary = with_job_lock(conn, &clock, LOW_STOCK_JOB, config.job_lock_stale_after, |conn| {
                generate_low_stock_purchase_orders(conn, &clock, &options, &mut DatabaseNotifier, &control)
            })?;
            println!(
                "Purchase orders: created={}, parts_ordered={}, groups_skipped={}, groups_failed={}, companies_failed={}, notifications_sent={}{}",
                summary.orders_created,
                summary.parts_ordered,
                summary.groups_skipped,
                summary.groups_failed,
                summary.companies_failed,
                summary.notifications_sent,
                if summary.interrupted { " (interrupted)" } else { "" }
            );
        }
        JobAction::NotifyOverdue { company, as_of } => {
            let clock = job_clock(as_of.as_deref())?;
            let company_id = resolve_optional_company(conn, company.as_deref())?;
            let summary = with_job_lock(conn, &clock, OVERDUE_JOB, config.job_lock_stale_after, |conn| {
                notify_overdue_tasks(conn, &clock, company_id, &mut DatabaseNotifier, &control)
            })?;
            println!(
                "Overdue reminders: sent={}, already_sent={}, failed={}{}",
                summary.sent,
                summary.already_sent,
                summary.failed,
                if summary.interrupted { " (interrupted)" } else { "" }
            );
        }
        JobAction::Locks => {
            let locks = list_locks(conn)?;
            if locks.is_empty() {
                println!("No job locks held.");
            } else {
                println!("Job locks:");
                for lock in locks {
                    println!("  Job: {}, Owner: {}, Since: {}", lock.job_name, lock.owner, lock.acquired_at);
                }
            }
        }
        JobAction::Unlock { name } => {
            if force_release_lock(conn, &name)? {
                println!("Released lock for job '{}'.", name);
            } else {
                println!("No lock held for job '{}'.", name);
            }
        }
    }
    Ok(())
}
