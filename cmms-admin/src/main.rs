// cmms-admin/src/main.rs

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cmms_core::config::CmmsConfig;
use cmms_core::orm::establish_connection;
use tracing::error;

mod admin_cli;

use admin_cli::company_commands::{CompanyAction, handle_company_command_with_conn};
use admin_cli::job_commands::{JobAction, handle_job_command_with_conn};
use admin_cli::user_commands::{UserAction, handle_user_command_with_conn};
use admin_cli::utils::install_signal_handlers;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Parser)]
#[command(name = "cmms-admin")]
#[command(about = "Administration and scheduled jobs for the maintenance management system")]
#[command(version)]
struct Cli {
    /// Show extended version information
    #[arg(long, action = clap::ArgAction::SetTrue)]
    version_info: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run or inspect recurring jobs")]
    Jobs {
        #[command(subcommand)]
        action: JobAction,
    },
    #[command(about = "Manage companies")]
    Company {
        #[command(subcommand)]
        action: CompanyAction,
    },
    #[command(about = "Manage users")]
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version_info {
        println!("cmms-admin {}", built_info::PKG_VERSION);
        println!("Built: {}", built_info::BUILT_TIME_UTC);
        if let Some(commit) = built_info::GIT_COMMIT_HASH {
            println!("Git commit: {}", commit);
        }
        return ExitCode::SUCCESS;
    }

    let Some(command) = cli.command else {
        eprintln!("No command given. Run `cmms-admin --help` for usage.");
        return ExitCode::from(2);
    };

    cmms_core::logging::init();

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    let config = CmmsConfig::from_env()?;
    let mut conn = establish_connection(&config.database_url)?;

    match command {
        Commands::Jobs { action } => {
            let cancel = install_signal_handlers()?;
            handle_job_command_with_conn(&mut conn, &config, action, cancel)
        }
        Commands::Company { action } => handle_company_command_with_conn(&mut conn, action),
        Commands::User { action } => handle_user_command_with_conn(&mut conn, action),
    }
}
