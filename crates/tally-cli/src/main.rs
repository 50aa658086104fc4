//! Tally CLI - Personal expense tracker
//!
//! Usage:
//!   tally init                          Initialize the data directory
//!   tally add -a 12.50 -c Food -d Lunch Record an expense
//!   tally list --search lunch           Filter and search expenses
//!   tally dashboard                     Totals and breakdowns
//!   tally export --format csv           Export expenses (accepts list filters)

mod cli;
mod commands;


use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let config = commands::load_config(
        cli.data_dir.as_deref(),
        cli.config.as_deref(),
        cli.backend.as_deref(),
    )?;

    match cli.command {
        Commands::Init => commands::cmd_init(&config),
        Commands::Add {
            amount,
            category,
            description,
            payment,
            date,
        } => {
            let mut store = commands::open_store(&config)?;
            commands::cmd_add(
                &mut store,
                amount,
                &category,
                &description,
                &payment,
                date.as_deref(),
            )
        }
        Commands::Edit {
            id,
            amount,
            category,
            description,
            payment,
            date,
        } => {
            let mut store = commands::open_store(&config)?;
            commands::cmd_edit(
                &mut store,
                &id,
                amount,
                category.as_deref(),
                description.as_deref(),
                payment.as_deref(),
                date.as_deref(),
            )
        }
        Commands::Delete { id } => {
            let mut store = commands::open_store(&config)?;
            commands::cmd_delete(&mut store, &id)
        }
        Commands::List { filter, limit } => {
            let store = commands::open_store(&config)?;
            commands::cmd_list(&store, &filter.to_filter()?, limit).map(drop)
        }
        Commands::Dashboard { json } => {
            let store = commands::open_store(&config)?;
            commands::cmd_dashboard(&store, Local::now().date_naive(), config.bucket_order, json)
                .map(drop)
        }
        Commands::Report { report_type } => {
            let store = commands::open_store(&config)?;
            match report_type {
                ReportType::Monthly => {
                    commands::cmd_report_monthly(&store, config.bucket_order).map(drop)
                }
                ReportType::Categories => {
                    commands::cmd_report_categories(&store, config.bucket_order).map(drop)
                }
                ReportType::Month { year, month } => {
                    commands::cmd_report_month(&store, year, month).map(drop)
                }
            }
        }
        Commands::Export {
            format,
            output,
            filter,
        } => {
            let store = commands::open_store(&config)?;
            commands::cmd_export(&store, &filter.to_filter()?, &format, output.as_deref())
                .map(drop)
        }
        Commands::Login { email, password } => {
            let session = commands::open_session(&config)?;
            commands::cmd_login(&session, &email, &password)
        }
        Commands::Signup {
            email,
            password,
            confirm_password,
        } => {
            let session = commands::open_session(&config)?;
            commands::cmd_signup(&session, &email, &password, &confirm_password)
        }
        Commands::Logout => {
            let session = commands::open_session(&config)?;
            commands::cmd_logout(&session)
        }
        Commands::Whoami => {
            let session = commands::open_session(&config)?;
            commands::cmd_whoami(&session)
        }
        Commands::Categories => {
            let store = commands::open_store(&config)?;
            commands::cmd_categories(&store).map(drop)
        }
    }
}
