//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tally - Personal expense tracker
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Local personal expense tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory (defaults to the platform's local data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file (defaults to <data-dir>/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage backend override: sqlite, json, memory
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the data directory and storage
    Init,

    /// Record a new expense
    Add {
        /// Amount spent (must be positive)
        #[arg(short, long)]
        amount: f64,

        /// Category (e.g. "Food & Dining"); see `tally categories`
        #[arg(short, long)]
        category: String,

        /// What the money was spent on
        #[arg(short, long)]
        description: String,

        /// Payment method (e.g. "Credit Card")
        #[arg(short, long, default_value = "Cash")]
        payment: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Change fields of an existing expense
    Edit {
        /// Expense ID
        id: String,

        #[arg(short, long)]
        amount: Option<f64>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        payment: Option<String>,

        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: String,
    },

    /// List expenses, newest first
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Maximum rows to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Show the dashboard summary
    Dashboard {
        /// Print the figures as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Export expenses to CSV or JSON
    Export {
        /// Format: csv or json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Sign in (mock: any email with the password "password")
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Create a local account and sign in
    Signup {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        confirm_password: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List known categories and payment methods
    Categories,
}

/// Filter flags shared by `list` and `export`
#[derive(Args)]
pub struct FilterArgs {
    /// Start date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub to: Option<String>,

    /// Only this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Only this payment method
    #[arg(short, long)]
    pub payment: Option<String>,

    /// Case-insensitive match on description or category
    #[arg(short, long)]
    pub search: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> anyhow::Result<tally_core::ExpenseFilter> {
        crate::commands::build_filter(
            self.from.as_deref(),
            self.to.as_deref(),
            self.category.as_deref(),
            self.payment.as_deref(),
            self.search.as_deref(),
        )
    }
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Totals per month
    Monthly,

    /// Totals per category
    Categories,

    /// Total for a single month
    Month {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Month number 1-12 (defaults to the current month)
        #[arg(long)]
        month: Option<u32>,
    },
}
