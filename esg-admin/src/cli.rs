//! Command-line interface definition

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// ESG assignment administration console
///
/// Operates on an in-memory sample dataset generated per invocation; use
/// `--seed` for reproducible runs.
#[derive(Debug, Parser)]
#[command(name = "esg-admin", version, about)]
pub struct Cli {
    /// Data folder for CSV exports (overrides env and config file)
    #[arg(long, global = true, env = "ESG_ADMIN_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Seed for sample data generation
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Emit JSON instead of text output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export all assignments to CSV
    Export {
        /// Output file (defaults to esg-assignments-<date>.csv in the data folder)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Import assignments from a CSV file
    Import {
        /// CSV file with User ID, Site ID, and Metric ID columns
        file: PathBuf,
    },

    /// Render the site × metric assignment matrix
    Matrix {
        /// Site selection: id, quick-filter name, or search term (repeatable)
        #[arg(long = "site", required = true)]
        sites: Vec<String>,

        /// Metric selection: id, category, or search term (repeatable)
        #[arg(long = "metric", required = true)]
        metrics: Vec<String>,
    },

    /// Search sites, metrics, or users by free text
    Search {
        #[arg(value_enum)]
        kind: SearchKind,
        term: String,
    },

    /// Paginated assignment review listing
    List {
        #[arg(long, default_value_t = 1)]
        page: i64,

        /// Filter by assigned user name or email
        #[arg(long)]
        user: Option<String>,

        /// Filter by site id (repeatable)
        #[arg(long = "site")]
        sites: Vec<String>,

        /// Filter by metric id (repeatable)
        #[arg(long = "metric")]
        metrics: Vec<String>,
    },

    /// Assign a user to one site × metric pair
    Assign {
        #[arg(long)]
        user: String,
        #[arg(long)]
        site: String,
        #[arg(long)]
        metric: String,
    },

    /// Remove a single assignment by id
    Unassign { assignment_id: String },

    /// Assign users to every pair in a site × metric product
    BulkAssign {
        #[arg(long = "user", required = true)]
        users: Vec<String>,
        #[arg(long = "site", required = true)]
        sites: Vec<String>,
        #[arg(long = "metric", required = true)]
        metrics: Vec<String>,
    },

    /// Remove every assignment in a site × metric product (destructive)
    BulkRemove {
        #[arg(long = "site", required = true)]
        sites: Vec<String>,
        #[arg(long = "metric", required = true)]
        metrics: Vec<String>,

        /// Skip the interactive confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Summary statistics over the dataset
    Stats,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SearchKind {
    Sites,
    Metrics,
    Users,
}
