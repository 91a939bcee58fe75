//! Command-line surface.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use enforcelog_core::YearMonth;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "enforcelog", version, about = "Field enforcement activity log")]
pub struct Cli {
    /// Path to `enforcelog.toml`.
    #[arg(long, global = true, env = "ENFORCELOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Record store file; overrides `store.path`.
    #[arg(long, global = true, env = "ENFORCELOG_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List categories and their activities.
    Taxonomy,
    /// List enforcers on the roster.
    Roster,
    /// Record or review an enforcer's entries.
    Entry {
        #[command(subcommand)]
        action: EntryCommands,
    },
    /// Manager reports across enforcers.
    Report {
        #[command(subcommand)]
        action: ReportCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum EntryCommands {
    /// Save one row per activity for the given day.
    Save(SaveArgs),
    /// Show the rows an enforcer has submitted.
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct SaveArgs {
    #[arg(long)]
    pub enforcer: String,
    /// Activity date; defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// `ACTIVITY=QTY` or `ACTIVITY=QTY:REMARK`; repeatable.
    #[arg(long = "set", value_name = "ACTIVITY=QTY[:REMARK]")]
    pub values: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(long)]
    pub enforcer: String,
    /// Write the rows to this CSV file instead of printing them.
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum ReportCommands {
    /// Date-range report.
    Daily(DailyArgs),
    /// Month-selection report.
    Monthly(MonthlyArgs),
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Restrict to these enforcers; repeatable. Defaults to the whole roster.
    #[arg(long = "enforcer")]
    pub enforcers: Vec<String>,
    /// Write the filtered rows to this CSV file.
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DailyArgs {
    #[arg(long)]
    pub from: Option<NaiveDate>,
    #[arg(long)]
    pub to: Option<NaiveDate>,
    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Debug, Args)]
pub struct MonthlyArgs {
    /// `YYYY-MM`; repeatable. Defaults to every month with data.
    #[arg(long = "month")]
    pub months: Vec<YearMonth>,
    #[command(flatten)]
    pub filter: FilterArgs,
}
