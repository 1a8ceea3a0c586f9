use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "listsync")]
#[command(about = "Browse a remote record list, cached locally and grouped by list")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Remote endpoint serving the record list as JSON
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Optional path to the JSON config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Follow the home screen live, refreshing periodically
    Watch {
        /// Seconds between periodic refreshes
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
    },
    /// Print the cached records without touching the network
    List {
        /// Only show records of this group
        #[arg(long, value_name = "ID")]
        group: Option<i64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch the remote list once and merge it into the cache
    Refresh,
    /// Show or set the stored layout
    Layout {
        #[arg(value_enum)]
        mode: Option<LayoutMode>,
    },
    /// Remove every cached record
    Clear,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum LayoutMode {
    List,
    Grid,
}

impl LayoutMode {
    pub const fn from_list_mode(is_list_mode: bool) -> Self {
        if is_list_mode {
            Self::List
        } else {
            Self::Grid
        }
    }

    pub const fn is_list_mode(self) -> bool {
        matches!(self, Self::List)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Grid => "grid",
        }
    }
}
