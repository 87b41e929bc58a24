use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "file-inventory")]
#[command(about = "Keeps a persistent inventory of every file under a directory", long_about = None)]
pub struct Cli {
    /// Mark records for paths not seen in this scan as deleted
    #[arg(short, long)]
    pub refresh: bool,

    /// Directory to scan (defaults to the configured root_path)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Inventory database file (defaults to <root>/<db_name>)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print record totals for the inventory
    Summary,
    /// List inventory records
    List {
        /// Only records with this extension
        #[arg(long)]
        ext: Option<String>,
        /// Only records marked deleted
        #[arg(long)]
        deleted: bool,
        #[arg(long, default_value_t = 100)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
    /// Print configuration values
    PrintConfig,
}
