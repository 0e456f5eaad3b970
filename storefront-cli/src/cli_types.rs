//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use storefront_catalog::Field;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Browse and query the graphics card catalog", long_about = None)]
pub(crate) struct Cli {
    /// Path to the catalog database file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// YAML product list to seed the catalog with instead of the built-in one
    #[arg(long, global = true)]
    pub seed: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Open, migrate, and seed the catalog, then report its state
    Init,

    /// List every product by name
    List,

    /// Filter, search, and sort the catalog
    Query(QueryArgs),

    /// Show the distinct values of a field
    Values {
        /// Field to inspect (e.g., vendor, memory, color)
        field: Field,
    },

    /// Show the lowest and highest value of a field
    Bounds {
        /// Field to inspect (e.g., price, stock, date)
        field: Field,
    },

    /// Show the schema version, field types, and indexes
    Schema,

    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },

    /// Manage saved filters, sort, and search
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },

    /// Show settings file information
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for the `query` command.
#[derive(Args, Clone, Default)]
pub(crate) struct QueryArgs {
    /// Accepted values for a field, e.g. vendor=Palit,MSI (repeatable)
    #[arg(short, long = "filter", value_name = "FIELD=VALUES")]
    pub filters: Vec<String>,

    /// Inclusive range for a field, e.g. price=1000..50000 (repeatable)
    #[arg(short, long = "range", value_name = "FIELD=MIN..MAX")]
    pub ranges: Vec<String>,

    /// Field to sort by
    #[arg(long)]
    pub sort: Option<Field>,

    /// Sort in descending order
    #[arg(long)]
    pub desc: bool,

    /// Case-insensitive name search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Start from the saved filters, sort, and search
    #[arg(long)]
    pub saved: bool,

    /// Save the resulting filters, sort, and search
    #[arg(long)]
    pub save: bool,
}

#[derive(Subcommand)]
pub(crate) enum CartAction {
    /// Show cart contents and totals
    Show,

    /// Add one unit of a product
    Add {
        /// Product name
        name: String,
    },

    /// Remove one unit of a product
    Remove {
        /// Product name
        name: String,
    },

    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
pub(crate) enum PrefsAction {
    /// Show the saved filters, sort, and search
    Show,

    /// Forget saved filters, sort, search, and cart
    Reset,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current settings and resolved paths
    Show,

    /// Print the settings file path
    Path,
}
