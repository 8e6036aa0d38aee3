use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use storage::models::{CompetitionCategory, ProductCategory, parse_label};

#[derive(Parser)]
#[command(name = "reppi-admin")]
#[command(about = "Manage Reppi competitions, enrollments and inventory", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the stored collections (overrides REPPI_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Competition and inventory dashboard numbers
    Stats,
    #[command(subcommand)]
    Competitions(CompetitionCommand),
    /// Enroll a user into a competition division
    Enroll {
        #[arg(long)]
        user: String,

        #[arg(long)]
        competition: String,

        #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
        division: i64,

        #[arg(long = "box")]
        box_name: String,
    },
    /// Search registered users by name or email
    Users {
        #[arg(long, default_value = "")]
        search: String,

        /// Only users enrolled in this competition
        #[arg(long)]
        competition: Option<String>,

        #[arg(long, requires = "competition")]
        division: Option<u32>,
    },
    /// Athletes enrolled in a competition
    Athletes {
        competition: String,

        #[arg(long)]
        division: Option<u32>,
    },
    #[command(subcommand)]
    Products(ProductCommand),
    /// Overwrite stored data with the seed
    Reset {
        #[arg(value_enum, default_value_t = CollectionArg::All)]
        collection: CollectionArg,
    },
}

#[derive(Subcommand)]
pub enum CompetitionCommand {
    List {
        #[command(flatten)]
        page: PageArgs,

        #[arg(long)]
        search: Option<String>,

        #[arg(long, value_parser = parse_competition_category)]
        category: Option<CompetitionCategory>,
    },
    Show {
        id: String,
    },
    /// Add a competition from a JSON form file
    Add {
        #[arg(long)]
        form: PathBuf,
    },
    Delete {
        id: String,
    },
    /// Replace divisions from a JSON array file
    Divisions {
        id: String,

        #[arg(long)]
        file: PathBuf,
    },
    /// Append a default division
    AddDivision {
        id: String,
    },
    /// Remove the division at a 1-based position and renumber the rest
    RemoveDivision {
        id: String,

        position: usize,
    },
}

#[derive(Subcommand)]
pub enum ProductCommand {
    List {
        #[command(flatten)]
        page: PageArgs,

        #[arg(long)]
        search: Option<String>,

        #[arg(long, value_parser = parse_product_category)]
        category: Option<ProductCategory>,
    },
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        sku: String,

        #[arg(long, value_parser = parse_product_category)]
        category: ProductCategory,

        #[arg(long)]
        price: String,

        #[arg(long)]
        quantity: String,

        #[arg(long, default_value = "")]
        low_stock_threshold: String,
    },
    Delete {
        id: String,
    },
    /// Add to (or subtract from) the stock count
    Adjust {
        id: String,

        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    Set {
        id: String,

        quantity: i64,
    },
}

#[derive(clap::Args, Debug, Clone, Copy)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long, default_value_t = storage::dto::common::DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CollectionArg {
    Competitions,
    Products,
    Athletes,
    All,
}

fn parse_competition_category(value: &str) -> Result<CompetitionCategory, String> {
    parse_label(value).ok_or_else(|| format!("unknown competition category '{}'", value))
}

fn parse_product_category(value: &str) -> Result<ProductCategory, String> {
    parse_label(value).ok_or_else(|| format!("unknown product category '{}'", value))
}
