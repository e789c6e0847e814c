//! Marketplace CLI - vendor store management and BOQ analysis.
//!
//! # Usage
//!
//! ```bash
//! # Register a vendor (and log in)
//! MKT_PASSWORD=secret1 mkt vendor register -n "Ada" -e ada@shop.example -s "Ada's Lamps"
//!
//! # List a product
//! mkt product add -n "Desk Lamp" -d "Warm LED light" -p 19.99 -c "Home & Garden" --stock 4
//!
//! # Browse the marketplace
//! mkt market search --term lamp
//!
//! # Submit drawings for analysis
//! mkt boq analyze -i "Two-storey house" -f plan.pdf
//! ```
//!
//! # Commands
//!
//! - `vendor` - Register, log in and out, edit the profile
//! - `product` - Manage the logged-in vendor's products
//! - `market` - Browse every vendor's products
//! - `dashboard` - Summary figures for the logged-in vendor
//! - `boq` - BOQ analysis submissions
//! - `store` - Store health check and repair
//!
//! # Environment Variables
//!
//! - `MARKETPLACE_DATA_DIR` - Store directory (default: `.marketplace`)
//! - `MARKETPLACE_LOG_FORMAT` - `json` for JSON log lines on stderr
//! - `RUST_LOG` - Log filter (default: `info`)

#![cfg_attr(not(test), forbid(unsafe_code))]
// stdout is this binary's output channel; logs go to stderr.
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marketplace_core::Category;

mod commands;

#[derive(Parser)]
#[command(name = "mkt")]
#[command(author, version, about = "Marketplace vendor store and BOQ analysis tools")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Vendor accounts
    Vendor {
        #[command(subcommand)]
        action: VendorAction,
    },
    /// The logged-in vendor's products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Browse the marketplace
    Market {
        #[command(subcommand)]
        action: MarketAction,
    },
    /// Show the logged-in vendor's dashboard
    Dashboard,
    /// BOQ analysis
    Boq {
        #[command(subcommand)]
        action: BoqAction,
    },
    /// Store maintenance
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand)]
enum VendorAction {
    /// Register a new vendor and log in
    Register(commands::vendor::RegisterArgs),
    /// Log in with email and password
    Login(commands::vendor::LoginArgs),
    /// Log out
    Logout,
    /// Show the logged-in vendor
    Whoami,
    /// Edit the logged-in vendor's profile
    Update(commands::vendor::UpdateArgs),
}

#[derive(Subcommand)]
enum ProductAction {
    /// List a new product
    Add(commands::product::AddArgs),
    /// Edit a product
    Edit(commands::product::EditArgs),
    /// Delete a product
    Delete {
        /// Product ID
        id: String,
    },
    /// List the logged-in vendor's products
    List,
    /// Show one product
    Show {
        /// Product ID
        id: String,
    },
}

#[derive(Subcommand)]
enum MarketAction {
    /// Search products by name, description and category
    Search {
        /// Text to look for in names and descriptions
        #[arg(short, long)]
        term: Option<String>,

        /// Category label, e.g. "Books & Media"
        #[arg(short, long)]
        category: Option<Category>,
    },
    /// List the product categories
    Categories,
}

#[derive(Subcommand)]
enum BoqAction {
    /// Submit requirements and drawings for analysis
    Analyze(commands::boq::AnalyzeArgs),
}

#[derive(Subcommand)]
enum StoreAction {
    /// Report the health of every stored key
    Check,
    /// Move corrupt keys to backups so writes can resume
    Repair,
}

/// Install the stderr log subscriber.
fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    // JSON lines for log shippers, text otherwise
    let is_json = std::env::var("MARKETPLACE_LOG_FORMAT")
        .is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    match cli.command {
        Commands::Vendor { action } => match action {
            VendorAction::Register(args) => commands::vendor::register(args, json)?,
            VendorAction::Login(args) => commands::vendor::login(args, json)?,
            VendorAction::Logout => commands::vendor::logout()?,
            VendorAction::Whoami => commands::vendor::whoami(json)?,
            VendorAction::Update(args) => commands::vendor::update(args, json)?,
        },
        Commands::Product { action } => match action {
            ProductAction::Add(args) => commands::product::add(args, json)?,
            ProductAction::Edit(args) => commands::product::edit(args, json)?,
            ProductAction::Delete { id } => commands::product::delete(id)?,
            ProductAction::List => commands::product::list(json)?,
            ProductAction::Show { id } => commands::product::show(id, json)?,
        },
        Commands::Market { action } => match action {
            MarketAction::Search { term, category } => {
                commands::market::search(term, category, json)?;
            }
            MarketAction::Categories => commands::market::categories(json)?,
        },
        Commands::Dashboard => commands::product::dashboard(json)?,
        Commands::Boq { action } => match action {
            BoqAction::Analyze(args) => commands::boq::analyze(args).await?,
        },
        Commands::Store { action } => match action {
            StoreAction::Check => commands::store::check(json)?,
            StoreAction::Repair => commands::store::repair(json)?,
        },
    }
    Ok(())
}
