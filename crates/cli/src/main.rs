//! Sunbird CLI - shop from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in with a Google id-token
//! sunbird login --id-token <TOKEN>
//!
//! # Browse the catalog
//! sunbird products list --search teapot
//!
//! # Build a cart and check out
//! sunbird cart add 3 --quantity 2
//! sunbird cart show
//! sunbird checkout --address "12 Main St" --phone 0712345678
//!
//! # Follow your orders
//! sunbird orders list
//! sunbird orders show 17
//!
//! # Admin: move an order along
//! sunbird admin set-status 17 SHIPPED
//! ```
//!
//! Configuration comes from the environment (see `sunbird_client::config`);
//! a `.env` file in the working directory is honored. Session and cart are
//! persisted under the state directory, so they survive between
//! invocations.

#![cfg_attr(not(test), forbid(unsafe_code))]
// User-facing CLI output goes to stdout by design.
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "sunbird")]
#[command(author, version, about = "Sunbird shop client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with a Google id-token
    Login {
        /// The Google id-token obtained from the OAuth flow
        #[arg(long)]
        id_token: String,
    },
    /// Sign out and forget the local session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the current cart
    Checkout {
        /// Delivery address
        #[arg(long)]
        address: String,
        /// Contact phone number
        #[arg(long)]
        phone: String,
    },
    /// Query your orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Administrative operations
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        /// Free-text search
        #[arg(long)]
        search: Option<String>,
        /// Filter by category id
        #[arg(long)]
        category: Option<i32>,
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Page size
        #[arg(long, default_value_t = 20)]
        size: u32,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product to the cart
    Add {
        /// Product id
        product_id: i32,
        /// Units to add
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        product_id: i32,
    },
    /// Set the exact quantity for a product (0 removes it)
    SetQuantity {
        /// Product id
        product_id: i32,
        /// New quantity
        quantity: u32,
    },
    /// Show the cart contents and totals
    Show,
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List your orders
    List {
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Page size
        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    /// Show one order
    Show {
        /// Order id
        order_id: i32,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Request an order status change
    SetStatus {
        /// Order id
        order_id: i32,
        /// New status (PENDING, ACCEPTED, REJECTED, COMPLETED, CANCELLED,
        /// CONFIRMED, SHIPPED, DELIVERED)
        status: String,
    },
    /// List all orders
    Orders {
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Page size
        #[arg(long, default_value_t = 50)]
        size: u32,
        /// Only show orders in this status
        #[arg(long)]
        status: Option<String>,
    },
    /// List all user profiles
    Users,
}

#[tokio::main]
async fn main() {
    // Initialize tracing; .env is honored if present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::from_env()?;

    match cli.command {
        Commands::Login { id_token } => commands::session::login(&ctx, &id_token).await?,
        Commands::Logout => commands::session::logout(&ctx).await?,
        Commands::Whoami => commands::session::whoami(&ctx),
        Commands::Products { action } => match action {
            ProductsAction::List {
                search,
                category,
                page,
                size,
            } => commands::catalog::list(&ctx, search, category, page, size).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&ctx, product_id, quantity).await?,
            CartAction::Remove { product_id } => commands::cart::remove(&ctx, product_id)?,
            CartAction::SetQuantity {
                product_id,
                quantity,
            } => commands::cart::set_quantity(&ctx, product_id, quantity)?,
            CartAction::Show => commands::cart::show(&ctx),
            CartAction::Clear => commands::cart::clear(&ctx)?,
        },
        Commands::Checkout { address, phone } => {
            commands::orders::checkout(&ctx, &address, &phone).await?;
        }
        Commands::Orders { action } => match action {
            OrdersAction::List { page, size } => commands::orders::list(&ctx, page, size).await?,
            OrdersAction::Show { order_id } => commands::orders::show(&ctx, order_id).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::SetStatus { order_id, status } => {
                commands::admin::set_status(&ctx, order_id, &status).await?;
            }
            AdminAction::Orders { page, size, status } => {
                commands::admin::orders(&ctx, page, size, status.as_deref()).await?;
            }
            AdminAction::Users => commands::admin::users(&ctx).await?,
        },
    }
    Ok(())
}
