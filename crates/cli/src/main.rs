//! Basil CLI - storefront and back-office tools.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog (no account needed)
//! basil products list
//! basil products show 42
//! basil categories
//!
//! # Cart operations (set BASIL_USERNAME / BASIL_PASSWORD)
//! basil cart show
//! basil cart add 42 --quantity 2
//! basil cart update 7 0        # quantity 0 removes the line
//!
//! # Checkout and order history
//! basil checkout --line1 "1 Market St" --city Springfield --state OR \
//!     --postal-code 97477 --phone 555-0100 --payment paypal
//! basil orders
//!
//! # Back office (admin account required)
//! basil admin orders
//! basil admin report
//! ```
//!
//! # Environment Variables
//!
//! - `BASIL_API_BASE_URL` - Base URL of the storefront API
//! - `BASIL_USERNAME` / `BASIL_PASSWORD` - Account used by authenticated commands

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use basil_client::{StoreClient, StoreConfig};

mod commands;

#[derive(Parser)]
#[command(name = "basil")]
#[command(author, version, about = "Basil storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// List product categories
    Categories,
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Save an address and place an order for the current cart
    Checkout {
        /// Street address
        #[arg(long)]
        line1: String,

        /// City
        #[arg(long)]
        city: String,

        /// State or region
        #[arg(long)]
        state: String,

        /// Postal code
        #[arg(long)]
        postal_code: String,

        /// Contact phone number
        #[arg(long)]
        phone: String,

        /// Payment method (`cod` or `paypal`)
        #[arg(long, default_value = "cod")]
        payment: String,
    },
    /// Show order history
    Orders,
    /// Back-office operations (admin account required)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List all products
    List,
    /// Show a single product
    Show {
        /// Product ID
        id: i32,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the current cart
    Show,
    /// Add a product to the cart
    Add {
        /// Product ID
        product: i32,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a cart line (0 removes it)
    Update {
        /// Cart item ID
        item: i32,

        /// New quantity
        quantity: i64,
    },
    /// Remove a line from the cart
    Remove {
        /// Cart item ID
        item: i32,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a product
    ProductAdd {
        /// Product name
        #[arg(long)]
        name: String,

        /// Unit price, e.g. 2.49
        #[arg(long)]
        price: String,

        /// Units in stock
        #[arg(long, default_value_t = 0)]
        stock: i32,

        /// Product description
        #[arg(long, default_value = "")]
        description: String,

        /// Category ID
        #[arg(long)]
        category: Option<i32>,

        /// Image URL
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Delete a product
    ProductDelete {
        /// Product ID
        id: i32,
    },
    /// List all orders
    Orders,
    /// Update an order's status
    OrderSet {
        /// Order ID
        id: i32,

        /// Fulfillment status (pending, processing, shipped, delivered, cancelled)
        #[arg(long)]
        status: String,

        /// Payment status (unpaid, paid, refunded)
        #[arg(long)]
        payment_status: String,
    },
    /// List customer accounts
    Customers,
    /// Activate or deactivate a customer account
    CustomerActive {
        /// Customer ID
        id: i32,

        /// New active flag
        active: bool,
    },
    /// Per-product sales report
    Report,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StoreConfig::from_env()?;
    let client = StoreClient::new(&config)?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List => commands::catalog::list_products(&client).await,
            ProductsAction::Show { id } => commands::catalog::show_product(&client, id).await?,
        },
        Commands::Categories => commands::catalog::list_categories(&client).await,
        Commands::Cart { action } => {
            commands::authenticate(&client).await?;
            match action {
                CartAction::Show => commands::cart::show(&client).await,
                CartAction::Add { product, quantity } => {
                    commands::cart::add(&client, product, quantity).await?;
                }
                CartAction::Update { item, quantity } => {
                    commands::cart::update(&client, item, quantity).await?;
                }
                CartAction::Remove { item } => commands::cart::remove(&client, item).await?,
            }
        }
        Commands::Checkout {
            line1,
            city,
            state,
            postal_code,
            phone,
            payment,
        } => {
            commands::authenticate(&client).await?;
            commands::checkout::place_order(
                &client,
                commands::checkout::AddressArgs {
                    line1,
                    city,
                    state,
                    postal_code,
                    phone,
                },
                &payment,
            )
            .await?;
        }
        Commands::Orders => {
            commands::authenticate(&client).await?;
            commands::checkout::list_orders(&client).await?;
        }
        Commands::Admin { action } => {
            commands::authenticate(&client).await?;
            commands::admin::run(&client, action).await?;
        }
    }
    Ok(())
}
