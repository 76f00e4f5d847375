//! Back-office commands.
//!
//! All of these require the configured account to hold admin privileges;
//! the server answers 403 otherwise.

#![allow(clippy::print_stdout)]

use basil_client::types::{OrderUpdate, ProductInput};
use basil_client::StoreClient;
use basil_core::{CategoryId, CustomerId, OrderId, OrderStatus, PaymentStatus, Price, ProductId};

use crate::AdminAction;

/// Dispatch an admin subcommand.
///
/// # Errors
///
/// Returns an error if input cannot be parsed or the API call fails.
pub async fn run(
    client: &StoreClient,
    action: AdminAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AdminAction::ProductAdd {
            name,
            price,
            stock,
            description,
            category,
            image_url,
        } => {
            let price: rust_decimal::Decimal = price.parse()?;
            let created = client
                .admin()
                .create_product(&ProductInput {
                    name,
                    price: Price::new(price),
                    stock,
                    description,
                    category: category.map(CategoryId::new),
                    image_url,
                })
                .await?;
            println!("Created product #{}: {}", created.id, created.name);
        }
        AdminAction::ProductDelete { id } => {
            client.admin().delete_product(ProductId::new(id)).await?;
            println!("Deleted product #{id}");
        }
        AdminAction::Orders => {
            for order in client.admin().list_orders().await? {
                println!(
                    "#{:<5}  {:<20}  {:<10}  {:<8}  total {}",
                    order.id,
                    order.user.username,
                    order.status,
                    order.payment_status,
                    order.total_amount
                );
            }
        }
        AdminAction::OrderSet {
            id,
            status,
            payment_status,
        } => {
            let update = OrderUpdate {
                status: status.parse::<OrderStatus>()?,
                payment_status: payment_status.parse::<PaymentStatus>()?,
            };
            client.admin().update_order(OrderId::new(id), &update).await?;
            println!("Updated order #{id}");
        }
        AdminAction::Customers => {
            for customer in client.admin().list_customers().await? {
                println!(
                    "{:>5}  {:<20}  active: {:<5}  staff: {}",
                    customer.id, customer.username, customer.is_active, customer.is_staff
                );
            }
        }
        AdminAction::CustomerActive { id, active } => {
            let confirmed = client
                .admin()
                .set_customer_active(CustomerId::new(id), active)
                .await?;
            println!("Customer #{id} active: {confirmed}");
        }
        AdminAction::Report => {
            for row in client.admin().sales_report().await? {
                println!(
                    "{:<30}  sold {:>5}  revenue {}",
                    row.product_name, row.total_quantity, row.total_revenue
                );
            }
        }
    }

    Ok(())
}
