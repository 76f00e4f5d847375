//! Checkout and order-history commands.

#![allow(clippy::print_stdout)]

use basil_client::types::{NewAddress, PaymentMethod};
use basil_client::StoreClient;

/// Address fields collected from command-line flags.
pub struct AddressArgs {
    pub line1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub phone: String,
}

/// Save the address and place an order for the current cart.
///
/// # Errors
///
/// Returns an error if the payment method is unknown, the address is
/// rejected, or the order cannot be placed (e.g. empty cart).
pub async fn place_order(
    client: &StoreClient,
    address: AddressArgs,
    payment: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let payment = match payment {
        "cod" => PaymentMethod::Cod,
        "paypal" => PaymentMethod::Paypal,
        other => return Err(format!("unknown payment method: {other}").into()),
    };

    let saved = client
        .checkout()
        .create_address(&NewAddress {
            line1: address.line1,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            phone: address.phone,
        })
        .await?;

    let placed = client.checkout().place_order(saved.id, payment).await?;

    println!("{} (order #{})", placed.message, placed.order_id);
    Ok(())
}

/// List the account's order history.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn list_orders(client: &StoreClient) -> Result<(), Box<dyn std::error::Error>> {
    let orders = client.checkout().list_orders().await?;

    if orders.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }

    for order in orders {
        println!(
            "#{:<5}  {:<10}  {:<8}  total {}",
            order.id, order.status, order.payment_status, order.total_amount
        );
        for item in &order.items {
            println!(
                "        {} x {:>3} @ {} = {}",
                item.product_name, item.quantity, item.unit_price, item.subtotal
            );
        }
    }

    Ok(())
}
