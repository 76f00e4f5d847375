//! Cart commands.

#![allow(clippy::print_stdout)]

use basil_client::types::{CartItem, cart_subtotal};
use basil_client::{AddToCart, StoreClient};
use basil_core::{CartItemId, ProductId};

/// Show the current cart.
pub async fn show(client: &StoreClient) {
    print_cart(&client.cart().fetch_cart().await);
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns an error if the add is rejected or fails.
pub async fn add(
    client: &StoreClient,
    product: i32,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    match client
        .cart()
        .add_item(ProductId::new(product), quantity)
        .await?
    {
        AddToCart::Added(cart) => print_cart(&cart),
        AddToCart::LoginRequired => println!("Please log in to add items to your cart."),
    }

    Ok(())
}

/// Set a cart line's quantity; zero removes it.
///
/// # Errors
///
/// Returns an error if the update is rejected or fails.
pub async fn update(
    client: &StoreClient,
    item: i32,
    quantity: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let cart = client
        .cart()
        .update_quantity(CartItemId::new(item), quantity)
        .await?;
    print_cart(&cart);
    Ok(())
}

/// Remove a cart line.
///
/// # Errors
///
/// Returns an error if the removal fails.
pub async fn remove(client: &StoreClient, item: i32) -> Result<(), Box<dyn std::error::Error>> {
    let cart = client.cart().remove_item(CartItemId::new(item)).await?;
    print_cart(&cart);
    Ok(())
}

fn print_cart(items: &[CartItem]) {
    if items.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for item in items {
        println!(
            "{:>5}  {:<30}  {} x {:>3} = {}",
            item.id,
            item.product.name,
            item.product.price,
            item.quantity,
            item.line_total()
        );
    }
    println!("Subtotal: {}", cart_subtotal(items));
}
