//! Catalog browsing commands.

#![allow(clippy::print_stdout)]

use basil_client::StoreClient;
use basil_core::ProductId;

/// List all products.
pub async fn list_products(client: &StoreClient) {
    let products = client.catalog().list_products().await;

    if products.is_empty() {
        println!("No products available.");
        return;
    }

    for product in products {
        let category = product.category_name.as_deref().unwrap_or("-");
        println!(
            "{:>5}  {:<30}  {:>8}  stock {:>4}  [{category}]",
            product.id, product.name, product.price, product.stock
        );
    }
}

/// Show a single product.
///
/// # Errors
///
/// Returns an error if the product does not exist or the request fails.
pub async fn show_product(
    client: &StoreClient,
    id: i32,
) -> Result<(), Box<dyn std::error::Error>> {
    let product = client.catalog().get_product(ProductId::new(id)).await?;

    println!("{} (#{})", product.name, product.id);
    println!("Price: {}", product.price);
    println!("Stock: {}", product.stock);
    if let Some(category) = product.category_name.as_deref() {
        println!("Category: {category}");
    }
    if !product.description.is_empty() {
        println!("\n{}", product.description);
    }

    Ok(())
}

/// List all categories.
pub async fn list_categories(client: &StoreClient) {
    let categories = client.catalog().list_categories().await;

    if categories.is_empty() {
        println!("No categories available.");
        return;
    }

    for category in categories {
        println!("{:>5}  {}", category.id, category.name);
    }
}
