//! Catalog browsing.

use sunbird_client::types::{Product, ProductQuery};
use sunbird_core::CategoryId;

use super::Context;

/// List products, filtered and paged.
pub async fn list(
    ctx: &Context,
    search: Option<String>,
    category: Option<i32>,
    page: u32,
    size: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = ProductQuery {
        category_id: category.map(CategoryId::new),
        search,
        page: Some(page),
        size: Some(size),
    };

    let result = ctx.products().list(&query).await?;
    for product in &result.content {
        print_product(product);
    }
    println!(
        "page {}/{} ({} products total)",
        result.number + 1,
        result.total_pages.max(1),
        result.total_elements
    );
    Ok(())
}

/// Page through the catalog until `product_id` turns up.
///
/// The backend has no single-product read, so the cart command scans the
/// listing instead.
pub async fn find_product(
    ctx: &Context,
    product_id: i32,
) -> Result<Option<Product>, Box<dyn std::error::Error>> {
    let products = ctx.products();
    let mut page = 0;

    loop {
        let query = ProductQuery {
            page: Some(page),
            size: Some(50),
            ..Default::default()
        };
        let result = products.list(&query).await?;

        if let Some(product) = result
            .content
            .into_iter()
            .find(|p| p.id.as_i32() == product_id)
        {
            return Ok(Some(product));
        }

        page += 1;
        if page >= result.total_pages {
            return Ok(None);
        }
    }
}

fn print_product(product: &Product) {
    let category = product.category_name.as_deref().unwrap_or("-");
    println!(
        "#{:<5} {:<30} {:>10}  stock {:>4}  [{category}]",
        product.id, product.name, product.price, product.quantity_available
    );
}
