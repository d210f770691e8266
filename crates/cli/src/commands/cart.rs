//! Local cart management.

use sunbird_core::ProductId;

use super::{Context, catalog};

/// Add units of a product to the cart.
pub async fn add(
    ctx: &Context,
    product_id: i32,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(product) = catalog::find_product(ctx, product_id).await? else {
        return Err(format!("no product with id {product_id}").into());
    };

    let name = product.name.clone();
    ctx.cart.add_item(product, quantity)?;
    println!("added {quantity} x {name}");
    show(ctx);
    Ok(())
}

/// Remove a product from the cart.
pub fn remove(ctx: &Context, product_id: i32) -> Result<(), Box<dyn std::error::Error>> {
    ctx.cart.remove_item(ProductId::new(product_id))?;
    show(ctx);
    Ok(())
}

/// Set the exact quantity for a product; 0 removes it.
pub fn set_quantity(
    ctx: &Context,
    product_id: i32,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.cart
        .update_quantity(ProductId::new(product_id), quantity)?;
    show(ctx);
    Ok(())
}

/// Print the cart contents and derived totals.
pub fn show(ctx: &Context) {
    let items = ctx.cart.items();
    if items.is_empty() {
        println!("cart is empty");
        return;
    }

    for item in &items {
        println!(
            "#{:<5} {:<30} {:>3} x {:>10}",
            item.product.id, item.product.name, item.quantity, item.product.price
        );
    }
    println!(
        "{} items, total {}",
        ctx.cart.item_count(),
        ctx.cart.total()
    );
}

/// Empty the cart.
pub fn clear(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.cart.clear()?;
    println!("cart cleared");
    Ok(())
}
