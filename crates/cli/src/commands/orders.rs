//! Checkout and order queries.

use sunbird_client::types::Order;
use sunbird_client::{CheckoutOrchestrator, ShippingDetails};
use sunbird_core::OrderId;

use super::Context;

/// Place an order for the current cart.
pub async fn checkout(
    ctx: &Context,
    address: &str,
    phone: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let orchestrator =
        CheckoutOrchestrator::new(ctx.session.clone(), ctx.cart.clone(), ctx.orders());

    let order = orchestrator
        .place_order(&ShippingDetails::new(address, phone))
        .await?;

    println!("order #{} placed, status {}", order.id, order.status);
    print_order(&order);
    Ok(())
}

/// List the signed-in user's orders.
pub async fn list(ctx: &Context, page: u32, size: u32) -> Result<(), Box<dyn std::error::Error>> {
    let result = ctx.orders().my_orders(page, size).await?;
    for order in &result.content {
        println!(
            "#{:<5} {:<10} ({:?}) {:>10}  {}",
            order.id,
            order.status,
            order.status.category(),
            order.amount(),
            order.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    println!(
        "page {}/{} ({} orders total)",
        result.number + 1,
        result.total_pages.max(1),
        result.total_elements
    );
    Ok(())
}

/// Show one order in full.
pub async fn show(ctx: &Context, order_id: i32) -> Result<(), Box<dyn std::error::Error>> {
    let order = ctx.orders().get(OrderId::new(order_id)).await?;
    print_order(&order);
    Ok(())
}

fn print_order(order: &Order) {
    println!(
        "order #{} - {} ({:?})",
        order.id,
        order.status,
        order.status.category()
    );
    println!("  placed {}", order.created_at.format("%Y-%m-%d %H:%M"));
    println!("  ship to {}", order.shipping_address);
    for item in &order.items {
        println!(
            "  {:<30} {:>3} x {:>10}",
            item.product_name,
            item.quantity,
            item.unit_price()
        );
    }
    println!("  total {}", order.amount());
}
