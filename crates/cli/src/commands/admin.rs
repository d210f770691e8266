//! Administrative commands.

use std::str::FromStr;

use sunbird_core::{OrderId, OrderStatus};

use super::Context;

/// Request an order status change; the backend decides legality.
pub async fn set_status(
    ctx: &Context,
    order_id: i32,
    status: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let status = OrderStatus::from_str(status)?;
    ctx.admin()
        .update_order_status(OrderId::new(order_id), status)
        .await?;
    println!("order #{order_id} set to {status}");
    Ok(())
}

/// List all orders, optionally filtered by status.
pub async fn orders(
    ctx: &Context,
    page: u32,
    size: u32,
    status: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let status = status.map(OrderStatus::from_str).transpose()?;
    let result = ctx.admin().list_orders(page, size, status).await?;
    for order in &result.content {
        println!(
            "#{:<5} {:<10} {:>10}  {}",
            order.id,
            order.status,
            order.amount(),
            order.shipping_address
        );
    }
    println!("{} orders total", result.total_elements);
    Ok(())
}

/// List all user profiles.
pub async fn users(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let users = ctx.admin().list_users().await?;
    for user in &users {
        println!("#{:<5} {:<30} {:<30} {}", user.id, user.name, user.email, user.role);
    }
    Ok(())
}
