//! `store` resource scheme.

use std::sync::Arc;

use crate::controller::StoreController;
use crate::model::Order;
use crate::routing::{bind, DispatchError, Invocation, Reply, RouteTable, RouteTableError};

pub const MOUNT: &str = "/store";

pub fn routes(controller: &Arc<dyn StoreController>) -> Result<RouteTable, RouteTableError> {
    RouteTable::builder("store", MOUNT)
        .get("/store/inventory", "getInventory", bind(controller, get_inventory))
        .post("/store/order", "placeOrder", bind(controller, place_order))
        .get("/store/order/{orderId}", "getOrderById", bind(controller, get_order_by_id))
        .delete("/store/order/{orderId}", "deleteOrder", bind(controller, delete_order))
        .build()
}

async fn get_inventory(c: Arc<dyn StoreController>, _: Invocation) -> Result<Reply, DispatchError> {
    Reply::json(&c.get_inventory().await?)
}

async fn place_order(c: Arc<dyn StoreController>, inv: Invocation) -> Result<Reply, DispatchError> {
    let order: Order = inv.json()?;
    Reply::json(&c.place_order(order).await?)
}

async fn get_order_by_id(
    c: Arc<dyn StoreController>,
    inv: Invocation,
) -> Result<Reply, DispatchError> {
    let order_id: i64 = inv.parse_param("orderId")?;
    Reply::json(&c.get_order_by_id(order_id).await?)
}

async fn delete_order(c: Arc<dyn StoreController>, inv: Invocation) -> Result<Reply, DispatchError> {
    let order_id: i64 = inv.parse_param("orderId")?;
    c.delete_order(order_id).await?;
    Ok(Reply::Empty)
}
