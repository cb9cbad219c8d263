use std::collections::HashMap;

use async_trait::async_trait;

use crate::controller::ControllerResult;
use crate::model::Order;

/// Capabilities of the `store` resource.
#[async_trait]
pub trait StoreController: Send + Sync {
    /// Pet counts keyed by status.
    async fn get_inventory(&self) -> ControllerResult<HashMap<String, i32>>;

    async fn place_order(&self, order: Order) -> ControllerResult<Order>;

    async fn get_order_by_id(&self, order_id: i64) -> ControllerResult<Order>;

    async fn delete_order(&self, order_id: i64) -> ControllerResult<()>;
}
