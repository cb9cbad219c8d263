use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::controller::{ControllerError, ControllerResult, StoreController};
use crate::memory::InMemoryPets;
use crate::model::{Order, OrderStatus};

/// Orders kept in process memory; inventory is counted from the pet store.
#[derive(Debug)]
pub struct InMemoryStore {
    orders: DashMap<i64, Order>,
    next_id: AtomicI64,
    pets: Arc<InMemoryPets>,
}

impl InMemoryStore {
    pub fn new(pets: Arc<InMemoryPets>) -> Self {
        Self {
            orders: DashMap::new(),
            next_id: AtomicI64::new(1),
            pets,
        }
    }
}

#[async_trait]
impl StoreController for InMemoryStore {
    async fn get_inventory(&self) -> ControllerResult<HashMap<String, i32>> {
        let mut inventory = HashMap::new();
        for pet in self.pets.all() {
            if let Some(status) = pet.status {
                *inventory.entry(status.to_string()).or_insert(0) += 1;
            }
        }
        Ok(inventory)
    }

    async fn place_order(&self, mut order: Order) -> ControllerResult<Order> {
        if order.quantity.is_some_and(|q| q <= 0) {
            return Err(ControllerError::validation("quantity must be positive"));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        order.id = Some(id);
        order.status = order.status.or(Some(OrderStatus::Placed));
        self.orders.insert(id, order.clone());
        tracing::debug!(order_id = id, "Order placed");
        Ok(order)
    }

    async fn get_order_by_id(&self, order_id: i64) -> ControllerResult<Order> {
        self.orders
            .get(&order_id)
            .map(|e| e.value().clone())
            .ok_or_else(|| ControllerError::not_found(format!("order {order_id}")))
    }

    async fn delete_order(&self, order_id: i64) -> ControllerResult<()> {
        self.orders
            .remove(&order_id)
            .map(|_| ())
            .ok_or_else(|| ControllerError::not_found(format!("order {order_id}")))
    }
}
