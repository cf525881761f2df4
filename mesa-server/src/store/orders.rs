//! Order repository

use super::{ORDERS_TABLE, Store, StoreError, StoreResult};
use chrono::Utc;
use shared::models::{Order, OrderStatus};

impl Store {
    /// Insert a new order
    pub fn insert_order(&self, order: &Order) -> StoreResult<()> {
        self.put(ORDERS_TABLE, &order.id, order)
    }

    /// Get order by id
    pub fn get_order(&self, id: &str) -> StoreResult<Option<Order>> {
        self.get(ORDERS_TABLE, id)
    }

    /// Get order by id, erroring when missing
    pub fn require_order(&self, id: &str) -> StoreResult<Order> {
        self.get_order(id)?
            .ok_or_else(|| StoreError::NotFound(format!("order {}", id)))
    }

    /// Read-modify-write an order atomically
    pub fn update_order(
        &self,
        id: &str,
        mutate: impl FnOnce(&mut Order) -> StoreResult<()>,
    ) -> StoreResult<Order> {
        self.update(ORDERS_TABLE, id, |order: &mut Order| {
            mutate(order)?;
            order.updated_at = crate::utils::now_millis();
            Ok(())
        })
    }

    /// Hard-delete an order (kitchen cleanup, distinct from cancel)
    pub fn delete_order(&self, id: &str) -> StoreResult<bool> {
        self.remove(ORDERS_TABLE, id)
    }

    /// List a restaurant's orders matching the filter, oldest first
    pub fn list_orders(
        &self,
        restaurant_id: &str,
        mut filter: impl FnMut(&Order) -> bool,
    ) -> StoreResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.scan(ORDERS_TABLE, |o: &Order| {
            o.restaurant_id == restaurant_id && filter(o)
        })?;
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    /// Active (non-terminal) orders for one table
    pub fn active_orders_for_table(
        &self,
        restaurant_id: &str,
        table_number: i32,
    ) -> StoreResult<Vec<Order>> {
        self.list_orders(restaurant_id, |o| {
            o.table_number == table_number && !o.status.is_terminal()
        })
    }

    /// Generate next receipt number (crash-safe via redb counter)
    pub fn next_receipt_number(&self, restaurant_id: &str, tz: chrono_tz::Tz) -> String {
        let counter_key = format!("orders:{}", restaurant_id);
        let count = self.increment_counter(&counter_key).unwrap_or(1);
        let date_str = Utc::now().with_timezone(&tz).format("%Y%m%d").to_string();
        format!("MES{}{}", date_str, 10000 + count)
    }
}
