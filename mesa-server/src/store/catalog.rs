//! Catalog repository - categories and menu items

use super::{CATEGORIES_TABLE, MENU_ITEMS_TABLE, Store, StoreError, StoreResult};
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, MenuItem, MenuItemCreate, MenuItemUpdate,
};

impl Store {
    // ========== Categories ==========

    pub fn insert_category(&self, category: &Category) -> StoreResult<()> {
        self.put(CATEGORIES_TABLE, &category.id, category)
    }

    pub fn create_category(
        &self,
        restaurant_id: &str,
        payload: CategoryCreate,
    ) -> StoreResult<Category> {
        let category = Category {
            id: uuid::Uuid::new_v4().to_string(),
            restaurant_id: restaurant_id.to_string(),
            name: payload.name,
            sort_order: payload.sort_order.unwrap_or(0),
            is_active: true,
            discount_percentage: payload.discount_percentage,
            discount_start: payload.discount_start,
            discount_end: payload.discount_end,
        };
        self.insert_category(&category)?;
        Ok(category)
    }

    pub fn get_category(&self, id: &str) -> StoreResult<Option<Category>> {
        self.get(CATEGORIES_TABLE, id)
    }

    pub fn list_categories(&self, restaurant_id: &str) -> StoreResult<Vec<Category>> {
        let mut categories: Vec<Category> =
            self.scan(CATEGORIES_TABLE, |c: &Category| {
                c.restaurant_id == restaurant_id
            })?;
        categories.sort_by_key(|c| c.sort_order);
        Ok(categories)
    }

    pub fn update_category(&self, id: &str, payload: CategoryUpdate) -> StoreResult<Category> {
        self.update(CATEGORIES_TABLE, id, |c: &mut Category| {
            if let Some(name) = payload.name {
                c.name = name;
            }
            if let Some(sort_order) = payload.sort_order {
                c.sort_order = sort_order;
            }
            if let Some(active) = payload.is_active {
                c.is_active = active;
            }
            // Double-option fields: outer None = unchanged, inner None = clear
            if let Some(pct) = payload.discount_percentage {
                c.discount_percentage = pct;
            }
            if let Some(start) = payload.discount_start {
                c.discount_start = start;
            }
            if let Some(end) = payload.discount_end {
                c.discount_end = end;
            }
            Ok(())
        })
    }

    /// Delete a category; refuses while menu items still reference it
    pub fn delete_category(&self, id: &str) -> StoreResult<bool> {
        let items = self.scan(MENU_ITEMS_TABLE, |i: &MenuItem| i.category_id == id)?;
        if !items.is_empty() {
            return Err(StoreError::Conflict(format!(
                "category {} has {} items",
                id,
                items.len()
            )));
        }
        self.remove(CATEGORIES_TABLE, id)
    }

    // ========== Menu items ==========

    pub fn insert_menu_item(&self, item: &MenuItem) -> StoreResult<()> {
        self.put(MENU_ITEMS_TABLE, &item.id, item)
    }

    pub fn create_menu_item(
        &self,
        restaurant_id: &str,
        payload: MenuItemCreate,
    ) -> StoreResult<MenuItem> {
        if self.get_category(&payload.category_id)?.is_none() {
            return Err(StoreError::NotFound(format!(
                "category {}",
                payload.category_id
            )));
        }

        let item = MenuItem {
            id: uuid::Uuid::new_v4().to_string(),
            restaurant_id: restaurant_id.to_string(),
            category_id: payload.category_id,
            name: payload.name,
            description: payload.description,
            price: payload.price,
            is_available: true,
            kitchen_station: payload.kitchen_station,
            sort_order: payload.sort_order.unwrap_or(0),
            discounted_price: payload.discounted_price,
            discount_percentage: payload.discount_percentage,
            discount_start: payload.discount_start,
            discount_end: payload.discount_end,
        };
        self.insert_menu_item(&item)?;
        Ok(item)
    }

    pub fn get_menu_item(&self, id: &str) -> StoreResult<Option<MenuItem>> {
        self.get(MENU_ITEMS_TABLE, id)
    }

    pub fn list_menu_items(&self, restaurant_id: &str) -> StoreResult<Vec<MenuItem>> {
        let mut items: Vec<MenuItem> = self.scan(MENU_ITEMS_TABLE, |i: &MenuItem| {
            i.restaurant_id == restaurant_id
        })?;
        items.sort_by_key(|i| i.sort_order);
        Ok(items)
    }

    pub fn update_menu_item(&self, id: &str, payload: MenuItemUpdate) -> StoreResult<MenuItem> {
        self.update(MENU_ITEMS_TABLE, id, |i: &mut MenuItem| {
            if let Some(category_id) = payload.category_id {
                i.category_id = category_id;
            }
            if let Some(name) = payload.name {
                i.name = name;
            }
            if let Some(description) = payload.description {
                i.description = Some(description);
            }
            if let Some(price) = payload.price {
                i.price = price;
            }
            if let Some(station) = payload.kitchen_station {
                i.kitchen_station = Some(station);
            }
            if let Some(sort_order) = payload.sort_order {
                i.sort_order = sort_order;
            }
            if let Some(dp) = payload.discounted_price {
                i.discounted_price = dp;
            }
            if let Some(pct) = payload.discount_percentage {
                i.discount_percentage = pct;
            }
            if let Some(start) = payload.discount_start {
                i.discount_start = start;
            }
            if let Some(end) = payload.discount_end {
                i.discount_end = end;
            }
            Ok(())
        })
    }

    /// Kitchen side-channel: toggle availability
    pub fn set_menu_item_availability(&self, id: &str, available: bool) -> StoreResult<MenuItem> {
        self.update(MENU_ITEMS_TABLE, id, |i: &mut MenuItem| {
            i.is_available = available;
            Ok(())
        })
    }

    pub fn delete_menu_item(&self, id: &str) -> StoreResult<bool> {
        self.remove(MENU_ITEMS_TABLE, id)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn seed_catalog(store: &Store) -> (Category, MenuItem) {
        seed_restaurant(store, "r1");
        let category = store
            .create_category(
                "r1",
                CategoryCreate {
                    name: "Tapas".into(),
                    sort_order: Some(1),
                    discount_percentage: None,
                    discount_start: None,
                    discount_end: None,
                },
            )
            .unwrap();
        let item = store
            .create_menu_item(
                "r1",
                MenuItemCreate {
                    category_id: category.id.clone(),
                    name: "Patatas bravas".into(),
                    description: None,
                    price: 6.5,
                    kitchen_station: Some("fryer".into()),
                    sort_order: None,
                    discounted_price: None,
                    discount_percentage: None,
                    discount_start: None,
                    discount_end: None,
                },
            )
            .unwrap();
        (category, item)
    }

    #[test]
    fn test_create_item_requires_category() {
        let store = memory_store();
        seed_restaurant(&store, "r1");
        let result = store.create_menu_item(
            "r1",
            MenuItemCreate {
                category_id: "missing".into(),
                name: "Ghost".into(),
                description: None,
                price: 1.0,
                kitchen_station: None,
                sort_order: None,
                discounted_price: None,
                discount_percentage: None,
                discount_start: None,
                discount_end: None,
            },
        );
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_delete_category_with_items_refused() {
        let store = memory_store();
        let (category, _item) = seed_catalog(&store);
        assert!(matches!(
            store.delete_category(&category.id),
            Err(StoreError::Conflict(_))
        ));
    }

    #[test]
    fn test_availability_toggle() {
        let store = memory_store();
        let (_category, item) = seed_catalog(&store);
        let updated = store.set_menu_item_availability(&item.id, false).unwrap();
        assert!(!updated.is_available);
        let fetched = store.get_menu_item(&item.id).unwrap().unwrap();
        assert!(!fetched.is_available);
    }

    #[test]
    fn test_clear_discount_via_double_option() {
        let store = memory_store();
        let (_category, item) = seed_catalog(&store);
        store
            .update_menu_item(
                &item.id,
                MenuItemUpdate {
                    category_id: None,
                    name: None,
                    description: None,
                    price: None,
                    kitchen_station: None,
                    sort_order: None,
                    discounted_price: Some(Some(4.0)),
                    discount_percentage: None,
                    discount_start: None,
                    discount_end: None,
                },
            )
            .unwrap();
        let updated = store
            .update_menu_item(
                &item.id,
                MenuItemUpdate {
                    category_id: None,
                    name: None,
                    description: None,
                    price: None,
                    kitchen_station: None,
                    sort_order: None,
                    discounted_price: Some(None),
                    discount_percentage: None,
                    discount_start: None,
                    discount_end: None,
                },
            )
            .unwrap();
        assert_eq!(updated.discounted_price, None);
    }
}
