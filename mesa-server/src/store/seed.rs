//! 开发环境种子数据
//!
//! 开发模式下首次启动时填充一家演示餐厅和一个管理员账号，
//! 便于直接调试面板和顾客链路。生产环境从不触发。

use super::{RESTAURANTS_TABLE, Store, StoreResult};
use crate::auth::{default_permissions, hash_password};
use shared::models::{
    CategoryCreate, MenuItemCreate, Restaurant, Staff, StaffRole,
};

impl Store {
    /// 是否还没有任何餐厅
    pub fn has_no_restaurants(&self) -> StoreResult<bool> {
        let all: Vec<Restaurant> = self.scan(RESTAURANTS_TABLE, |_: &Restaurant| true)?;
        Ok(all.is_empty())
    }

    /// 填充演示数据 (幂等: 已有餐厅时不做任何事)
    pub fn seed_dev_data(&self) -> StoreResult<()> {
        if !self.has_no_restaurants()? {
            return Ok(());
        }

        let restaurant = Restaurant {
            id: "demo".to_string(),
            name: "Casa Mesa".to_string(),
            subdomain: "demo".to_string(),
            timezone: "Europe/Madrid".to_string(),
            business_day_cutoff: "02:00".to_string(),
            is_active: true,
            created_at: crate::utils::now_millis(),
        };
        self.insert_restaurant(&restaurant)?;

        let password = std::env::var("DEV_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());
        let admin = Staff {
            id: uuid::Uuid::new_v4().to_string(),
            restaurant_id: restaurant.id.clone(),
            name: "Admin".to_string(),
            username: "admin".to_string(),
            password_hash: hash_password(&password)
                .map_err(|e| super::StoreError::Conflict(e.message))?,
            role: StaffRole::Admin,
            permissions: default_permissions(StaffRole::Admin),
            is_active: true,
            created_at: crate::utils::now_millis(),
        };
        self.insert_staff(&admin)?;

        let category = self.create_category(
            &restaurant.id,
            CategoryCreate {
                name: "Tapas".to_string(),
                sort_order: Some(1),
                discount_percentage: None,
                discount_start: None,
                discount_end: None,
            },
        )?;
        for (name, price) in [("Patatas bravas", 6.5), ("Tortilla", 5.0), ("Croquetas", 7.0)] {
            self.create_menu_item(
                &restaurant.id,
                MenuItemCreate {
                    category_id: category.id.clone(),
                    name: name.to_string(),
                    description: None,
                    price,
                    kitchen_station: Some("cocina".to_string()),
                    sort_order: None,
                    discounted_price: None,
                    discount_percentage: None,
                    discount_start: None,
                    discount_end: None,
                },
            )?;
        }

        tracing::info!("Seeded demo restaurant 'demo' with admin/admin login");
        Ok(())
    }
}
