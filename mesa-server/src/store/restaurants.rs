//! Restaurant repository

use super::{RESTAURANTS_TABLE, Store, StoreError, StoreResult};
use shared::models::{Restaurant, RestaurantCreate, RestaurantUpdate};

impl Store {
    /// Insert a fully-built restaurant (seeding, tests)
    pub fn insert_restaurant(&self, restaurant: &Restaurant) -> StoreResult<()> {
        self.put(RESTAURANTS_TABLE, &restaurant.id, restaurant)
    }

    /// Create a restaurant, enforcing subdomain uniqueness
    pub fn create_restaurant(&self, payload: RestaurantCreate) -> StoreResult<Restaurant> {
        if self
            .find_restaurant_by_subdomain(&payload.subdomain)?
            .is_some()
        {
            return Err(StoreError::Conflict(format!(
                "subdomain {}",
                payload.subdomain
            )));
        }

        let restaurant = Restaurant {
            id: uuid::Uuid::new_v4().to_string(),
            name: payload.name,
            subdomain: payload.subdomain,
            timezone: payload
                .timezone
                .unwrap_or_else(|| "Europe/Madrid".to_string()),
            business_day_cutoff: payload
                .business_day_cutoff
                .unwrap_or_else(|| "02:00".to_string()),
            is_active: true,
            created_at: crate::utils::now_millis(),
        };
        self.insert_restaurant(&restaurant)?;
        Ok(restaurant)
    }

    /// Get restaurant by id
    pub fn get_restaurant(&self, id: &str) -> StoreResult<Option<Restaurant>> {
        self.get(RESTAURANTS_TABLE, id)
    }

    /// Find restaurant by subdomain
    pub fn find_restaurant_by_subdomain(&self, subdomain: &str) -> StoreResult<Option<Restaurant>> {
        let mut matches: Vec<Restaurant> =
            self.scan(RESTAURANTS_TABLE, |r: &Restaurant| r.subdomain == subdomain)?;
        Ok(matches.pop())
    }

    /// Update restaurant fields
    pub fn update_restaurant(&self, id: &str, payload: RestaurantUpdate) -> StoreResult<Restaurant> {
        self.update(RESTAURANTS_TABLE, id, |r: &mut Restaurant| {
            if let Some(name) = payload.name {
                r.name = name;
            }
            if let Some(tz) = payload.timezone {
                r.timezone = tz;
            }
            if let Some(cutoff) = payload.business_day_cutoff {
                r.business_day_cutoff = cutoff;
            }
            if let Some(active) = payload.is_active {
                r.is_active = active;
            }
            Ok(())
        })
    }

    /// Business timezone for a restaurant, falling back to the given default
    pub fn restaurant_timezone(&self, id: &str, fallback: chrono_tz::Tz) -> chrono_tz::Tz {
        self.get_restaurant(id)
            .ok()
            .flatten()
            .and_then(|r| r.timezone.parse().ok())
            .unwrap_or(fallback)
    }
}
