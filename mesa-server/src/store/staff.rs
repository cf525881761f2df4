//! Staff repository

use super::{STAFF_TABLE, Store, StoreError, StoreResult};
use shared::models::{Staff, StaffUpdate};

impl Store {
    /// Insert a fully-built staff record, enforcing username uniqueness
    pub fn insert_staff(&self, staff: &Staff) -> StoreResult<()> {
        if let Some(existing) = self.find_staff_by_username(&staff.username)?
            && existing.id != staff.id
        {
            return Err(StoreError::Conflict(format!(
                "username {}",
                staff.username
            )));
        }
        self.put(STAFF_TABLE, &staff.id, staff)
    }

    /// Get staff by id
    pub fn get_staff(&self, id: &str) -> StoreResult<Option<Staff>> {
        self.get(STAFF_TABLE, id)
    }

    /// Find staff by username (usernames are globally unique)
    pub fn find_staff_by_username(&self, username: &str) -> StoreResult<Option<Staff>> {
        let mut matches: Vec<Staff> = self.scan(STAFF_TABLE, |s: &Staff| s.username == username)?;
        Ok(matches.pop())
    }

    /// List all staff of a restaurant
    pub fn list_staff(&self, restaurant_id: &str) -> StoreResult<Vec<Staff>> {
        let mut staff: Vec<Staff> =
            self.scan(STAFF_TABLE, |s: &Staff| s.restaurant_id == restaurant_id)?;
        staff.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(staff)
    }

    /// Update staff fields
    ///
    /// `password_hash` carries the already-hashed replacement password when
    /// the payload included one.
    pub fn update_staff(
        &self,
        id: &str,
        payload: StaffUpdate,
        password_hash: Option<String>,
        permissions: Option<Vec<String>>,
    ) -> StoreResult<Staff> {
        if let Some(username) = &payload.username
            && let Some(existing) = self.find_staff_by_username(username)?
            && existing.id != id
        {
            return Err(StoreError::Conflict(format!("username {}", username)));
        }

        self.update(STAFF_TABLE, id, |s: &mut Staff| {
            if let Some(name) = payload.name {
                s.name = name;
            }
            if let Some(username) = payload.username {
                s.username = username;
            }
            if let Some(hash) = password_hash {
                s.password_hash = hash;
            }
            if let Some(role) = payload.role {
                s.role = role;
            }
            if let Some(perms) = permissions {
                s.permissions = perms;
            }
            if let Some(active) = payload.is_active {
                s.is_active = active;
            }
            Ok(())
        })
    }

    /// Delete staff by id
    pub fn delete_staff(&self, id: &str) -> StoreResult<bool> {
        self.remove(STAFF_TABLE, id)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use shared::models::StaffRole;

    fn make_staff(id: &str, username: &str) -> Staff {
        Staff {
            id: id.to_string(),
            restaurant_id: "r1".to_string(),
            name: format!("Staff {}", id),
            username: username.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: StaffRole::Waiter,
            permissions: vec!["waiter:view".to_string()],
            is_active: true,
            created_at: 0,
        }
    }

    #[test]
    fn test_username_uniqueness() {
        let store = memory_store();
        store.insert_staff(&make_staff("s1", "ana")).unwrap();

        let duplicate = store.insert_staff(&make_staff("s2", "ana"));
        assert!(matches!(duplicate, Err(StoreError::Conflict(_))));

        // Re-inserting the same record is fine (upsert)
        store.insert_staff(&make_staff("s1", "ana")).unwrap();
    }

    #[test]
    fn test_find_by_username() {
        let store = memory_store();
        store.insert_staff(&make_staff("s1", "ana")).unwrap();
        assert_eq!(
            store.find_staff_by_username("ana").unwrap().unwrap().id,
            "s1"
        );
        assert!(store.find_staff_by_username("bob").unwrap().is_none());
    }
}
