//! QR token repository
//!
//! Tokens are keyed by their sha256 digest; the plain token never touches
//! disk. 同一桌台同时只保留一个有效令牌。

use super::{QR_TOKENS_TABLE, Store, StoreResult};
use redb::ReadableTable;
use shared::models::QrToken;

impl Store {
    /// Insert a token record
    pub fn insert_token(&self, token: &QrToken) -> StoreResult<()> {
        self.put(QR_TOKENS_TABLE, &token.digest, token)
    }

    /// Find a token by digest
    pub fn find_token(&self, digest: &str) -> StoreResult<Option<QrToken>> {
        self.get(QR_TOKENS_TABLE, digest)
    }

    /// Deactivate a token (payment completed / superseded)
    pub fn deactivate_token(&self, digest: &str) -> StoreResult<QrToken> {
        self.update(QR_TOKENS_TABLE, digest, |t: &mut QrToken| {
            t.is_active = false;
            Ok(())
        })
    }

    /// Deactivate all active tokens of one table (new token supersedes old)
    ///
    /// Returns the number of tokens deactivated.
    pub fn deactivate_tokens_for_table(
        &self,
        restaurant_id: &str,
        table_number: i32,
    ) -> StoreResult<usize> {
        self.deactivate_matching(|t| {
            t.is_active && t.restaurant_id == restaurant_id && t.table_number == table_number
        })
    }

    /// Deactivate every active token past its expiry (periodic sweep)
    pub fn deactivate_expired_tokens(&self, now: i64) -> StoreResult<usize> {
        self.deactivate_matching(|t| t.is_active && now >= t.expires_at)
    }

    fn deactivate_matching(&self, matches: impl Fn(&QrToken) -> bool) -> StoreResult<usize> {
        let write_txn = self.db.begin_write()?;
        let count = {
            let mut table = write_txn.open_table(QR_TOKENS_TABLE)?;

            // Collect first - the iterator borrows the table
            let mut stale: Vec<QrToken> = Vec::new();
            for entry in table.iter()? {
                let (_, value) = entry?;
                let token: QrToken = serde_json::from_slice(value.value())?;
                if matches(&token) {
                    stale.push(token);
                }
            }

            let count = stale.len();
            for mut token in stale {
                token.is_active = false;
                let bytes = serde_json::to_vec(&token)?;
                table.insert(token.digest.as_str(), bytes.as_slice())?;
            }
            count
        };
        write_txn.commit()?;
        Ok(count)
    }
}
