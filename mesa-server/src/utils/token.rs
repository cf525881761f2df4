//! 二维码令牌工具
//!
//! 明文令牌只在签发响应里出现一次；存储和比对都走 sha256 摘要。

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::store::Store;
use shared::models::QrToken;
use shared::{AppError, AppResult, ErrorCode};

/// 生成新的明文令牌 (32 随机字节, base64url)
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// 明文令牌 → sha256 hex 摘要
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// 门禁检查: 令牌必须存在、有效、未过期
///
/// 过期但仍标记有效的令牌顺手失效落库。购物车/下单等一切
/// 变更操作都要先过这道门。
pub fn require_active_token(store: &Store, token: &str) -> AppResult<QrToken> {
    let digest = token_digest(token);
    let record = store
        .find_token(&digest)
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::QrTokenNotFound))?;

    if !record.is_active {
        return Err(AppError::qr_token_inactive());
    }

    let now = crate::utils::now_millis();
    if now >= record.expires_at {
        let _ = store.deactivate_token(&digest);
        return Err(AppError::new(ErrorCode::QrTokenExpired));
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::memory_store;

    #[test]
    fn test_digest_is_stable_and_hex() {
        let d1 = token_digest("abc");
        let d2 = token_digest("abc");
        assert_eq!(d1, d2);
        assert_eq!(d1.len(), 64);
        assert_ne!(d1, token_digest("abd"));
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn test_gate_rejects_unknown_inactive_expired() {
        let store = memory_store();
        let now = crate::utils::now_millis();

        // unknown
        let err = require_active_token(&store, "ghost").unwrap_err();
        assert_eq!(err.code, ErrorCode::QrTokenNotFound);

        // inactive
        let token = generate_token();
        store
            .insert_token(&QrToken {
                digest: token_digest(&token),
                restaurant_id: "r1".into(),
                table_number: 5,
                is_active: false,
                issued_at: now,
                expires_at: now + 60_000,
            })
            .unwrap();
        let err = require_active_token(&store, &token).unwrap_err();
        assert_eq!(err.code, ErrorCode::QrTokenInactive);

        // expired (and flips to inactive on check)
        let expired = generate_token();
        store
            .insert_token(&QrToken {
                digest: token_digest(&expired),
                restaurant_id: "r1".into(),
                table_number: 5,
                is_active: true,
                issued_at: now - 120_000,
                expires_at: now - 60_000,
            })
            .unwrap();
        let err = require_active_token(&store, &expired).unwrap_err();
        assert_eq!(err.code, ErrorCode::QrTokenExpired);
        assert!(
            !store
                .find_token(&token_digest(&expired))
                .unwrap()
                .unwrap()
                .is_active
        );
    }

    #[test]
    fn test_gate_accepts_active_token() {
        let store = memory_store();
        let now = crate::utils::now_millis();
        let token = generate_token();
        store
            .insert_token(&QrToken {
                digest: token_digest(&token),
                restaurant_id: "r1".into(),
                table_number: 5,
                is_active: true,
                issued_at: now,
                expires_at: now + 60_000,
            })
            .unwrap();

        let record = require_active_token(&store, &token).unwrap();
        assert_eq!(record.table_number, 5);
    }
}
