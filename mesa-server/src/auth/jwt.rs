//! JWT 令牌服务
//!
//! 处理员工 JWT 令牌的生成、验证和解析。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::models::StaffRole;
use thiserror::Error;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match load_jwt_secret() {
            Ok(secret) => secret,
            Err(e) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT configuration error: {}, using generated key", e);
                    generate_printable_jwt_secret()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("🚨 FATAL: JWT_SECRET configuration failed: {}", e);
                }
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 默认 24 小时
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "mesa-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "mesa-panels".to_string()),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 员工 ID (Subject)
    pub sub: String,
    /// 用户名
    pub username: String,
    /// 显示名
    pub name: String,
    /// 角色名称
    pub role: String,
    /// 所属餐厅 ID
    pub rid: String,
    /// 权限列表 (逗号分隔)
    pub permissions: String,
    /// 令牌类型
    pub token_type: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// 生成可打印的安全 JWT 密钥 (用于开发环境)
pub fn generate_printable_jwt_secret() -> String {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";
    let mut rng = rand::thread_rng();
    (0..64)
        .map(|_| ALLOWED[rng.gen_range(0..ALLOWED.len())] as char)
        .collect()
}

/// 从环境变量安全地加载 JWT 密钥
fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(JwtError::ConfigError(
                    "JWT_SECRET must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret)
        }
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!(
                    "⚠️  JWT_SECRET not set! Generating secure temporary key for development."
                );
                Ok(generate_printable_jwt_secret())
            }
            #[cfg(not(debug_assertions))]
            {
                Err(JwtError::ConfigError(
                    "JWT_SECRET environment variable must be set in production!".to_string(),
                ))
            }
        }
    }
}

/// JWT 令牌服务
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// 使用默认配置创建新的 JWT 服务
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为员工生成新令牌
    pub fn generate_token(
        &self,
        staff_id: &str,
        username: &str,
        name: &str,
        role: StaffRole,
        restaurant_id: &str,
        permissions: &[String],
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: staff_id.to_string(),
            username: username.to_string(),
            name: name.to_string(),
            role: role.as_str().to_string(),
            rid: restaurant_id.to_string(),
            permissions: permissions.join(","),
            token_type: "access".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 当前员工上下文 (从 JWT Claims 解析)
///
/// 由认证中间件创建，注入到请求处理函数
#[derive(Debug, Clone)]
pub struct CurrentStaff {
    /// 员工 ID
    pub id: String,
    /// 用户名
    pub username: String,
    /// 显示名
    pub name: String,
    /// 角色
    pub role: StaffRole,
    /// 所属餐厅 ID
    pub restaurant_id: String,
    /// 权限列表
    pub permissions: Vec<String>,
}

impl TryFrom<Claims> for CurrentStaff {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role = match claims.role.as_str() {
            "waiter" => StaffRole::Waiter,
            "chef" => StaffRole::Chef,
            "cashier" => StaffRole::Cashier,
            "manager" => StaffRole::Manager,
            "admin" => StaffRole::Admin,
            other => return Err(format!("unknown role: {}", other)),
        };

        let permissions = if claims.permissions.is_empty() {
            vec![]
        } else {
            claims
                .permissions
                .split(',')
                .map(|s| s.to_string())
                .collect()
        };

        Ok(Self {
            id: claims.sub,
            username: claims.username,
            name: claims.name,
            role,
            restaurant_id: claims.rid,
            permissions,
        })
    }
}

impl CurrentStaff {
    /// 是否管理员
    ///
    /// 管理员角色拥有所有权限
    pub fn is_admin(&self) -> bool {
        self.role == StaffRole::Admin
    }

    /// 检查是否拥有指定权限
    ///
    /// # 规则
    ///
    /// 1. 管理员拥有所有权限
    /// 2. 权限列表包含 `"all"` 则拥有所有权限
    /// 3. 精确匹配或前缀匹配 (`:*` 通配符)
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.is_admin() {
            return true;
        }

        if self.permissions.iter().any(|p| p == "all") {
            return true;
        }

        self.permissions.iter().any(|p| {
            if p == permission {
                return true;
            }
            // 通配符模式，如 "orders:*" 匹配 "orders:update"
            if let Some(prefix) = p.strip_suffix(":*") {
                return permission.starts_with(prefix)
                    && permission.as_bytes().get(prefix.len()) == Some(&b':');
            }
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-key-that-is-long-enough!".to_string(),
            expiration_minutes: 60,
            issuer: "mesa-server".to_string(),
            audience: "mesa-panels".to_string(),
        })
    }

    #[test]
    fn test_generate_and_validate() {
        let svc = test_service();
        let token = svc
            .generate_token(
                "s1",
                "ana",
                "Ana",
                StaffRole::Cashier,
                "r1",
                &["cashier:view".to_string()],
            )
            .unwrap();

        let claims = svc.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "s1");
        assert_eq!(claims.role, "cashier");
        assert_eq!(claims.rid, "r1");

        let staff = CurrentStaff::try_from(claims).unwrap();
        assert_eq!(staff.role, StaffRole::Cashier);
        assert_eq!(staff.permissions, vec!["cashier:view".to_string()]);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let svc = test_service();
        assert!(matches!(
            svc.validate_token("not-a-token"),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let svc = test_service();
        let token = svc
            .generate_token("s1", "ana", "Ana", StaffRole::Admin, "r1", &[])
            .unwrap();

        let other = JwtService::with_config(JwtConfig {
            secret: "another-secret-key-that-is-long-enough".to_string(),
            expiration_minutes: 60,
            issuer: "mesa-server".to_string(),
            audience: "mesa-panels".to_string(),
        });
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_permission_matching() {
        let staff = CurrentStaff {
            id: "s1".into(),
            username: "ana".into(),
            name: "Ana".into(),
            role: StaffRole::Cashier,
            restaurant_id: "r1".into(),
            permissions: vec!["cashier:view".into(), "orders:*".into()],
        };
        assert!(staff.has_permission("cashier:view"));
        assert!(staff.has_permission("orders:settle"));
        assert!(staff.has_permission("orders:update"));
        assert!(!staff.has_permission("staff:manage"));
    }

    #[test]
    fn test_admin_has_everything() {
        let staff = CurrentStaff {
            id: "s1".into(),
            username: "root".into(),
            name: "Root".into(),
            role: StaffRole::Admin,
            restaurant_id: "r1".into(),
            permissions: vec![],
        };
        assert!(staff.has_permission("staff:manage"));
        assert!(staff.has_permission("anything:at_all"));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let svc = test_service();
        let token = svc
            .generate_token("s1", "ana", "Ana", StaffRole::Waiter, "r1", &[])
            .unwrap();
        let mut claims = svc.validate_token(&token).unwrap();
        claims.role = "superuser".to_string();
        assert!(CurrentStaff::try_from(claims).is_err());
    }
}
