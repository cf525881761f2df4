//! Permission Definitions
//!
//! Simplified RBAC permission system.
//!
//! ## 设计原则
//! - 顾客侧接口（菜单浏览、会话、下单）由二维码令牌门禁，不走 JWT 权限
//! - 面板权限：按面板授权 (kitchen/cashier/waiter/reports)
//! - 敏感操作：单独控制高风险操作（作废、硬删除、收款）
//! - 员工管理：仅 manager/admin 可用

use shared::models::StaffRole;

/// 可配置权限列表
/// 不包含 "all"，这是系统级权限
pub const ALL_PERMISSIONS: &[&str] = &[
    // === 面板权限 (4) ===
    "kitchen:view",      // 厨房面板
    "cashier:view",      // 收银面板
    "waiter:view",       // 服务员面板
    "reports:view",      // 报表查看

    // === 模块化权限 (3) ===
    "menu:manage",       // 菜单管理（菜品/分类 增删改查）
    "menu:availability", // 菜品售罄切换（厨房侧信道操作）
    "staff:manage",      // 员工管理
    "qr:manage",         // 桌台二维码管理

    // === 敏感操作 (4) ===
    "orders:update",     // 订单状态流转
    "orders:cancel",     // 取消订单
    "orders:delete",     // 硬删除订单（厨房清理）
    "orders:settle",     // 收款（单笔/拆分支付）
];

/// Get the default permissions for a role
pub fn default_permissions(role: StaffRole) -> Vec<String> {
    let perms: &[&str] = match role {
        StaffRole::Admin => &["all"],
        StaffRole::Manager => ALL_PERMISSIONS,
        StaffRole::Waiter => &["waiter:view", "orders:update", "orders:cancel"],
        StaffRole::Chef => &[
            "kitchen:view",
            "orders:update",
            "orders:delete",
            "menu:availability",
        ],
        StaffRole::Cashier => &["cashier:view", "orders:settle", "orders:update"],
    };
    perms.iter().map(|s| s.to_string()).collect()
}

/// Validate if a permission string is valid
pub fn is_valid_permission(permission: &str) -> bool {
    permission == "all" || ALL_PERMISSIONS.contains(&permission) || permission.ends_with(":*")
}
