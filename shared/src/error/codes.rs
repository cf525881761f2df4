//! Unified error codes for the Mesa platform
//!
//! This module defines all error codes used across the server and clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Restaurant (tenant) errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu errors
//! - 7xxx: Table / session / QR errors
//! - 8xxx: Staff errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,

    // ==================== 3xxx: Restaurant ====================
    /// Restaurant not found
    RestaurantNotFound = 3001,
    /// Restaurant is inactive
    RestaurantInactive = 3002,
    /// Restaurant subdomain already exists
    SubdomainExists = 3003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been paid
    OrderAlreadyPaid = 4002,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4003,
    /// Status transition is not legal
    InvalidTransition = 4004,
    /// Order has no items
    OrderEmpty = 4005,
    /// Transition not permitted for the acting role view
    TransitionNotAllowed = 4006,

    // ==================== 5xxx: Payment ====================
    /// Payment processing failed
    PaymentFailed = 5001,
    /// Payment amount exceeds remaining balance
    PaymentExceedsRemaining = 5002,
    /// Order cannot be completed while balance remains
    PaymentIncomplete = 5003,
    /// Invalid payment method
    PaymentInvalidMethod = 5004,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item is unavailable
    MenuItemUnavailable = 6002,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category has associated items
    CategoryHasItems = 6102,

    // ==================== 7xxx: Table / Session / QR ====================
    /// QR token not found
    QrTokenNotFound = 7001,
    /// QR token is inactive (ordering closed for this session)
    QrTokenInactive = 7002,
    /// QR token has expired
    QrTokenExpired = 7003,
    /// Table session not found
    SessionNotFound = 7101,
    /// Client is not a member of the session
    ClientNotInSession = 7102,

    // ==================== 8xxx: Staff ====================
    /// Staff member not found
    StaffNotFound = 8001,
    /// Staff username already exists
    StaffUsernameExists = 8002,
    /// Cannot delete own account
    StaffCannotDeleteSelf = 8003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// Client disconnected
    ClientDisconnected = 9301,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",

            // Restaurant
            ErrorCode::RestaurantNotFound => "Restaurant not found",
            ErrorCode::RestaurantInactive => "Restaurant is inactive",
            ErrorCode::SubdomainExists => "Subdomain already exists",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyPaid => "Order has already been paid",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::InvalidTransition => "Illegal order status transition",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::TransitionNotAllowed => "Transition not permitted for this role",

            // Payment
            ErrorCode::PaymentFailed => "Payment processing failed",
            ErrorCode::PaymentExceedsRemaining => "Payment amount exceeds remaining balance",
            ErrorCode::PaymentIncomplete => "Order balance has not reached zero",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemUnavailable => "Menu item is unavailable",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryHasItems => "Category has associated menu items",

            // Table / Session / QR
            ErrorCode::QrTokenNotFound => "QR token not found",
            ErrorCode::QrTokenInactive => "QR token is inactive",
            ErrorCode::QrTokenExpired => "QR token has expired",
            ErrorCode::SessionNotFound => "Table session not found",
            ErrorCode::ClientNotInSession => "Client is not a member of the session",

            // Staff
            ErrorCode::StaffNotFound => "Staff member not found",
            ErrorCode::StaffUsernameExists => "Staff username already exists",
            ErrorCode::StaffCannotDeleteSelf => "Cannot delete own account",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::ClientDisconnected => "Client disconnected",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),

            // Restaurant
            3001 => Ok(ErrorCode::RestaurantNotFound),
            3002 => Ok(ErrorCode::RestaurantInactive),
            3003 => Ok(ErrorCode::SubdomainExists),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyPaid),
            4003 => Ok(ErrorCode::OrderAlreadyCancelled),
            4004 => Ok(ErrorCode::InvalidTransition),
            4005 => Ok(ErrorCode::OrderEmpty),
            4006 => Ok(ErrorCode::TransitionNotAllowed),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5002 => Ok(ErrorCode::PaymentExceedsRemaining),
            5003 => Ok(ErrorCode::PaymentIncomplete),
            5004 => Ok(ErrorCode::PaymentInvalidMethod),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuItemUnavailable),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6102 => Ok(ErrorCode::CategoryHasItems),

            // Table / Session / QR
            7001 => Ok(ErrorCode::QrTokenNotFound),
            7002 => Ok(ErrorCode::QrTokenInactive),
            7003 => Ok(ErrorCode::QrTokenExpired),
            7101 => Ok(ErrorCode::SessionNotFound),
            7102 => Ok(ErrorCode::ClientNotInSession),

            // Staff
            8001 => Ok(ErrorCode::StaffNotFound),
            8002 => Ok(ErrorCode::StaffUsernameExists),
            8003 => Ok(ErrorCode::StaffCannotDeleteSelf),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),
            9301 => Ok(ErrorCode::ClientDisconnected),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
