//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::RestaurantNotFound
            | Self::OrderNotFound
            | Self::MenuItemNotFound
            | Self::CategoryNotFound
            | Self::QrTokenNotFound
            | Self::SessionNotFound
            | Self::StaffNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::SubdomainExists
            | Self::OrderAlreadyPaid
            | Self::OrderAlreadyCancelled
            | Self::CategoryHasItems
            | Self::StaffUsernameExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::RoleRequired
            | Self::RestaurantInactive
            | Self::QrTokenInactive
            | Self::QrTokenExpired
            | Self::StaffCannotDeleteSelf => StatusCode::FORBIDDEN,

            // 422 Unprocessable Entity
            Self::InvalidTransition
            | Self::TransitionNotAllowed
            | Self::PaymentExceedsRemaining
            | Self::PaymentIncomplete
            | Self::MenuItemUnavailable
            | Self::OrderEmpty => StatusCode::UNPROCESSABLE_ENTITY,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::PaymentInvalidMethod
            | Self::ClientNotInSession => StatusCode::BAD_REQUEST,

            // 500 Internal Server Error
            Self::Unknown
            | Self::PaymentFailed
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::ClientDisconnected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
        assert_eq!(ErrorCode::OrderNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::StaffUsernameExists.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::QrTokenInactive.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ErrorCode::PaymentExceedsRemaining.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
