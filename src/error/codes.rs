//! Error code constants.
//!
//! Error codes are organized by category:
//! - 1xxx: Validation errors
//! - 2xxx: Resource errors (missing or conflicting records)
//! - 5xxx: Internal/System errors

/// Error code type with semantic categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(i32);

impl ErrorCode {
    // ===== Validation Errors (1xxx) =====

    /// Bad request / invalid parameters.
    pub const BAD_REQUEST: Self = Self(1001);

    /// URL failed the shortener's format check.
    pub const INVALID_URL: Self = Self(1002);

    // ===== Resource Errors (2xxx) =====

    /// No user with the requested id.
    pub const USER_NOT_FOUND: Self = Self(2001);

    /// No URL behind the requested short code.
    pub const SHORT_URL_NOT_FOUND: Self = Self(2002);

    /// Username is already registered.
    pub const USERNAME_TAKEN: Self = Self(2003);

    /// Short code is already assigned to another URL.
    pub const SHORT_CODE_CONFLICT: Self = Self(2004);

    // ===== Internal/System Errors (5xxx) =====

    /// Storage backend error.
    pub const STORAGE_ERROR: Self = Self(5001);

    /// Internal server error.
    pub const INTERNAL_ERROR: Self = Self(5002);

    /// Get the error code as an i32.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Get the category of this error code.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self.0 {
            1000..=1999 => ErrorCategory::Validation,
            2000..=2999 => ErrorCategory::Resource,
            5000..=5999 => ErrorCategory::Internal,
            _ => ErrorCategory::Unknown,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.0
    }
}

/// Error category based on error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Validation errors (1xxx).
    Validation,
    /// Resource errors (2xxx).
    Resource,
    /// Internal/system errors (5xxx).
    Internal,
    /// Unknown category.
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Resource => write!(f, "resource"),
            Self::Internal => write!(f, "internal"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::BAD_REQUEST.as_i32(), 1001);
        assert_eq!(ErrorCode::INVALID_URL.as_i32(), 1002);
        assert_eq!(ErrorCode::USER_NOT_FOUND.as_i32(), 2001);
        assert_eq!(ErrorCode::SHORT_URL_NOT_FOUND.as_i32(), 2002);
        assert_eq!(ErrorCode::INTERNAL_ERROR.as_i32(), 5002);
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(ErrorCode::INVALID_URL.category(), ErrorCategory::Validation);
        assert_eq!(
            ErrorCode::USERNAME_TAKEN.category(),
            ErrorCategory::Resource
        );
        assert_eq!(
            ErrorCode::STORAGE_ERROR.category(),
            ErrorCategory::Internal
        );
        assert_eq!(ErrorCategory::Resource.to_string(), "resource");
    }
}
