//! Process-wide sentinel errors.
//!
//! Derive from these at the error site (`NOT_FOUND.wrap_message(..)`) and
//! compare against them with [`ApiError::is`].

use crate::ApiError;
use once_cell::sync::Lazy;

/// 500 / 0
pub static UNKNOWN: Lazy<ApiError> = Lazy::new(|| ApiError::new(500, 0, "unknown"));

/// 500 / 1
pub static INTERNAL_SERVER_ERROR: Lazy<ApiError> =
    Lazy::new(|| ApiError::new(500, 1, "internal server error"));

/// 400 / 2
pub static BAD_REQUEST: Lazy<ApiError> = Lazy::new(|| ApiError::new(400, 2, "bad request"));

/// 404 / 3
pub static NOT_FOUND: Lazy<ApiError> = Lazy::new(|| ApiError::new(404, 3, "not found"));

/// 401 / 4
pub static UNAUTHORIZED: Lazy<ApiError> = Lazy::new(|| ApiError::new(401, 4, "unauthorized"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_table() {
        let table: [(&ApiError, u16, i32, &str); 5] = [
            (&*UNKNOWN, 500, 0, "unknown"),
            (&*INTERNAL_SERVER_ERROR, 500, 1, "internal server error"),
            (&*BAD_REQUEST, 400, 2, "bad request"),
            (&*NOT_FOUND, 404, 3, "not found"),
            (&*UNAUTHORIZED, 401, 4, "unauthorized"),
        ];

        for (err, status, code, message) in table {
            assert_eq!(err.status(), status);
            assert_eq!(err.code(), code);
            assert_eq!(err.message(), message);
            assert!(err.cause().is_none());
            assert!(err.base().is_none());
            assert_eq!(err.frame().file(), file!());
        }
    }

    #[test]
    fn test_sentinels_are_distinct() {
        assert!(!UNKNOWN.is(&INTERNAL_SERVER_ERROR));
        assert!(!NOT_FOUND.is(&BAD_REQUEST));
        assert!(!UNAUTHORIZED.is(&NOT_FOUND));
    }

    #[test]
    fn test_trace_twice_keeps_status_and_code() {
        let err = NOT_FOUND.trace().trace();
        assert_eq!(err.status(), 404);
        assert_eq!(err.code(), 3);
        assert!(err.derives_from(&NOT_FOUND));
    }
}
