//! Conversions from foreign errors and `Result` helpers.

use crate::sentinel::{BAD_REQUEST, INTERNAL_SERVER_ERROR, NOT_FOUND, UNAUTHORIZED};
use crate::ApiError;
use std::io;

// =============================================================================
// From<io::Error> - pick a sentinel by kind, keep the io error as cause
// =============================================================================

impl From<io::Error> for ApiError {
    #[track_caller]
    fn from(err: io::Error) -> Self {
        let sentinel: &ApiError = match err.kind() {
            io::ErrorKind::NotFound => &*NOT_FOUND,
            io::ErrorKind::PermissionDenied => &*UNAUTHORIZED,
            io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData => &*BAD_REQUEST,
            _ => &*INTERNAL_SERVER_ERROR,
        };
        sentinel.wrap(err)
    }
}

// =============================================================================
// Result extensions
// =============================================================================

/// Derive from a sentinel on the error path of any `Result`.
///
/// ```rust
/// use apierror::{ResultExt, NOT_FOUND};
///
/// fn load(name: &str) -> apierror::Result<String> {
///     std::fs::read_to_string(name).wrap_err(&NOT_FOUND)
/// }
///
/// let err = load("/definitely/missing").unwrap_err();
/// assert!(err.is(&NOT_FOUND));
/// ```
pub trait ResultExt<T> {
    /// Wrap the error as the cause of a value derived from `sentinel`.
    fn wrap_err(self, sentinel: &ApiError) -> crate::Result<T>;

    /// Like [`wrap_err`](ResultExt::wrap_err), but the error text is
    /// prefixed with `message` in the cause.
    fn wrap_err_msg(self, sentinel: &ApiError, message: &str) -> crate::Result<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[track_caller]
    fn wrap_err(self, sentinel: &ApiError) -> crate::Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(sentinel.wrap(err)),
        }
    }

    #[track_caller]
    fn wrap_err_msg(self, sentinel: &ApiError, message: &str) -> crate::Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(sentinel.wrap(anyhow::Error::new(err).context(message.to_string()))),
        }
    }
}

/// Re-stamp the call site of an `ApiError` while propagating it.
pub trait TraceExt<T> {
    fn trace_err(self) -> crate::Result<T>;
}

impl<T> TraceExt<T> for crate::Result<T> {
    #[track_caller]
    fn trace_err(self) -> crate::Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.trace()),
        }
    }
}
