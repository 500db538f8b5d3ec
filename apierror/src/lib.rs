//! # apierror
//!
//! Structured errors for API services: a transport status, an application
//! code, a short message, an optional cause and the call site that raised it.
//!
//! ## Design Philosophy
//!
//! - **Sentinels**: declare each error category once (`NOT_FOUND`, `UNAUTHORIZED`, ...)
//! - **Derivation**: enrich a sentinel at the error site without mutating it
//! - **Identity**: `status`, `code` and `message` survive every derivation,
//!   so category checks against the sentinel keep working
//! - **Cheap capture**: the call site is recorded eagerly, symbols are only
//!   resolved when the error is printed with `{:?}`
//!
//! ## Usage
//!
//! ```rust
//! use apierror::{wrap_messagef, ApiError, NOT_FOUND};
//!
//! fn find_user(id: u64) -> apierror::Result<String> {
//!     Err(wrap_messagef!(NOT_FOUND, "user {}", id))
//! }
//!
//! let err = find_user(42).unwrap_err();
//! assert_eq!(err.to_string(), "not found");
//! assert_eq!(err.status(), 404);
//! assert!(err.is(&NOT_FOUND));
//!
//! // `{:?}` adds the cause and the call site
//! let detail = format!("{:?}", err);
//! assert!(detail.starts_with("not found: user 42\n"));
//!
//! // Still recoverable after moving into anyhow
//! let any: anyhow::Error = err.into();
//! assert!(ApiError::is_category(&*any, &NOT_FOUND));
//! ```
//!
//! ## Principles
//!
//! - `Display` is the short message only; the cause is reached through `source()`
//! - Derive at the site where the error is observed: `trace`, `wrap`, `wrap_message`
//! - Compare categories with `is`, not by address
//! - Sentinels are shared; never rebuild them per request
//!
//! ## Feature Flags
//!
//! | Flag        | Effect |
//! |-------------|--------|
//! | `backtrace` | Resolve the caller's function name in `{:?}` output (default) |

mod convert;
mod error;
mod frame;
pub mod sentinel;

pub use convert::{ResultExt, TraceExt};
pub use error::ApiError;
pub use frame::Frame;
pub use sentinel::{BAD_REQUEST, INTERNAL_SERVER_ERROR, NOT_FOUND, UNAUTHORIZED, UNKNOWN};

/// Result type alias using ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

/// Derive from an error with a formatted message as the cause.
///
/// `wrap_messagef!(NOT_FOUND, "user {}", id)` is
/// `NOT_FOUND.wrap_message_fmt(format_args!("user {}", id))`.
#[macro_export]
macro_rules! wrap_messagef {
    ($err:expr, $($arg:tt)+) => {
        $err.wrap_message_fmt(::std::format_args!($($arg)+))
    };
}
