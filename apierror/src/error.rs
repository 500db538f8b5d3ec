//! The main Error type for apierror

use crate::Frame;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A structured API error.
///
/// Every value carries:
/// - `status`: transport status, e.g. an HTTP response code
/// - `code`: application-defined category number
/// - `message`: short, static, user-facing description
/// - `cause`: the underlying error (if any), exposed through `source()`
/// - `base`: the value this one was derived from (if any)
/// - `frame`: the call site that created or derived it
///
/// Values are cheap handles over immutable data. Deriving never touches the
/// receiver, so sentinels can be shared freely across threads.
///
/// # Example
///
/// ```rust
/// use apierror::{ApiError, NOT_FOUND};
///
/// let err = NOT_FOUND.wrap_message("user 42");
///
/// assert_eq!(err.to_string(), "not found");
/// assert_eq!(err.status(), 404);
/// assert!(err.is(&NOT_FOUND));
/// assert_eq!(err.cause().map(|c| c.to_string()).as_deref(), Some("user 42"));
///
/// let custom = ApiError::new(409, 10, "conflict");
/// assert!(custom.is_client_error());
/// ```
#[derive(Clone)]
pub struct ApiError {
    inner: Arc<Inner>,
}

struct Inner {
    status: u16,
    code: i32,
    message: Cow<'static, str>,
    cause: Option<Arc<anyhow::Error>>,
    base: Option<ApiError>,
    frame: Frame,
}

// Long derivation chains would otherwise be freed recursively, one stack
// frame per link. Unlink bases we own the last reference to in a loop.
impl Drop for Inner {
    fn drop(&mut self) {
        let mut next = self.base.take();
        while let Some(base) = next {
            next = Arc::into_inner(base.inner).and_then(|mut inner| inner.base.take());
        }
    }
}

impl ApiError {
    /// Create a root error. Nothing is validated; any status and code are accepted.
    #[track_caller]
    #[inline(never)]
    pub fn new(status: u16, code: i32, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                status,
                code,
                message: message.into(),
                cause: None,
                base: None,
                frame: Frame::capture(),
            }),
        }
    }

    fn derive(&self, cause: Option<Arc<anyhow::Error>>, frame: Frame) -> Self {
        Self {
            inner: Arc::new(Inner {
                status: self.inner.status,
                code: self.inner.code,
                message: self.inner.message.clone(),
                cause,
                base: Some(self.clone()),
                frame,
            }),
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Get the transport status
    pub fn status(&self) -> u16 {
        self.inner.status
    }

    /// Get the application code
    pub fn code(&self) -> i32 {
        self.inner.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// Get the wrapped cause (if any)
    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.inner.cause.as_deref()
    }

    /// Get the value this error was derived from (if any)
    pub fn base(&self) -> Option<&ApiError> {
        self.inner.base.as_ref()
    }

    /// Get the call site that created this value
    pub fn frame(&self) -> &Frame {
        &self.inner.frame
    }

    /// Iterate the base chain, nearest first. Does not include `self`.
    pub fn bases(&self) -> impl Iterator<Item = &ApiError> {
        std::iter::successors(self.base(), |err| err.base())
    }

    /// The root of the base chain, usually the sentinel this was derived from.
    pub fn root(&self) -> &ApiError {
        self.bases().last().unwrap_or(self)
    }

    /// True for 4xx statuses
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.inner.status)
    }

    /// True for 5xx statuses
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.inner.status)
    }

    // =========================================================================
    // Derivation
    // =========================================================================

    /// Re-stamp the current call site. The cause is carried over unchanged.
    #[track_caller]
    #[inline(never)]
    pub fn trace(&self) -> Self {
        self.derive(self.inner.cause.clone(), Frame::capture())
    }

    /// Wrap an existing error as the cause, keeping its own source chain.
    #[track_caller]
    #[inline(never)]
    pub fn wrap(&self, next: impl Into<anyhow::Error>) -> Self {
        self.derive(Some(Arc::new(next.into())), Frame::capture())
    }

    /// Use a plain message as the cause.
    #[track_caller]
    #[inline(never)]
    pub fn wrap_message(&self, message: impl Into<String>) -> Self {
        let cause = anyhow::Error::msg(message.into());
        self.derive(Some(Arc::new(cause)), Frame::capture())
    }

    /// Use formatted text as the cause. See also [`wrap_messagef!`](crate::wrap_messagef).
    #[track_caller]
    #[inline(never)]
    pub fn wrap_message_fmt(&self, args: fmt::Arguments<'_>) -> Self {
        let cause = anyhow::Error::msg(fmt::format(args));
        self.derive(Some(Arc::new(cause)), Frame::capture())
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Same category as `other`: equal status, code and message.
    ///
    /// Holds for every value derived from a sentinel, however deep.
    pub fn is(&self, other: &ApiError) -> bool {
        self.inner.status == other.inner.status
            && self.inner.code == other.inner.code
            && self.inner.message == other.inner.message
    }

    /// True if `self` is `ancestor`, or `ancestor` appears on the base chain.
    pub fn derives_from(&self, ancestor: &ApiError) -> bool {
        std::iter::once(self)
            .chain(self.bases())
            .any(|err| Arc::ptr_eq(&err.inner, &ancestor.inner))
    }

    /// Find the first `ApiError` on a `source()` chain, starting at `err`.
    pub fn find<'a>(err: &'a (dyn std::error::Error + 'static)) -> Option<&'a ApiError> {
        let mut current = Some(err);
        while let Some(err) = current {
            if let Some(api) = err.downcast_ref::<ApiError>() {
                return Some(api);
            }
            current = err.source();
        }
        None
    }

    /// True if the first `ApiError` on the chain of `err` has the category of `sentinel`.
    pub fn is_category(err: &(dyn std::error::Error + 'static), sentinel: &ApiError) -> bool {
        Self::find(err).is_some_and(|api| api.is(sentinel))
    }

    // =========================================================================
    // Logging
    // =========================================================================

    /// Emit one `tracing` event for this error.
    ///
    /// Server errors log at `ERROR`, everything else at `WARN`. The frame
    /// is logged as `file:line` only, so no symbols are resolved here.
    pub fn report(&self) {
        let cause = self.cause().map(tracing::field::display);
        if self.is_server_error() {
            tracing::error!(
                status = self.status(),
                code = self.code(),
                cause,
                location = %self.frame(),
                "{}",
                self.message()
            );
        } else {
            tracing::warn!(
                status = self.status(),
                code = self.code(),
                cause,
                location = %self.frame(),
                "{}",
                self.message()
            );
        }
    }
}

// =============================================================================
// Display - the message only
// =============================================================================

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.message)
    }
}

// =============================================================================
// Debug - message, cause and call site
// =============================================================================

impl fmt::Debug for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.cause {
            Some(cause) => writeln!(f, "{}: {}", self.inner.message, cause)?,
            None => writeln!(f, "{}", self.inner.message)?,
        }
        fmt::Debug::fmt(&self.inner.frame, f)
    }
}

// =============================================================================
// std::error::Error implementation
// =============================================================================

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner
            .cause
            .as_deref()
            .map(|cause| &**cause as &(dyn std::error::Error + 'static))
    }
}

// =============================================================================
// Equality follows the category, never the cause or frame
// =============================================================================

impl PartialEq for ApiError {
    fn eq(&self, other: &Self) -> bool {
        self.is(other)
    }
}

impl Eq for ApiError {}

impl Hash for ApiError {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.status.hash(state);
        self.inner.code.hash(state);
        self.inner.message.hash(state);
    }
}
