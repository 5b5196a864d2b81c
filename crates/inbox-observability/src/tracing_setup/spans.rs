//! Span definitions per operation: configure, compute, snapshot.

/// Create a configure span.
#[macro_export]
macro_rules! configure_span {
    ($feature:expr, $user:expr) => {
        tracing::debug_span!("inbox.configure", feature = %$feature, user = %$user)
    };
}

/// Create a compute span.
#[macro_export]
macro_rules! compute_span {
    ($feature:expr, $message:expr) => {
        tracing::trace_span!("inbox.compute", feature = %$feature, message = %$message)
    };
}

/// Create a snapshot span.
#[macro_export]
macro_rules! snapshot_span {
    ($op:expr, $features:expr) => {
        tracing::info_span!("inbox.snapshot", op = %$op, features = $features)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const CONFIGURE: &str = "inbox.configure";
    pub const COMPUTE: &str = "inbox.compute";
    pub const SNAPSHOT: &str = "inbox.snapshot";
}
