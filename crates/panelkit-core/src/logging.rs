//! Structured logging shim.
//!
//! With the `tracing` feature enabled this module re-exports the `tracing`
//! macros, and the crate root re-exports them again so dependents can write
//! `use panelkit_core::{debug, warn};` without naming `tracing` themselves.
//!
//! Without the feature, same-named macros are exported at the crate root that
//! expand to nothing (events) or to a [`NoopSpan`] (spans), so call sites
//! compile identically in both configurations.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Install a JSON `tracing` subscriber filtered by `RUST_LOG`.
///
/// Intended for hosts that embed panelkit in a service without their own
/// subscriber. Returns an error if a global subscriber is already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
}

/// Span stand-in used when the `tracing` feature is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpan;

impl NoopSpan {
    /// Mirrors `tracing::Span::entered`.
    #[inline]
    #[must_use]
    pub fn entered(self) -> Self {
        self
    }

    /// Mirrors `tracing::Span::in_scope`.
    #[inline]
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        f()
    }
}

#[cfg(not(feature = "tracing"))]
mod noop {
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! trace_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    #[macro_export]
    macro_rules! info_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    #[macro_export]
    macro_rules! warn_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    #[macro_export]
    macro_rules! error_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}
