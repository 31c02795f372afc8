//! The logger capability role.
//!
//! Kept as an explicit trait (rather than having callers reach for
//! `tracing` macros directly) so the spec's "bind a logger" role language
//! still maps onto a concrete type, and so a `tracing`-free build stays
//! possible. The default implementation forwards to `tracing`.

/// `info`/`debug`/`warn`/`error`, each taking a pre-formatted message.
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn debug(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

impl<T: Logger + ?Sized> Logger for std::sync::Arc<T> {
    #[inline]
    fn info(&self, message: &str) {
        (**self).info(message)
    }

    #[inline]
    fn debug(&self, message: &str) {
        (**self).debug(message)
    }

    #[inline]
    fn warn(&self, message: &str) {
        (**self).warn(message)
    }

    #[inline]
    fn error(&self, message: &str) {
        (**self).error(message)
    }
}

/// Forwards every call to the matching `tracing` macro. This is the
/// `"console"` logger the spec's `logger` configuration option binds.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        #[cfg(feature = "tracing")]
        tracing::info!("{message}");
        #[cfg(not(feature = "tracing"))]
        let _ = message;
    }

    fn debug(&self, message: &str) {
        #[cfg(feature = "tracing")]
        tracing::debug!("{message}");
        #[cfg(not(feature = "tracing"))]
        let _ = message;
    }

    fn warn(&self, message: &str) {
        #[cfg(feature = "tracing")]
        tracing::warn!("{message}");
        #[cfg(not(feature = "tracing"))]
        let _ = message;
    }

    fn error(&self, message: &str) {
        #[cfg(feature = "tracing")]
        tracing::error!("{message}");
        #[cfg(not(feature = "tracing"))]
        let _ = message;
    }
}

/// Discards every message. Used in tests that would otherwise be noisy
/// with dispatch-retry logging.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn info(&self, _message: &str) {}
    fn debug(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
