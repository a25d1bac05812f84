//! Typed error enum for list loads.

use thiserror::Error;

/// Why a load produced no page. `E` is the list source's own error type.
#[derive(Debug, Error)]
pub enum LoadError<E> {
    /// The source failed. Reported to the renderer exactly once.
    #[error("listing request failed: {0}")]
    Source(#[source] E),

    /// A newer request (or a filter change) replaced this one before it finished.
    #[error("request #{seq} discarded: a newer request was issued")]
    Superseded { seq: u64 },

    /// The request was cancelled while in flight.
    #[error("request #{seq} was cancelled")]
    Cancelled { seq: u64 },
}

impl<E> LoadError<E> {
    /// Superseded and cancelled loads are silent: nothing was rendered and
    /// nothing needs to be reported.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::Superseded { .. } | Self::Cancelled { .. })
    }

    /// The source error, if this was a real failure.
    pub fn into_source(self) -> Option<E> {
        match self {
            Self::Source(e) => Some(e),
            _ => None,
        }
    }
}
