//! Errors surfaced by the copy controller.

use thiserror::Error;

/// A clipboard write that did not happen.
///
/// Both variants are the same failure from the page's point of view: the text
/// never reached the clipboard. They are logged and swallowed by the
/// controller, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// No clipboard in this context (no window, insecure origin, old browser).
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    /// The `writeText` promise rejected, e.g. permission denied.
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
}
