//! Secret redaction for diagnostic output.
//!
//! Nothing here touches the wrap decision or the encoder. The diagnostic log
//! sink runs every line through a [`Redactor`] before it reaches disk.

pub mod patterns;

use std::borrow::Cow;

pub use patterns::PatternRedactor;

/// Text substituted for a redacted secret value.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Trait for filters that scrub sensitive values out of text.
pub trait Redactor: Send + Sync {
    /// Return `text` with every sensitive value replaced by [`REDACTION_MARKER`].
    ///
    /// Borrows the input unchanged when nothing matched.
    fn redact<'a>(&self, text: &'a str) -> Cow<'a, str>;
}
