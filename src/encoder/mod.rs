//! Lossless command wrapping.
//!
//! A wrapped command re-invokes bash on the base64 form of the original bytes:
//!
//! ```text
//! bash -c "$(echo '<BASE64>' | base64 -d)"
//! ```
//!
//! The standard base64 alphabet (`A-Z a-z 0-9 + / =`) contains no quote,
//! backslash, `$`, backtick or newline, so the payload is always safe inside
//! the single-quoted `echo` argument whatever the original command contains.
//! The transform is defined for every byte sequence and never fails.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Everything before the encoded payload.
pub const WRAP_PREFIX: &str = "bash -c \"$(echo '";

/// Everything after the encoded payload.
pub const WRAP_SUFFIX: &str = "' | base64 -d)\"";

/// Encode raw bytes as padded standard base64 on a single line.
pub fn encode(command: impl AsRef<[u8]>) -> String {
    STANDARD.encode(command.as_ref())
}

/// Wrap a command so that executing the result runs exactly the original bytes.
pub fn wrap(command: impl AsRef<[u8]>) -> String {
    let encoded = encode(command);
    let mut wrapped = String::with_capacity(WRAP_PREFIX.len() + encoded.len() + WRAP_SUFFIX.len());
    wrapped.push_str(WRAP_PREFIX);
    wrapped.push_str(&encoded);
    wrapped.push_str(WRAP_SUFFIX);
    wrapped
}

/// Recover the original bytes from a string produced by [`wrap`].
///
/// Returns `None` if `wrapped` does not have the exact wrapper shape or the
/// payload is not valid base64.
pub fn decode_wrapped(wrapped: &str) -> Option<Vec<u8>> {
    let payload = wrapped.strip_prefix(WRAP_PREFIX)?.strip_suffix(WRAP_SUFFIX)?;
    STANDARD.decode(payload).ok()
}
