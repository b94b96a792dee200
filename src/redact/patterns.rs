//! Regex-based secret redactor.
//!
//! Ships with two kinds of built-in patterns:
//!
//! | Kind | Patterns | Replacement |
//! |------|----------|-------------|
//! | Keyed | `api_key=...`, `token: ...`, `bearer ...`, `password=...`, `secret=...` | `<key>=[REDACTED]` |
//! | Bare | OpenAI, Anthropic, GitHub, AWS, Google AI, HuggingFace, Groq, Slack, private key headers | `[REDACTED]` |
//!
//! Keyed patterns keep the key name so a reader of the log can still tell
//! which setting was present. Patterns are applied in declaration order.

use std::borrow::Cow;

use regex::{Captures, NoExpand, Regex};

use super::{Redactor, REDACTION_MARKER};

/// A compiled pattern and how its matches are replaced.
struct SecretPattern {
    name: &'static str,
    regex: Regex,
    /// Capture group 1 holds a key name to keep in the output.
    keyed: bool,
}

/// A redactor that replaces matches of a fixed list of regex patterns.
///
/// Use [`PatternRedactor::new()`] for all built-in patterns, or
/// [`PatternRedactor::with_patterns()`] for a specific subset.
pub struct PatternRedactor {
    patterns: Vec<SecretPattern>,
}

fn keyed(name: &'static str, pattern: &str) -> SecretPattern {
    SecretPattern {
        name,
        regex: Regex::new(pattern).unwrap(),
        keyed: true,
    }
}

fn bare(name: &'static str, pattern: &str) -> SecretPattern {
    SecretPattern {
        name,
        regex: Regex::new(pattern).unwrap(),
        keyed: false,
    }
}

impl PatternRedactor {
    /// Create a `PatternRedactor` with all built-in patterns.
    pub fn new() -> Self {
        let patterns = vec![
            // === Key/value assignments ===
            keyed(
                "api-key",
                r#"(?i)(api[_-]?key)[\s=:]+['"]?[A-Za-z0-9_\-]{16,}['"]?"#,
            ),
            keyed(
                "token",
                r#"(?i)(token|bearer)[\s=:]+['"]?[A-Za-z0-9_.\-]{16,}['"]?"#,
            ),
            keyed(
                "password",
                r#"(?i)(password|passwd|pwd)[\s=:]+['"]?[^\s'"]{8,}['"]?"#,
            ),
            keyed(
                "secret",
                r#"(?i)(secret|auth)[\s=:]+['"]?[A-Za-z0-9_\-]{16,}['"]?"#,
            ),
            // === Provider tokens ===
            bare("anthropic-api-key", r"sk-ant-(?:api03|admin)[A-Za-z0-9_-]{20,}"),
            bare("openai-api-key", r"sk-(?:proj-|svcacct-)?[A-Za-z0-9_-]{20,}"),
            bare("github-token", r"gh[pousr]_[A-Za-z0-9]{36,}"),
            bare("aws-access-key", r"AKIA[0-9A-Z]{16}"),
            bare("google-ai-api-key", r"AIzaSy[A-Za-z0-9_-]{33}"),
            bare("huggingface-token", r"hf_[A-Za-z0-9]{20,}"),
            bare("groq-api-key", r"gsk_[A-Za-z0-9]{20,}"),
            bare("slack-token", r"xox[baprs]-[A-Za-z0-9-]{10,}"),
            bare("private-key", r"-----BEGIN (?:RSA |EC |DSA |OPENSSH )?PRIVATE KEY-----"),
        ];

        Self { patterns }
    }

    /// Create a `PatternRedactor` with only the specified pattern names (subset of built-in).
    ///
    /// Patterns not found in the built-in set are silently ignored.
    pub fn with_patterns(pattern_names: &[String]) -> Self {
        let patterns = Self::new()
            .patterns
            .into_iter()
            .filter(|p| pattern_names.iter().any(|n| n == p.name))
            .collect();
        Self { patterns }
    }

    /// Names of the active patterns, in application order.
    pub fn pattern_names(&self) -> Vec<&'static str> {
        self.patterns.iter().map(|p| p.name).collect()
    }
}

impl Default for PatternRedactor {
    fn default() -> Self {
        Self::new()
    }
}

impl Redactor for PatternRedactor {
    fn redact<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut result = Cow::Borrowed(text);

        for pattern in &self.patterns {
            if !pattern.regex.is_match(&result) {
                continue;
            }
            let replaced = if pattern.keyed {
                pattern
                    .regex
                    .replace_all(&result, |caps: &Captures| {
                        format!("{}={}", &caps[1], REDACTION_MARKER)
                    })
                    .into_owned()
            } else {
                pattern
                    .regex
                    .replace_all(&result, NoExpand(REDACTION_MARKER))
                    .into_owned()
            };
            result = Cow::Owned(replaced);
        }

        result
    }
}
