use super::config::PolicyConfig;

/// Comment markers that always opt a command out of wrapping.
pub const BUILTIN_ESCAPE_MARKERS: [&str; 3] = ["# bypass-hook", "# no-wrap", "# skip-hook"];

/// A command starting with this prefix is treated as already wrapped.
pub const ALREADY_WRAPPED_PREFIX: &str = "bash -c ";

/// What to do with a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Replace the command with its wrapped form.
    Wrap,
    /// Send the command on unchanged.
    PassThrough,
}

/// Result of evaluating a command, including the decision and the reason.
#[derive(Debug, Clone)]
pub struct EvalResult {
    pub decision: Decision,
    pub reason: String,
    pub matched_marker: Option<String>,
}

impl EvalResult {
    pub fn should_wrap(&self) -> bool {
        self.decision == Decision::Wrap
    }

    fn pass(reason: &str) -> Self {
        Self {
            decision: Decision::PassThrough,
            reason: reason.to_string(),
            matched_marker: None,
        }
    }

    fn marker(marker: &str) -> Self {
        Self {
            decision: Decision::PassThrough,
            reason: format!("Escape marker present: {}", marker),
            matched_marker: Some(marker.to_string()),
        }
    }
}

/// Evaluate a command against the policy configuration.
///
/// Checks run in order and the first one that applies wins: empty command,
/// already wrapped, disabled, built-in marker, configured marker. Anything
/// left is wrapped. Shell syntax is never inspected.
pub fn evaluate(command: impl AsRef<[u8]>, config: &PolicyConfig) -> EvalResult {
    let cmd = trim_command(command.as_ref());

    if cmd.is_empty() {
        return EvalResult::pass("Empty command");
    }
    if cmd.starts_with(ALREADY_WRAPPED_PREFIX.as_bytes()) {
        return EvalResult::pass("Already wrapped");
    }
    if !config.enabled {
        return EvalResult::pass("Wrapping disabled by configuration");
    }

    if let Some(marker) = BUILTIN_ESCAPE_MARKERS
        .iter()
        .find(|m| contains(cmd, m.as_bytes()))
    {
        return EvalResult::marker(marker);
    }
    if let Some(marker) = config
        .additional_escape_markers
        .iter()
        .find(|m| contains(cmd, m.as_bytes()))
    {
        return EvalResult::marker(marker);
    }

    EvalResult {
        decision: Decision::Wrap,
        reason: "No exemption applies".to_string(),
        matched_marker: None,
    }
}

/// Boolean form of [`evaluate`]. `None` behaves like [`PolicyConfig::default`].
pub fn should_wrap(command: impl AsRef<[u8]>, config: Option<&PolicyConfig>) -> bool {
    match config {
        Some(config) => evaluate(command, config).should_wrap(),
        None => evaluate(command, &PolicyConfig::default()).should_wrap(),
    }
}

/// Strip space, tab, CR and LF from both ends.
fn trim_command(command: &[u8]) -> &[u8] {
    let is_blank = |b: &u8| matches!(b, b' ' | b'\t' | b'\n' | b'\r');
    let start = command.iter().position(|b| !is_blank(b)).unwrap_or(command.len());
    let end = command.iter().rposition(|b| !is_blank(b)).map_or(start, |i| i + 1);
    &command[start..end]
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> PolicyConfig {
        PolicyConfig::default()
    }

    fn with_markers(markers: &[&str]) -> PolicyConfig {
        PolicyConfig {
            additional_escape_markers: markers.iter().map(|s| s.to_string()).collect(),
            ..PolicyConfig::default()
        }
    }

    #[test]
    fn wraps_plain_commands() {
        for cmd in ["cd /home/user", "pwd", "ls -la", "git status", "echo hello"] {
            assert!(should_wrap(cmd, Some(&enabled())), "should wrap: {}", cmd);
        }
    }

    #[test]
    fn wraps_compound_shell_syntax() {
        for cmd in [
            "ls | grep test",
            "echo $(pwd)",
            "echo `pwd`",
            "git status && git diff",
            "for i in 1 2 3; do echo $i; done",
            r#"result=$(echo "test" | tr a-z A-Z); echo "Result: $result""#,
            r#"export TEST_VAR=alpha && echo "$TEST_VAR" | hexdump -C"#,
        ] {
            assert!(should_wrap(cmd, Some(&enabled())), "should wrap: {}", cmd);
        }
    }

    #[test]
    fn skips_blank_commands() {
        for cmd in ["", "   ", "\t", "\n", " \r\n\t "] {
            let result = evaluate(cmd, &enabled());
            assert_eq!(result.decision, Decision::PassThrough, "{:?}", cmd);
            assert_eq!(result.reason, "Empty command");
        }
    }

    #[test]
    fn skips_already_wrapped() {
        for cmd in [
            "bash -c 'echo hello'",
            "bash -c \"ls | grep test\"",
            r#"bash -c "$(echo 'dGVzdA==' | base64 -d)""#,
            "   bash -c 'indented'",
        ] {
            assert!(!should_wrap(cmd, Some(&enabled())), "should not re-wrap: {}", cmd);
        }
    }

    #[test]
    fn wrapped_prefix_is_exact() {
        assert!(should_wrap("bash -ce 'x'", Some(&enabled())));
        assert!(should_wrap("BASH -c 'x'", Some(&enabled())));
        assert!(should_wrap("bash\t-c 'x'", Some(&enabled())));
    }

    #[test]
    fn disabled_passes_everything_through() {
        let config = PolicyConfig {
            enabled: false,
            ..PolicyConfig::default()
        };
        let result = evaluate("ls | grep foo", &config);
        assert_eq!(result.decision, Decision::PassThrough);
        assert!(result.reason.contains("disabled"));
    }

    #[test]
    fn empty_check_precedes_disabled() {
        let config = PolicyConfig {
            enabled: false,
            ..PolicyConfig::default()
        };
        assert_eq!(evaluate("  ", &config).reason, "Empty command");
    }

    #[test]
    fn builtin_markers_skip() {
        for (cmd, marker) in [
            ("ls | grep foo # bypass-hook", "# bypass-hook"),
            ("echo $(pwd) # no-wrap", "# no-wrap"),
            ("cat file.txt # skip-hook", "# skip-hook"),
            ("# no-wrap\necho first", "# no-wrap"),
        ] {
            let result = evaluate(cmd, &enabled());
            assert!(!result.should_wrap(), "should not wrap: {}", cmd);
            assert_eq!(result.matched_marker.as_deref(), Some(marker));
        }
    }

    #[test]
    fn custom_marker_skips_only_when_configured() {
        let cmd = "ls | grep foo # custom-skip";
        assert!(!should_wrap(cmd, Some(&with_markers(&["# custom-skip"]))));
        assert!(should_wrap(cmd, Some(&enabled())));
    }

    #[test]
    fn empty_custom_marker_matches_every_command() {
        let config = with_markers(&[""]);
        assert!(!should_wrap("ls", Some(&config)));
        assert!(!should_wrap("echo $(pwd)", Some(&config)));

        let result = evaluate("ls", &config);
        assert_eq!(result.decision, Decision::PassThrough);
        assert_eq!(result.matched_marker.as_deref(), Some(""));
    }

    #[test]
    fn reserved_patterns_do_not_affect_decision() {
        let config = PolicyConfig {
            additional_safe_patterns: vec!["ls".to_string()],
            force_wrap_patterns: vec!["never-matches".to_string()],
            ..PolicyConfig::default()
        };
        assert!(should_wrap("ls -la", Some(&config)));
        assert!(!should_wrap("", Some(&config)));
    }

    #[test]
    fn absent_config_fails_open_to_wrapping() {
        assert!(should_wrap("echo hello", None));
        assert!(!should_wrap("echo hello # bypass-hook", None));
    }

    #[test]
    fn accepts_non_utf8_bytes() {
        let cmd: &[u8] = b"printf '\xff\xfe'";
        assert!(should_wrap(cmd, None));
    }

    #[test]
    fn trim_handles_only_listed_whitespace() {
        assert_eq!(trim_command(b"  ls \r\n"), b"ls");
        assert_eq!(trim_command(b"\x0bls"), b"\x0bls");
        assert_eq!(trim_command(b""), b"");
    }
}
