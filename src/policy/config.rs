//! Configuration types for bashwrap.
//!
//! The top-level [`HookConfig`] is read from `~/.claude/bash-hook-config.json`
//! (or a path passed with `--config`). Files ending in `.toml` are parsed as
//! TOML; anything else is parsed as JSON.
//!
//! # Example `bash-hook-config.json`
//!
//! ```json
//! {
//!   "enabled": true,
//!   "additional_escape_markers": ["# raw"],
//!   "debug_log": true
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::redact::PatternRedactor;

const CLAUDE_DIR: &str = ".claude";
const CONFIG_FILENAME: &str = "bash-hook-config.json";
const DEBUG_LOG_FILENAME: &str = "bash-hook-debug.log";

fn default_enabled() -> bool {
    true
}

/// Toggles that drive the wrap decision.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PolicyConfig {
    /// Master switch. When `false`, every command passes through untouched.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Extra substrings that opt a command out of wrapping, checked after the
    /// built-in markers.
    #[serde(default)]
    pub additional_escape_markers: Vec<String>,
    /// Reserved. Accepted and round-tripped but not consulted when deciding.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_safe_patterns: Vec<String>,
    /// Reserved. Accepted and round-tripped but not consulted when deciding.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub force_wrap_patterns: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            additional_escape_markers: Vec::new(),
            additional_safe_patterns: Vec::new(),
            force_wrap_patterns: Vec::new(),
        }
    }
}

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HookConfig {
    #[serde(flatten)]
    pub policy: PolicyConfig,
    /// Write diagnostic traces to [`HookConfig::log_file`].
    #[serde(default)]
    pub debug_log: bool,
    /// Diagnostic log path. Filled in by [`HookConfig::load_from_path`] when
    /// `debug_log` is set and no path was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Names of the secret patterns applied to diagnostic output. Empty means
    /// every built-in pattern.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redact_patterns: Vec<String>,
}

impl HookConfig {
    /// Load and parse the configuration file at `path`.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: HookConfig = if is_toml(path) {
            toml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        if config.debug_log && config.log_file.is_none() {
            config.log_file = default_log_path();
        }
        Ok(config)
    }

    /// Like [`HookConfig::load_from_path`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_path(path)
    }

    /// Write the configuration to `path`, creating the parent directory.
    ///
    /// The file is only readable by the owner on Unix.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = if is_toml(path) {
            toml::to_string_pretty(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        std::fs::write(path, content)?;
        restrict_permissions(path)?;
        Ok(())
    }

    /// Redactor for diagnostic output, limited to `redact_patterns` when set.
    pub fn redactor(&self) -> PatternRedactor {
        if self.redact_patterns.is_empty() {
            PatternRedactor::new()
        } else {
            PatternRedactor::with_patterns(&self.redact_patterns)
        }
    }

    /// Log file to use when debug logging is on.
    pub fn effective_log_file(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(default_log_path)
    }
}

/// `$HOME/.claude`, or `None` if `HOME` is not set.
pub fn claude_dir() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(CLAUDE_DIR))
}

/// `~/.claude/bash-hook-config.json`
pub fn default_config_path() -> Option<PathBuf> {
    claude_dir().map(|dir| dir.join(CONFIG_FILENAME))
}

/// `~/.claude/bash-hook-debug.log`
pub fn default_log_path() -> Option<PathBuf> {
    claude_dir().map(|dir| dir.join(DEBUG_LOG_FILENAME))
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

#[cfg(unix)]
pub(crate) fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
pub(crate) fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
