use std::path::{Path, PathBuf};

use serde_json::{json, Value};

const SETTINGS_FILENAME: &str = "settings.json";
const HOOK_MATCHER: &str = "Bash";
const BINARY_NAME: &str = "bashwrap";

/// Claude Code user settings path (~/.claude/settings.json)
pub fn default_settings_path() -> Option<PathBuf> {
    crate::policy::config::claude_dir().map(|dir| dir.join(SETTINGS_FILENAME))
}

/// Command line Claude Code should run: the current executable, or the bare
/// binary name if it cannot be resolved.
pub fn default_hook_command() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.to_str().map(str::to_string))
        .unwrap_or_else(|| BINARY_NAME.to_string())
}

fn hook_entry(command: &str) -> Value {
    json!({
        "matcher": HOOK_MATCHER,
        "hooks": [
            { "type": "command", "command": command }
        ]
    })
}

/// True if `command` launches this binary, whatever path it was installed under.
fn is_bashwrap_command(command: &str) -> bool {
    command
        .split_whitespace()
        .next()
        .and_then(|program| Path::new(program).file_name())
        .is_some_and(|name| name == BINARY_NAME)
}

fn entry_commands(entry: &Value) -> impl Iterator<Item = &str> {
    entry
        .get("hooks")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|h| h.get("command").and_then(Value::as_str))
}

fn read_settings(settings_path: &Path) -> anyhow::Result<Value> {
    if !settings_path.exists() {
        return Ok(json!({}));
    }
    let content = std::fs::read_to_string(settings_path)?;
    if content.trim().is_empty() {
        return Ok(json!({}));
    }
    Ok(serde_json::from_str(&content)?)
}

fn write_settings(settings_path: &Path, settings: &Value) -> anyhow::Result<()> {
    if let Some(parent) = settings_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let formatted = serde_json::to_string_pretty(settings)?;
    std::fs::write(settings_path, formatted)?;
    Ok(())
}

/// Register the hook under `hooks.PreToolUse` in a Claude Code settings file.
///
/// Returns `false` without touching the file if a bashwrap entry is already
/// present. All other settings are preserved.
pub fn install_hook(settings_path: &Path, command: &str) -> anyhow::Result<bool> {
    let mut settings = read_settings(settings_path)?;

    let pre_tool_use = settings
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("{} is not a JSON object", settings_path.display()))?
        .entry("hooks")
        .or_insert_with(|| json!({}))
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("hooks is not a JSON object"))?
        .entry("PreToolUse")
        .or_insert_with(|| json!([]))
        .as_array_mut()
        .ok_or_else(|| anyhow::anyhow!("hooks.PreToolUse is not an array"))?;

    if pre_tool_use
        .iter()
        .any(|entry| entry_commands(entry).any(is_bashwrap_command))
    {
        return Ok(false);
    }

    pre_tool_use.push(hook_entry(command));
    write_settings(settings_path, &settings)?;
    Ok(true)
}

/// Remove every bashwrap hook from a Claude Code settings file.
///
/// Matcher groups left without hooks are dropped. Returns the number of hook
/// commands removed.
pub fn remove_hook(settings_path: &Path) -> anyhow::Result<usize> {
    let mut settings = read_settings(settings_path)?;

    let Some(pre_tool_use) = settings
        .get_mut("hooks")
        .and_then(|h| h.get_mut("PreToolUse"))
        .and_then(Value::as_array_mut)
    else {
        return Ok(0);
    };

    let mut removed = 0;
    for entry in pre_tool_use.iter_mut() {
        if let Some(hooks) = entry.get_mut("hooks").and_then(Value::as_array_mut) {
            let before = hooks.len();
            hooks.retain(|h| {
                !h.get("command")
                    .and_then(Value::as_str)
                    .is_some_and(is_bashwrap_command)
            });
            removed += before - hooks.len();
        }
    }
    pre_tool_use.retain(|entry| {
        entry
            .get("hooks")
            .and_then(Value::as_array)
            .map_or(true, |hooks| !hooks.is_empty())
    });

    if removed > 0 {
        write_settings(settings_path, &settings)?;
    }
    Ok(removed)
}

fn resolve_settings_path(settings: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    settings
        .or_else(default_settings_path)
        .ok_or_else(|| anyhow::anyhow!("HOME is not set; pass --settings explicitly"))
}

/// Execute the `bashwrap integrate install` command
pub fn cmd_integrate_install(settings: Option<PathBuf>, command: Option<String>) -> anyhow::Result<()> {
    let settings_path = resolve_settings_path(settings)?;
    let command = command.unwrap_or_else(default_hook_command);

    println!("Registering bashwrap with Claude Code...");
    println!("  Settings: {}", settings_path.display());

    if install_hook(&settings_path, &command)? {
        println!("  Added PreToolUse hook for Bash: {}", command);
        println!();
        println!("Done! New Bash tool calls will be wrapped.");
        println!("  Run 'bashwrap integrate remove' to undo.");
    } else {
        println!("  bashwrap hook already registered, nothing to do.");
    }
    Ok(())
}

/// Execute the `bashwrap integrate remove` command
pub fn cmd_integrate_remove(settings: Option<PathBuf>) -> anyhow::Result<()> {
    let settings_path = resolve_settings_path(settings)?;

    println!("Removing bashwrap from Claude Code...");
    println!("  Settings: {}", settings_path.display());

    let removed = remove_hook(&settings_path)?;
    if removed == 0 {
        println!("  No bashwrap hook found.");
    } else {
        println!("  Removed {} hook entr{}", removed, if removed == 1 { "y" } else { "ies" });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_settings_json() -> &'static str {
        r#"{
  "model": "opus",
  "hooks": {
    "PreToolUse": [
      {
        "matcher": "Edit",
        "hooks": [
          { "type": "command", "command": "/usr/local/bin/formatter" }
        ]
      }
    ]
  }
}"#
    }

    fn load(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn install_into_missing_file_creates_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".claude").join("settings.json");

        assert!(install_hook(&path, "/opt/bin/bashwrap").unwrap());

        let result = load(&path);
        let entry = &result["hooks"]["PreToolUse"][0];
        assert_eq!(entry["matcher"], "Bash");
        assert_eq!(entry["hooks"][0]["type"], "command");
        assert_eq!(entry["hooks"][0]["command"], "/opt/bin/bashwrap");
    }

    #[test]
    fn install_preserves_existing_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, sample_settings_json()).unwrap();

        install_hook(&path, "bashwrap").unwrap();

        let result = load(&path);
        assert_eq!(result["model"], "opus");
        let entries = result["hooks"]["PreToolUse"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["matcher"], "Edit");
        assert_eq!(entries[1]["matcher"], "Bash");
    }

    #[test]
    fn install_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        assert!(install_hook(&path, "/opt/bin/bashwrap").unwrap());
        assert!(!install_hook(&path, "/home/me/.cargo/bin/bashwrap hook").unwrap());

        let result = load(&path);
        assert_eq!(result["hooks"]["PreToolUse"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn install_rejects_non_object_hooks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"hooks": []}"#).unwrap();

        let result = install_hook(&path, "bashwrap");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("hooks is not a JSON object"));
    }

    #[test]
    fn remove_drops_only_bashwrap_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, sample_settings_json()).unwrap();
        install_hook(&path, "/opt/bin/bashwrap").unwrap();

        assert_eq!(remove_hook(&path).unwrap(), 1);

        let result = load(&path);
        let entries = result["hooks"]["PreToolUse"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["hooks"][0]["command"], "/usr/local/bin/formatter");
        assert_eq!(result["model"], "opus");
    }

    #[test]
    fn remove_when_not_installed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, sample_settings_json()).unwrap();

        assert_eq!(remove_hook(&path).unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), sample_settings_json());
    }

    #[test]
    fn recognizes_bashwrap_commands() {
        assert!(is_bashwrap_command("bashwrap"));
        assert!(is_bashwrap_command("/usr/local/bin/bashwrap hook"));
        assert!(!is_bashwrap_command("/usr/local/bin/bashwrap-old"));
        assert!(!is_bashwrap_command("echo bashwrap"));
        assert!(!is_bashwrap_command(""));
    }
}
