//! Claude Code `PreToolUse` hook protocol.
//!
//! The agent sends one JSON document on stdin:
//!
//! ```json
//! {"tool_name": "Bash", "tool_input": {"command": "ls | grep foo", "description": "..."}}
//! ```
//!
//! When the command is wrapped, the reply approves the call and swaps in the
//! wrapped command, keeping every other `tool_input` field:
//!
//! ```json
//! {"hookSpecificOutput": {"hookEventName": "PreToolUse",
//!   "permissionDecision": "allow",
//!   "updatedInput": {"command": "bash -c \"$(echo '...' | base64 -d)\"", "description": "..."}}}
//! ```
//!
//! In every other case, including unreadable or malformed input, the reply is
//! `{}` and the call proceeds unmodified.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::encoder;
use crate::policy::config::PolicyConfig;
use crate::policy::evaluator;

/// Tool whose calls are rewritten.
pub const BASH_TOOL: &str = "Bash";

/// Key of the command string inside `tool_input`.
pub const COMMAND_FIELD: &str = "command";

const HOOK_EVENT_NAME: &str = "PreToolUse";
const PERMISSION_ALLOW: &str = "allow";

/// A tool call as delivered to the hook.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: String,
    pub permission_decision: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_input: Option<Map<String, Value>>,
}

/// The hook's reply. The default value serializes to `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HookOutput {
    #[serde(rename = "hookSpecificOutput", skip_serializing_if = "Option::is_none")]
    pub hook_specific_output: Option<HookSpecificOutput>,
}

impl HookOutput {
    /// Leave the tool call untouched.
    pub fn passthrough() -> Self {
        Self::default()
    }

    /// Approve the tool call with a replacement input.
    pub fn allow_with(updated_input: Map<String, Value>) -> Self {
        Self {
            hook_specific_output: Some(HookSpecificOutput {
                hook_event_name: HOOK_EVENT_NAME.to_string(),
                permission_decision: PERMISSION_ALLOW.to_string(),
                updated_input: Some(updated_input),
            }),
        }
    }

    #[cfg(test)]
    fn is_passthrough(&self) -> bool {
        self.hook_specific_output.is_none()
    }
}

/// Decide the reply for one tool call.
pub fn process(input: &HookInput, config: &PolicyConfig) -> HookOutput {
    if input.tool_name != BASH_TOOL {
        debug!("Ignoring non-Bash tool: {}", input.tool_name);
        return HookOutput::passthrough();
    }

    let command = match input.tool_input.get(COMMAND_FIELD) {
        Some(Value::String(command)) => command,
        Some(_) => {
            debug!("Command parameter is not a string");
            return HookOutput::passthrough();
        }
        None => {
            debug!("No command parameter found");
            return HookOutput::passthrough();
        }
    };

    debug!("Processing command: {}", command);
    let result = evaluator::evaluate(command, config);
    if !result.should_wrap() {
        debug!("Skipping wrap: {}", result.reason);
        return HookOutput::passthrough();
    }

    let wrapped = encoder::wrap(command);
    debug!("Wrapped: {}", wrapped);

    let mut updated = input.tool_input.clone();
    updated.insert(COMMAND_FIELD.to_string(), Value::String(wrapped));
    HookOutput::allow_with(updated)
}

/// Read one hook request from `reader` and write the reply line to `writer`.
///
/// Every failure before the reply is written resolves to `{}`. Only errors
/// writing the reply itself are returned.
pub fn run<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    config: &PolicyConfig,
) -> std::io::Result<()> {
    let mut raw = Vec::new();
    let output = match reader.read_to_end(&mut raw) {
        Ok(_) => match serde_json::from_slice::<HookInput>(&raw) {
            Ok(input) => process(&input, config),
            Err(e) => {
                warn!("Failed to parse hook input, passing through: {}", e);
                HookOutput::passthrough()
            }
        },
        Err(e) => {
            warn!("Failed to read hook input, passing through: {}", e);
            HookOutput::passthrough()
        }
    };

    let line = serde_json::to_string(&output).unwrap_or_else(|e| {
        warn!("Failed to serialize hook output, passing through: {}", e);
        "{}".to_string()
    });
    debug!("Output JSON: {}", line);
    writeln!(writer, "{}", line)?;
    writer.flush()
}
