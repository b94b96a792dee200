//! # bashwrap
//!
//! **PreToolUse hook that makes agent shell commands immune to preprocessing.**
//!
//! Before an AI agent's Bash tool call reaches the shell, intermediate layers
//! may strip quotes or expand variables. bashwrap intercepts each call and
//! replaces the command with an equivalent that carries the original bytes in
//! base64:
//!
//! ```text
//! ls | grep "foo"   =>   bash -c "$(echo 'bHMgfCBncmVwICJmb28i' | base64 -d)"
//! ```
//!
//! ## Architecture
//!
//! - **[`policy`]**: Configuration types and the wrap/pass-through evaluator
//! - **[`encoder`]**: The lossless base64 wrapper
//! - **[`hook`]**: Claude Code `PreToolUse` JSON protocol
//! - **[`redact`]**: Secret scrubbing for diagnostic output
//! - **[`logging`]**: `tracing` setup and the rotating debug log file
//! - **[`cli`]**: Command-line interface (clap) and settings integration
//! - **[`error`]**: Unified error types using `thiserror`
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a default configuration
//! bashwrap config init
//!
//! # Register the hook in ~/.claude/settings.json
//! bashwrap integrate install
//!
//! # See what a command turns into
//! bashwrap test 'for f in *.rs; do wc -l "$f"; done'
//! ```

pub mod cli;
pub mod encoder;
pub mod error;
pub mod hook;
pub mod logging;
pub mod policy;
pub mod redact;
