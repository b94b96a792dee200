pub mod integrate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bashwrap")]
#[command(about = "PreToolUse hook that base64-wraps Bash commands so they reach the shell byte-for-byte")]
#[command(version)]
pub struct Cli {
    /// Path to config file [default: ~/.claude/bash-hook-config.json]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Defaults to `hook` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read a PreToolUse request from stdin and answer on stdout
    Hook,
    /// Show what a command would be turned into
    Test {
        /// The command to evaluate
        command: String,
        /// Print the decision reason on stderr
        #[arg(long)]
        explain: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Register or unregister the hook in Claude Code settings
    Integrate {
        #[command(subcommand)]
        target: IntegrateTarget,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum IntegrateTarget {
    /// Add the hook to Claude Code's settings.json
    Install {
        /// Settings file [default: ~/.claude/settings.json]
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Command Claude Code should run [default: this executable]
        #[arg(long)]
        command: Option<String>,
    },
    /// Remove the hook from Claude Code's settings.json
    Remove {
        /// Settings file [default: ~/.claude/settings.json]
        #[arg(long)]
        settings: Option<PathBuf>,
    },
}
