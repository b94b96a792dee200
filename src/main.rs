use std::path::{Path, PathBuf};

use bashwrap::cli::{integrate, Cli, Commands, ConfigAction, IntegrateTarget};
use bashwrap::encoder;
use bashwrap::hook;
use bashwrap::logging;
use bashwrap::policy::config::{self, HookConfig};
use bashwrap::policy::evaluator;
use clap::Parser;

fn config_path(cli_path: Option<PathBuf>) -> Option<PathBuf> {
    cli_path.or_else(config::default_config_path)
}

/// Load the configuration, falling back to the defaults on any failure.
///
/// Logging is set up from whichever configuration wins, so a load failure is
/// reported through the same sink as everything else.
fn load_config_fail_open(path: Option<&Path>) -> HookConfig {
    let loaded = match path {
        Some(path) => HookConfig::load_or_default(path),
        None => Ok(HookConfig::default()),
    };
    match loaded {
        Ok(config) => {
            logging::init(&config);
            config
        }
        Err(e) => {
            let config = HookConfig::default();
            logging::init(&config);
            tracing::warn!("Failed to load config, using defaults: {}", e);
            config
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let path = config_path(cli.config);

    match cli.command.unwrap_or(Commands::Hook) {
        Commands::Hook => {
            let config = load_config_fail_open(path.as_deref());
            let stdin = std::io::stdin().lock();
            let stdout = std::io::stdout().lock();
            hook::run(stdin, stdout, &config.policy)?;
        }
        Commands::Test { command, explain } => {
            let config = load_config_fail_open(path.as_deref());
            cmd_test(&config, &command, explain);
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cmd_config_show(path.as_deref())?,
            ConfigAction::Init { force } => cmd_config_init(path.as_deref(), force)?,
        },
        Commands::Integrate { target } => match target {
            IntegrateTarget::Install { settings, command } => {
                integrate::cmd_integrate_install(settings, command)?
            }
            IntegrateTarget::Remove { settings } => integrate::cmd_integrate_remove(settings)?,
        },
    }

    Ok(())
}

fn cmd_test(config: &HookConfig, command: &str, explain: bool) {
    let result = evaluator::evaluate(command, &config.policy);
    if explain {
        let verdict = if result.should_wrap() { "wrap" } else { "pass through" };
        eprintln!("Decision: {} ({})", verdict, result.reason);
    }
    if result.should_wrap() {
        println!("{}", encoder::wrap(command));
    } else {
        println!("{}", command);
    }
}

fn cmd_config_show(path: Option<&Path>) -> anyhow::Result<()> {
    let path = path.ok_or_else(|| anyhow::anyhow!("HOME is not set; pass --config explicitly"))?;
    let exists = path.exists();
    let config = HookConfig::load_or_default(path)?;

    println!("Configuration ({})", path.display());
    if !exists {
        println!("  (file not found, showing defaults)");
    }
    println!("═══════════════════════════════════════");
    println!("Enabled: {}", config.policy.enabled);
    println!(
        "Built-in escape markers: {}",
        evaluator::BUILTIN_ESCAPE_MARKERS.join(", ")
    );
    if config.policy.additional_escape_markers.is_empty() {
        println!("Additional escape markers: (none)");
    } else {
        println!("Additional escape markers:");
        for marker in &config.policy.additional_escape_markers {
            println!("  {}", marker);
        }
    }
    if !config.policy.additional_safe_patterns.is_empty() {
        println!(
            "Additional safe patterns (reserved, not evaluated): {}",
            config.policy.additional_safe_patterns.len()
        );
    }
    if !config.policy.force_wrap_patterns.is_empty() {
        println!(
            "Force-wrap patterns (reserved, not evaluated): {}",
            config.policy.force_wrap_patterns.len()
        );
    }
    match config.effective_log_file() {
        Some(log) if config.debug_log => println!("Debug log: {}", log.display()),
        _ => println!("Debug log: off"),
    }
    Ok(())
}

fn cmd_config_init(path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = path.ok_or_else(|| anyhow::anyhow!("HOME is not set; pass --config explicitly"))?;
    if path.exists() && !force {
        println!("Config already exists: {}", path.display());
        println!("Use --force to overwrite it.");
        return Ok(());
    }

    HookConfig::default().save_to_path(path)?;
    println!("Created config: {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Register the hook:  bashwrap integrate install");
    println!("  2. Try a command:      bashwrap test 'ls | grep foo'");
    Ok(())
}
