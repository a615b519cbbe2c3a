//! Veer CLI
//!
//! Tooling for the scroll-driven theme engine.
//!
//! # Commands
//!
//! - `replay <trace.toml>`: Play a recorded scroll trace through the engine headlessly
//! - `vars`: Print the CSS custom properties for a theme
//! - `config`: Print the default engine configuration, or validate a file

mod replay;
mod trace;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};
use veer_animation::Easing;
use veer_theme::{CssVariables, EngineConfig, ThemeIdentity, ThemeTokens};

#[derive(Parser)]
#[command(name = "veer")]
#[command(version)]
#[command(about = "Scroll-driven theme engine tooling")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scroll trace and report every theme change
    Replay {
        /// Trace file (TOML)
        trace: PathBuf,

        /// Engine configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Token overrides (TOML)
        #[arg(short, long)]
        tokens: Option<PathBuf>,

        /// Frame interval in milliseconds
        #[arg(long, default_value_t = 16)]
        frame_ms: u64,

        /// Override the transition duration
        #[arg(long)]
        duration_ms: Option<u64>,

        /// Override the easing curve, e.g. `ease-in-out` or `cubic-bezier(0.4, 0, 0.2, 1)`
        #[arg(long)]
        easing: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Human)]
        format: Format,
    },

    /// Print the CSS variables of a theme
    Vars {
        /// Theme id (`extreme-brutalist`, `refined-brutalist`, or `primary`/`secondary`)
        #[arg(long, default_value = "extreme-brutalist")]
        theme: String,

        /// Token overrides (TOML)
        #[arg(short, long)]
        tokens: Option<PathBuf>,

        /// Selector for the emitted rule
        #[arg(long, default_value = ":root")]
        selector: String,

        /// Emit an inline style attribute value instead of a rule
        #[arg(long)]
        inline: bool,
    },

    /// Print the default engine configuration
    Config {
        /// Validate this file and print it with defaults filled in
        #[arg(long)]
        check: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Human,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Replay {
            trace,
            config,
            tokens,
            frame_ms,
            duration_ms,
            easing,
            format,
        } => cmd_replay(&trace, config, tokens, frame_ms, duration_ms, easing, format),
        Commands::Vars {
            theme,
            tokens,
            selector,
            inline,
        } => cmd_vars(&theme, tokens, &selector, inline),
        Commands::Config { check } => cmd_config(check),
    }
}

fn cmd_replay(
    trace_path: &Path,
    config_path: Option<PathBuf>,
    tokens_path: Option<PathBuf>,
    frame_ms: u64,
    duration_ms: Option<u64>,
    easing: Option<String>,
    format: Format,
) -> Result<()> {
    let trace = trace::Trace::load(trace_path)?;
    let mut config = load_config(config_path.as_deref())?;
    if let Some(duration_ms) = duration_ms {
        config = config.with_duration_ms(duration_ms);
    }
    if let Some(easing) = easing {
        let easing: Easing = easing.parse().context("Invalid --easing")?;
        config = config.with_easing(easing);
    }
    config.validate().context("Invalid engine configuration")?;
    let tokens = load_tokens(tokens_path.as_deref())?;

    tracing::info!(
        "replaying {} events from {}",
        trace.events.len(),
        trace_path.display()
    );
    let report = replay::run(&trace, config, tokens, frame_ms)?;

    match format {
        Format::Human => println!("{}", report),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn cmd_vars(theme: &str, tokens_path: Option<PathBuf>, selector: &str, inline: bool) -> Result<()> {
    let theme: ThemeIdentity = theme.parse()?;
    let tokens = load_tokens(tokens_path.as_deref())?;
    let vars = CssVariables::for_theme(&tokens, theme);
    if inline {
        println!("{}", vars.to_inline_style());
    } else {
        println!("{}", vars.to_rule(selector));
    }
    Ok(())
}

fn cmd_config(check: Option<PathBuf>) -> Result<()> {
    let config = load_config(check.as_deref())?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    EngineConfig::from_toml_str(&content)
        .with_context(|| format!("Invalid engine configuration in {}", path.display()))
}

fn load_tokens(path: Option<&Path>) -> Result<ThemeTokens> {
    let Some(path) = path else {
        return Ok(ThemeTokens::default());
    };
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    ThemeTokens::from_toml_str(&content)
        .with_context(|| format!("Invalid token overrides in {}", path.display()))
}
