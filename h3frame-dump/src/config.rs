//! Configuration loading for `h3dump`.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, command-line
//! flags. Logging is filtered by `RUST_LOG` when it is set.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use h3frame::DecoderConfig;
use serde::{Deserialize, Serialize};

/// Print the HTTP/3 frames found in a captured stream.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Input file, or `-` for stdin
    #[arg(default_value = "-")]
    pub input: String,

    /// Treat the input as hex text (whitespace and `#` comments ignored)
    #[arg(long)]
    pub hex: bool,

    /// Path to configuration file (TOML format)
    #[arg(long, short = 'c', default_value = "h3dump.toml")]
    pub config: String,

    /// Bytes handed to the decoder per call (overrides config file)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Log level (overrides config file)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Validate configuration and exit
    #[arg(long)]
    pub validate: bool,

    /// Print default configuration and exit
    #[arg(long)]
    pub print_default_config: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    pub decoder: DecoderConfig,
    pub input: InputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Bytes handed to the decoder per `process_input` call.
    ///
    /// **Default:** `4096`
    pub chunk_size: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { chunk_size: 4096 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// **Default:** `warn`
    pub level: LogLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl DumpConfig {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = match self.decoder.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => errors,
        };
        if self.input.chunk_size == 0 {
            errors.push("input.chunk_size must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Outcome of [`load_config`]; `missing_file` is set when defaults were used
/// because the configuration file does not exist.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: DumpConfig,
    pub missing_file: bool,
    pub ignored_log_level: Option<String>,
}

/// Load the configuration file, apply CLI overrides and validate.
///
/// Logging is not installed yet when this runs, so conditions worth a
/// warning are returned to the caller instead of logged.
pub fn load_config(cli: &CliArgs) -> Result<LoadedConfig> {
    let (mut config, missing_file) = load_config_file(&cli.config)?;
    let ignored_log_level = apply_cli_overrides(&mut config, cli);

    config.validate().map_err(|errors| {
        anyhow::anyhow!("Configuration validation failed:\n{}", errors.join("\n"))
    })?;

    Ok(LoadedConfig {
        config,
        missing_file,
        ignored_log_level,
    })
}

fn load_config_file(path: &str) -> Result<(DumpConfig, bool)> {
    let path_obj = Path::new(path);
    if !path_obj.exists() {
        return Ok((DumpConfig::default(), true));
    }

    let config_str = std::fs::read_to_string(path_obj)
        .with_context(|| format!("Failed to read config file: {}", path))?;
    let config = toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse TOML config: {}", path))?;
    Ok((config, false))
}

/// Returns the log level string if it could not be parsed.
fn apply_cli_overrides(config: &mut DumpConfig, cli: &CliArgs) -> Option<String> {
    if let Some(chunk_size) = cli.chunk_size {
        config.input.chunk_size = chunk_size;
    }

    let raw = cli.log_level.as_ref()?;
    match raw.parse() {
        Ok(level) => {
            config.logging.level = level;
            None
        }
        Err(_) => Some(raw.clone()),
    }
}

pub fn print_default_config() -> Result<()> {
    let toml_str =
        toml::to_string_pretty(&DumpConfig::default()).context("Failed to serialize default config")?;
    println!("{}", toml_str);
    Ok(())
}
