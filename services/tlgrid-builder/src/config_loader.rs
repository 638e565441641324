//! Configuration loader for the grid builder.
//!
//! Loads a YAML file with a `build` section (a [`BuildConfig`]) and a
//! `logging` section. Supports environment variable substitution using
//! `${VAR}` and `${VAR:-default}` syntax.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tl_grid::BuildConfig;

/// Contents of a builder configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderFileConfig {
    pub build: BuildConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Load and parse a builder config YAML file with environment variable
/// substitution.
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<BuilderFileConfig> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read builder config from {:?}", path.as_ref()))?;

    parse_config(&content)
        .with_context(|| format!("Failed to parse builder config from {:?}", path.as_ref()))
}

/// Parse builder config YAML text.
pub fn parse_config(content: &str) -> Result<BuilderFileConfig> {
    let expanded = expand_env_vars(content)?;

    let config: BuilderFileConfig =
        serde_yaml::from_str(&expanded).context("Failed to parse builder config YAML")?;

    validate_logging_config(&config.logging)?;

    Ok(config)
}

/// Expand `${VAR}` and `${VAR:-default}` references.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::new();
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut var_expr = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }

            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).with_context(|| format!("Environment variable {} not set", expr))
    }
}

fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    anyhow::ensure!(
        valid_levels.contains(&config.level.as_str()),
        "Invalid log level: {}. Must be one of: {:?}",
        config.level,
        valid_levels
    );

    let valid_formats = ["json", "pretty"];
    anyhow::ensure!(
        valid_formats.contains(&config.format.as_str()),
        "Invalid log format: {}. Must be one of: {:?}",
        config.format,
        valid_formats
    );

    Ok(())
}
