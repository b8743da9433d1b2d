//! Runtime configuration.
//!
//! Values come from three layers, lowest priority first:
//!
//! 1. built-in defaults
//! 2. a TOML file passed with `--config <path>`
//! 3. `key=value` command-line arguments
//!
//! [`Cli`] parses the command line with `clap`; `--help` and `--version` come
//! from there.
//!
//! Files and arguments are both flattened into a string map and parsed by
//! [`Config::from_map`], so they follow the same rules: a value that does not
//! parse falls back to its default and unknown keys are ignored.
//!
//! ```toml
//! # bulkbar.toml
//! context = "orders"
//! multi_select = true
//! selection = "multiple"
//! latency_ms = 800
//! theme = "catppuccin-frappe"
//! trace_level = "debug"
//! ```

use crate::domain::error::{BulkbarError, Result};
use crate::domain::{Context, SelectionMode};
use crate::infrastructure::expand_tilde;
use clap::Parser;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_LATENCY_MS: u64 = 600;
const DEFAULT_ROWS: usize = 24;
const DEFAULT_COLS: usize = 100;
const MIN_ROWS: usize = 10;
const MIN_COLS: usize = 40;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Context shown at startup. Default: users
    pub context: Context,

    /// Start in multi-select mode. Default: `true`
    pub multi_select: bool,

    /// Selection multiplicity in multi-select mode. Default: multiple
    pub selection: SelectionMode,

    /// Simulated backend latency of every bulk operation. Default: 600
    pub latency_ms: u64,

    /// Terminal height used for layout. Default: 24
    pub rows: usize,

    /// Terminal width used for layout. Default: 100
    pub cols: usize,

    /// Built-in theme name. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. `~` is expanded.
    pub theme_file: Option<String>,

    /// Log level for the log file: `trace`, `debug`, `info`, `warn`,
    /// `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            context: Context::Users,
            multi_select: true,
            selection: SelectionMode::Multiple,
            latency_ms: DEFAULT_LATENCY_MS,
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from a string map with fallback defaults.
    ///
    /// # Parsing Rules
    ///
    /// - `context`: `users` | `orders`
    /// - `multi_select`: `true`/`false`, `yes`/`no`, `on`/`off`, `1`/`0`
    /// - `selection`: `single` | `multiple`
    /// - `latency_ms`: `u64`
    /// - `rows`, `cols`: `usize`, at least 10 rows and 40 columns
    /// - `theme` (or `theme_name`), `theme_file`, `trace_level`: taken as is
    ///
    /// # Example
    ///
    /// ```
    /// use bulkbar::domain::Context;
    /// use bulkbar::Config;
    /// use std::collections::BTreeMap;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("context".to_string(), "orders".to_string());
    /// map.insert("latency_ms".to_string(), "fast".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.context, Context::Orders);
    /// assert_eq!(config.latency_ms, Config::default().latency_ms);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        for key in map.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                tracing::debug!(key = %key, "ignoring unknown config key");
            }
        }

        let context = map
            .get("context")
            .and_then(|s| s.parse::<Context>().ok())
            .unwrap_or(defaults.context);

        let multi_select = map
            .get("multi_select")
            .and_then(|s| parse_bool(s))
            .unwrap_or(defaults.multi_select);

        let selection = map
            .get("selection")
            .and_then(|s| parse_selection(s))
            .unwrap_or(defaults.selection);

        let latency_ms = map
            .get("latency_ms")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(defaults.latency_ms);

        let rows = map
            .get("rows")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(defaults.rows)
            .max(MIN_ROWS);

        let cols = map
            .get("cols")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(defaults.cols)
            .max(MIN_COLS);

        Self {
            context,
            multi_select,
            selection,
            latency_ms,
            rows,
            cols,
            theme_name: map.get("theme").or_else(|| map.get("theme_name")).cloned(),
            theme_file: map.get("theme_file").cloned(),
            trace_level: map.get("trace_level").cloned(),
        }
    }

    /// Parses a TOML document into the string map [`from_map`](Self::from_map)
    /// takes.
    ///
    /// # Errors
    ///
    /// Returns [`BulkbarError::Config`] if the document is not valid TOML or a
    /// value is a table or array.
    pub fn toml_to_map(contents: &str) -> Result<BTreeMap<String, String>> {
        let table: toml::Table = contents
            .parse()
            .map_err(|e| BulkbarError::Config(format!("invalid TOML: {e}")))?;

        table
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    toml::Value::String(s) => s,
                    toml::Value::Integer(i) => i.to_string(),
                    toml::Value::Float(f) => f.to_string(),
                    toml::Value::Boolean(b) => b.to_string(),
                    other => {
                        return Err(BulkbarError::Config(format!(
                            "`{key}` must be a string, number or boolean, got {}",
                            other.type_str()
                        )))
                    }
                };
                Ok((key, value))
            })
            .collect()
    }

    /// Layers `overrides` over the optional TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>, overrides: BTreeMap<String, String>) -> Result<Self> {
        let mut map = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                Self::toml_to_map(&contents)?
            }
            None => BTreeMap::new(),
        };
        map.extend(overrides);
        Ok(Self::from_map(&map))
    }

    /// Simulated latency as a [`Duration`].
    #[must_use]
    pub const fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// `theme_file` with `~` expanded.
    #[must_use]
    pub fn theme_path(&self) -> Option<PathBuf> {
        self.theme_file.as_deref().map(expand_tilde)
    }
}

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "bulkbar", version, about = "Terminal data table with a bulk-action bar")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Settings overriding the file, e.g. `context=orders latency_ms=1500`
    #[arg(value_name = "KEY=VALUE", value_parser = parse_override)]
    pub overrides: Vec<(String, String)>,
}

impl Cli {
    /// Layers the overrides over the `--config` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn into_config(self) -> Result<Config> {
        let path = self.config.as_deref().map(expand_tilde);
        Config::load(path.as_deref(), self.overrides.into_iter().collect())
    }
}

fn parse_override(arg: &str) -> std::result::Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.trim().to_string())),
        _ => Err(format!("expected key=value, got `{arg}`")),
    }
}

const KNOWN_KEYS: [&str; 10] = [
    "context",
    "multi_select",
    "selection",
    "latency_ms",
    "rows",
    "cols",
    "theme",
    "theme_name",
    "theme_file",
    "trace_level",
];

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn parse_selection(value: &str) -> Option<SelectionMode> {
    match value.trim().to_lowercase().as_str() {
        "single" => Some(SelectionMode::Single),
        "multiple" | "multi" => Some(SelectionMode::Multiple),
        _ => None,
    }
}
