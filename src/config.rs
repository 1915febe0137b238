//! Configuration for the benchmark driver
//!
//! The original measurement scripts carried paths, repeat counts, and the
//! dataset table as script-level globals. Here they form one explicit,
//! immutable [`BenchConfig`] handed to the driver at startup, loadable from
//! TOML/YAML/JSON files with environment-variable overrides on top.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use validator::Validate;

use crate::dataset::{self, DatasetRecord};
use crate::error::{Result, TrimbenchError};
use crate::logging::LoggingConfig;
use crate::sweep::SweepSpec;

/// Where executables, input data, and logs live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Directory containing the external trimming binaries
    pub exec_dir: PathBuf,
    /// Directory containing the `.fastq` input files
    pub data_dir: PathBuf,
    /// Directory receiving per-invocation log files
    pub log_dir: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            exec_dir: PathBuf::from("."),
            data_dir: PathBuf::from("."),
            log_dir: PathBuf::from("."),
        }
    }
}

/// What to do with a non-zero exit status from an external tool.
///
/// The original scripts never inspected exit codes; `Ignore` reproduces
/// that. `Warn` reports the failure and continues, so a sweep still
/// collects every sample it can. Neither policy aborts the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExitPolicy {
    Ignore,
    #[default]
    Warn,
}

/// Execution parameters for one harness run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RunSettings {
    /// Number of repeats per suite
    #[validate(range(min = 1, max = 1000))]
    pub repeats: u32,

    /// Pause after dropping the page cache, seconds
    pub settle_delay_secs: u64,

    /// Pause after each invocation, seconds
    pub cooldown_delay_secs: u64,

    /// Print commands instead of executing them
    pub dry_run: bool,

    /// Drop the page cache before each (repeat, grid point) block
    pub drop_cache: bool,

    /// Shell command used to drop the page cache; requires privileges
    pub cache_flush_cmd: String,

    /// Timing wrapper prefixed to every command, empty to disable
    pub time_wrapper: String,

    /// Handling of non-zero exit statuses
    pub exit_policy: ExitPolicy,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            repeats: 3,
            settle_delay_secs: 10,
            cooldown_delay_secs: 5,
            dry_run: false,
            drop_cache: true,
            cache_flush_cmd: "sync; echo 3 > /proc/sys/vm/drop_caches".to_string(),
            time_wrapper: "time -f 'total: %e \\t\\t user: %U'".to_string(),
            exit_policy: ExitPolicy::default(),
        }
    }
}

impl RunSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    pub fn cooldown_delay(&self) -> Duration {
        Duration::from_secs(self.cooldown_delay_secs)
    }
}

/// Complete configuration for one harness invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub paths: PathSettings,
    pub run: RunSettings,
    pub logging: LoggingConfig,
    /// Dataset table; defaults to the builtin measurement campaign table
    pub datasets: Vec<DatasetRecord>,
    /// User-defined suites, selectable by label alongside the builtin ones
    pub extra_suites: Vec<SweepSpec>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            paths: PathSettings::default(),
            run: RunSettings::default(),
            logging: LoggingConfig::default(),
            datasets: dataset::builtin_records(),
            extra_suites: Vec::new(),
        }
    }
}

impl BenchConfig {
    /// Load configuration from a file, dispatching on the extension.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TrimbenchError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: BenchConfig = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| TrimbenchError::config(format!("TOML parse error: {}", e)))?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| TrimbenchError::config(format!("YAML parse error: {}", e)))?,
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| TrimbenchError::config(format!("JSON parse error: {}", e)))?,
            _ => {
                return Err(TrimbenchError::config(
                    "Unsupported config file format. Use .toml, .yaml, .yml, or .json",
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Override configuration values from `TRIMBENCH_*` environment
    /// variables, re-validating afterwards.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(repeats) = env::var("TRIMBENCH_REPEATS") {
            self.run.repeats = repeats
                .parse()
                .map_err(|e| TrimbenchError::config(format!("Invalid TRIMBENCH_REPEATS: {}", e)))?;
        }

        if let Ok(dry_run) = env::var("TRIMBENCH_DRY_RUN") {
            self.run.dry_run = dry_run
                .parse()
                .map_err(|e| TrimbenchError::config(format!("Invalid TRIMBENCH_DRY_RUN: {}", e)))?;
        }

        if let Ok(exec_dir) = env::var("TRIMBENCH_EXEC_DIR") {
            self.paths.exec_dir = PathBuf::from(exec_dir);
        }

        if let Ok(data_dir) = env::var("TRIMBENCH_DATA_DIR") {
            self.paths.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(log_dir) = env::var("TRIMBENCH_LOG_DIR") {
            self.paths.log_dir = PathBuf::from(log_dir);
        }

        if let Ok(level) = env::var("TRIMBENCH_LOG_LEVEL") {
            self.logging.level = level.parse()?;
        }

        self.validate()
    }

    /// Save the configuration to a file, dispatching on the extension.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| TrimbenchError::config(format!("TOML serialize error: {}", e)))?,
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)
                .map_err(|e| TrimbenchError::config(format!("YAML serialize error: {}", e)))?,
            Some("json") => serde_json::to_string_pretty(self)
                .map_err(|e| TrimbenchError::config(format!("JSON serialize error: {}", e)))?,
            _ => {
                return Err(TrimbenchError::config(
                    "Unsupported config file format. Use .toml, .yaml, .yml, or .json",
                ))
            }
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate settings ranges, the dataset table, and suite labels.
    pub fn validate(&self) -> Result<()> {
        self.run
            .validate()
            .map_err(|e| TrimbenchError::config(format!("run settings: {}", e)))?;
        dataset::validate_records(&self.datasets)?;

        let mut labels = HashSet::new();
        for suite in &self.extra_suites {
            if suite.label.is_empty() || suite.program.is_empty() {
                return Err(TrimbenchError::config(
                    "suite label and program must be non-empty",
                ));
            }
            if !labels.insert(suite.label.as_str()) {
                return Err(TrimbenchError::config(format!(
                    "duplicate suite label '{}'",
                    suite.label
                )));
            }
        }
        Ok(())
    }
}
