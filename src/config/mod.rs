//! # Harness Configuration
//!
//! Runner settings passed to every job, plus the orchestration knobs (storage
//! prefix, global timeout, launcher command).
//!
//! ## Sources
//!
//! Values are layered, lowest precedence first:
//!
//! - built-in defaults
//! - an optional TOML/YAML/JSON file
//! - `PRERELEASE_IT__<SECTION>__<KEY>` environment variables
//! - command-line overrides ([`RunnerOverrides`])
//!
//! ```rust,no_run
//! use prerelease_it::config::OrchestratorConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OrchestratorConfig::load(None)?;
//! println!("timeout: {:?}", config.timeout());
//! # Ok(())
//! # }
//! ```

pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ConfigResult, ConfigurationError};

pub use loader::ENV_PREFIX;

/// Settings for the cloud runner, rendered as baseline job arguments
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub runner: String,
    pub project: String,
    pub region: String,
    pub temp_location: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            runner: "DataflowRunner".to_string(),
            project: "data-integration-test".to_string(),
            region: "us-central1".to_string(),
            temp_location: "gs://dataflow-staging-us-central1-790249772184/temp".to_string(),
        }
    }
}

impl RunnerConfig {
    /// Arguments appended to every job invocation
    pub fn baseline_args(&self) -> Vec<String> {
        vec![
            format!("--runner={}", self.runner),
            format!("--project={}", self.project),
            format!("--region={}", self.region),
            format!("--tempLocation={}", self.temp_location),
        ]
    }
}

/// Root configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub runner: RunnerConfig,

    /// Object store prefix every output path is scoped under
    pub storage_prefix: String,

    /// `project:dataset` receiving BigQuery output tables
    pub bigquery_dataset: String,

    /// Global wall-clock bound for the whole run
    pub timeout_secs: u64,

    /// Command prefix used to launch a job entry point
    pub launcher: Vec<String>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            runner: RunnerConfig::default(),
            storage_prefix: "gs://data-integration-test-prerelease-it".to_string(),
            bigquery_dataset: "data-integration-test:gha_it_us".to_string(),
            timeout_secs: 3600,
            launcher: vec![
                "java".to_string(),
                "-cp".to_string(),
                "scio-examples.jar".to_string(),
            ],
        }
    }
}

/// Command-line overrides for runner settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerOverrides {
    pub runner: Option<String>,
    pub project: Option<String>,
    pub region: Option<String>,
    pub temp_location: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl OrchestratorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn apply_overrides(&mut self, overrides: RunnerOverrides) {
        let RunnerOverrides {
            runner,
            project,
            region,
            temp_location,
            timeout_secs,
        } = overrides;

        if let Some(runner) = runner {
            self.runner.runner = runner;
        }
        if let Some(project) = project {
            self.runner.project = project;
        }
        if let Some(region) = region {
            self.runner.region = region;
        }
        if let Some(temp_location) = temp_location {
            self.runner.temp_location = temp_location;
        }
        if let Some(timeout_secs) = timeout_secs {
            self.timeout_secs = timeout_secs;
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let required = [
            ("runner.runner", &self.runner.runner),
            ("runner.project", &self.runner.project),
            ("runner.region", &self.runner.region),
            ("runner.temp_location", &self.runner.temp_location),
            ("bigquery_dataset", &self.bigquery_dataset),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigurationError::invalid_value(field, "must not be empty"));
            }
        }

        if !self.storage_prefix.starts_with("gs://") {
            return Err(ConfigurationError::invalid_value(
                "storage_prefix",
                format!("'{}' is not a gs:// location", self.storage_prefix),
            ));
        }
        if self.storage_prefix.ends_with('/') {
            return Err(ConfigurationError::invalid_value(
                "storage_prefix",
                "must not end with '/'",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigurationError::invalid_value(
                "timeout_secs",
                "must be greater than zero",
            ));
        }
        if self.launcher.is_empty() {
            return Err(ConfigurationError::invalid_value(
                "launcher",
                "must name at least a program",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(3600));
        assert_eq!(config.runner.runner, "DataflowRunner");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_baseline_args() {
        let args = RunnerConfig::default().baseline_args();
        assert_eq!(
            args,
            vec![
                "--runner=DataflowRunner",
                "--project=data-integration-test",
                "--region=us-central1",
                "--tempLocation=gs://dataflow-staging-us-central1-790249772184/temp",
            ]
        );
    }

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let mut config = OrchestratorConfig::default();
        config.apply_overrides(RunnerOverrides {
            runner: Some("DirectRunner".to_string()),
            timeout_secs: Some(60),
            ..Default::default()
        });
        assert_eq!(config.runner.runner, "DirectRunner");
        assert_eq!(config.runner.project, "data-integration-test");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = OrchestratorConfig::default();
        config.storage_prefix = "s3://bucket".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidValue { ref field, .. }) if field == "storage_prefix"
        ));

        let mut config = OrchestratorConfig::default();
        config.storage_prefix = "gs://bucket/".to_string();
        assert!(config.validate().is_err());

        let mut config = OrchestratorConfig::default();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = OrchestratorConfig::default();
        config.runner.project = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = OrchestratorConfig::default();
        config.launcher.clear();
        assert!(config.validate().is_err());
    }
}
