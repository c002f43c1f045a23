//! Configuration Loader
//!
//! Layers defaults, an optional file and environment variables with the
//! `config` crate, applies command-line overrides last, then validates the
//! result.

use config::{Config, Environment, File};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::{OrchestratorConfig, RunnerOverrides};
use crate::error::ConfigResult;

/// Prefix for environment overrides, e.g. `PRERELEASE_IT__RUNNER__PROJECT`
pub const ENV_PREFIX: &str = "PRERELEASE_IT";

impl OrchestratorConfig {
    /// Load from defaults, `path` (if any) and the process environment
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with_overrides(path, RunnerOverrides::default())
    }

    /// Load every layer, then apply command-line `overrides` before validating
    pub fn load_with_overrides(
        path: Option<&Path>,
        overrides: RunnerOverrides,
    ) -> ConfigResult<Self> {
        Self::load_from_sources(path, None, overrides)
    }

    /// Load with an explicit environment map instead of the process environment.
    /// Useful for testing without touching global environment variables.
    pub fn load_from_sources(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
        overrides: RunnerOverrides,
    ) -> ConfigResult<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("launcher")
                .try_parsing(true)
                .source(env),
        );

        let mut config: OrchestratorConfig = builder.build()?.try_deserialize()?;
        config.apply_overrides(overrides);
        config.validate()?;

        debug!(
            project = %config.runner.project,
            region = %config.runner.region,
            storage_prefix = %config.storage_prefix,
            timeout_secs = config.timeout_secs,
            "Configuration loaded"
        );
        Ok(config)
    }
}
