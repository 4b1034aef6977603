//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Base settings file: `settings.toml`
//! 3. Environment-specific file: `settings.<env>.toml`
//! 4. Environment variables: `WIREUP_*` prefix
//!
//! The environment name comes from `WIREUP_ENVIRONMENT` and falls back to
//! `development`. A caller-supplied configuration supplier bypasses all of
//! this: whatever it returns is registered as-is.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::application::HarnessError;

/// Environment-name variable consulted when no supplier is given.
pub const ENVIRONMENT_VAR: &str = "WIREUP_ENVIRONMENT";

/// Fallback environment name.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Unified configuration, registered as the singleton settings service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Active environment name (development, staging, ...)
    pub environment: String,
    /// Application name, mirrored into the hosting environment
    pub application_name: String,
    /// Root directory for relative lookups
    pub content_root: PathBuf,
    /// Free-form key/value entries for consumers
    pub entries: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            application_name: env!("CARGO_PKG_NAME").to_string(),
            content_root: PathBuf::from("."),
            entries: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Resolve the active environment name from the process environment.
    pub fn environment_name() -> String {
        std::env::var(ENVIRONMENT_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
    }

    /// Load settings from the current directory with layered precedence.
    pub fn load() -> Result<Self, HarnessError> {
        Self::load_from(Path::new("."))
    }

    /// Load settings anchored at `base_dir`.
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. `<base_dir>/settings.toml` (optional)
    /// 3. `<base_dir>/settings.<env>.toml` (optional)
    /// 4. `WIREUP_*` environment variables
    pub fn load_from(base_dir: &Path) -> Result<Self, HarnessError> {
        let env = Self::environment_name();
        let defaults = Settings::default();

        let builder = Config::builder()
            .set_default("environment", env.clone())
            .map_err(config_err)?
            .set_default("application_name", defaults.application_name.clone())
            .map_err(config_err)?
            .set_default(
                "content_root",
                base_dir.to_string_lossy().to_string(),
            )
            .map_err(config_err)?
            .add_source(File::from(base_dir.join("settings.toml")).required(false))
            .add_source(
                File::from(base_dir.join(format!("settings.{env}.toml"))).required(false),
            )
            .add_source(
                Environment::with_prefix("WIREUP")
                    .separator("__")
                    .list_separator(","),
            );

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.expand_paths();
        Ok(settings)
    }

    /// Look up a free-form entry.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Expand `~`, `$VAR`, and `${VAR}` in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.content_root.to_string_lossy().as_ref());
        self.content_root = PathBuf::from(expanded);
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, HarnessError> {
        toml::to_string_pretty(self)
            .map_err(|e| HarnessError::config(format!("serialize config: {e}")))
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# wireup settings
#
# Locations (by precedence, lowest to highest):
#   Base:  settings.toml
#   Env:   settings.<environment>.toml
#   Vars:  WIREUP_* environment variables (explicit overrides)
#
# The environment name is read from WIREUP_ENVIRONMENT (default "development").

# environment = "development"

# Application name, mirrored into the hosting environment
# application_name = "my-app"

# Root directory for relative lookups
# content_root = "."

# Free-form entries available to resolved services
# [entries]
# connection_string = "sqlite::memory:"
"#
        .to_string()
    }
}

/// Expand environment variables and tilde in a path string.
fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

fn config_err(e: ConfigError) -> HarnessError {
    HarnessError::config(e.to_string())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use tempfile::TempDir;

    use super::*;

    #[test]
    #[serial]
    fn given_no_config_files_when_loading_then_uses_defaults() {
        std::env::remove_var(ENVIRONMENT_VAR);
        let temp = TempDir::new().unwrap();

        let settings = Settings::load_from(temp.path()).expect("load defaults");

        assert_eq!(settings.environment, DEFAULT_ENVIRONMENT);
        assert_eq!(settings.application_name, "wireup");
        assert!(settings.entries.is_empty());
    }

    #[test]
    #[serial]
    fn given_base_and_environment_files_when_loading_then_later_source_wins() {
        std::env::set_var(ENVIRONMENT_VAR, "staging");
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("settings.toml"),
            r#"
application_name = "base-app"

[entries]
shared = "base"
base_only = "yes"
"#,
        )
        .unwrap();
        std::fs::write(
            temp.path().join("settings.staging.toml"),
            r#"
[entries]
shared = "staging"
"#,
        )
        .unwrap();

        let settings = Settings::load_from(temp.path()).expect("layered load");

        assert_eq!(settings.environment, "staging");
        assert_eq!(settings.application_name, "base-app");
        assert_eq!(settings.get("shared"), Some("staging"));
        assert_eq!(settings.get("base_only"), Some("yes"));

        std::env::remove_var(ENVIRONMENT_VAR);
    }

    #[test]
    #[serial]
    fn given_env_var_override_when_loading_then_it_beats_files() {
        std::env::remove_var(ENVIRONMENT_VAR);
        std::env::set_var("WIREUP_APPLICATION_NAME", "from-env");
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("settings.toml"), "application_name = \"from-file\"\n")
            .unwrap();

        let settings = Settings::load_from(temp.path()).expect("load");
        assert_eq!(settings.application_name, "from-env");

        std::env::remove_var("WIREUP_APPLICATION_NAME");
    }

    #[test]
    #[serial]
    fn given_blank_environment_var_when_resolving_name_then_falls_back() {
        std::env::set_var(ENVIRONMENT_VAR, "   ");
        assert_eq!(Settings::environment_name(), DEFAULT_ENVIRONMENT);
        std::env::remove_var(ENVIRONMENT_VAR);
    }

    #[test]
    fn given_settings_when_rendering_toml_then_round_trips() {
        let mut settings = Settings::default();
        settings
            .entries
            .insert("connection_string".into(), "sqlite::memory:".into());

        let rendered = settings.to_toml().expect("render");
        let parsed: Settings = toml::from_str(&rendered).expect("parse");
        assert_eq!(parsed, settings);
    }
}
