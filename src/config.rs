//! CLI configuration.
//!
//! Effective settings are layered: built-in defaults, then the persisted
//! `~/.valtstorage/config.json`, then `VALTSTORAGE_*` environment variables.
//! Demo mode always forces the mock API URL, whatever the other layers say.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::{CliError, CliResult};

/// API URL used whenever the environment is `demo`.
pub const DEMO_API_URL: &str = "mock";

pub const PRODUCTION_API_URL: &str = "https://valtstorage.cloud/api/public";
pub const DEVELOPMENT_API_URL: &str = "http://localhost:8080/api/public";

pub const ENV_ENVIRONMENT: &str = "VALTSTORAGE_ENV";
pub const ENV_API_URL: &str = "VALTSTORAGE_API_URL";
pub const ENV_WINDOW_TITLE: &str = "VALTSTORAGE_WINDOW_TITLE";
pub const ENV_INTERACTIVE: &str = "VALTSTORAGE_INTERACTIVE";

/// Deployment the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Development,
    /// Fabricated responses, no network traffic.
    Demo,
}

impl Environment {
    pub const ALL: [Environment; 3] = [
        Environment::Production,
        Environment::Development,
        Environment::Demo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
            Environment::Demo => "demo",
        }
    }

    /// Canonical API URL for this environment.
    pub fn api_url(self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_API_URL,
            Environment::Development => DEVELOPMENT_API_URL,
            Environment::Demo => DEMO_API_URL,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Environment::ALL
            .into_iter()
            .find(|env| env.as_str() == s)
            .ok_or_else(|| {
                CliError::config(format!(
                    "Invalid environment: {}. Must be one of: production, development, demo",
                    s
                ))
            })
    }
}

/// Semantic color slots used by the terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Primary,
    Secondary,
    Success,
    Error,
    Warning,
    Info,
    Border,
}

/// Color name for every [`Role`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub success: String,
    pub error: String,
    pub warning: String,
    pub info: String,
    pub border: String,
}

impl Palette {
    fn from_row(row: [&str; 7]) -> Self {
        let [primary, secondary, success, error, warning, info, border] = row.map(String::from);
        Self {
            primary,
            secondary,
            success,
            error,
            warning,
            info,
            border,
        }
    }

    pub fn get(&self, role: Role) -> &str {
        match role {
            Role::Primary => &self.primary,
            Role::Secondary => &self.secondary,
            Role::Success => &self.success,
            Role::Error => &self.error,
            Role::Warning => &self.warning,
            Role::Info => &self.info,
            Role::Border => &self.border,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::from_row(THEMES[0].1)
    }
}

// primary, secondary, success, error, warning, info, border
const THEMES: [(&str, [&str; 7]); 5] = [
    (
        "default",
        ["cyan", "blue", "green", "red", "yellow", "white", "cyan"],
    ),
    (
        "dark",
        ["blue", "cyan", "green", "red", "yellow", "gray", "blue"],
    ),
    (
        "light",
        ["cyan", "blue", "green", "red", "yellow", "black", "cyan"],
    ),
    (
        "blue",
        ["blue", "cyan", "green", "red", "yellow", "white", "blue"],
    ),
    (
        "green",
        ["green", "cyan", "blue", "red", "yellow", "white", "green"],
    ),
];

/// Names of the built-in themes.
pub fn theme_names() -> impl Iterator<Item = &'static str> {
    THEMES.iter().map(|(name, _)| *name)
}

/// Look up a built-in palette by name.
pub fn theme(name: &str) -> Option<Palette> {
    THEMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, row)| Palette::from_row(*row))
}

/// Effective settings. Field names match the persisted JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub api_url: String,
    pub environment: Environment,
    /// Request timeout in milliseconds.
    pub timeout: u64,
    /// Progress animation step in milliseconds.
    pub progress_update_interval: u64,
    pub use_dedicated_window: bool,
    pub window_title: String,
    pub interactive_mode: bool,
    pub terminal_colors: Palette,
    pub terminal_theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: PRODUCTION_API_URL.to_string(),
            environment: Environment::Production,
            timeout: 60_000,
            progress_update_interval: 500,
            use_dedicated_window: true,
            window_title: "ValStorage CLI".to_string(),
            interactive_mode: true,
            terminal_colors: Palette::default(),
            terminal_theme: "default".to_string(),
        }
    }
}

impl Settings {
    /// Build effective settings from the persisted document (if any) and an
    /// environment lookup.
    ///
    /// An unparsable document is logged and replaced by the defaults.
    pub fn resolve<F>(persisted: Option<&str>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match persisted {
            Some(text) => serde_json::from_str(text).unwrap_or_else(|e| {
                warn!(error = %e, "Error loading configuration, using defaults");
                Settings::default()
            }),
            None => Settings::default(),
        };
        settings.apply_env(env);
        let theme = settings.terminal_theme.clone();
        settings.apply_theme(&theme);
        settings.enforce_demo();
        settings
    }

    /// Apply `VALTSTORAGE_*` overrides in their fixed order.
    pub fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = env(ENV_ENVIRONMENT) {
            match name.parse() {
                Ok(environment) => self.environment = environment,
                Err(e) => warn!(error = %e, "ignoring {}", ENV_ENVIRONMENT),
            }
        }
        if let Some(url) = env(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(title) = env(ENV_WINDOW_TITLE) {
            self.window_title = title;
        }
        match env(ENV_INTERACTIVE).as_deref() {
            Some("true") => self.interactive_mode = true,
            Some("false") => self.interactive_mode = false,
            _ => {}
        }
    }

    fn enforce_demo(&mut self) {
        if self.environment == Environment::Demo {
            self.api_url = DEMO_API_URL.to_string();
        }
    }

    /// Replace the palette with the named theme.
    ///
    /// Unknown names leave the current palette untouched and return `false`.
    pub fn apply_theme(&mut self, name: &str) -> bool {
        match theme(name) {
            Some(palette) => {
                self.terminal_colors = palette;
                true
            }
            None => {
                debug!(theme = name, "unknown theme, keeping current colors");
                false
            }
        }
    }

    /// Base URL for API requests, `mock` in demo mode.
    pub fn api_base_url(&self) -> &str {
        if self.is_demo() {
            DEMO_API_URL
        } else {
            &self.api_url
        }
    }

    pub fn is_demo(&self) -> bool {
        self.environment == Environment::Demo
    }

    pub fn color(&self, role: Role) -> &str {
        self.terminal_colors.get(role)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_update_interval)
    }

    /// Switch environment and reset the API URL to that environment's.
    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
        self.api_url = environment.api_url().to_string();
    }

    /// Update a single key from its string form.
    ///
    /// Keys use the persisted camelCase names. Setting `terminalTheme`
    /// also applies the theme.
    pub fn set(&mut self, key: &str, value: &str) -> CliResult<()> {
        let invalid = || CliError::config(format!("Invalid value for {}: {}", key, value));
        match key {
            "apiUrl" => self.api_url = value.to_string(),
            "environment" => self.set_environment(value.parse()?),
            "timeout" => self.timeout = value.parse().map_err(|_| invalid())?,
            "progressUpdateInterval" => {
                self.progress_update_interval = value.parse().map_err(|_| invalid())?
            }
            "useDedicatedWindow" => self.use_dedicated_window = value.parse().map_err(|_| invalid())?,
            "windowTitle" => self.window_title = value.to_string(),
            "interactiveMode" => self.interactive_mode = value.parse().map_err(|_| invalid())?,
            "terminalTheme" => {
                self.terminal_theme = value.to_string();
                self.apply_theme(value);
            }
            _ => return Err(CliError::config(format!("Unknown setting: {}", key))),
        }
        Ok(())
    }
}

/// Default location of the persisted settings.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".valtstorage")
        .join("config.json")
}

/// Settings plus the file they persist to.
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    settings: Settings,
}

impl Config {
    /// Load from the default location with the process environment.
    pub fn load() -> Self {
        Self::load_from(default_config_path(), |key| std::env::var(key).ok())
    }

    /// Load from `path`, resolving overrides through `env`.
    pub fn load_from<F>(path: PathBuf, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let persisted = match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read configuration");
                None
            }
        };
        let settings = Settings::resolve(persisted.as_deref(), env);
        debug!(
            environment = %settings.environment,
            api_url = settings.api_base_url(),
            "configuration resolved"
        );
        Self { path, settings }
    }

    pub fn new(path: PathBuf, settings: Settings) -> Self {
        Self { path, settings }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Write the current settings to disk.
    ///
    /// Best effort: failures are logged and reported as `false`.
    pub fn save(&self) -> bool {
        match self.try_save() {
            Ok(()) => true,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Error saving configuration");
                false
            }
        }
    }

    fn try_save(&self) -> CliResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.settings)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    fn finish(&self, persist: bool) -> bool {
        !persist || self.save()
    }

    /// Update one key, optionally persisting. `Ok(false)` means the save failed.
    pub fn set(&mut self, key: &str, value: &str, persist: bool) -> CliResult<bool> {
        self.settings.set(key, value)?;
        Ok(self.finish(persist))
    }

    /// Switch to a named environment, optionally persisting.
    pub fn set_environment(&mut self, name: &str, persist: bool) -> CliResult<bool> {
        let environment: Environment = name.parse()?;
        self.settings.set_environment(environment);
        Ok(self.finish(persist))
    }

    /// Restore the built-in defaults, optionally persisting.
    pub fn reset(&mut self, persist: bool) -> bool {
        self.settings = Settings::default();
        self.finish(persist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let settings = Settings::resolve(None, env_of(&[]));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.api_base_url(), PRODUCTION_API_URL);
        assert!(!settings.is_demo());
    }

    #[test]
    fn test_file_merges_over_defaults() {
        let settings = Settings::resolve(
            Some(r#"{"environment": "development", "timeout": 5000, "somethingElse": 1}"#),
            env_of(&[]),
        );
        assert_eq!(settings.environment, Environment::Development);
        assert_eq!(settings.timeout, 5000);
        // untouched keys keep their defaults
        assert_eq!(settings.window_title, "ValStorage CLI");
        assert_eq!(settings.api_url, PRODUCTION_API_URL);
    }

    #[test]
    fn test_env_beats_file_and_demo_forces_mock_url() {
        let settings = Settings::resolve(
            Some(r#"{"environment": "development", "apiUrl": "http://files.example"}"#),
            env_of(&[
                (ENV_ENVIRONMENT, "demo"),
                (ENV_API_URL, "http://override.example"),
            ]),
        );
        assert_eq!(settings.environment, Environment::Demo);
        assert_eq!(settings.api_url, DEMO_API_URL);
        assert_eq!(settings.api_base_url(), DEMO_API_URL);
    }

    #[test]
    fn test_env_api_url_override() {
        let settings = Settings::resolve(
            Some(r#"{"apiUrl": "http://files.example"}"#),
            env_of(&[(ENV_API_URL, "http://override.example")]),
        );
        assert_eq!(settings.api_base_url(), "http://override.example");
    }

    #[test]
    fn test_interactive_only_accepts_literals() {
        let settings = Settings::resolve(None, env_of(&[(ENV_INTERACTIVE, "false")]));
        assert!(!settings.interactive_mode);

        let settings = Settings::resolve(
            Some(r#"{"interactiveMode": false}"#),
            env_of(&[(ENV_INTERACTIVE, "yes")]),
        );
        assert!(!settings.interactive_mode);

        let settings = Settings::resolve(None, env_of(&[(ENV_INTERACTIVE, "TRUE")]));
        assert!(settings.interactive_mode);
    }

    #[test]
    fn test_window_title_from_env() {
        let settings = Settings::resolve(None, env_of(&[(ENV_WINDOW_TITLE, "Vault")]));
        assert_eq!(settings.window_title, "Vault");
    }

    #[test]
    fn test_unknown_env_name_keeps_prior_value() {
        let settings = Settings::resolve(
            Some(r#"{"environment": "development"}"#),
            env_of(&[(ENV_ENVIRONMENT, "staging")]),
        );
        assert_eq!(settings.environment, Environment::Development);
    }

    #[test]
    fn test_unparsable_file_falls_back_to_defaults() {
        let settings = Settings::resolve(Some("{not json"), env_of(&[]));
        assert_eq!(settings, Settings::default());

        // env overrides still apply on top of the fallback
        let settings = Settings::resolve(Some("42"), env_of(&[(ENV_ENVIRONMENT, "demo")]));
        assert!(settings.is_demo());
    }

    #[test]
    fn test_theme_from_file_is_applied() {
        let settings = Settings::resolve(Some(r#"{"terminalTheme": "dark"}"#), env_of(&[]));
        assert_eq!(settings.color(Role::Info), "gray");
        assert_eq!(settings.color(Role::Primary), "blue");
    }

    #[test]
    fn test_unknown_theme_keeps_palette() {
        let mut settings = Settings::default();
        assert!(settings.apply_theme("green"));
        let before = settings.terminal_colors.clone();

        assert!(!settings.apply_theme("neon"));
        assert_eq!(settings.terminal_colors, before);
    }

    #[test]
    fn test_known_theme_replaces_whole_palette() {
        let mut settings = Settings::default();
        settings.terminal_colors.warning = "magenta".to_string();
        settings.terminal_colors.info = "magenta".to_string();

        assert!(settings.apply_theme("light"));
        assert_eq!(settings.terminal_colors, theme("light").unwrap());
        assert_eq!(settings.color(Role::Warning), "yellow");
    }

    #[test]
    fn test_set_theme_reapplies_palette() {
        let mut settings = Settings::default();
        settings.set("terminalTheme", "blue").unwrap();
        assert_eq!(settings.terminal_theme, "blue");
        assert_eq!(settings.color(Role::Border), "blue");
    }

    #[test]
    fn test_set_environment_key_leaves_demo_url_behind() {
        let mut settings = Settings::default();
        settings.set("environment", "demo").unwrap();
        assert_eq!(settings.api_url, DEMO_API_URL);

        settings.set("environment", "production").unwrap();
        assert_eq!(settings.environment, Environment::Production);
        assert_eq!(settings.api_base_url(), PRODUCTION_API_URL);
        assert!(!settings.is_demo());
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut settings = Settings::default();
        assert!(settings.set("timeout", "soon").is_err());
        assert!(settings.set("interactiveMode", "maybe").is_err());
        assert!(settings.set("nope", "1").is_err());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_set_environment_updates_url() {
        let mut settings = Settings::default();
        settings.set_environment(Environment::Development);
        assert_eq!(settings.api_url, DEVELOPMENT_API_URL);
        settings.set_environment(Environment::Demo);
        assert_eq!(settings.api_base_url(), DEMO_API_URL);
    }

    #[test]
    fn test_save_creates_directory_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::load_from(path.clone(), env_of(&[]));
        assert!(config.set("windowTitle", "Vault", true).unwrap());
        assert!(path.exists());

        let reloaded = Config::load_from(path, env_of(&[]));
        assert_eq!(reloaded.settings().window_title, "Vault");
    }

    #[test]
    fn test_save_failure_is_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a dir").unwrap();

        let config = Config::new(blocker.join("config.json"), Settings::default());
        assert!(!config.save());
    }

    #[test]
    fn test_set_environment_rejects_unknown() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::new(dir.path().join("config.json"), Settings::default());
        assert!(config.set_environment("staging", false).is_err());
        assert!(config.set_environment("demo", false).unwrap());
        assert!(config.settings().is_demo());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::new(dir.path().join("config.json"), Settings::default());
        config.set("timeout", "10", false).unwrap();
        assert!(config.reset(true));
        assert_eq!(config.settings(), &Settings::default());
        assert!(config.path().exists());
    }
}
