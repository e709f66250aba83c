//! Command handlers.
//!
//! Each handler validates its input, runs one remote (or browser) operation
//! behind the progress animation, prints the outcome and returns a
//! [`CommandResult`]. Validation and transport problems become a failed
//! result; only unexpected terminal or filesystem errors are returned as `Err`.

use std::path::PathBuf;

use crate::api::ApiClient;
use crate::config::{Config, Settings};
use crate::error::{CliError, CliResult};
use crate::progress::Animation;
use crate::ui;

mod download;
mod lookup;
mod scan;
mod settings;
mod upload;

pub use download::download;
pub use lookup::{info, record};
pub use scan::{open_in_browser, scan};
pub use settings::{config, ConfigAction};
pub use upload::upload;

/// Where a command was invoked from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Single command from the process arguments.
    OneShot,
    /// Interactive read loop.
    Shell,
}

/// Everything a handler needs: settings, API client and invocation mode.
pub struct Context {
    pub config: Config,
    pub api: ApiClient,
    pub mode: Mode,
    prompts: bool,
}

impl Context {
    /// Build a context whose API client follows the configured environment.
    pub fn new(config: Config, mode: Mode) -> CliResult<Self> {
        let api = ApiClient::from_settings(config.settings())?;
        Ok(Self::with_api(config, api, mode))
    }

    pub fn with_api(config: Config, api: ApiClient, mode: Mode) -> Self {
        Self {
            config,
            api,
            mode,
            prompts: ui::is_terminal(),
        }
    }

    pub fn settings(&self) -> &Settings {
        self.config.settings()
    }

    /// Whether follow-up prompts (return to menu, key press) may be shown.
    fn prompts_enabled(&self) -> bool {
        self.prompts && self.mode == Mode::Shell && self.settings().use_dedicated_window
    }

    fn animation(&self, status: &str) -> Animation {
        Animation::start(status, self.settings().progress_interval())
    }
}

/// Outcome of one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    pub share_url: Option<String>,
    pub filename: Option<PathBuf>,
    pub scan_url: Option<String>,
    /// Answer to "Return to main menu?", only asked in the shell.
    pub return_to_menu: Option<bool>,
}

impl CommandResult {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn failed() -> Self {
        Self::default()
    }

    pub fn with_share_url(mut self, url: impl Into<String>) -> Self {
        self.share_url = Some(url.into());
        self
    }

    pub fn with_filename(mut self, path: PathBuf) -> Self {
        self.filename = Some(path);
        self
    }

    pub fn with_scan_url(mut self, url: impl Into<String>) -> Self {
        self.scan_url = Some(url.into());
        self
    }
}

/// Print the footer and, in the shell, run the follow-up prompt.
fn conclude(ctx: &Context, mut result: CommandResult) -> CliResult<CommandResult> {
    ui::footer();
    if !ctx.prompts_enabled() {
        return Ok(result);
    }
    let settings = ctx.settings();
    if settings.interactive_mode {
        result.return_to_menu = Some(ui::confirm_return_to_menu(settings)?);
    } else {
        ui::wait_for_keypress(settings, "\nPress any key to continue...")?;
    }
    Ok(result)
}

/// Report a validation error and conclude with a failed result.
fn reject(ctx: &Context, err: CliError) -> CliResult<CommandResult> {
    ui::error(ctx.settings(), format!("Error: {}", err));
    conclude(ctx, CommandResult::failed())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::api::demo::DemoBackend;
    use crate::config::Environment;
    use tempfile::TempDir;

    /// Demo-mode context with an instant backend and no prompts.
    pub fn demo_context(dir: &TempDir) -> Context {
        let mut settings = Settings::default();
        settings.set_environment(Environment::Demo);
        settings.progress_update_interval = 5;
        let config = Config::new(dir.path().join("config.json"), settings);
        let mut ctx = Context::with_api(config, ApiClient::demo(DemoBackend::instant()), Mode::Shell);
        ctx.prompts = false;
        ctx
    }

    /// Context talking to a real server at `base_url`.
    pub fn live_context(dir: &TempDir, base_url: &str) -> Context {
        let mut settings = Settings::default();
        settings.api_url = base_url.to_string();
        settings.progress_update_interval = 5;
        let config = Config::new(dir.path().join("config.json"), settings);
        let api = ApiClient::from_settings(config.settings()).expect("live client");
        let mut ctx = Context::with_api(config, api, Mode::Shell);
        ctx.prompts = false;
        ctx
    }
}
