use super::{CommandResult, Context};
use crate::config::{theme_names, Role};
use crate::error::CliResult;
use crate::ui::{self, paint};

/// What to do with the persisted settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    Show,
    Set { key: String, value: String },
    Environment { name: String },
    Reset,
}

/// Inspect or change the persisted settings.
pub fn config(ctx: &mut Context, action: ConfigAction) -> CliResult<CommandResult> {
    let saved = match action {
        ConfigAction::Show => {
            let settings = ctx.settings();
            println!(
                "{} {}",
                paint(settings, Role::Primary, "Config file:"),
                ctx.config.path().display()
            );
            println!(
                "{} {}",
                paint(settings, Role::Primary, "API base URL:"),
                settings.api_base_url()
            );
            println!(
                "{} {}",
                paint(settings, Role::Primary, "Themes:"),
                theme_names().collect::<Vec<_>>().join(", ")
            );
            println!("{}", serde_json::to_string_pretty(settings)?);
            return Ok(CommandResult::succeeded());
        }
        ConfigAction::Set { key, value } => ctx.config.set(&key, &value, true),
        ConfigAction::Environment { name } => ctx.config.set_environment(&name, true),
        ConfigAction::Reset => Ok(ctx.config.reset(true)),
    };

    let settings = ctx.settings();
    match saved {
        Ok(true) => {
            ui::success(
                settings,
                format!("Configuration saved to {}", ctx.config.path().display()),
            );
            Ok(CommandResult::succeeded())
        }
        Ok(false) => {
            ui::error(settings, "Error saving configuration");
            Ok(CommandResult::failed())
        }
        Err(e) => {
            ui::error(settings, format!("Error: {}", e));
            Ok(CommandResult::failed())
        }
    }
}
