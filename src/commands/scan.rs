use std::process::Command;

use crossterm::style::Stylize;
use tracing::debug;

use super::{conclude, reject, CommandResult, Context};
use crate::config::Role;
use crate::error::{CliError, CliResult};
use crate::share::ShareRef;
use crate::ui::{self, paint};

/// Open the blockchain explorer page for a share in the browser.
pub fn scan(ctx: &Context, input: &str) -> CliResult<CommandResult> {
    let settings = ctx.settings();
    println!(
        "{}",
        paint(settings, Role::Primary, "Opening blockchain explorer in your browser...")
    );

    let share = match ShareRef::parse(input) {
        Ok(share) => share,
        Err(e) => return reject(ctx, e),
    };
    let scan_url = share.scan_url();

    match open_in_browser(&scan_url) {
        Ok(()) => {
            println!(
                "{} {}",
                paint(settings, Role::Success, "\nBrowser opened to:"),
                paint(settings, Role::Success, &scan_url).bold()
            );
            println!(
                "{}",
                paint(
                    settings,
                    Role::Secondary,
                    "\nVerifying file integrity and blockchain records..."
                )
            );
            conclude(ctx, CommandResult::succeeded().with_scan_url(scan_url))
        }
        Err(e) => {
            ui::error(settings, format!("\nError opening browser: {}", e));
            ui::warning(
                settings,
                format!("\nPlease manually open this URL in your browser: {}", scan_url),
            );
            conclude(ctx, CommandResult::failed().with_scan_url(scan_url))
        }
    }
}

/// Hand `url` to the browser named by `$BROWSER`, or the platform opener.
pub fn open_in_browser(url: &str) -> CliResult<()> {
    let mut command = match std::env::var("BROWSER") {
        Ok(browser) if !browser.trim().is_empty() => Command::new(browser.trim()),
        _ => platform_opener(),
    };
    command.arg(url);
    debug!(?command, "opening browser");

    let status = command
        .status()
        .map_err(|e| CliError::Browser(e.to_string()))?;
    if status.success() {
        Ok(())
    } else {
        Err(CliError::Browser(format!("opener exited with {}", status)))
    }
}

#[cfg(target_os = "macos")]
fn platform_opener() -> Command {
    Command::new("open")
}

#[cfg(target_os = "windows")]
fn platform_opener() -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn platform_opener() -> Command {
    Command::new("xdg-open")
}
