use std::path::Path;

use crossterm::style::Stylize;

use super::{conclude, reject, CommandResult, Context};
use crate::config::Role;
use crate::error::{CliError, CliResult};
use crate::share::ShareRef;
use crate::ui::{self, paint};

/// Upload a local file and print its share and scan links.
pub fn upload(ctx: &Context, path: &Path) -> CliResult<CommandResult> {
    let settings = ctx.settings();
    if !path.is_file() {
        return reject(ctx, CliError::FileNotFound(path.to_path_buf()));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    println!(
        "{}",
        paint(settings, Role::Primary, format!("Uploading {} to Valtstorage...", name))
    );

    let animation = ctx.animation("Uploading...");
    let res = match ctx.api.upload_file(path) {
        Ok(res) => {
            animation.finish();
            res
        }
        Err(e) => {
            animation.abandon();
            ui::error(settings, format!("\nError uploading file: {}", e));
            return conclude(ctx, CommandResult::failed());
        }
    };

    ui::success(settings, "\nFile uploaded successfully!");
    println!(
        "{} {}",
        paint(settings, Role::Primary, "Share URL:"),
        paint(settings, Role::Primary, &res.share_url).bold()
    );
    if let Ok(share) = ShareRef::parse(&res.share_url) {
        println!(
            "{} {}",
            paint(settings, Role::Secondary, "View blockchain record:"),
            paint(settings, Role::Secondary, share.scan_url()).bold()
        );
    }
    for file in &res.files {
        println!(
            "  {} ({} bytes, {})",
            paint(settings, Role::Info, &file.name),
            file.size,
            file.mime_type
        );
    }
    if let Some(expires_at) = &res.expires_at {
        println!("{} {}", paint(settings, Role::Info, "Expires at:"), expires_at);
    }
    ui::success(
        settings,
        "\nYour file is now securely stored with 7-layer protection on the decentralized network.",
    );

    conclude(ctx, CommandResult::succeeded().with_share_url(res.share_url))
}
