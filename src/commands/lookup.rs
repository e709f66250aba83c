// Read-only lookups: file metadata and the blockchain record of a share.

use super::{conclude, reject, CommandResult, Context};
use crate::config::Role;
use crate::error::CliResult;
use crate::share::ShareRef;
use crate::ui::{self, paint};

/// Print the metadata of a shared file.
pub fn info(ctx: &Context, input: &str) -> CliResult<CommandResult> {
    let settings = ctx.settings();
    let share = match ShareRef::parse(input) {
        Ok(share) => share,
        Err(e) => return reject(ctx, e),
    };

    let animation = ctx.animation("Fetching file info...");
    let info = match ctx.api.file_info(&share) {
        Ok(info) => {
            animation.finish();
            info
        }
        Err(e) => {
            animation.abandon();
            ui::error(settings, format!("\nError fetching file info: {}", e));
            return conclude(ctx, CommandResult::failed());
        }
    };

    let share_url = info.share_url.unwrap_or_else(|| share.share_url());
    println!("{} {}", paint(settings, Role::Primary, "Share URL:"), share_url);
    if let Some(expires_at) = &info.expires_at {
        println!("{} {}", paint(settings, Role::Primary, "Expires at:"), expires_at);
    }
    for file in &info.files {
        println!(
            "  {} ({} bytes, {})",
            paint(settings, Role::Info, &file.name),
            file.size,
            file.mime_type
        );
    }
    conclude(ctx, CommandResult::succeeded().with_share_url(share_url))
}

/// Print the blockchain record of a shared file.
pub fn record(ctx: &Context, input: &str) -> CliResult<CommandResult> {
    let settings = ctx.settings();
    let share = match ShareRef::parse(input) {
        Ok(share) => share,
        Err(e) => return reject(ctx, e),
    };

    let animation = ctx.animation("Fetching blockchain record...");
    let record = match ctx.api.blockchain_record(&share) {
        Ok(record) => {
            animation.finish();
            record
        }
        Err(e) => {
            animation.abandon();
            ui::error(settings, format!("\nError fetching blockchain record: {}", e));
            return conclude(ctx, CommandResult::failed());
        }
    };

    let field = |label: &str, value: &dyn std::fmt::Display| {
        println!("{} {}", paint(settings, Role::Primary, format!("{:<14}", label)), value);
    };
    field("Record:", &record.record_id);
    if let Some(name) = &record.file_name {
        field("File:", name);
    }
    if let Some(status) = &record.status {
        field("Status:", status);
    }
    field("Verified:", &record.is_verified);
    field("Downloads:", &record.download_count);
    if let Some(expires_in) = &record.expires_in {
        field("Expires in:", expires_in);
    }

    println!();
    println!(
        "{}",
        paint(
            settings,
            Role::Secondary,
            format!("Transactions ({}):", record.transaction_count)
        )
    );
    for tx in &record.transactions {
        let mark = if tx.confirmed { "confirmed" } else { "pending" };
        println!(
            "  {} {} {} [{}]",
            paint(settings, Role::Info, &tx.timestamp),
            tx.transaction_type,
            tx.id,
            mark
        );
    }
    conclude(ctx, CommandResult::succeeded().with_scan_url(share.scan_url()))
}
