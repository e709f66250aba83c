use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crossterm::style::Stylize;
use tracing::debug;

use super::{conclude, reject, CommandResult, Context};
use crate::config::Role;
use crate::error::{CliError, CliResult, Operation};
use crate::share::ShareRef;
use crate::ui::{self, paint};

/// Download the file behind a share into `output_dir`.
pub fn download(ctx: &Context, input: &str, output_dir: &Path) -> CliResult<CommandResult> {
    let settings = ctx.settings();
    println!(
        "{}",
        paint(settings, Role::Primary, "Downloading from Valtstorage...")
    );

    let share = match ShareRef::parse(input) {
        Ok(share) => share,
        Err(e) => return reject(ctx, e),
    };

    let animation = ctx.animation("Downloading...");
    let saved = match fetch(ctx, &share, output_dir) {
        Ok(saved) => {
            animation.finish();
            saved
        }
        Err(e) => {
            animation.abandon();
            ui::error(settings, format!("\nError downloading file: {}", e));
            return conclude(ctx, CommandResult::failed());
        }
    };

    println!(
        "{} {}",
        paint(settings, Role::Success, "\nFile saved:"),
        paint(settings, Role::Success, saved.display()).bold()
    );
    ui::success(
        settings,
        "\nYour file has been securely retrieved from the decentralized network.",
    );
    conclude(ctx, CommandResult::succeeded().with_filename(saved))
}

fn fetch(ctx: &Context, share: &ShareRef, output_dir: &Path) -> CliResult<PathBuf> {
    let mut download = ctx.api.download_file(share)?;
    let name = download
        .filename
        .take()
        .unwrap_or_else(|| format!("valtstorage-{}.zip", share.id()));
    let path = output_dir.join(name);
    debug!(path = %path.display(), content_type = ?download.content_type, "writing download");

    let mut file = File::create(&path)?;
    let written = io::copy(&mut download.body, &mut file).and_then(|_| file.flush());
    if let Err(e) = written {
        // don't leave a truncated file behind
        drop(file);
        let _ = std::fs::remove_file(&path);
        return Err(body_error(e));
    }
    Ok(path)
}

/// Map a failure while streaming the body. Network errors get the same
/// short message as a failed request; disk errors stay I/O errors.
fn body_error(err: io::Error) -> CliError {
    let op = Operation::Download;
    if err.get_ref().is_some_and(|inner| inner.is::<reqwest::Error>()) {
        if let Some(inner) = err.into_inner() {
            if let Ok(e) = inner.downcast::<reqwest::Error>() {
                return CliError::transport(op, *e);
            }
        }
        return CliError::Transport { op };
    }
    if err.kind() == io::ErrorKind::TimedOut {
        debug!(%op, error = %err, "transport failure");
        return CliError::Timeout { op };
    }
    err.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{demo_context, live_context};
    use std::io::Read;
    use std::net::TcpListener;
    use tempfile::TempDir;

    /// Serve one response that promises more bytes than it sends.
    fn truncating_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(
                b"HTTP/1.1 200 OK\r\nContent-Length: 100000\r\nContent-Type: application/zip\r\n\r\nhello",
            );
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_demo_download_writes_file() {
        let dir = TempDir::new().unwrap();
        let ctx = demo_context(&dir);

        let result = download(
            &ctx,
            "https://valtstorage.cloud/share/V1A2B3C4D/",
            dir.path(),
        )
        .unwrap();
        assert!(result.success);
        let saved = result.filename.unwrap();
        assert_eq!(saved, dir.path().join("valtstorage-V1A2B3C4D-README.md"));
        assert!(std::fs::metadata(&saved).unwrap().len() > 0);
    }

    #[test]
    fn test_invalid_reference_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let ctx = demo_context(&dir);

        let result = download(&ctx, "https://valtstorage.cloud/share//", dir.path()).unwrap();
        assert!(!result.success);
        assert_eq!(result.filename, None);
    }

    #[test]
    fn test_broken_body_is_a_transport_error() {
        let dir = TempDir::new().unwrap();
        let ctx = live_context(&dir, &truncating_server());
        let share = ShareRef::parse("V1A2B3C4D").unwrap();

        let err = fetch(&ctx, &share, dir.path()).unwrap_err();
        assert!(
            matches!(err, CliError::Transport { op: Operation::Download }),
            "{err:?}"
        );
        assert_eq!(err.to_string(), "Download failed: Could not complete request");
        assert!(!dir.path().join("valtstorage-V1A2B3C4D.zip").exists());
    }

    #[test]
    fn test_disk_errors_stay_io_errors() {
        let err = body_error(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        assert!(matches!(err, CliError::Io(_)));

        let err = body_error(io::ErrorKind::TimedOut.into());
        assert!(matches!(err, CliError::Timeout { op: Operation::Download }));
    }

    #[test]
    fn test_unwritable_target_is_a_failed_result() {
        let dir = TempDir::new().unwrap();
        let ctx = demo_context(&dir);

        let result = download(&ctx, "V1A2B3C4D", &dir.path().join("missing-dir")).unwrap();
        assert!(!result.success);
    }
}
