//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::ConfigAction;

/// ValtStorage command-line client.
#[derive(Parser, Debug)]
#[command(name = "valtstorage")]
#[command(version)]
#[command(about = "Secure file storage and sharing with blockchain verification")]
#[command(
    long_about = "Secure file storage and sharing with blockchain verification.\n\nRun without a command to start the interactive shell.",
    after_help = "Examples:\n  $ valtstorage upload ./document.pdf\n  $ valtstorage download https://valtstorage.cloud/share/V1234567\n  $ valtstorage scan V1234567\n\nFor more information visit: https://valtstorage.cloud"
)]
pub struct Cli {
    /// Command to run; omit for the interactive shell.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the settings file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a file to Valtstorage.
    Upload {
        /// File to upload.
        file: PathBuf,
    },

    /// Download a file from Valtstorage.
    Download {
        /// Share URL or identifier.
        share_url: String,

        /// Directory to save into.
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Open the blockchain record of a file in the browser.
    Scan {
        /// Share URL or identifier.
        share_url: String,
    },

    /// Show metadata of a shared file.
    Info {
        /// Share URL or identifier.
        share_url: String,
    },

    /// Show the blockchain record of a shared file.
    Record {
        /// Share URL or identifier.
        share_url: String,
    },

    /// Inspect or change persisted settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective settings.
    Show,

    /// Set one setting and save it (e.g. `terminalTheme dark`).
    Set { key: String, value: String },

    /// Switch environment: production, development or demo.
    Env { name: String },

    /// Restore the defaults and save them.
    Reset,
}

impl From<ConfigCommands> for ConfigAction {
    fn from(cmd: ConfigCommands) -> Self {
        match cmd {
            ConfigCommands::Show => ConfigAction::Show,
            ConfigCommands::Set { key, value } => ConfigAction::Set { key, value },
            ConfigCommands::Env { name } => ConfigAction::Environment { name },
            ConfigCommands::Reset => ConfigAction::Reset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command_means_shell() {
        let cli = Cli::try_parse_from(["valtstorage"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_download_defaults_to_cwd() {
        let cli = Cli::try_parse_from(["valtstorage", "download", "V1A2B3C4D"]).unwrap();
        match cli.command {
            Some(Commands::Download { share_url, output }) => {
                assert_eq!(share_url, "V1A2B3C4D");
                assert_eq!(output, PathBuf::from("."));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_upload_requires_file() {
        assert!(Cli::try_parse_from(["valtstorage", "upload"]).is_err());
    }
}
