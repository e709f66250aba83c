// Library root
// -----------
// The `valtstorage` binary is a thin wrapper around these modules.
//
// Module responsibilities:
// - `config`: layered settings (defaults, ~/.valtstorage/config.json,
//   VALTSTORAGE_* variables) and color themes.
// - `share`: turns share URLs into bare identifiers.
// - `api`: HTTP calls to the public API, or fabricated answers in demo mode.
// - `commands`: upload / download / scan / info / record / config handlers.
// - `shell`: verb parsing and the interactive read loop.
// - `ui` and `progress`: terminal output, prompts and the progress bar.
// - `cli`: clap definitions for single-command mode.
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod progress;
pub mod share;
pub mod shell;
pub mod ui;

pub use config::{Config, Settings};
pub use error::{CliError, CliResult};
