//! Verb parsing and the interactive read loop.
//!
//! The shell reads one line at a time, splits it on whitespace and runs the
//! matching handler. Errors from a handler are reported and the loop keeps
//! going; only `exit`, Ctrl-C or end of input end the session.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use dialoguer::theme::ColorfulTheme;
use dialoguer::{BasicHistory, Completion, Input};
use tracing::debug;

use crate::commands::{self, CommandResult, Context};
use crate::error::{CliError, CliResult};
use crate::ui;

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Exit,
    Clear,
    Help,
    Upload(PathBuf),
    Download(String),
    Scan(String),
    Info(String),
    Record(String),
}

/// Whether the shell keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Parse one input line. Blank input yields `Ok(None)`.
pub fn parse(input: &str) -> CliResult<Option<Verb>> {
    let mut tokens = input.split_whitespace();
    let Some(first) = tokens.next() else {
        return Ok(None);
    };
    let verb = first.to_lowercase();
    let args: Vec<&str> = tokens.collect();

    let parsed = match verb.as_str() {
        "exit" => Verb::Exit,
        "clear" => Verb::Clear,
        "help" => Verb::Help,
        "upload" => Verb::Upload(PathBuf::from(single(&args, "file path", "upload <file>")?)),
        "download" => Verb::Download(single(&args, "share URL", "download <shareUrl>")?),
        "scan" => Verb::Scan(single(&args, "share URL", "scan <shareUrl>")?),
        "info" => Verb::Info(single(&args, "share URL", "info <shareUrl>")?),
        "record" => Verb::Record(single(&args, "share URL", "record <shareUrl>")?),
        _ => return Err(CliError::UnknownCommand(verb)),
    };
    Ok(Some(parsed))
}

fn single(args: &[&str], what: &str, usage: &'static str) -> CliResult<String> {
    match args {
        [one] => Ok(one.to_string()),
        [] => Err(CliError::usage(format!("Missing {}", what), usage)),
        _ => Err(CliError::usage(format!("Too many arguments, expected one {}", what), usage)),
    }
}

/// Parse and run one line of input.
///
/// Input problems are reported to the user and never returned as errors.
pub fn dispatch(ctx: &Context, input: &str) -> CliResult<Flow> {
    match parse(input) {
        Ok(Some(verb)) => execute(ctx, verb),
        Ok(None) => Ok(Flow::Continue),
        Err(e) => {
            report(ctx, &e);
            Ok(Flow::Continue)
        }
    }
}

/// Run a parsed verb.
pub fn execute(ctx: &Context, verb: Verb) -> CliResult<Flow> {
    debug!(?verb, "executing");
    let settings = ctx.settings();
    let result = match verb {
        Verb::Exit => {
            ui::goodbye(settings);
            return Ok(Flow::Exit);
        }
        Verb::Clear => {
            ui::clear_screen()?;
            ui::banner(settings);
            return Ok(Flow::Continue);
        }
        Verb::Help => {
            ui::help(settings);
            return Ok(Flow::Continue);
        }
        Verb::Upload(path) => commands::upload(ctx, &path)?,
        Verb::Download(share) => commands::download(ctx, &share, Path::new("."))?,
        Verb::Scan(share) => commands::scan(ctx, &share)?,
        Verb::Info(share) => commands::info(ctx, &share)?,
        Verb::Record(share) => commands::record(ctx, &share)?,
    };
    Ok(after(ctx, &result))
}

fn after(ctx: &Context, result: &CommandResult) -> Flow {
    if result.return_to_menu == Some(false) {
        ui::goodbye(ctx.settings());
        Flow::Exit
    } else {
        Flow::Continue
    }
}

fn report(ctx: &Context, err: &CliError) {
    let settings = ctx.settings();
    match err {
        CliError::Usage { message, usage } => {
            ui::error(settings, format!("Error: {}", message));
            ui::warning(settings, format!("Usage: {}", usage));
        }
        CliError::UnknownCommand(_) => {
            ui::error(settings, err);
            ui::warning(settings, "Type \"help\" to see available commands");
        }
        _ => ui::error(settings, format!("Error: {}", err)),
    }
}

/// Source of shell input lines.
trait LineSource {
    /// Next line, or `None` at end of input.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Completes the verb at the start of the line.
struct VerbCompletion;

impl Completion for VerbCompletion {
    fn get(&self, input: &str) -> Option<String> {
        if input.is_empty() || input.contains(char::is_whitespace) {
            return None;
        }
        ui::COMMANDS
            .iter()
            .map(|(verb, _, _)| *verb)
            .find(|verb| verb.starts_with(input))
            .map(str::to_string)
    }
}

/// Terminal prompt with history and tab completion.
struct Prompt {
    theme: ColorfulTheme,
    history: BasicHistory,
}

impl Prompt {
    fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
            history: BasicHistory::new().max_entries(100).no_duplicates(true),
        }
    }
}

impl LineSource for Prompt {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let line: String = Input::with_theme(&self.theme)
            .with_prompt("valtstorage")
            .allow_empty(true)
            .history_with(&mut self.history)
            .completion_with(&VerbCompletion)
            .interact_text()
            .map_err(|dialoguer::Error::IO(e)| e)?;
        Ok(Some(line))
    }
}

/// Plain line reader for piped input.
struct Piped<R> {
    reader: R,
}

impl<R: BufRead> LineSource for Piped<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Run the interactive shell until `exit`, Ctrl-C or end of input.
pub fn run(ctx: &Context) -> CliResult<()> {
    let terminal = ui::is_terminal();
    if terminal {
        if let Err(e) = ui::set_title(&ctx.settings().window_title) {
            debug!(error = %e, "could not set window title");
        }
        ui::clear_screen()?;
    }
    ui::banner(ctx.settings());
    ui::help(ctx.settings());
    println!();

    let mut source: Box<dyn LineSource> = if terminal {
        Box::new(Prompt::new())
    } else {
        Box::new(Piped {
            reader: io::stdin().lock(),
        })
    };

    drive(ctx, source.as_mut(), dispatch)
}

/// Feed lines from `source` to `step` until the session ends.
fn drive<F>(ctx: &Context, source: &mut dyn LineSource, mut step: F) -> CliResult<()>
where
    F: FnMut(&Context, &str) -> CliResult<Flow>,
{
    loop {
        let line = match source.next_line() {
            Ok(Some(line)) => line,
            Ok(None) => {
                ui::goodbye(ctx.settings());
                return Ok(());
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => return interrupted(ctx),
            Err(e) => return Err(e.into()),
        };

        match step(ctx, &line) {
            Ok(Flow::Exit) => return Ok(()),
            Ok(Flow::Continue) => {}
            // Ctrl-C inside a follow-up prompt ends the session too
            Err(e) if e.is_interrupted() => return interrupted(ctx),
            Err(e) => ui::error(ctx.settings(), format!("Error: {}", e)),
        }
    }
}

fn interrupted(ctx: &Context) -> CliResult<()> {
    println!();
    ui::goodbye(ctx.settings());
    Ok(())
}
