// UI layer: banner, help text, colors and the small prompts shown around
// commands. Everything here writes straight to the terminal; the command
// handlers decide *what* to say and use these helpers to say it in the
// active theme's colors.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::style::{Color, StyledContent, Stylize};
use crossterm::terminal::{self, Clear, ClearType, SetTitle};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use crate::config::{Role, Settings};

const RULE: &str = "───────────────────────────────────────────────────────────────";
const WEBSITE: &str = "https://valtstorage.cloud";

/// Map a palette color name to a terminal color. Unknown names reset.
pub fn color(name: &str) -> Color {
    match name.to_ascii_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::DarkRed,
        "green" => Color::DarkGreen,
        "yellow" => Color::DarkYellow,
        "blue" => Color::DarkBlue,
        "magenta" => Color::DarkMagenta,
        "cyan" => Color::DarkCyan,
        "white" => Color::Grey,
        "gray" | "grey" => Color::DarkGrey,
        _ => Color::Reset,
    }
}

/// Style `text` with the color the active theme assigns to `role`.
pub fn paint(settings: &Settings, role: Role, text: impl Display) -> StyledContent<String> {
    text.to_string().with(color(settings.color(role)))
}

fn muted(text: impl Display) -> StyledContent<String> {
    text.to_string().with(Color::DarkGrey)
}

/// Whether both ends of the session are attached to a terminal.
pub fn is_terminal() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

pub fn banner(settings: &Settings) {
    let title = "VALTSTORAGE.CLOUD";
    let tagline = "Decentralized Storage with Proof of Activity";
    let width = tagline.chars().count() + 4;
    let border = |s: String| paint(settings, Role::Border, s);
    let line = |text: &str| {
        let pad = width - text.chars().count();
        (" ".repeat(pad / 2), " ".repeat(pad - pad / 2))
    };

    println!();
    println!("{}", border(format!("╔{}╗", "═".repeat(width))));
    println!("{}{}{}", border("║".into()), " ".repeat(width), border("║".into()));
    let (l, r) = line(title);
    println!(
        "{}{}{}{}{}",
        border("║".into()),
        l,
        paint(settings, Role::Primary, title).bold(),
        r,
        border("║".into())
    );
    let (l, r) = line(tagline);
    println!(
        "{}{}{}{}{}",
        border("║".into()),
        l,
        paint(settings, Role::Info, tagline),
        r,
        border("║".into())
    );
    println!("{}{}{}", border("║".into()), " ".repeat(width), border("║".into()));
    println!("{}", border(format!("╚{}╝", "═".repeat(width))));
    println!();
}

/// Verb, arguments and description for every shell command.
pub const COMMANDS: [(&str, &str, &str); 8] = [
    ("upload", "<file>", "Upload a file to ValStorage"),
    ("download", "<shareUrl>", "Download a file from ValStorage"),
    ("scan", "<shareUrl>", "View blockchain verification"),
    ("info", "<shareUrl>", "Show metadata of a shared file"),
    ("record", "<shareUrl>", "Show the blockchain record of a shared file"),
    ("help", "", "Show this help message"),
    ("exit", "", "Exit the ValStorage CLI"),
    ("clear", "", "Clear the terminal screen"),
];

pub fn help(settings: &Settings) {
    println!("Available commands:");
    for (verb, args, description) in COMMANDS {
        let pad = 26usize.saturating_sub(verb.len() + args.len() + 1);
        println!(
            "  {} {}{}{}",
            paint(settings, Role::Primary, verb),
            args,
            " ".repeat(pad),
            description
        );
    }
    println!();
    println!(
        "For more information visit: {}",
        paint(settings, Role::Primary, WEBSITE)
    );
}

/// Closing rule printed after every command.
pub fn footer() {
    println!();
    println!("{}", muted(RULE));
    println!("{}", muted(format!("For more information visit: {}", WEBSITE)));
    println!("{}", muted(RULE));
}

pub fn success(settings: &Settings, text: impl Display) {
    println!("{}", paint(settings, Role::Success, text));
}

pub fn error(settings: &Settings, text: impl Display) {
    eprintln!("{}", paint(settings, Role::Error, text));
}

pub fn warning(settings: &Settings, text: impl Display) {
    println!("{}", paint(settings, Role::Warning, text));
}

pub fn goodbye(settings: &Settings) {
    warning(settings, "Exiting ValStorage CLI. Goodbye!");
}

/// Clear the screen and put the cursor in the top-left corner.
pub fn clear_screen() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    stdout.flush()
}

pub fn set_title(title: &str) -> io::Result<()> {
    execute!(io::stdout(), SetTitle(title))
}

/// Ask whether the shell should keep running after a command.
pub fn confirm_return_to_menu(settings: &Settings) -> io::Result<bool> {
    println!();
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(paint(settings, Role::Primary, "Return to main menu?").to_string())
        .default(true)
        .interact()
        .map_err(|dialoguer::Error::IO(e)| e)
}

/// Block until any key is pressed. Ctrl-C is reported as `Interrupted`.
pub fn wait_for_keypress(settings: &Settings, message: &str) -> io::Result<()> {
    println!("{}", paint(settings, Role::Primary, message));
    io::stdout().flush()?;
    terminal::enable_raw_mode()?;
    let result = loop {
        match event::read() {
            Ok(Event::Key(key)) => match key_press(key) {
                Some(outcome) => break outcome,
                None => continue,
            },
            Ok(_) => continue,
            Err(e) => break Err(e),
        }
    };
    terminal::disable_raw_mode()?;
    result
}

/// What a key event means while waiting for a key press.
/// Raw mode swallows SIGINT, so Ctrl-C has to be recognized here.
fn key_press(key: KeyEvent) -> Option<io::Result<()>> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Err(io::ErrorKind::Interrupted.into()));
    }
    Some(Ok(()))
}
