// Entrypoint for the CLI application.
// - No command: start the interactive shell.
// - Otherwise run exactly one command and exit with its status.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use valtstorage_cli::cli::{Cli, Commands};
use valtstorage_cli::commands::{self, Context, Mode};
use valtstorage_cli::config::{default_config_path, Config};
use valtstorage_cli::error::{CliError, CliResult};
use valtstorage_cli::{shell, ui};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = Config::load_from(path, |key| std::env::var(key).ok());

    let code = match run(cli, config) {
        Ok(code) => code,
        Err(e) => {
            print_error(&e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    // RUST_LOG wins over --verbose
    let fallback = if verbose {
        "valtstorage_cli=debug,valtstorage=debug"
    } else {
        "valtstorage_cli=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init()?;
    Ok(())
}

fn print_error(e: &CliError) {
    let settings = valtstorage_cli::Settings::default();
    ui::error(&settings, format!("Error: {}", e));
}

fn run(cli: Cli, config: Config) -> CliResult<i32> {
    let Some(command) = cli.command else {
        let ctx = Context::new(config, Mode::Shell)?;
        shell::run(&ctx)?;
        return Ok(0);
    };

    let mut ctx = Context::new(config, Mode::OneShot)?;
    if !matches!(command, Commands::Config { .. }) {
        ui::banner(ctx.settings());
    }
    let result = match command {
        Commands::Upload { file } => commands::upload(&ctx, &file)?,
        Commands::Download { share_url, output } => commands::download(&ctx, &share_url, &output)?,
        Commands::Scan { share_url } => commands::scan(&ctx, &share_url)?,
        Commands::Info { share_url } => commands::info(&ctx, &share_url)?,
        Commands::Record { share_url } => commands::record(&ctx, &share_url)?,
        Commands::Config { command } => commands::config(&mut ctx, command.into())?,
    };
    Ok(if result.success { 0 } else { 1 })
}
