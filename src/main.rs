mod app;
mod autocomplete;
mod buffer;
mod config;
mod console;
mod executor;
mod history;
mod i18n;
mod messages;
mod model;
mod popup;
mod theme;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use config::LoadedConfig;
use console::{Console, ConsoleSettings};
use executor::{ChannelSink, spawn_executor};
use i18n::{KEY_CONFIG, KEY_LOADED, Localizer, Translator};
use model::CommandCatalog;
use popup::WidthSettings;
use theme::Theme;

const LOG_ENV: &str = "CMDCON_LOG";

#[derive(Debug, Parser)]
#[command(name = "cmdcon", version, about = "Terminal command console")]
struct Cli {
    /// Override config path. If omitted, cmdcon checks ./cmdcon.toml, ./.cmdcon.toml, and then ~/.config/cmdcon/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start in this locale instead of the configured one
    #[arg(short, long)]
    locale: Option<String>,

    /// Write logs here instead of the cache directory
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write an example config to the global config path and exit
    #[arg(long)]
    init: bool,

    /// Overwrite an existing config with --init
    #[arg(long, requires = "init")]
    force: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.init {
        let path = config::global_config_path()?;
        config::write_example_config(&path, cli.force)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let _log_guard = init_logging(cli.log_file.as_deref())?;

    let cwd = env::current_dir()?;
    let loaded = config::load(&cwd, cli.config.as_deref())?;
    info!(path = ?loaded.path, commands = loaded.config.commands.len(), "config loaded");

    let catalog = Arc::new(CommandCatalog::from_config(&loaded.config)?);
    if catalog.is_empty() {
        warn!("no commands configured; every line will be unknown");
    }
    let translator = Arc::new(build_translator(&loaded, &catalog, cli.locale.as_deref())?);
    info!(locale = %translator.locale(), available = ?translator.locales(), "translations ready");

    if !theme::install(Theme::from_config(&loaded.config.theme)?) {
        warn!("theme already installed; keeping the first one");
    }

    let (sink, submissions) = ChannelSink::channel();
    let _executor = spawn_executor(catalog.clone(), submissions)?;

    let console_config = &loaded.config.console;
    let settings = ConsoleSettings {
        widths: WidthSettings {
            min_width: console_config.min_width,
            width_ratio: console_config.width_ratio,
            margin: console_config.margin,
        },
        suggest_on_unknown: console_config.suggest_on_unknown,
    };
    let mut console = Console::new(catalog.clone(), translator.clone(), Box::new(sink), settings);

    console.print_message(KEY_LOADED, Some(&catalog.len().to_string()));
    if let Some(path) = &loaded.path {
        console.print_message(KEY_CONFIG, Some(&path.display().to_string()));
    }

    app::run_tui(&mut console, translator)?;
    info!("console closed");
    Ok(())
}

fn build_translator(
    loaded: &LoadedConfig,
    catalog: &CommandCatalog,
    cli_locale: Option<&str>,
) -> Result<Translator> {
    let translator = catalog
        .commands()
        .iter()
        .fold(Translator::new(&loaded.config.locales), |translator, command| {
            match &command.description {
                Some(description) => {
                    translator.with_description(&command.group, &command.global_name, description)
                }
                None => translator,
            }
        });

    if let Some(locale) = cli_locale.or(loaded.config.locale.as_deref()) {
        translator.set_locale(locale)?;
    }
    Ok(translator)
}

fn init_logging(explicit_path: Option<&Path>) -> Result<WorkerGuard> {
    let log_path = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => dirs::cache_dir()
            .context("unable to resolve OS cache directory")?
            .join("cmdcon")
            .join("cmdcon.log"),
    };
    let log_dir = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = log_path
        .file_name()
        .context("log path has no file name")?
        .to_os_string();
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed when embedded; keep going without ours.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .try_init();

    Ok(guard)
}
