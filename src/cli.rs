//! The command line interface for the map.
use crate::atlas::Atlas;
use crate::log;
use crate::settings::Settings;
use crate::window::run_window;
use ::log::info;
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the map.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Open the interactive map.
    Run {
        /// Path to the data directory.
        data_dir: PathBuf,
    },
    /// Check that a data directory can be loaded, without opening a window.
    Validate {
        /// Path to the data directory.
        data_dir: PathBuf,
    },
    /// Manage the program settings file.
    Settings {
        /// The available subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { data_dir } => handle_run_command(&data_dir, None),
            Self::Validate { data_dir } => handle_validate_command(&data_dir, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ renewable-atlas --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided, and initialise the logger
fn init_settings_and_logging(settings: Option<Settings>) -> Result<Settings> {
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    log::init(Some(&settings.log_level)).context("Failed to initialise logging.")?;

    Ok(settings)
}

/// Handle the `run` command.
pub fn handle_run_command(data_dir: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = init_settings_and_logging(settings)?;

    let atlas = Atlas::load(data_dir).context("Failed to load data.")?;
    info!("Loaded data from {}", data_dir.display());

    run_window(atlas, settings.fps)
}

/// Handle the `validate` command.
pub fn handle_validate_command(data_dir: &Path, settings: Option<Settings>) -> Result<()> {
    init_settings_and_logging(settings)?;

    Atlas::load(data_dir).context("Failed to validate data.")?;
    info!("Data validation successful!");

    Ok(())
}
