// Courier settings CLI - headless inspection of the preferences file

mod commands;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use commands::CliError;
use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "courier-settings")]
#[command(about = "Inspect and edit Courier preferences (headless)")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Preferences file [default: ~/.config/courier/preferences.json]
    #[arg(long, global = true, env = "COURIER_PREFERENCES")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every setting with its current value
    List {
        /// Emit a JSON array instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one setting
    #[command(after_help = "\
Examples:
  courier-settings get DarkMode
  courier-settings get ProfileName --json")]
    Get {
        /// Setting name (see `courier-settings keys`)
        key: String,

        #[arg(long)]
        json: bool,
    },

    /// Write one setting and notify subscribers
    #[command(after_help = "\
Examples:
  courier-settings set DarkMode true
  courier-settings set SoundAlerts 2
  courier-settings set ProfileName 'Ada Lovelace'
  courier-settings set AccentColor 7 --as text")]
    Set {
        key: String,

        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Force the value type (inferred when omitted)
        #[arg(long = "as", value_enum)]
        as_kind: Option<ValueKind>,
    },

    /// Clear one setting
    Unset { key: String },

    /// List known settings with their notification topics
    Keys,

    /// Print the resolved preferences file path
    Path,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ValueKind {
    Int,
    Text,
    Bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let store_path = cli.store.unwrap_or_else(courier_settings::default_store_path);
    log::debug!("preferences file: {}", store_path.display());

    let result = match cli.command {
        Commands::List { json } => commands::cmd_list(&store_path, json),
        Commands::Get { key, json } => commands::cmd_get(&store_path, &key, json),
        Commands::Set { key, value, as_kind } => commands::cmd_set(&store_path, &key, &value, as_kind),
        Commands::Unset { key } => commands::cmd_unset(&store_path, &key),
        Commands::Keys => commands::cmd_keys(),
        Commands::Path => {
            println!("{}", store_path.display());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => report(e),
    }
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn report(err: CliError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err.exit_code())
}
