#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use vn_dashboard::config::AppSettings;
use vn_dashboard::serializer::{Mode, Session, Value, ValueKind};
use vn_dashboard::system::default_config_dir;

#[derive(Debug, Parser)]
#[command(name = "vn-dashboard")]
#[command(about = "Visual-novel reading dashboard settings tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the settings files (default: next to the executable)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load and print the general application settings
    Settings {
        /// Print as JSON
        #[arg(long)]
        json: bool,
        /// Write the effective settings back so missing keys appear in the file
        #[arg(long)]
        write_defaults: bool,
    },
    /// Print one value
    Get {
        /// Settings file name inside the config directory
        file: String,
        /// Section path, nested sections separated by '.' (e.g. general_settings.window)
        section: String,
        key: String,
        /// Value kind: printf tag (%d, %llu, %f, %s, ...) or name (i32, u64, bool, str, ...)
        #[arg(short, long, default_value = "str")]
        format: String,
    },
    /// Store one value, creating the section when needed
    Set {
        file: String,
        section: String,
        key: String,
        value: String,
        #[arg(short, long, default_value = "str")]
        format: String,
    },
    /// Print the direct entries of a section
    Show {
        file: String,
        section: String,
        #[arg(long)]
        json: bool,
    },
}

fn init_logging() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    // stdout carries command output, logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")
}

/// Open `file` and descend to the dotted `section` path
fn open_section(dir: &Path, file: &str, section: &str, mode: Mode) -> Result<Session> {
    let mut names = section.split('.');
    let root = names
        .next()
        .filter(|name| !name.is_empty())
        .context("Section path is empty")?;

    let mut session = Session::init(dir, file, root, mode)
        .with_context(|| format!("Failed to open {}", dir.join(file).display()))?;
    for name in names {
        session
            .subsection_begin(name)
            .with_context(|| format!("Failed to enter section '{name}'"))?;
    }
    Ok(session)
}

fn run_settings(dir: &Path, json: bool, write_defaults: bool) -> Result<()> {
    let settings = AppSettings::load(dir)?;
    info!(
        frame_duration_ms = settings.frame_duration_secs() * 1000.0,
        "loaded app settings"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        println!("{settings:#?}");
    }

    if write_defaults {
        settings.save(dir)?;
    }
    Ok(())
}

fn run_get(dir: &Path, file: &str, section: &str, key: &str, format: &str) -> Result<ExitCode> {
    let kind: ValueKind = format.parse()?;
    let mut session = open_section(dir, file, section, Mode::Load)?;
    let mut value = Value::default_of(kind);
    let found = session.entry_value(key, &mut value)?;
    session.shutdown()?;

    if found {
        println!("{value}");
        Ok(ExitCode::SUCCESS)
    } else {
        info!(%section, key, %kind, "no such value");
        Ok(ExitCode::FAILURE)
    }
}

fn run_set(dir: &Path, file: &str, section: &str, key: &str, text: &str, format: &str) -> Result<()> {
    let kind: ValueKind = format.parse()?;
    let Some(mut value) = Value::parse(kind, text) else {
        bail!("'{text}' is not a valid {kind}");
    };

    let mut session = open_section(dir, file, section, Mode::Save)?;
    let replaced = session.entry_value(key, &mut value)?;
    session
        .shutdown()
        .with_context(|| format!("Failed to write {}", session.path().display()))?;
    info!(%section, key, %value, replaced, "stored value");
    Ok(())
}

fn run_show(dir: &Path, file: &str, section: &str, json: bool) -> Result<()> {
    let mut session = open_section(dir, file, section, Mode::Load)?;
    if !session.section_found() {
        bail!("Section '{section}' not found in {}", session.path().display());
    }

    if json {
        let mut map = serde_json::Map::new();
        for line in session.section_text().lines() {
            if let Some((key, value)) = line.split_once(':') {
                map.insert(key.to_string(), value.trim_start().into());
            }
        }
        println!("{}", serde_json::to_string_pretty(&map)?);
    } else {
        print!("{}", session.section_text());
    }
    session.shutdown()?;
    Ok(())
}

fn main() -> Result<ExitCode> {
    init_logging()?;
    let cli = Cli::parse();
    let dir = cli.config_dir.unwrap_or_else(default_config_dir);
    info!(config_dir = %dir.display(), "using config directory");

    match cli.command {
        Command::Settings { json, write_defaults } => {
            run_settings(&dir, json, write_defaults)?;
        }
        Command::Get { file, section, key, format } => {
            return run_get(&dir, &file, &section, &key, &format);
        }
        Command::Set { file, section, key, value, format } => {
            run_set(&dir, &file, &section, &key, &value, &format)?;
        }
        Command::Show { file, section, json } => {
            run_show(&dir, &file, &section, json)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
