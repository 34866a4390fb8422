use std::fs::File;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger};

use navkit::core::config::{self, ResolvedConfig};
use navkit::replay;

#[derive(Parser)]
#[command(name = "navkit", about = "Replay navigation scripts against the navkit state machine")]
struct Args {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a TOML navigation script and print the final state as JSON
    Replay {
        script: PathBuf,

        /// Config file (defaults to ~/.navkit/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write logs to this file instead of the terminal
        #[arg(long)]
        log_file: Option<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },
    /// Write a commented default config file
    InitConfig {
        /// Where to write it (defaults to ~/.navkit/config.toml)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(resolved: &ResolvedConfig, log_file: Option<PathBuf>) {
    let level = resolved
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::Info);
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    match log_file.or_else(|| resolved.log_file.clone()) {
        Some(path) => match File::create(&path) {
            Ok(file) => {
                let _ = WriteLogger::init(level, log_config, file);
            }
            Err(e) => eprintln!("Could not open log file {}: {e}", path.display()),
        },
        None => {
            let _ = TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    match args.command {
        Command::Replay {
            script,
            config: config_file,
            log_file,
            pretty,
        } => {
            let file_config = config::load_config(config_file.as_deref())?;
            let resolved = config::resolve(&file_config, args.log_level.as_deref());
            init_logging(&resolved, log_file);
            log::info!("navkit replaying {}", script.display());

            let script = replay::load_script(&script)?;
            let outcome = replay::replay(&script, resolved.navigation.clone())?;
            println!("{}", outcome.provider.snapshot_json(pretty)?);
        }
        Command::InitConfig { path, force } => {
            let path = path
                .or_else(config::config_path)
                .ok_or("could not determine home directory")?;
            if path.exists() && !force {
                return Err(format!("{} already exists (use --force)", path.display()).into());
            }
            config::write_default_config(&path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}
