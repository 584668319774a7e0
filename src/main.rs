use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tidyup::cli::{TidyCommand, run_cli_with_config};
use tidyup::output::OutputFormatter;

/// Sort a directory into per-extension folders and clean its CSV files.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory to organize. Prompted for when omitted.
    root: Option<PathBuf>,

    /// Show what would happen without touching any file
    #[arg(long, short = 'n')]
    dry_run: bool,

    /// Organize files but skip CSV cleaning
    #[arg(long, conflicts_with = "clean_only")]
    organize_only: bool,

    /// Only clean the CSV files already in csv_files/
    #[arg(long, conflicts_with = "dry_run")]
    clean_only: bool,

    /// Configuration file (defaults to <ROOT>/.tidyup.toml, then ~/.config/tidyup/config.toml)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let root = match args.root {
        Some(root) => root,
        None => match prompt_for_root() {
            Ok(root) => root,
            Err(e) => {
                OutputFormatter::error(&format!("Could not read directory path: {}", e));
                return ExitCode::FAILURE;
            }
        },
    };

    let command = if args.clean_only {
        TidyCommand::Clean
    } else if args.organize_only {
        TidyCommand::Organize {
            dry_run: args.dry_run,
        }
    } else {
        TidyCommand::Full {
            dry_run: args.dry_run,
        }
    };

    match run_cli_with_config(command, &root, args.config.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Asks for the root directory on stdin.
fn prompt_for_root() -> io::Result<PathBuf> {
    print!("Enter the source directory path for file management: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no directory path given",
        ));
    }
    Ok(PathBuf::from(trimmed))
}
