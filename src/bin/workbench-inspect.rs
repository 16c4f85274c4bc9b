//! CLI tool to inspect a run history exported from the workbench page.
//!
//! Usage:
//!   workbench-inspect runs <history.json>
//!   workbench-inspect csvs <history.json>
//!   workbench-inspect export-csv <history.json> <id> [-o out.csv]
//!   workbench-inspect check <model> <target-type>

use clap::{Parser, Subcommand};
use ml_workbench::inspect;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

/// Inspect a saved model history.
#[derive(Parser)]
#[command(name = "workbench-inspect")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List model runs, oldest first
    Runs {
        /// History JSON (the `modelHistory` local-storage value)
        history: PathBuf,
    },
    /// List stored CSV uploads; the current one is starred
    Csvs { history: PathBuf },
    /// Write a stored CSV's raw text
    ExportCsv {
        history: PathBuf,
        id: u64,

        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show whether a model supports a target type
    Check { model: String, target_type: String },
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Runs { history } => {
            inspect::read_history(history).map(|h| Some(inspect::runs_report(&h)))
        }
        Command::Csvs { history } => {
            inspect::read_history(history).map(|h| Some(inspect::csvs_report(&h)))
        }
        Command::ExportCsv { history, id, output } => {
            inspect::read_history(history).and_then(|h| {
                let text = inspect::csv_text(&h, *id)?;
                match output {
                    Some(path) => {
                        inspect::write_output(path, text)?;
                        eprintln!("Wrote CSV {id} to {}", path.display());
                        Ok(None)
                    }
                    None => Ok(Some(text.to_string())),
                }
            })
        }
        Command::Check { model, target_type } => {
            inspect::check_report(model, target_type).map(|line| Some(format!("{line}\n")))
        }
    };

    match result {
        Ok(Some(output)) => {
            if let Err(e) = io::stdout().write_all(output.as_bytes()) {
                eprintln!("Error writing output: {e}");
                process::exit(1);
            }
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
