//! CLI for inspecting tally counter files.
//!
//! Counter files are raw, headerless arrays of native-endian `u64` words,
//! so everything here is straight decoding; which label means what is the
//! business of whatever generated the instrumented program.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tally::{WORD_BYTES, read_counts, read_counts_exact};

/// tally — memory-mapped event counter inspection CLI.
#[derive(Parser)]
#[command(name = "tally", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Print every counter in a counter file.
    Dump {
        /// Path to the counter file.
        file: PathBuf,

        /// Output format.
        #[arg(long, default_value = "csv")]
        format: OutputFormat,

        /// Only print counters with non-zero counts.
        #[arg(long)]
        nonzero: bool,

        /// Fail unless the file holds exactly this many counters
        /// (the capacity the writing program was built with).
        #[arg(long)]
        expect: Option<usize>,
    },

    /// Display counter file metadata.
    Info {
        /// Path to the counter file.
        file: PathBuf,
    },
}

/// Output format for dumped counters.
#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Comma-separated values.
    Csv,
    /// JSON array of objects.
    Json,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Dump {
            file,
            format,
            nonzero,
            expect,
        } => cmd_dump(&file, &format, nonzero, expect),
        Commands::Info { file } => cmd_info(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Implements `tally dump <file>`.
fn cmd_dump(
    file: &PathBuf,
    format: &OutputFormat,
    nonzero: bool,
    expect: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let counts = match expect {
        Some(n) => read_counts_exact(file, n)?,
        None => read_counts(file)?,
    };

    let rows = counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| !nonzero || count != 0);

    match format {
        OutputFormat::Csv => {
            println!("label,count");
            for (label, count) in rows {
                println!("{label},{count}");
            }
        }
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = rows
                .map(|(label, count)| {
                    serde_json::json!({
                        "label": label,
                        "count": count,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }

    Ok(())
}

/// Implements `tally info <file>`.
fn cmd_info(file: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let counts = read_counts(file)?;
    let nonzero = counts.iter().filter(|&&c| c != 0).count();
    let total: u128 = counts.iter().map(|&c| u128::from(c)).sum();

    println!("File: {}", file.display());
    println!("  Size: {} bytes", counts.len() * WORD_BYTES);
    println!("  Word size: {WORD_BYTES} bytes");
    println!("  Counters: {}", counts.len());
    println!("  Non-zero: {nonzero}");
    println!("  Total count: {total}");

    Ok(())
}
