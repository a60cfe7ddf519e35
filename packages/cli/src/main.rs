mod commands;
mod config;
mod driver;
mod inputs;
mod verify;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{analyze, init, transpile, AnalyzeArgs, InitArgs, TranspileArgs};

/// js-to-ts - transpile JavaScript files to annotated TypeScript
#[derive(Parser, Debug)]
#[command(name = "js-to-ts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Transpile JavaScript files to TypeScript
    Transpile(TranspileArgs),

    /// Print the analysis record of a single file as JSON
    Analyze(AnalyzeArgs),

    /// Write a default js2ts.config.json
    Init(InitArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Transpile(args) => transpile(args, &cwd),
        Command::Analyze(args) => analyze(args, &cwd),
        Command::Init(args) => init(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
