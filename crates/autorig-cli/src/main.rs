//! autorig - headless rig template tooling.
//!
//! Validates and builds rig templates against the in-memory reference scene,
//! and lists the registered module types.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;
mod skeleton;

/// Procedural rig module system
#[derive(Parser)]
#[command(name = "autorig")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered module types and their supported features
    Modules,

    /// Validate a rig template file against the module registry
    Validate {
        /// Path to the template JSON file
        #[arg(short, long)]
        template: PathBuf,
    },

    /// Build a rig template against a skeleton and write the scene dump
    Build {
        /// Path to the template JSON file
        #[arg(short, long)]
        template: PathBuf,

        /// Path to the skeleton JSON file (bind joint ids and positions)
        #[arg(short, long)]
        skeleton: PathBuf,

        /// Output path for the scene dump JSON (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Modules => commands::modules::run(),
        Commands::Validate { template } => commands::validate::run(&template),
        Commands::Build {
            template,
            skeleton,
            output,
        } => commands::build::run(&template, &skeleton, output.as_deref()),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
