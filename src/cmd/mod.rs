mod check;
mod generate;
mod schema;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate as generate_completions, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "patron-gen")]
#[command(version)]
#[command(about = "Generate synthetic document-database workload files for backup/restore tests", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate one <patron>.json workload file per patron in the config
    Generate {
        /// Patron configuration file (JSON array of patrons)
        config: PathBuf,

        /// Output directory for patron files
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Show progress during generation
        #[arg(short, long)]
        progress: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,

        /// Preview without writing files (dry run)
        #[arg(long)]
        dry_run: bool,

        /// Output results as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },

    /// Validate a patron configuration without generating anything
    Check {
        /// Patron configuration file (JSON array of patrons)
        config: PathBuf,

        /// Output results as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },

    /// Print JSON Schemas for the config format and --json output
    Schema {
        /// Schema name (config, insert-adv, generate, check); all when omitted
        name: Option<String>,

        /// List available schema names
        #[arg(long, conflicts_with = "name")]
        list: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            config,
            output,
            seed,
            progress,
            verbose,
            dry_run,
            json,
        } => generate::run(config, output, seed, progress, verbose, dry_run, json),
        Commands::Check { config, json } => check::run(config, json),
        Commands::Schema { name, list } => schema::run(name, list),
        Commands::Completions { shell } => {
            generate_completions(shell, &mut Cli::command(), "patron-gen", &mut io::stdout());
            Ok(())
        }
    }
}
