//! Generate command CLI handler.

use patron_gen::generator::OpRegistry;
use patron_gen::patron::{self, BatchConfig};
use std::path::PathBuf;
use std::time::Instant;

#[allow(clippy::too_many_arguments)]
pub fn run(
    config: PathBuf,
    output: PathBuf,
    seed: Option<u64>,
    progress: bool,
    verbose: bool,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    if !config.exists() {
        anyhow::bail!("config file does not exist: {}", config.display());
    }

    if !dry_run {
        std::fs::create_dir_all(&output)?;
    }

    let registry = OpRegistry::default();
    if verbose && !json {
        eprintln!("Operation types: {}", registry.names().join(", "));
        eprintln!("Reading patrons from: {}", config.display());
    }

    let batch = BatchConfig {
        config_path: config,
        output_dir: output,
        seed,
        dry_run,
        progress: progress && !json,
    };

    let start_time = Instant::now();
    let stats = patron::generate_patrons_from_file(&batch, &registry)?;
    let elapsed = start_time.elapsed();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    if verbose || dry_run {
        for p in &stats.patrons {
            match &p.output_file {
                Some(path) => eprintln!(
                    "  {}: {} records in {} blocks -> {}",
                    p.name, p.records_written, p.op_blocks, path
                ),
                None => eprintln!(
                    "  {}: {} records in {} blocks",
                    p.name, p.records_written, p.op_blocks
                ),
            }
        }
    }

    if progress || verbose || dry_run {
        eprintln!();
        eprintln!("Generation Statistics:");
        eprintln!("  Patrons: {}", stats.patrons.len());
        eprintln!("  Records: {}", stats.total_records);
        eprintln!("  Bytes: {}", stats.total_bytes);
        eprintln!("  Seed: {}", stats.seed);
        eprintln!("  Elapsed: {:.3?}", elapsed);
        if dry_run {
            eprintln!("  (dry run, no files written)");
        }
    }

    Ok(())
}
