//! Check command CLI handler.

use patron_gen::config;
use patron_gen::generator::OpRegistry;
use patron_gen::patron;
use std::path::PathBuf;

pub fn run(config_path: PathBuf, json: bool) -> anyhow::Result<()> {
    if !config_path.exists() {
        anyhow::bail!("config file does not exist: {}", config_path.display());
    }

    let patrons = config::load_patrons(&config_path)?;
    let registry = OpRegistry::default();
    let report = patron::check_patrons(&patrons, &registry);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        eprintln!("Checking: {}", config_path.display());
        for p in &report.patrons {
            match &p.error {
                None => eprintln!(
                    "  ✓ {} ({} blocks, {} records)",
                    p.name, p.op_blocks, p.planned_records
                ),
                Some(err) => eprintln!("  ✗ {}: {}", p.name, err),
            }
        }
    }

    if !report.valid {
        let failed = report.patrons.iter().filter(|p| p.error.is_some()).count();
        anyhow::bail!("{} of {} patrons are invalid", failed, report.patrons.len());
    }

    Ok(())
}
