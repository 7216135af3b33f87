//! Patron generation: one JSON array file per patron.
//!
//! The batch driver seeds one RNG for the whole run, then generates every
//! patron in order with a fresh id sequence. The first failing patron aborts
//! the run; files written for earlier patrons are left in place, and a patron
//! that fails mid-write may leave a truncated file behind.

use crate::config::{load_patrons, PatronConfig};
use crate::generator::{expand_op, GenContext, GenError, OpRegistry};
use crate::writer::{patron_path, PatronWriter};
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use schemars::JsonSchema;
use serde::Serialize;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// Batch generation settings
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Configuration document (JSON array of patrons)
    pub config_path: PathBuf,
    /// Directory receiving `<patron>.json` files
    pub output_dir: PathBuf,
    /// RNG seed; random when unset
    pub seed: Option<u64>,
    /// Generate without writing files
    pub dry_run: bool,
    /// Show a progress bar
    pub progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            output_dir: PathBuf::from("."),
            seed: None,
            dry_run: false,
            progress: false,
        }
    }
}

/// Result of generating one patron
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
pub struct PatronStats {
    pub name: String,
    /// Written file, absent on dry runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    pub op_blocks: usize,
    pub records_written: usize,
    pub bytes_written: u64,
}

/// Result of a batch run
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
pub struct BatchStats {
    /// Seed the run used; pass it to `--seed` to reproduce the output
    pub seed: u64,
    pub dry_run: bool,
    pub patrons: Vec<PatronStats>,
    pub total_records: usize,
    pub total_bytes: u64,
}

/// Validation result for one patron
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PatronCheck {
    pub name: String,
    pub op_blocks: usize,
    pub planned_records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Validation result for a configuration document
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CheckReport {
    pub valid: bool,
    pub patrons: Vec<PatronCheck>,
}

/// Reject patrons that cannot be generated, before any output is created.
pub fn validate_patron(patron: &PatronConfig, registry: &OpRegistry) -> Result<(), GenError> {
    check_patron_name(&patron.name)?;
    for (i, op) in patron.operations.iter().enumerate() {
        op.check_exclusive().map_err(|e| match e {
            GenError::Config(msg) => GenError::Config(format!("op block {}: {}", i, msg)),
            other => other,
        })?;
        if op.literal_commands.is_none() && op.count > 0 {
            let name = op.op_type.as_deref().unwrap_or_default();
            if !registry.contains(name) {
                return Err(GenError::UnknownOperation(name.to_string()));
            }
        }
    }
    Ok(())
}

/// The name becomes `<output_dir>/<name>.json`, so it must be a single plain
/// file stem.
fn check_patron_name(name: &str) -> Result<(), GenError> {
    if name.is_empty() {
        return Err(GenError::Config("patron name cannot be empty".to_string()));
    }
    let mut components = Path::new(name).components();
    let plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !plain || name.contains(['/', '\\']) || name.contains("..") {
        return Err(GenError::Config(format!(
            "patron name {name:?} must not contain path separators or '..'"
        )));
    }
    Ok(())
}

/// Validate every patron without generating anything.
pub fn check_patrons(patrons: &[PatronConfig], registry: &OpRegistry) -> CheckReport {
    let patrons: Vec<PatronCheck> = patrons
        .iter()
        .map(|patron| PatronCheck {
            name: patron.name.clone(),
            op_blocks: patron.operations.len(),
            planned_records: patron.operations.iter().map(|op| op.planned_records()).sum(),
            error: validate_patron(patron, registry)
                .err()
                .map(|e| e.to_string()),
        })
        .collect();

    CheckReport {
        valid: patrons.iter().all(|p| p.error.is_none()),
        patrons,
    }
}

/// Write one patron's JSON array into `sink`.
///
/// A block's trailing comma is decided by whether any later block yields
/// records, so empty blocks never leave a dangling separator.
pub fn write_patron<W: Write>(
    patron: &PatronConfig,
    registry: &OpRegistry,
    rng: &mut StdRng,
    sink: W,
) -> anyhow::Result<PatronStats> {
    let mut ctx = GenContext::new(rng);
    let mut writer = PatronWriter::new(sink);
    let mut records_written = 0;

    writer.begin().map_err(GenError::from)?;
    for (i, op) in patron.operations.iter().enumerate() {
        let more_follow = patron.operations[i + 1..]
            .iter()
            .any(|later| later.yields_records());
        records_written += expand_op(op, more_follow, registry, &mut ctx, &mut writer)?;
    }
    let bytes_written = writer.finish().map_err(GenError::from)?;

    Ok(PatronStats {
        name: patron.name.clone(),
        output_file: None,
        op_blocks: patron.operations.len(),
        records_written,
        bytes_written,
    })
}

/// Generate `<output_dir>/<name>.json` for one patron.
pub fn generate_patron(
    patron: &PatronConfig,
    config: &BatchConfig,
    registry: &OpRegistry,
    rng: &mut StdRng,
) -> anyhow::Result<PatronStats> {
    generate_patron_inner(patron, config, registry, rng)
        .with_context(|| format!("cannot generate patron {}", patron.name))
}

fn generate_patron_inner(
    patron: &PatronConfig,
    config: &BatchConfig,
    registry: &OpRegistry,
    rng: &mut StdRng,
) -> anyhow::Result<PatronStats> {
    validate_patron(patron, registry)?;

    if config.dry_run {
        return write_patron(patron, registry, rng, std::io::sink());
    }

    let path = patron_path(&config.output_dir, &patron.name);
    let file = std::fs::File::create(&path)
        .map_err(GenError::from)
        .with_context(|| format!("cannot create output file: {}", path.display()))?;
    let mut stats = write_patron(patron, registry, rng, file)?;
    stats.output_file = Some(path.display().to_string());
    Ok(stats)
}

/// Generate every patron in order, stopping at the first failure.
pub fn generate_patrons(
    patrons: &[PatronConfig],
    config: &BatchConfig,
    registry: &OpRegistry,
) -> anyhow::Result<BatchStats> {
    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let progress_bar = if config.progress {
        let pb = ProgressBar::new(patrons.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} patrons {msg}",
            )?
            .progress_chars("█▓▒░  ")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        Some(pb)
    } else {
        None
    };

    let mut stats = BatchStats {
        seed,
        dry_run: config.dry_run,
        ..Default::default()
    };

    for patron in patrons {
        if let Some(ref pb) = progress_bar {
            pb.set_message(patron.name.clone());
        }

        let patron_stats = generate_patron(patron, config, registry, &mut rng)?;
        stats.total_records += patron_stats.records_written;
        stats.total_bytes += patron_stats.bytes_written;
        stats.patrons.push(patron_stats);

        if let Some(ref pb) = progress_bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    Ok(stats)
}

/// Load the configuration at `config.config_path` and generate every patron.
pub fn generate_patrons_from_file(
    config: &BatchConfig,
    registry: &OpRegistry,
) -> anyhow::Result<BatchStats> {
    let patrons = load_patrons(&config.config_path)?;
    generate_patrons(&patrons, config, registry)
}
