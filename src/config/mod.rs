//! Patron configuration.
//!
//! The configuration document is a JSON array of patrons. Each patron names an
//! output file and lists the operation blocks that make up its workload:
//!
//! ```json
//! [
//!   {
//!     "name": "p1",
//!     "config": [
//!       { "op": "insert", "cnt": 2, "db": "d", "col": "c", "adv": { "keys": ["k"] } },
//!       { "cmds": [ { "op": "c", "db": "d", "dc": { "drop": "c" } } ] }
//!     ]
//!   }
//! ]
//! ```

use crate::generator::GenError;
use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One named test fixture, generating one output file.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PatronConfig {
    /// Patron name, also the output file stem (`<name>.json`)
    pub name: String,
    /// Operation blocks, emitted in order
    #[serde(rename = "config", default)]
    pub operations: Vec<OpSpec>,
}

/// Declarative description of one block of operations within a patron.
///
/// Either `op` (with `cnt` synthesized records) or `cmds` (literal commands)
/// must be set, never both.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct OpSpec {
    /// Operation type to synthesize (e.g. `insert`)
    #[serde(rename = "op", default, deserialize_with = "empty_as_none")]
    #[schemars(with = "Option<String>")]
    pub op_type: Option<String>,
    /// Number of records to synthesize
    #[serde(rename = "cnt", default)]
    pub count: usize,
    /// Target database
    #[serde(rename = "db", default)]
    pub db_name: String,
    /// Target collection
    #[serde(rename = "col", default)]
    pub collection_name: String,
    /// Pre-authored commands, emitted verbatim apart from id injection
    #[serde(rename = "cmds", default)]
    #[schemars(with = "Option<Vec<serde_json::Value>>")]
    pub literal_commands: Option<Vec<Box<RawValue>>>,
    /// Operation-specific generation settings
    #[serde(rename = "adv", default)]
    #[schemars(with = "Option<serde_json::Value>")]
    pub advanced: Option<Box<RawValue>>,
}

impl OpSpec {
    /// Name used when wrapping errors for this block.
    pub fn label(&self) -> &str {
        match (&self.op_type, &self.literal_commands) {
            (Some(op), _) => op,
            (None, Some(_)) => "cmds",
            (None, None) => "<none>",
        }
    }

    /// Literal commands and an operation type cannot be combined.
    pub fn check_exclusive(&self) -> Result<(), GenError> {
        if self.literal_commands.is_some() {
            if let Some(op) = &self.op_type {
                return Err(GenError::Config(format!(
                    "if explicit cmds is used, op field cannot be set (op = {op:?})"
                )));
            }
        }
        Ok(())
    }

    /// Number of records this block will emit.
    pub fn planned_records(&self) -> usize {
        match &self.literal_commands {
            Some(commands) => commands.len(),
            None => self.count,
        }
    }

    /// Whether this block writes at least one record.
    pub fn yields_records(&self) -> bool {
        self.planned_records() > 0
    }
}

/// Generation settings for `insert` blocks (the `adv` object).
///
/// Unset numeric bounds fall back to defaults: 2-10 characters for generated
/// keys and values, 1-3 documents per insert and 1-3 keys per document.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct InsertAdvancedConfig {
    /// Value vocabulary; random strings are generated when empty
    pub values: Vec<String>,
    #[serde(rename = "mn_val_len")]
    pub min_value_len: Option<usize>,
    #[serde(rename = "mx_val_len")]
    pub max_value_len: Option<usize>,
    /// Key vocabulary; random strings are generated when empty
    pub keys: Vec<String>,
    #[serde(rename = "mn_key_len")]
    pub min_key_len: Option<usize>,
    #[serde(rename = "mx_key_len")]
    pub max_key_len: Option<usize>,
    #[serde(rename = "mn_docs_cnt")]
    pub min_doc_count: Option<usize>,
    #[serde(rename = "mx_docs_cnt")]
    pub max_doc_count: Option<usize>,
    #[serde(rename = "mn_keys_cnt")]
    pub min_key_count: Option<usize>,
    #[serde(rename = "mx_keys_cnt")]
    pub max_key_count: Option<usize>,
}

/// The source format uses `""` for "no operation type".
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let op = Option::<String>::deserialize(deserializer)?;
    Ok(op.filter(|s| !s.is_empty()))
}

/// Decode a configuration document from a string.
pub fn parse_patrons(content: &str) -> Result<Vec<PatronConfig>, GenError> {
    serde_json::from_str(content)
        .map_err(|e| GenError::Config(format!("cannot decode config JSON: {e}")))
}

/// Load the configuration document at `path`.
pub fn load_patrons(path: &Path) -> anyhow::Result<Vec<PatronConfig>> {
    let file = File::open(path)
        .with_context(|| format!("cannot open config file: {}", path.display()))?;
    let patrons: Vec<PatronConfig> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| GenError::Config(format!("cannot decode config JSON: {e}")))
        .with_context(|| format!("cannot load patrons from {}", path.display()))?;
    Ok(patrons)
}
