//! JSON Schema generation for the configuration format and `--json` output.
//!
//! Schemas are generated using the schemars crate and can be exported via the `schema` subcommand.

use crate::config::{InsertAdvancedConfig, PatronConfig};
use crate::patron::{BatchStats, CheckReport};
use schemars::{schema_for, Schema};
use std::collections::BTreeMap;

/// Returns all JSON schemas.
/// Uses BTreeMap for deterministic ordering (important for diffable output).
pub fn all_schemas() -> BTreeMap<&'static str, Schema> {
    let mut schemas = BTreeMap::new();

    // configuration document: array of patrons
    schemas.insert("config", schema_for!(Vec<PatronConfig>));

    // `adv` object of insert blocks
    schemas.insert("insert-adv", schema_for!(InsertAdvancedConfig));

    // generate --json
    schemas.insert("generate", schema_for!(BatchStats));

    // check --json
    schemas.insert("check", schema_for!(CheckReport));

    schemas
}

/// Generate a single schema by name.
pub fn get_schema(name: &str) -> Option<Schema> {
    all_schemas().remove(name)
}

/// List all available schema names.
pub fn schema_names() -> Vec<&'static str> {
    all_schemas().keys().copied().collect()
}
