//! Tests that verify configs and JSON output against the generated JSON schemas.

use jsonschema::Validator;
use patron_gen::config::parse_patrons;
use patron_gen::generator::OpRegistry;
use patron_gen::json_schema::{all_schemas, get_schema, schema_names};
use patron_gen::patron::{check_patrons, generate_patrons, BatchConfig};
use serde_json::{json, Value};
use tempfile::TempDir;

fn load_schema(name: &str) -> Validator {
    let schema = get_schema(name).unwrap_or_else(|| panic!("missing schema: {}", name));
    let schema: Value = serde_json::to_value(&schema).expect("Invalid schema JSON");
    Validator::new(&schema).expect("Failed to compile schema")
}

fn assert_valid(validator: &Validator, instance: &Value, what: &str) {
    if let Err(error) = validator.validate(instance) {
        panic!(
            "{} doesn't match schema:\n  - {}: {}\n\nInstance was:\n{}",
            what,
            error.instance_path(),
            error,
            serde_json::to_string_pretty(instance).unwrap()
        );
    }
}

const SAMPLE_CONFIG: &str = r#"[
  {"name": "p1", "config": [
    {"op": "insert", "cnt": 2, "db": "d", "col": "c",
     "adv": {"values": ["x"], "keys": ["k"], "mn_docs_cnt": 1, "mx_docs_cnt": 1}},
    {"cmds": [{"op": "c", "db": "d", "dc": {"drop": "c"}}, "{\"op\":\"x\"}"]}
  ]},
  {"name": "p2", "config": []}
]"#;

#[test]
fn test_schema_names() {
    assert_eq!(
        schema_names(),
        vec!["check", "config", "generate", "insert-adv"]
    );
    assert_eq!(all_schemas().len(), 4);
    assert!(get_schema("nope").is_none());
}

#[test]
fn test_all_schemas_compile() {
    for name in schema_names() {
        load_schema(name);
    }
}

#[test]
fn test_sample_config_matches_schema() {
    let validator = load_schema("config");
    let config: Value = serde_json::from_str(SAMPLE_CONFIG).unwrap();
    assert_valid(&validator, &config, "sample config");
}

#[test]
fn test_config_schema_rejects_wrong_shapes() {
    let validator = load_schema("config");
    assert!(!validator.is_valid(&json!({"name": "p"})));
    assert!(!validator.is_valid(&json!([{"config": []}])));
    assert!(!validator.is_valid(&json!([{"name": "p", "config": [{"cnt": "two"}]}])));
}

#[test]
fn test_insert_adv_schema() {
    let validator = load_schema("insert-adv");
    assert_valid(
        &validator,
        &json!({"values": ["a"], "mn_val_len": 0, "mx_keys_cnt": 3}),
        "insert settings",
    );
    assert!(!validator.is_valid(&json!({"mn_docs_cnt": -1})));
    assert!(!validator.is_valid(&json!({"keys": "k"})));
}

#[test]
fn test_generate_output_matches_schema() {
    let patrons = parse_patrons(SAMPLE_CONFIG).unwrap();
    let out = TempDir::new().unwrap();
    let config = BatchConfig {
        output_dir: out.path().to_path_buf(),
        seed: Some(99),
        ..Default::default()
    };
    let stats = generate_patrons(&patrons, &config, &OpRegistry::default()).unwrap();

    let validator = load_schema("generate");
    assert_valid(
        &validator,
        &serde_json::to_value(&stats).unwrap(),
        "generate output",
    );
}

#[test]
fn test_check_output_matches_schema() {
    let patrons = parse_patrons(
        r#"[{"name":"ok","config":[{"op":"insert","cnt":1}]},{"name":"bad","config":[{"op":"zap","cnt":1}]}]"#,
    )
    .unwrap();
    let report = check_patrons(&patrons, &OpRegistry::default());

    let validator = load_schema("check");
    assert_valid(
        &validator,
        &serde_json::to_value(&report).unwrap(),
        "check output",
    );
}
