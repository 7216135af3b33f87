//! Schema command CLI handler.

use patron_gen::json_schema;

pub fn run(name: Option<String>, list: bool) -> anyhow::Result<()> {
    if list {
        for name in json_schema::schema_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    match name {
        Some(name) => {
            let schema = json_schema::get_schema(&name).ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown schema: {}. Available: {}",
                    name,
                    json_schema::schema_names().join(", ")
                )
            })?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        None => {
            let all = json_schema::all_schemas();
            println!("{}", serde_json::to_string_pretty(&all)?);
        }
    }

    Ok(())
}
