use crate::config::ConfigToml;
use schemars::schema::RootSchema;
use serde_json::Map;
use serde_json::Value;
use std::path::Path;

/// Build the config schema for `config.toml`.
pub fn config_schema() -> RootSchema {
    schemars::r#gen::SchemaSettings::draft07()
        .with(|settings| {
            settings.option_add_null_type = false;
        })
        .into_generator()
        .into_root_schema_for::<ConfigToml>()
}

/// Canonicalize a JSON value by sorting its keys.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(left, _), (right, _)| left.cmp(right));
            let mut sorted = Map::with_capacity(map.len());
            for (key, child) in entries {
                sorted.insert(key.clone(), canonicalize(child));
            }
            Value::Object(sorted)
        }
        _ => value.clone(),
    }
}

/// Render the config schema as pretty-printed JSON.
pub fn config_schema_json() -> anyhow::Result<Vec<u8>> {
    let schema = config_schema();
    let value = serde_json::to_value(schema)?;
    let value = canonicalize(&value);
    let json = serde_json::to_vec_pretty(&value)?;
    Ok(json)
}

/// Write the config schema to disk.
pub fn write_config_schema(out_path: &Path) -> anyhow::Result<()> {
    let json = config_schema_json()?;
    std::fs::write(out_path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::canonicalize;
    use super::config_schema_json;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema_value() -> serde_json::Value {
        let schema_json = config_schema_json().expect("serialize config schema");
        serde_json::from_slice(&schema_json).expect("decode schema json")
    }

    #[test]
    fn schema_lists_top_level_keys() {
        let schema = schema_value();
        let properties = schema["properties"]
            .as_object()
            .expect("schema should have properties");
        let mut keys: Vec<&str> = properties.keys().map(String::as_str).collect();
        keys.sort_unstable();

        assert_eq!(
            keys,
            vec!["chord_timeout_ms", "keybinds", "replace_default_keybinds"]
        );
        assert_eq!(schema["additionalProperties"], json!(false));
    }

    #[test]
    fn schema_describes_keybind_records() {
        let schema = schema_value();
        let record = &schema["definitions"]["KeybindRecord"];

        assert_eq!(record["required"], json!(["command", "key"]));
        assert!(record["properties"]["args"].is_object());
        assert!(record["properties"]["alt"].is_object());
    }

    #[test]
    fn canonicalize_sorts_nested_keys() {
        let value = json!({"b": {"z": 1, "a": 2}, "a": [{"d": 1, "c": 2}]});
        let sorted = serde_json::to_string(&canonicalize(&value)).expect("serialize");
        assert_eq!(sorted, r#"{"a":[{"c":2,"d":1}],"b":{"a":2,"z":1}}"#);
    }
}
