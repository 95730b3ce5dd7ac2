//! Persisted keybind records and the argument values they carry.
//!
//! A keybind record is `{ command, args = [{ name, val }], key, alt }`. The
//! same argument shape is produced by free-form command entry, so both feed
//! the binder through [`Argument`].

use std::fmt;

use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

/// Runtime kind of an argument value, also used to declare argument schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Datatype {
    Int,
    Float,
    String,
    Bool,
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Datatype::Int => "int",
            Datatype::Float => "float",
            Datatype::String => "string",
            Datatype::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// A dynamically typed argument value.
///
/// Typed variants are fixed when the value is constructed (or deserialized)
/// and are checked strictly against the declared [`Datatype`] when arguments
/// are bound. [`ArgumentValue::Raw`] carries unparsed text from free-form
/// entry and is parsed as the declared kind instead.
///
/// On the wire this is untagged: `true`, `5`, `2.5` and `"up"` map to `Bool`,
/// `Int`, `Float` and `String` respectively. `Raw` is never deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ArgumentValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    #[serde(skip_deserializing)]
    Raw(String),
}

impl ArgumentValue {
    /// Kind used in error messages. Raw text reports as a string.
    pub fn kind(&self) -> Datatype {
        match self {
            ArgumentValue::Bool(_) => Datatype::Bool,
            ArgumentValue::Int(_) => Datatype::Int,
            ArgumentValue::Float(_) => Datatype::Float,
            ArgumentValue::String(_) | ArgumentValue::Raw(_) => Datatype::String,
        }
    }

    /// Parses free-form text as `datatype`. Bools are `true`/`false`, floats
    /// must be finite, and any text is a valid string.
    pub fn parse_as(raw: &str, datatype: Datatype) -> Option<Self> {
        match datatype {
            Datatype::Bool => match raw {
                "true" => Some(ArgumentValue::Bool(true)),
                "false" => Some(ArgumentValue::Bool(false)),
                _ => None,
            },
            Datatype::Int => raw.parse().ok().map(ArgumentValue::Int),
            Datatype::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|float| float.is_finite())
                .map(ArgumentValue::Float),
            Datatype::String => Some(ArgumentValue::String(raw.to_string())),
        }
    }
}

impl fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentValue::Bool(value) => write!(f, "{value}"),
            ArgumentValue::Int(value) => write!(f, "{value}"),
            ArgumentValue::Float(value) => write!(f, "{value}"),
            ArgumentValue::String(value) => write!(f, "{value:?}"),
            ArgumentValue::Raw(value) => f.write_str(value),
        }
    }
}

/// A named argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Argument {
    pub name: String,
    #[serde(rename = "val")]
    pub value: ArgumentValue,
}

impl Argument {
    pub fn new(name: impl Into<String>, value: ArgumentValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn int(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, ArgumentValue::Int(value))
    }

    pub fn float(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, ArgumentValue::Float(value))
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, ArgumentValue::String(value.into()))
    }

    pub fn bool(name: impl Into<String>, value: bool) -> Self {
        Self::new(name, ArgumentValue::Bool(value))
    }

    pub fn raw(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, ArgumentValue::Raw(value.into()))
    }
}

/// One persisted keybinding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct KeybindRecord {
    /// Name of the command to run.
    pub command: String,
    /// Preset arguments supplied to the command.
    #[serde(default)]
    pub args: Vec<Argument>,
    /// Chord text: `-` separates sequential steps, `+` joins tokens within a
    /// step (for example `"CtrlX-A"` or `"Alt+F1"`).
    pub key: String,
    /// Require Alt on every step of the chord.
    #[serde(default)]
    pub alt: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn values_deserialize_by_json_kind() {
        let args: Vec<Argument> = serde_json::from_str(
            r#"[
                {"name": "amount", "val": 5},
                {"name": "ratio", "val": 0.5},
                {"name": "direction", "val": "up"},
                {"name": "words", "val": true}
            ]"#,
        )
        .expect("arguments should parse");

        assert_eq!(
            args,
            vec![
                Argument::int("amount", 5),
                Argument::float("ratio", 0.5),
                Argument::string("direction", "up"),
                Argument::bool("words", true),
            ]
        );
    }

    #[test]
    fn keybind_record_from_json() {
        let record: KeybindRecord = serde_json::from_str(
            r#"{"command": "scroll", "args": [{"name": "direction", "val": "down"}], "key": "CtrlX-A", "alt": false}"#,
        )
        .expect("record should parse");

        assert_eq!(record.command, "scroll");
        assert_eq!(record.key, "CtrlX-A");
        assert_eq!(record.args, vec![Argument::string("direction", "down")]);
        assert!(!record.alt);
    }

    #[test]
    fn keybind_record_defaults_optional_fields() {
        let record: KeybindRecord =
            toml::from_str("command = \"quit\"\nkey = \"CtrlQ\"\n").expect("record should parse");

        assert_eq!(record.args, Vec::new());
        assert!(!record.alt);
    }

    #[test]
    fn keybind_record_rejects_unknown_fields() {
        let err = toml::from_str::<KeybindRecord>("command = \"quit\"\nkey = \"CtrlQ\"\nkeys = 1\n")
            .expect_err("unknown field should be rejected");
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn raw_text_parses_as_the_declared_kind() {
        assert_eq!(
            ArgumentValue::parse_as("true", Datatype::Bool),
            Some(ArgumentValue::Bool(true))
        );
        assert_eq!(
            ArgumentValue::parse_as("-3", Datatype::Int),
            Some(ArgumentValue::Int(-3))
        );
        assert_eq!(
            ArgumentValue::parse_as("2", Datatype::Float),
            Some(ArgumentValue::Float(2.0))
        );
        assert_eq!(
            ArgumentValue::parse_as("42", Datatype::String),
            Some(ArgumentValue::String("42".to_string()))
        );
        assert_eq!(ArgumentValue::parse_as("NaN", Datatype::Float), None);
        assert_eq!(ArgumentValue::parse_as("yes", Datatype::Bool), None);
        assert_eq!(ArgumentValue::parse_as("1.5", Datatype::Int), None);
    }

    #[test]
    fn string_values_never_deserialize_as_raw() {
        let arg: Argument =
            serde_json::from_str(r#"{"name": "message", "val": "42"}"#).expect("argument");
        assert_eq!(arg, Argument::string("message", "42"));
    }
}
