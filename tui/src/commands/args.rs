//! Validates supplied arguments against a command's declared schema.

use chatterm_core::Argument;
use chatterm_core::ArgumentValue;
use chatterm_core::Datatype;
use thiserror::Error;
use tracing::debug;

/// One declared argument of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentDef {
    pub name: &'static str,
    pub optional: bool,
    pub datatype: Datatype,
}

impl ArgumentDef {
    pub const fn required(name: &'static str, datatype: Datatype) -> Self {
        Self {
            name,
            optional: false,
            datatype,
        }
    }

    pub const fn optional(name: &'static str, datatype: Datatype) -> Self {
        Self {
            name,
            optional: true,
            datatype,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("'{command}' requires argument '{argument}'")]
    MissingArgument { command: String, argument: String },
    #[error("argument '{argument}' of '{command}' must be {expected}, got {actual}")]
    InvalidArgumentType {
        command: String,
        argument: String,
        expected: Datatype,
        actual: Datatype,
    },
}

/// Arguments that passed validation, keyed by declared name.
///
/// Accessors return `None` for absent optional arguments and for a name read
/// with a kind other than the declared one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    values: Vec<(&'static str, ArgumentValue)>,
}

impl BoundArguments {
    pub fn get(&self, name: &str) -> Option<&ArgumentValue> {
        self.values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            ArgumentValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            ArgumentValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            ArgumentValue::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            ArgumentValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Binds `supplied` to `schema`.
///
/// Every required argument must be present. A typed argument must carry the
/// declared kind, except that an int is accepted where a float is declared.
/// Raw text from free-form entry is parsed as the declared kind. When a name
/// is supplied twice the first occurrence wins. Names the schema does not
/// declare are ignored.
pub fn bind_arguments(
    command: &str,
    schema: &[ArgumentDef],
    supplied: &[Argument],
) -> Result<BoundArguments, BindError> {
    let mut values = Vec::with_capacity(schema.len());
    for def in schema {
        let Some(arg) = supplied.iter().find(|arg| arg.name == def.name) else {
            if def.optional {
                continue;
            }
            return Err(BindError::MissingArgument {
                command: command.to_string(),
                argument: def.name.to_string(),
            });
        };
        let value = match (&arg.value, def.datatype) {
            (ArgumentValue::Raw(text), expected) => ArgumentValue::parse_as(text, expected),
            (ArgumentValue::Int(value), Datatype::Float) => {
                Some(ArgumentValue::Float(*value as f64))
            }
            (value, expected) if value.kind() == expected => Some(value.clone()),
            _ => None,
        };
        let Some(value) = value else {
            return Err(BindError::InvalidArgumentType {
                command: command.to_string(),
                argument: def.name.to_string(),
                expected: def.datatype,
                actual: arg.value.kind(),
            });
        };
        values.push((def.name, value));
    }

    for (idx, arg) in supplied.iter().enumerate() {
        if !schema.iter().any(|def| def.name == arg.name) {
            debug!(command, argument = %arg.name, "ignoring undeclared argument");
        } else if supplied[..idx].iter().any(|earlier| earlier.name == arg.name) {
            debug!(
                command,
                argument = %arg.name,
                value = %arg.value,
                "ignoring duplicate argument"
            );
        }
    }
    Ok(BoundArguments { values })
}
