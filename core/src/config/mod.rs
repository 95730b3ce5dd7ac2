//! Loading of `config.toml` and `keybinds.json` from the chatterm home.

pub mod schema;
pub mod types;

use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use self::types::KeybindRecord;

pub const CONFIG_TOML_FILE: &str = "config.toml";
pub const KEYBINDS_JSON_FILE: &str = "keybinds.json";

/// Default idle time before a partially typed chord is discarded.
pub const DEFAULT_CHORD_TIMEOUT: Duration = Duration::from_millis(1000);

/// Raw shape of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ConfigToml {
    /// Milliseconds a partially typed multi-step chord may sit idle before it
    /// is discarded.
    pub chord_timeout_ms: Option<u64>,
    /// Drop the built-in keybindings instead of layering user bindings on top.
    pub replace_default_keybinds: Option<bool>,
    /// User keybindings, in priority order.
    #[serde(default)]
    pub keybinds: Vec<KeybindRecord>,
}

/// Effective configuration after defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory the configuration was loaded from.
    pub chatterm_home: PathBuf,
    pub chord_timeout: Duration,
    pub replace_default_keybinds: bool,
    /// TOML keybinds followed by any `keybinds.json` records.
    pub keybinds: Vec<KeybindRecord>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid TOML in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Config {
    /// Loads configuration from `chatterm_home`. Missing files fall back to
    /// defaults.
    pub fn load(chatterm_home: &Path) -> Result<Self, ConfigError> {
        let toml_path = chatterm_home.join(CONFIG_TOML_FILE);
        let config_toml = match read_optional(&toml_path)? {
            Some(contents) => {
                toml::from_str::<ConfigToml>(&contents).map_err(|source| ConfigError::Toml {
                    path: toml_path.clone(),
                    source,
                })?
            }
            None => {
                debug!("no config at {}, using defaults", toml_path.display());
                ConfigToml::default()
            }
        };

        let json_path = chatterm_home.join(KEYBINDS_JSON_FILE);
        let json_keybinds = match read_optional(&json_path)? {
            Some(contents) => parse_keybinds_json(&json_path, &contents)?,
            None => Vec::new(),
        };

        Ok(Self::from_toml(
            chatterm_home.to_path_buf(),
            config_toml,
            json_keybinds,
        ))
    }

    pub fn from_toml(
        chatterm_home: PathBuf,
        config_toml: ConfigToml,
        extra_keybinds: Vec<KeybindRecord>,
    ) -> Self {
        let ConfigToml {
            chord_timeout_ms,
            replace_default_keybinds,
            mut keybinds,
        } = config_toml;
        keybinds.extend(extra_keybinds);
        Self {
            chatterm_home,
            chord_timeout: chord_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_CHORD_TIMEOUT),
            replace_default_keybinds: replace_default_keybinds.unwrap_or(false),
            keybinds,
        }
    }
}

/// Resolves the configuration directory: `$CHATTERM_HOME` when set, otherwise
/// `<platform config dir>/chatterm`.
pub fn find_chatterm_home() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("CHATTERM_HOME")
        && !home.is_empty()
    {
        return Some(PathBuf::from(home));
    }
    dirs::config_dir().map(|dir| dir.join("chatterm"))
}

/// Reads a JSON array of keybind records.
pub fn load_keybinds_json(path: &Path) -> Result<Vec<KeybindRecord>, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_keybinds_json(path, &contents)
}

fn parse_keybinds_json(path: &Path, contents: &str) -> Result<Vec<KeybindRecord>, ConfigError> {
    serde_json::from_str(contents).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
