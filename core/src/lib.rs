//! Persisted configuration for chatterm: keybind records, argument values and
//! the `config.toml` loader.

pub mod config;

pub use config::Config;
pub use config::ConfigError;
pub use config::types::Argument;
pub use config::types::ArgumentValue;
pub use config::types::Datatype;
pub use config::types::KeybindRecord;
