//! Key bindings: which chord fires which command with which preset arguments.

mod chord;
mod session;

use std::collections::HashMap;
use std::fmt;

use chatterm_core::Argument;
use chatterm_core::Config;
use chatterm_core::KeybindRecord;
use tracing::debug;

use crate::commands::BindError;
use crate::commands::CommandRegistry;

pub use chord::ChordKey;
pub use chord::ChordMatch;
pub use chord::ChordParseError;
pub use chord::ChordSequence;
pub use chord::KeyPress;
pub use chord::SpecialKey;
pub use chord::parse_chord;
pub use session::FiredCommand;
pub use session::KeyResolution;
pub use session::KeySession;

/// A chord bound to a command invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBinding {
    pub command: String,
    pub args: Vec<Argument>,
    pub chord: ChordSequence,
    /// Set when the record asked for Alt on every step. Already folded into
    /// `chord`.
    pub alt: bool,
}

impl KeyBinding {
    pub fn from_record(record: &KeybindRecord) -> Result<Self, KeymapError> {
        let chord = parse_chord(&record.key).map_err(|source| KeymapError::InvalidChord {
            command: record.command.clone(),
            chord: record.key.clone(),
            source,
        })?;
        let chord = if record.alt { chord.with_alt() } else { chord };
        Ok(Self {
            command: record.command.clone(),
            args: record.args.clone(),
            chord,
            alt: record.alt,
        })
    }
}

/// How a buffer of pending key presses relates to the keymap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeymapMatch<'a> {
    /// The first binding, in order, whose chord equals the buffer.
    Full(&'a KeyBinding),
    /// No binding equals the buffer but at least one starts with it.
    Partial,
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeymapError {
    UnknownCommand {
        command: String,
        chord: String,
    },
    InvalidChord {
        command: String,
        chord: String,
        source: ChordParseError,
    },
    InvalidPreset {
        chord: String,
        source: BindError,
    },
    Conflict {
        chord: String,
        commands: Vec<String>,
    },
    Shadowed {
        prefix: String,
        prefix_command: String,
        chord: String,
        command: String,
    },
}

impl fmt::Display for KeymapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeymapError::UnknownCommand { command, chord } => {
                write!(f, "keybinding '{chord}' refers to unknown command '{command}'")
            }
            KeymapError::InvalidChord {
                command,
                chord,
                source,
            } => write!(f, "invalid keybinding '{chord}' for '{command}': {source}"),
            KeymapError::InvalidPreset { chord, source } => {
                write!(f, "invalid preset arguments for '{chord}': {source}")
            }
            KeymapError::Conflict { chord, commands } => write!(
                f,
                "keybinding conflict: {chord} used by {}",
                format_command_list(commands)
            ),
            KeymapError::Shadowed {
                prefix,
                prefix_command,
                chord,
                command,
            } => write!(
                f,
                "keybinding {chord} for '{command}' can never fire because {prefix} \
                 already runs '{prefix_command}'"
            ),
        }
    }
}

impl std::error::Error for KeymapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KeymapError::InvalidChord { source, .. } => Some(source),
            KeymapError::InvalidPreset { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// The ordered set of active bindings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Keymap {
    bindings: Vec<KeyBinding>,
}

impl Keymap {
    /// Wraps bindings as given. Use [`Keymap::from_records`] for validation.
    pub fn new(bindings: Vec<KeyBinding>) -> Self {
        Self { bindings }
    }

    pub fn defaults(registry: &CommandRegistry) -> Result<Self, KeymapError> {
        Self::from_records(&[], false, registry)
    }

    pub fn from_config(config: &Config, registry: &CommandRegistry) -> Result<Self, KeymapError> {
        Self::from_records(&config.keybinds, config.replace_default_keybinds, registry)
    }

    /// Layers user records over the built-in defaults and validates the result.
    ///
    /// A user chord replaces every default it collides with, whether the
    /// chords are equal or one is a prefix of the other.
    pub fn from_records(
        records: &[KeybindRecord],
        replace_defaults: bool,
        registry: &CommandRegistry,
    ) -> Result<Self, KeymapError> {
        let user = records
            .iter()
            .map(KeyBinding::from_record)
            .collect::<Result<Vec<_>, _>>()?;

        let mut bindings = if replace_defaults {
            Vec::new()
        } else {
            default_bindings()
                .iter()
                .map(KeyBinding::from_record)
                .collect::<Result<Vec<_>, _>>()?
        };
        bindings.retain(|default| {
            let overridden = user.iter().find(|binding| overlaps(&binding.chord, &default.chord));
            if let Some(binding) = overridden {
                debug!(
                    chord = %default.chord,
                    default = %default.command,
                    replacement = %binding.command,
                    "user keybinding overrides default"
                );
            }
            overridden.is_none()
        });
        bindings.extend(user);

        let keymap = Self { bindings };
        keymap.validate(registry)?;
        Ok(keymap)
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }

    /// Bindings that run `command`, in order.
    pub fn bindings_for<'a>(&'a self, command: &'a str) -> impl Iterator<Item = &'a KeyBinding> {
        self.bindings
            .iter()
            .filter(move |binding| binding.command == command)
    }

    pub fn lookup(&self, events: &[KeyPress]) -> KeymapMatch<'_> {
        let mut partial = false;
        for binding in &self.bindings {
            match binding.chord.check(events) {
                ChordMatch::Full => return KeymapMatch::Full(binding),
                ChordMatch::Partial => partial = true,
                ChordMatch::None => {}
            }
        }
        if partial {
            KeymapMatch::Partial
        } else {
            KeymapMatch::None
        }
    }

    fn validate(&self, registry: &CommandRegistry) -> Result<(), KeymapError> {
        for binding in &self.bindings {
            let Some(command) = registry.get(&binding.command) else {
                return Err(KeymapError::UnknownCommand {
                    command: binding.command.clone(),
                    chord: binding.chord.to_string(),
                });
            };
            command
                .bind(&binding.args)
                .map_err(|source| KeymapError::InvalidPreset {
                    chord: binding.chord.to_string(),
                    source,
                })?;
        }
        validate_conflicts(&self.bindings)
    }
}

fn overlaps(a: &ChordSequence, b: &ChordSequence) -> bool {
    a == b || a.is_strict_prefix_of(b) || b.is_strict_prefix_of(a)
}

fn validate_conflicts(bindings: &[KeyBinding]) -> Result<(), KeymapError> {
    let mut used: HashMap<&ChordSequence, Vec<String>> = HashMap::new();
    for binding in bindings {
        used.entry(&binding.chord)
            .or_default()
            .push(binding.command.clone());
    }
    for binding in bindings {
        if let Some(commands) = used.remove(&binding.chord)
            && commands.len() > 1
        {
            return Err(KeymapError::Conflict {
                chord: binding.chord.to_string(),
                commands,
            });
        }
    }

    for short in bindings {
        for long in bindings {
            if short.chord.is_strict_prefix_of(&long.chord) {
                return Err(KeymapError::Shadowed {
                    prefix: short.chord.to_string(),
                    prefix_command: short.command.clone(),
                    chord: long.chord.to_string(),
                    command: long.command.clone(),
                });
            }
        }
    }
    Ok(())
}

fn format_command_list(commands: &[String]) -> String {
    match commands {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
    }
}

fn default_bindings() -> Vec<KeybindRecord> {
    let direction = |dir: &str| Argument::string("direction", dir);
    let amount = |n: i64| Argument::int("amount", n);
    let words = Argument::bool("words", true);

    vec![
        record("commands", "CtrlP", vec![]),
        record("help", "F1", vec![]),
        record("servers", "CtrlS", vec![]),
        record("channels", "CtrlX-C", vec![]),
        record("message_window", "CtrlX-M", vec![]),
        record("clear_log", "CtrlX-L", vec![]),
        record("reload_theme", "CtrlX-T", vec![]),
        record("quit", "CtrlQ", vec![]),
        record("select", "Enter", vec![]),
        record("toggle", "CtrlT", vec![]),
        record("back", "Esc", vec![]),
        record("move_cursor", "ArrowLeft", vec![direction("left"), amount(1)]),
        record("move_cursor", "ArrowRight", vec![direction("right"), amount(1)]),
        record(
            "move_cursor",
            "Alt+ArrowLeft",
            vec![direction("left"), amount(1), words.clone()],
        ),
        record(
            "move_cursor",
            "Alt+ArrowRight",
            vec![direction("right"), amount(1), words.clone()],
        ),
        record("move_cursor", "Home", vec![direction("start"), amount(1)]),
        record("move_cursor", "End", vec![direction("end"), amount(1)]),
        record("erase", "Backspace2", vec![direction("left"), amount(1)]),
        record("erase", "Backspace", vec![direction("left"), amount(1)]),
        record("erase", "Delete", vec![direction("right"), amount(1)]),
        record("erase", "CtrlW", vec![direction("left"), amount(1), words.clone()]),
        record("erase", "Alt+Backspace2", vec![direction("left"), amount(1), words]),
        record("scroll", "ArrowUp", vec![direction("up"), amount(1)]),
        record("scroll", "ArrowDown", vec![direction("down"), amount(1)]),
        record("scroll", "Pgup", vec![direction("up"), amount(10)]),
        record("scroll", "Pgdn", vec![direction("down"), amount(10)]),
        record("scroll", "MouseWheelUp", vec![direction("up"), amount(3)]),
        record("scroll", "MouseWheelDown", vec![direction("down"), amount(3)]),
        record("scroll", "Alt+Home", vec![direction("start"), amount(1)]),
        record("scroll", "Alt+End", vec![direction("end"), amount(1)]),
    ]
}

fn record(command: &str, key: &str, args: Vec<Argument>) -> KeybindRecord {
    KeybindRecord {
        command: command.to_string(),
        args,
        key: key.to_string(),
        alt: false,
    }
}
