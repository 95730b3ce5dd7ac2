//! Chord text parsing and positional matching.
//!
//! Chord text uses `-` between sequential steps and `+` between the tokens of
//! one step, so `"Ctrl+X-A"` means "press Ctrl+X, then A". Tokens are matched
//! case-insensitively against `Alt`, `Ctrl` and the named [`SpecialKey`]s. Any
//! other single character is a literal key.

use std::fmt;
use std::str::FromStr;

use strum_macros::EnumIter;
use strum_macros::EnumString;
use strum_macros::IntoStaticStr;
use thiserror::Error;

/// Named keys a chord step can refer to.
///
/// Terminals report several Ctrl combinations as the same byte, so those
/// names are aliases of one variant (`CtrlI` is `Tab`, `CtrlM` is `Enter`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, IntoStaticStr, strum_macros::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum SpecialKey {
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Insert,
    Delete,
    Home,
    End,
    Pgup,
    Pgdn,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    MouseLeft,
    MouseMiddle,
    MouseRight,
    MouseRelease,
    MouseWheelUp,
    MouseWheelDown,

    #[strum(to_string = "CtrlSpace", serialize = "CtrlTilde", serialize = "Ctrl2")]
    CtrlSpace,
    CtrlA,
    CtrlB,
    CtrlC,
    CtrlD,
    CtrlE,
    CtrlF,
    CtrlG,
    #[strum(to_string = "Backspace", serialize = "CtrlH")]
    Backspace,
    #[strum(to_string = "Tab", serialize = "CtrlI")]
    Tab,
    CtrlJ,
    CtrlK,
    CtrlL,
    #[strum(to_string = "Enter", serialize = "CtrlM")]
    Enter,
    CtrlN,
    CtrlO,
    CtrlP,
    CtrlQ,
    CtrlR,
    CtrlS,
    CtrlT,
    CtrlU,
    CtrlV,
    CtrlW,
    CtrlX,
    CtrlY,
    CtrlZ,
    #[strum(to_string = "Esc", serialize = "CtrlLsqBracket", serialize = "Ctrl3")]
    Esc,
    #[strum(to_string = "CtrlBackslash", serialize = "Ctrl4")]
    CtrlBackslash,
    #[strum(to_string = "CtrlRsqBracket", serialize = "Ctrl5")]
    CtrlRsqBracket,
    Ctrl6,
    #[strum(
        to_string = "CtrlSlash",
        serialize = "CtrlUnderscore",
        serialize = "Ctrl7"
    )]
    CtrlSlash,
    Space,
    #[strum(to_string = "Backspace2", serialize = "Ctrl8")]
    Backspace2,
}

const CTRL_LETTERS: [SpecialKey; 26] = [
    SpecialKey::CtrlA,
    SpecialKey::CtrlB,
    SpecialKey::CtrlC,
    SpecialKey::CtrlD,
    SpecialKey::CtrlE,
    SpecialKey::CtrlF,
    SpecialKey::CtrlG,
    SpecialKey::Backspace,
    SpecialKey::Tab,
    SpecialKey::CtrlJ,
    SpecialKey::CtrlK,
    SpecialKey::CtrlL,
    SpecialKey::Enter,
    SpecialKey::CtrlN,
    SpecialKey::CtrlO,
    SpecialKey::CtrlP,
    SpecialKey::CtrlQ,
    SpecialKey::CtrlR,
    SpecialKey::CtrlS,
    SpecialKey::CtrlT,
    SpecialKey::CtrlU,
    SpecialKey::CtrlV,
    SpecialKey::CtrlW,
    SpecialKey::CtrlX,
    SpecialKey::CtrlY,
    SpecialKey::CtrlZ,
];

impl SpecialKey {
    /// The key a terminal reports for Ctrl held together with `ch`.
    pub fn ctrl_char(ch: char) -> Option<SpecialKey> {
        if ch.is_ascii_alphabetic() {
            let idx = (ch.to_ascii_lowercase() as u8 - b'a') as usize;
            return Some(CTRL_LETTERS[idx]);
        }
        match ch {
            ' ' | '2' | '@' | '~' | '`' => Some(SpecialKey::CtrlSpace),
            '3' | '[' => Some(SpecialKey::Esc),
            '4' | '\\' => Some(SpecialKey::CtrlBackslash),
            '5' | ']' => Some(SpecialKey::CtrlRsqBracket),
            '6' | '^' => Some(SpecialKey::Ctrl6),
            '7' | '/' | '_' => Some(SpecialKey::CtrlSlash),
            '8' => Some(SpecialKey::Backspace2),
            _ => None,
        }
    }
}

/// Identity of the key pressed in one step: a literal character or a named key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordKey {
    Char(char),
    Special(SpecialKey),
}

/// One step of a chord, and equally one observed input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub alt: bool,
    pub key: ChordKey,
}

impl KeyPress {
    pub fn char(ch: char) -> Self {
        Self {
            alt: false,
            key: ChordKey::Char(ch),
        }
    }

    pub fn special(key: SpecialKey) -> Self {
        Self {
            alt: false,
            key: ChordKey::Special(key),
        }
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Whether `event` satisfies this step: same Alt state and same key.
    pub fn accepts(&self, event: &KeyPress) -> bool {
        self.alt == event.alt && self.key == event.key
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alt {
            f.write_str("Alt+")?;
        }
        match self.key {
            ChordKey::Special(key) => write!(f, "{key}"),
            ChordKey::Char('-') => f.write_str("Minus"),
            ChordKey::Char('+') => f.write_str("Plus"),
            ChordKey::Char(ch) => write!(f, "{ch}"),
        }
    }
}

/// Result of comparing an input buffer against a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordMatch {
    /// The buffer diverges from the chord, or is longer than it.
    None,
    /// The buffer is a proper prefix of the chord.
    Partial,
    /// The buffer is exactly the chord.
    Full,
}

impl ChordMatch {
    pub fn is_partial(self) -> bool {
        self == ChordMatch::Partial
    }
}

/// A non-empty sequence of key presses bound as one combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChordSequence(Vec<KeyPress>);

impl ChordSequence {
    pub fn new(steps: Vec<KeyPress>) -> Result<Self, ChordParseError> {
        if steps.is_empty() {
            return Err(ChordParseError::Empty);
        }
        Ok(Self(steps))
    }

    pub fn steps(&self) -> &[KeyPress] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Requires Alt on every step.
    pub fn with_alt(mut self) -> Self {
        for step in &mut self.0 {
            step.alt = true;
        }
        self
    }

    /// Compares the buffered events (oldest first) position by position.
    pub fn check(&self, events: &[KeyPress]) -> ChordMatch {
        if events.len() > self.0.len() {
            return ChordMatch::None;
        }
        let diverges = self
            .0
            .iter()
            .zip(events)
            .any(|(step, event)| !step.accepts(event));
        if diverges {
            ChordMatch::None
        } else if events.len() < self.0.len() {
            ChordMatch::Partial
        } else {
            ChordMatch::Full
        }
    }

    /// True when `self` is a strict prefix of `other`.
    pub fn is_strict_prefix_of(&self, other: &ChordSequence) -> bool {
        self.len() < other.len() && other.check(&self.0).is_partial()
    }
}

impl fmt::Display for ChordSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, step) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("-")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl FromStr for ChordSequence {
    type Err = ChordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_chord(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChordParseError {
    #[error("empty key chord")]
    Empty,
    #[error("step {step} of the chord is empty")]
    EmptyStep { step: usize },
    #[error("step {step} contains an empty token")]
    EmptyToken { step: usize },
    #[error("step {step} has modifiers but no key")]
    MissingKey { step: usize },
    #[error("step {step} names more than one key")]
    MultipleKeys { step: usize },
    #[error("unknown key '{token}'")]
    UnknownKey { token: String },
    #[error("'{token}' cannot be combined with Ctrl")]
    NoCtrlVariant { token: String },
}

/// Parses chord text such as `"Ctrl+X-A"` or `"Alt+F1"`.
pub fn parse_chord(input: &str) -> Result<ChordSequence, ChordParseError> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err(ChordParseError::Empty);
    }

    let mut steps = Vec::new();
    for (idx, step) in raw.split('-').enumerate() {
        steps.push(parse_step(step, idx + 1)?);
    }
    ChordSequence::new(steps)
}

fn parse_step(step: &str, number: usize) -> Result<KeyPress, ChordParseError> {
    if step.trim().is_empty() {
        return Err(ChordParseError::EmptyStep { step: number });
    }

    let mut alt = false;
    let mut ctrl = false;
    let mut key: Option<(ChordKey, &str)> = None;

    for token in step.split('+').map(str::trim) {
        if token.is_empty() {
            return Err(ChordParseError::EmptyToken { step: number });
        }
        let lower = token.to_ascii_lowercase();
        match lower.as_str() {
            "alt" => alt = true,
            "ctrl" | "control" => ctrl = true,
            _ => {
                if key.is_some() {
                    return Err(ChordParseError::MultipleKeys { step: number });
                }
                key = Some((parse_key_token(token, &lower)?, token));
            }
        }
    }

    let Some((key, token)) = key else {
        return Err(ChordParseError::MissingKey { step: number });
    };
    let key = if ctrl { apply_ctrl(key, token)? } else { key };
    Ok(KeyPress { alt, key })
}

fn parse_key_token(token: &str, lower: &str) -> Result<ChordKey, ChordParseError> {
    if let Ok(special) = SpecialKey::from_str(token) {
        return Ok(ChordKey::Special(special));
    }
    if let Some(ch) = parse_named_punct(lower) {
        return Ok(ChordKey::Char(ch));
    }
    let mut chars = token.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Ok(ChordKey::Char(ch));
    }
    Err(ChordParseError::UnknownKey {
        token: token.to_string(),
    })
}

fn parse_named_punct(lower: &str) -> Option<char> {
    match lower {
        "plus" => Some('+'),
        "minus" => Some('-'),
        "comma" => Some(','),
        "period" | "dot" => Some('.'),
        "slash" => Some('/'),
        "backslash" => Some('\\'),
        "quote" => Some('\''),
        "doublequote" => Some('"'),
        "semicolon" => Some(';'),
        _ => None,
    }
}

fn apply_ctrl(key: ChordKey, token: &str) -> Result<ChordKey, ChordParseError> {
    let ctrl = match key {
        ChordKey::Char(ch) => SpecialKey::ctrl_char(ch),
        ChordKey::Special(SpecialKey::Space) => Some(SpecialKey::CtrlSpace),
        ChordKey::Special(_) => None,
    };
    ctrl.map(ChordKey::Special)
        .ok_or_else(|| ChordParseError::NoCtrlVariant {
            token: token.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    fn chord(text: &str) -> ChordSequence {
        parse_chord(text).expect("chord should parse")
    }

    #[test]
    fn ctrl_x_then_a_is_two_steps() {
        assert_eq!(
            chord("Ctrl+X-A").steps(),
            &[
                KeyPress::special(SpecialKey::CtrlX),
                KeyPress::char('A'),
            ]
        );
        assert_eq!(chord("CtrlX-A"), chord("Ctrl+X-A"));
    }

    #[test]
    fn alt_f1_is_one_step_with_alt() {
        assert_eq!(
            chord("Alt+F1").steps(),
            &[KeyPress::special(SpecialKey::F1).with_alt()]
        );
    }

    #[test]
    fn tokens_are_case_insensitive_but_literals_are_not() {
        assert_eq!(chord("alt+pgdn"), chord("ALT+Pgdn"));
        assert_eq!(chord("a").steps(), &[KeyPress::char('a')]);
        assert_eq!(chord("A").steps(), &[KeyPress::char('A')]);
    }

    #[test]
    fn aliases_resolve_to_one_key() {
        assert_eq!(chord("CtrlI"), chord("Tab"));
        assert_eq!(chord("CtrlM"), chord("Enter"));
        assert_eq!(chord("Ctrl+H"), chord("Backspace"));
        assert_eq!(chord("Ctrl7"), chord("CtrlUnderscore"));
        assert_eq!(chord("Ctrl+Space"), chord("CtrlTilde"));
    }

    #[test]
    fn every_special_key_round_trips_through_display() {
        for key in SpecialKey::iter() {
            let text = key.to_string();
            assert_eq!(chord(&text).steps(), &[KeyPress::special(key)], "{text}");
        }
    }

    #[test]
    fn named_punctuation_allows_separators_as_literals() {
        assert_eq!(
            chord("Alt+Minus-Plus").steps(),
            &[KeyPress::char('-').with_alt(), KeyPress::char('+')]
        );
        assert_eq!(chord("Alt+Minus-Plus").to_string(), "Alt+Minus-Plus");
    }

    #[test]
    fn malformed_chords_are_rejected() {
        assert_eq!(parse_chord(""), Err(ChordParseError::Empty));
        assert_eq!(
            parse_chord("CtrlX-"),
            Err(ChordParseError::EmptyStep { step: 2 })
        );
        assert_eq!(
            parse_chord("Alt++A"),
            Err(ChordParseError::EmptyToken { step: 1 })
        );
        assert_eq!(
            parse_chord("Alt"),
            Err(ChordParseError::MissingKey { step: 1 })
        );
        assert_eq!(
            parse_chord("A+B"),
            Err(ChordParseError::MultipleKeys { step: 1 })
        );
        assert_eq!(
            parse_chord("Hyper+A"),
            Err(ChordParseError::UnknownKey {
                token: "Hyper".to_string()
            })
        );
        assert_eq!(
            parse_chord("Ctrl+F1"),
            Err(ChordParseError::NoCtrlVariant {
                token: "F1".to_string()
            })
        );
    }

    #[test]
    fn prefix_buffer_is_partial_match() {
        let seq = chord("CtrlX-A-B");
        assert_eq!(seq.check(&[]), ChordMatch::Partial);
        assert_eq!(
            seq.check(&[KeyPress::special(SpecialKey::CtrlX)]),
            ChordMatch::Partial
        );
        assert_eq!(
            seq.check(&[KeyPress::special(SpecialKey::CtrlX), KeyPress::char('A')]),
            ChordMatch::Partial
        );
    }

    #[test]
    fn equal_length_buffer_is_full_match() {
        let seq = chord("CtrlX-A");
        let events = [KeyPress::special(SpecialKey::CtrlX), KeyPress::char('A')];
        assert_eq!(seq.check(&events), ChordMatch::Full);
    }

    #[test]
    fn longer_buffer_never_matches() {
        let seq = chord("A");
        let events = [KeyPress::char('A'), KeyPress::char('A')];
        assert_eq!(seq.check(&events), ChordMatch::None);
    }

    #[test]
    fn alt_state_must_agree() {
        let plain = chord("A");
        let alt = chord("Alt+A");
        assert_eq!(plain.check(&[KeyPress::char('A').with_alt()]), ChordMatch::None);
        assert_eq!(alt.check(&[KeyPress::char('A')]), ChordMatch::None);
        assert_eq!(alt.check(&[KeyPress::char('A').with_alt()]), ChordMatch::Full);
    }

    #[test]
    fn divergent_key_is_no_match() {
        let seq = chord("CtrlX-A");
        let events = [KeyPress::special(SpecialKey::CtrlX), KeyPress::char('B')];
        assert_eq!(seq.check(&events), ChordMatch::None);
        assert_eq!(
            seq.check(&[KeyPress::char('x')]),
            ChordMatch::None,
            "literal x is not Ctrl+X"
        );
    }

    #[test]
    fn strict_prefix_detection() {
        assert!(chord("CtrlX").is_strict_prefix_of(&chord("CtrlX-A")));
        assert!(!chord("CtrlX-A").is_strict_prefix_of(&chord("CtrlX-A")));
        assert!(!chord("CtrlY").is_strict_prefix_of(&chord("CtrlX-A")));
    }

    #[test]
    fn with_alt_applies_to_every_step() {
        assert_eq!(chord("CtrlX-A").with_alt(), chord("Alt+CtrlX-Alt+A"));
    }
}
