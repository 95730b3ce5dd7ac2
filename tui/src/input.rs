//! Normalises crossterm events into [`KeyPress`] values the keymap can match.

use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseButton;
use crossterm::event::MouseEvent;
use crossterm::event::MouseEventKind;

use crate::keymap::ChordKey;
use crate::keymap::KeyPress;
use crate::keymap::SpecialKey;

const FUNCTION_KEYS: [SpecialKey; 12] = [
    SpecialKey::F1,
    SpecialKey::F2,
    SpecialKey::F3,
    SpecialKey::F4,
    SpecialKey::F5,
    SpecialKey::F6,
    SpecialKey::F7,
    SpecialKey::F8,
    SpecialKey::F9,
    SpecialKey::F10,
    SpecialKey::F11,
    SpecialKey::F12,
];

/// Converts a terminal event into a key press, or `None` for events no chord
/// can describe (resizes, focus changes, key releases, mouse motion).
pub fn key_press_from_event(event: &Event) -> Option<KeyPress> {
    match event {
        Event::Key(key) => key_press_from_key(*key),
        Event::Mouse(mouse) => key_press_from_mouse(*mouse),
        _ => None,
    }
}

pub fn key_press_from_key(event: KeyEvent) -> Option<KeyPress> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let alt = event.modifiers.contains(KeyModifiers::ALT);
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);

    let key = match event.code {
        KeyCode::Char(ch) if ctrl => ChordKey::Special(SpecialKey::ctrl_char(ch)?),
        KeyCode::Char(' ') => ChordKey::Special(SpecialKey::Space),
        KeyCode::Char(ch) => ChordKey::Char(ch),
        KeyCode::Null => ChordKey::Special(SpecialKey::CtrlSpace),
        KeyCode::F(n) => {
            let idx = usize::from(n).checked_sub(1)?;
            ChordKey::Special(*FUNCTION_KEYS.get(idx)?)
        }
        code => ChordKey::Special(named_key(code)?),
    };
    Some(KeyPress { alt, key })
}

fn named_key(code: KeyCode) -> Option<SpecialKey> {
    let key = match code {
        KeyCode::Enter => SpecialKey::Enter,
        KeyCode::Tab => SpecialKey::Tab,
        KeyCode::Backspace => SpecialKey::Backspace2,
        KeyCode::Esc => SpecialKey::Esc,
        KeyCode::Insert => SpecialKey::Insert,
        KeyCode::Delete => SpecialKey::Delete,
        KeyCode::Home => SpecialKey::Home,
        KeyCode::End => SpecialKey::End,
        KeyCode::PageUp => SpecialKey::Pgup,
        KeyCode::PageDown => SpecialKey::Pgdn,
        KeyCode::Up => SpecialKey::ArrowUp,
        KeyCode::Down => SpecialKey::ArrowDown,
        KeyCode::Left => SpecialKey::ArrowLeft,
        KeyCode::Right => SpecialKey::ArrowRight,
        _ => return None,
    };
    Some(key)
}

pub fn key_press_from_mouse(event: MouseEvent) -> Option<KeyPress> {
    let key = match event.kind {
        MouseEventKind::Down(MouseButton::Left) => SpecialKey::MouseLeft,
        MouseEventKind::Down(MouseButton::Middle) => SpecialKey::MouseMiddle,
        MouseEventKind::Down(MouseButton::Right) => SpecialKey::MouseRight,
        MouseEventKind::Up(_) => SpecialKey::MouseRelease,
        MouseEventKind::ScrollUp => SpecialKey::MouseWheelUp,
        MouseEventKind::ScrollDown => SpecialKey::MouseWheelDown,
        _ => return None,
    };
    Some(KeyPress {
        alt: event.modifiers.contains(KeyModifiers::ALT),
        key: ChordKey::Special(key),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Option<KeyPress> {
        key_press_from_event(&Event::Key(KeyEvent::new(code, modifiers)))
    }

    fn mouse(kind: MouseEventKind) -> Option<KeyPress> {
        key_press_from_event(&Event::Mouse(MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }))
    }

    #[test]
    fn plain_characters_are_literals() {
        assert_eq!(
            press(KeyCode::Char('a'), KeyModifiers::NONE),
            Some(KeyPress::char('a'))
        );
        assert_eq!(
            press(KeyCode::Char('A'), KeyModifiers::SHIFT),
            Some(KeyPress::char('A'))
        );
    }

    #[test]
    fn ctrl_letters_become_ctrl_keys() {
        assert_eq!(
            press(KeyCode::Char('x'), KeyModifiers::CONTROL),
            Some(KeyPress::special(SpecialKey::CtrlX))
        );
        assert_eq!(
            press(KeyCode::Char('h'), KeyModifiers::CONTROL),
            Some(KeyPress::special(SpecialKey::Backspace))
        );
        assert_eq!(
            press(KeyCode::Char('x'), KeyModifiers::CONTROL | KeyModifiers::ALT),
            Some(KeyPress::special(SpecialKey::CtrlX).with_alt())
        );
        assert_eq!(press(KeyCode::Char('!'), KeyModifiers::CONTROL), None);
    }

    #[test]
    fn named_keys_map_to_special_keys() {
        assert_eq!(
            press(KeyCode::Backspace, KeyModifiers::NONE),
            Some(KeyPress::special(SpecialKey::Backspace2))
        );
        assert_eq!(
            press(KeyCode::Char(' '), KeyModifiers::NONE),
            Some(KeyPress::special(SpecialKey::Space))
        );
        assert_eq!(
            press(KeyCode::PageDown, KeyModifiers::ALT),
            Some(KeyPress::special(SpecialKey::Pgdn).with_alt())
        );
        assert_eq!(
            press(KeyCode::F(12), KeyModifiers::NONE),
            Some(KeyPress::special(SpecialKey::F12))
        );
        assert_eq!(press(KeyCode::F(13), KeyModifiers::NONE), None);
        assert_eq!(press(KeyCode::F(0), KeyModifiers::NONE), None);
        assert_eq!(press(KeyCode::BackTab, KeyModifiers::SHIFT), None);
    }

    #[test]
    fn releases_are_dropped() {
        let release =
            KeyEvent::new_with_kind(KeyCode::Char('a'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(key_press_from_event(&Event::Key(release)), None);
    }

    #[test]
    fn mouse_buttons_and_wheel() {
        assert_eq!(
            mouse(MouseEventKind::Down(MouseButton::Left)),
            Some(KeyPress::special(SpecialKey::MouseLeft))
        );
        assert_eq!(
            mouse(MouseEventKind::Up(MouseButton::Right)),
            Some(KeyPress::special(SpecialKey::MouseRelease))
        );
        assert_eq!(
            mouse(MouseEventKind::ScrollDown),
            Some(KeyPress::special(SpecialKey::MouseWheelDown))
        );
        assert_eq!(mouse(MouseEventKind::Moved), None);
        assert_eq!(key_press_from_event(&Event::Resize(80, 24)), None);
    }
}
