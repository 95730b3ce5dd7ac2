use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use chatterm_core::Argument;
use tracing::debug;

use super::KeyPress;
use super::Keymap;
use super::KeymapMatch;

/// A binding that fired, carrying its preset arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct FiredCommand {
    pub command: String,
    pub args: Vec<Argument>,
}

/// Outcome of feeding one event into a [`KeySession`].
#[derive(Debug, Clone, PartialEq)]
pub enum KeyResolution {
    Fire(FiredCommand),
    /// The buffered events are a prefix of at least one binding.
    Pending,
    /// No binding matches. The event is free for the focused widget.
    Unmatched,
}

/// Buffers key presses until they resolve to a binding.
///
/// The buffer is cleared after a full match, after a mismatch, and when it
/// has sat idle longer than the chord timeout.
#[derive(Debug)]
pub struct KeySession {
    keymap: Arc<Keymap>,
    timeout: Duration,
    pending: Vec<KeyPress>,
    last_input: Option<Instant>,
}

impl KeySession {
    pub fn new(keymap: Arc<Keymap>, timeout: Duration) -> Self {
        Self {
            keymap,
            timeout,
            pending: Vec::new(),
            last_input: None,
        }
    }

    pub fn pending(&self) -> &[KeyPress] {
        &self.pending
    }

    /// When the pending buffer will be discarded if no further input arrives.
    pub fn deadline(&self) -> Option<Instant> {
        if self.pending.is_empty() {
            return None;
        }
        self.last_input.map(|last| last + self.timeout)
    }

    /// Drops a stale pending buffer. Returns true when something was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                debug!(pending = self.pending.len(), "chord timed out");
                self.reset();
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.pending.clear();
        self.last_input = None;
    }

    pub fn feed(&mut self, event: KeyPress, now: Instant) -> KeyResolution {
        self.expire(now);
        self.pending.push(event);
        self.last_input = Some(now);

        #[cfg(feature = "debug-logs")]
        tracing::trace!(event = %event, pending = self.pending.len(), "key buffered");

        match self.resolve() {
            // A broken multi-step attempt may still leave the last key as the
            // start of another binding.
            KeyResolution::Unmatched if self.pending.len() > 1 => {
                debug!(%event, "abandoning partial chord, retrying last key");
                self.pending.clear();
                self.pending.push(event);
                self.resolve()
            }
            resolution => resolution,
        }
    }

    fn resolve(&mut self) -> KeyResolution {
        let resolution = match self.keymap.lookup(&self.pending) {
            KeymapMatch::Full(binding) => KeyResolution::Fire(FiredCommand {
                command: binding.command.clone(),
                args: binding.args.clone(),
            }),
            KeymapMatch::Partial => return KeyResolution::Pending,
            KeymapMatch::None => KeyResolution::Unmatched,
        };
        if let KeyResolution::Fire(fired) = &resolution {
            debug!(command = %fired.command, "chord resolved");
        }
        self.reset();
        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::SpecialKey;
    use crate::keymap::parse_chord;
    use crate::keymap::tests::binding;
    use pretty_assertions::assert_eq;

    fn session() -> KeySession {
        let keymap = Keymap::new(vec![
            binding("clear_log", "CtrlX-L"),
            binding("help", "CtrlX-H-H"),
            binding("quit", "CtrlQ"),
            binding("toggle", "L"),
        ]);
        KeySession::new(Arc::new(keymap), Duration::from_millis(500))
    }

    fn fire(command: &str) -> KeyResolution {
        KeyResolution::Fire(FiredCommand {
            command: command.to_string(),
            args: Vec::new(),
        })
    }

    fn ctrl_x() -> KeyPress {
        KeyPress::special(SpecialKey::CtrlX)
    }

    #[test]
    fn single_step_fires_immediately() {
        let mut session = session();
        let now = Instant::now();
        assert_eq!(
            session.feed(KeyPress::special(SpecialKey::CtrlQ), now),
            fire("quit")
        );
        assert!(session.pending().is_empty());
        assert_eq!(session.deadline(), None);
    }

    #[test]
    fn multi_step_chord_waits_then_fires() {
        let mut session = session();
        let now = Instant::now();
        assert_eq!(session.feed(ctrl_x(), now), KeyResolution::Pending);
        assert_eq!(session.pending(), &[ctrl_x()]);
        assert_eq!(session.deadline(), Some(now + Duration::from_millis(500)));
        assert_eq!(
            session.feed(KeyPress::char('L'), now + Duration::from_millis(100)),
            fire("clear_log")
        );
        assert!(session.pending().is_empty());
    }

    #[test]
    fn unmatched_event_clears_buffer() {
        let mut session = session();
        let now = Instant::now();
        assert_eq!(session.feed(KeyPress::char('z'), now), KeyResolution::Unmatched);
        assert!(session.pending().is_empty());
    }

    #[test]
    fn broken_chord_retries_trailing_key() {
        let mut session = session();
        let now = Instant::now();
        assert_eq!(session.feed(ctrl_x(), now), KeyResolution::Pending);
        assert_eq!(
            session.feed(KeyPress::special(SpecialKey::CtrlQ), now),
            fire("quit")
        );

        assert_eq!(session.feed(ctrl_x(), now), KeyResolution::Pending);
        assert_eq!(session.feed(KeyPress::char('z'), now), KeyResolution::Unmatched);
        assert!(session.pending().is_empty());
    }

    #[test]
    fn stale_buffer_is_discarded_before_new_input() {
        let mut session = session();
        let now = Instant::now();
        assert_eq!(session.feed(ctrl_x(), now), KeyResolution::Pending);
        // After the timeout, `L` is judged on its own.
        assert_eq!(
            session.feed(KeyPress::char('L'), now + Duration::from_secs(1)),
            fire("toggle")
        );
    }

    #[test]
    fn expire_only_after_deadline() {
        let mut session = session();
        let now = Instant::now();
        session.feed(ctrl_x(), now);
        assert!(!session.expire(now + Duration::from_millis(499)));
        assert_eq!(session.pending(), &[ctrl_x()]);
        assert!(session.expire(now + Duration::from_millis(500)));
        assert!(session.pending().is_empty());
        assert!(!session.expire(now + Duration::from_secs(5)));
    }

    #[test]
    fn three_step_chord_stays_pending_until_complete() {
        let mut session = session();
        let now = Instant::now();
        let steps = parse_chord("CtrlX-H-H").expect("chord").steps().to_vec();
        assert_eq!(session.feed(steps[0], now), KeyResolution::Pending);
        assert_eq!(session.feed(steps[1], now), KeyResolution::Pending);
        assert_eq!(session.feed(steps[2], now), fire("help"));
    }
}
