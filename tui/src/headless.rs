//! A view manager without rendering. It keeps just enough state to show what
//! commands do and records every effect as a line of text.

use std::collections::BTreeSet;
use std::collections::HashMap;

use crate::ui::BackHandler;
use crate::ui::Direction;
use crate::ui::MessageView;
use crate::ui::Scrollable;
use crate::ui::Selectable;
use crate::ui::TextInput;
use crate::ui::Toggleable;
use crate::ui::UiEntity;
use crate::ui::ViewManager;
use crate::ui::WindowKind;

/// Single-line editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInput {
    text: Vec<char>,
    cursor: usize,
    inactive: bool,
}

impl LineInput {
    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += 1;
    }

    pub fn take(&mut self) -> String {
        self.cursor = 0;
        self.text.drain(..).collect()
    }

    fn word_left(&self, from: usize) -> usize {
        let mut idx = from;
        while idx > 0 && self.text[idx - 1].is_whitespace() {
            idx -= 1;
        }
        while idx > 0 && !self.text[idx - 1].is_whitespace() {
            idx -= 1;
        }
        idx
    }

    fn word_right(&self, from: usize) -> usize {
        let len = self.text.len();
        let mut idx = from;
        while idx < len && self.text[idx].is_whitespace() {
            idx += 1;
        }
        while idx < len && !self.text[idx].is_whitespace() {
            idx += 1;
        }
        idx
    }

    /// Applies `step` up to `amount` times, stopping once the cursor no
    /// longer moves.
    fn step_words(&self, amount: usize, step: impl Fn(&Self, usize) -> usize) -> usize {
        let mut at = self.cursor;
        for _ in 0..amount {
            let next = step(self, at);
            if next == at {
                break;
            }
            at = next;
        }
        at
    }

    /// Where the cursor would land after `amount` steps, or `None` for a
    /// direction that has no meaning on one line.
    fn target(&self, direction: Direction, amount: usize, words: bool) -> Option<usize> {
        let len = self.text.len();
        let target = match direction {
            Direction::Left if words => self.step_words(amount, Self::word_left),
            Direction::Right if words => self.step_words(amount, Self::word_right),
            Direction::Left => self.cursor.saturating_sub(amount),
            Direction::Right => self.cursor.saturating_add(amount).min(len),
            Direction::Start => 0,
            Direction::End => len,
            Direction::Up | Direction::Down => return None,
        };
        Some(target)
    }
}

impl TextInput for LineInput {
    fn is_active(&self) -> bool {
        !self.inactive
    }

    fn move_cursor(&mut self, direction: Direction, amount: usize, words: bool) {
        if let Some(target) = self.target(direction, amount, words) {
            self.cursor = target;
        }
    }

    fn erase(&mut self, direction: Direction, amount: usize, words: bool) {
        let Some(target) = self.target(direction, amount, words) else {
            return;
        };
        if target < self.cursor {
            self.text.drain(target..self.cursor);
            self.cursor = target;
        } else {
            self.text.drain(self.cursor..target);
        }
    }
}

/// The message log. `offset` counts lines scrolled up from the newest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageLog {
    lines: Vec<String>,
    offset: usize,
    effects: Vec<String>,
}

impl MessageLog {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn push(&mut self, line: String) {
        self.lines.push(line);
        self.offset = 0;
    }
}

impl Scrollable for MessageLog {
    fn scroll(&mut self, direction: Direction, amount: usize) {
        let top = self.lines.len().saturating_sub(1);
        self.offset = match direction {
            Direction::Up | Direction::Left => self.offset.saturating_add(amount).min(top),
            Direction::Down | Direction::Right => self.offset.saturating_sub(amount),
            Direction::Start => top,
            Direction::End => 0,
        };
        self.effects
            .push(format!("log scrolled {direction} to offset {}", self.offset));
    }
}

impl MessageView for MessageLog {
    fn open_message_select_window(&mut self, text: &str) {
        self.effects.push(format!("message select window: {text:?}"));
    }
}

/// A selectable, toggleable list shown inside a window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemList {
    items: Vec<String>,
    cursor: usize,
    marked: BTreeSet<usize>,
    effects: Vec<String>,
}

impl ItemList {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn current(&self) -> &str {
        self.items.get(self.cursor).map_or("", String::as_str)
    }
}

impl UiEntity for ItemList {
    fn as_scrollable(&mut self) -> Option<&mut dyn Scrollable> {
        Some(self)
    }

    fn as_selectable(&mut self) -> Option<&mut dyn Selectable> {
        Some(self)
    }

    fn as_toggleable(&mut self) -> Option<&mut dyn Toggleable> {
        Some(self)
    }
}

impl Scrollable for ItemList {
    fn scroll(&mut self, direction: Direction, amount: usize) {
        let last = self.items.len().saturating_sub(1);
        self.cursor = match direction {
            Direction::Up | Direction::Left => self.cursor.saturating_sub(amount),
            Direction::Down | Direction::Right => self.cursor.saturating_add(amount).min(last),
            Direction::Start => 0,
            Direction::End => last,
        };
        self.effects.push(format!("cursor on {:?}", self.current()));
    }
}

impl Selectable for ItemList {
    fn select(&mut self) {
        self.effects.push(format!("selected {:?}", self.current()));
    }
}

impl Toggleable for ItemList {
    fn toggle(&mut self) {
        let state = if self.marked.insert(self.cursor) {
            "marked"
        } else {
            self.marked.remove(&self.cursor);
            "unmarked"
        };
        self.effects.push(format!("{state} {:?}", self.current()));
    }
}

/// A window: a title bar with an optional filter prompt above its list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    kind: WindowKind,
    filter: Option<FilterPrompt>,
    list: ItemList,
}

impl Window {
    pub fn new(kind: WindowKind, items: Vec<String>) -> Self {
        Self {
            kind,
            filter: None,
            list: ItemList::new(items),
        }
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn list(&self) -> &ItemList {
        &self.list
    }

    /// Starts filtering. The next back request clears the filter instead of
    /// closing the window.
    pub fn start_filter(&mut self, text: &str) {
        self.filter = Some(FilterPrompt {
            text: text.to_string(),
        });
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_ref().map(|filter| filter.text.as_str())
    }
}

impl UiEntity for Window {
    fn children_mut(&mut self) -> Vec<&mut dyn UiEntity> {
        let mut children: Vec<&mut dyn UiEntity> = Vec::new();
        if let Some(filter) = self.filter.as_mut() {
            children.push(filter);
        }
        children.push(&mut self.list);
        children
    }

    fn as_back_handler(&mut self) -> Option<&mut dyn BackHandler> {
        Some(self)
    }
}

impl BackHandler for Window {
    fn back(&mut self) -> bool {
        self.filter.take().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FilterPrompt {
    text: String,
}

impl UiEntity for FilterPrompt {}

/// Headless [`ViewManager`] with a window stack, one line input and one
/// message log.
#[derive(Debug, Clone, Default)]
pub struct HeadlessViews {
    input: LineInput,
    log: MessageLog,
    windows: Vec<Window>,
    entries: HashMap<WindowKind, Vec<String>>,
    effects: Vec<String>,
}

impl HeadlessViews {
    /// Items listed when a window of `kind` opens.
    pub fn with_entries(mut self, kind: WindowKind, items: Vec<String>) -> Self {
        self.entries.insert(kind, items);
        self
    }

    pub fn input(&self) -> &LineInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut LineInput {
        &mut self.input
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn top_window_mut(&mut self) -> Option<&mut Window> {
        self.windows.last_mut()
    }

    /// Drains the effects recorded since the last call.
    pub fn take_effects(&mut self) -> Vec<String> {
        let mut effects = std::mem::take(&mut self.effects);
        effects.append(&mut self.log.effects);
        for window in &mut self.windows {
            effects.append(&mut window.list.effects);
        }
        effects
    }

    fn sync_focus(&mut self) {
        self.input.inactive = !self.windows.is_empty();
    }
}

impl ViewManager for HeadlessViews {
    fn current_window(&mut self) -> Option<&mut dyn UiEntity> {
        self.windows
            .last_mut()
            .map(|window| window as &mut dyn UiEntity)
    }

    fn active_input(&mut self) -> Option<&mut dyn TextInput> {
        Some(&mut self.input)
    }

    fn selected_message_view(&mut self) -> Option<&mut dyn MessageView> {
        Some(&mut self.log)
    }

    fn can_open_window(&self) -> bool {
        self.windows.is_empty()
    }

    fn open_window(&mut self, kind: WindowKind) {
        let items = self.entries.get(&kind).cloned().unwrap_or_default();
        self.windows.push(Window::new(kind, items));
        self.sync_focus();
        self.effects.push(format!("opened {kind} window"));
    }

    fn close_current_window(&mut self) {
        if let Some(window) = self.windows.pop() {
            // Effects recorded by the closing window would otherwise be lost.
            let mut list = window.list;
            self.effects.append(&mut list.effects);
            self.effects.push(format!("closed {} window", window.kind));
        }
        self.sync_focus();
    }

    fn send_from_text_buffer(&mut self) {
        let text = self.input.take();
        if text.is_empty() {
            return;
        }
        self.effects.push(format!("sent {text:?}"));
        self.log.push(text);
    }

    fn clear_log(&mut self) {
        self.effects.push("log cleared".to_string());
    }

    fn reload_theme(&mut self) {
        self.effects.push("theme reloaded".to_string());
    }

    fn notify(&mut self, message: &str) {
        self.effects.push(format!("notice: {message}"));
    }
}
