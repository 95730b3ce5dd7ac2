use strum_macros::Display;

use super::Direction;
use super::Scrollable;
use super::UiEntity;

/// The focused line editor.
pub trait TextInput {
    fn is_active(&self) -> bool;
    fn move_cursor(&mut self, direction: Direction, amount: usize, words: bool);
    fn erase(&mut self, direction: Direction, amount: usize, words: bool);
}

/// The message log the user is reading.
pub trait MessageView: Scrollable {
    fn open_message_select_window(&mut self, text: &str);
}

/// Windows the command catalog can ask the view manager to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum WindowKind {
    Commands,
    Servers,
    Channels,
    Help,
}

/// The surface commands act on. Window construction and layout stay on the
/// implementor's side.
pub trait ViewManager {
    /// The topmost open window, if any.
    fn current_window(&mut self) -> Option<&mut dyn UiEntity>;

    fn active_input(&mut self) -> Option<&mut dyn TextInput>;

    fn selected_message_view(&mut self) -> Option<&mut dyn MessageView>;

    /// False while a modal window blocks opening another one.
    fn can_open_window(&self) -> bool;

    fn open_window(&mut self, kind: WindowKind);

    fn close_current_window(&mut self);

    /// Sends whatever is composed in the text input.
    fn send_from_text_buffer(&mut self);

    fn clear_log(&mut self);

    fn reload_theme(&mut self);

    /// Shows a non-fatal notice to the user.
    fn notify(&mut self, message: &str);
}
