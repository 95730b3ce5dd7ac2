//! Input routing and command dispatch for the chatterm terminal client.
//!
//! Key presses are normalised by [`input`], buffered and matched against the
//! [`keymap`], and resolved commands are run by [`dispatch`] against a
//! [`ui::ViewManager`].

pub mod app;
pub mod commands;
pub mod dispatch;
pub mod headless;
pub mod input;
pub mod keymap;
pub mod logging;
pub mod probe;
pub mod ui;

pub use app::App;
pub use app::route_key;
pub use commands::CommandContext;
pub use commands::CommandRegistry;
pub use dispatch::CommandDispatcher;
pub use dispatch::CommandError;
pub use keymap::KeySession;
pub use keymap::Keymap;
