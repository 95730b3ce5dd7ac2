//! The command catalog and the context handlers run in.

mod args;
mod catalog;
mod invocation;

use std::collections::HashSet;

use chatterm_core::Argument;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::ui::ViewManager;

pub use args::ArgumentDef;
pub use args::BindError;
pub use args::BoundArguments;
pub use args::bind_arguments;
pub use catalog::BUILTIN_COMMANDS;
pub use invocation::Invocation;
pub use invocation::InvocationError;
pub use invocation::parse_invocation;

/// Category that keeps a command out of the palette.
pub const HIDDEN: &str = "Hidden";

/// Everything a handler may touch while it runs.
///
/// `views` exposes the focused text input directly and the window tree for
/// capability traversal. `shutdown` is cancelled to quit.
pub struct CommandContext<'a> {
    pub views: &'a mut dyn ViewManager,
    pub shutdown: &'a CancellationToken,
}

impl<'a> CommandContext<'a> {
    pub fn new(views: &'a mut dyn ViewManager, shutdown: &'a CancellationToken) -> Self {
        Self { views, shutdown }
    }

    /// Logs `message` and shows it to the user.
    pub fn notice(&mut self, message: &str) {
        warn!("{message}");
        self.views.notify(message);
    }
}

pub type CommandHandler = fn(&mut CommandContext<'_>, &BoundArguments);

#[derive(Debug, Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static [&'static str],
    pub args: &'static [ArgumentDef],
    pub handler: CommandHandler,
}

impl Command {
    pub fn is_hidden(&self) -> bool {
        self.category.contains(&HIDDEN)
    }

    pub fn bind(&self, supplied: &[Argument]) -> Result<BoundArguments, BindError> {
        bind_arguments(self.name, self.args, supplied)
    }
}

/// Immutable, ordered command catalog.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

#[derive(Debug, Default)]
pub struct CommandRegistryBuilder {
    commands: Vec<Command>,
    seen: HashSet<&'static str>,
}

impl CommandRegistryBuilder {
    /// Appends `command`. A repeated name is logged and ignored so lookups
    /// stay first-match.
    pub fn register(mut self, command: Command) -> Self {
        if !self.seen.insert(command.name) {
            warn!(command = command.name, "duplicate command name ignored");
            return self;
        }
        self.commands.push(command);
        self
    }

    pub fn extend(self, commands: impl IntoIterator<Item = Command>) -> Self {
        commands.into_iter().fold(self, Self::register)
    }

    pub fn build(self) -> CommandRegistry {
        CommandRegistry {
            commands: self.commands,
        }
    }
}

impl CommandRegistry {
    pub fn builder() -> CommandRegistryBuilder {
        CommandRegistryBuilder::default()
    }

    pub fn builtin() -> Self {
        Self::builder()
            .extend(BUILTIN_COMMANDS.iter().copied())
            .build()
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|command| command.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// Commands shown in the command palette.
    pub fn palette(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(|command| !command.is_hidden())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
