//! Resolves a command by name, binds its arguments and runs its handler.

use chatterm_core::Argument;
use thiserror::Error;
use tracing::info;

use crate::commands::BindError;
use crate::commands::Command;
use crate::commands::CommandContext;
use crate::commands::CommandRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error(transparent)]
    Bind(#[from] BindError),
}

#[derive(Debug, Clone, Copy)]
pub struct CommandDispatcher<'r> {
    registry: &'r CommandRegistry,
}

impl<'r> CommandDispatcher<'r> {
    pub fn new(registry: &'r CommandRegistry) -> Self {
        Self { registry }
    }

    pub fn resolve(&self, name: &str) -> Result<&'r Command, CommandError> {
        self.registry
            .get(name)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))
    }

    pub fn run(
        &self,
        ctx: &mut CommandContext<'_>,
        name: &str,
        args: &[Argument],
    ) -> Result<(), CommandError> {
        let command = self.resolve(name)?;
        let bound = command.bind(args)?;
        info!(command = command.name, args = bound.len(), "running command");
        (command.handler)(ctx, &bound);
        Ok(())
    }

    /// Like [`CommandDispatcher::run`], but a failure becomes a user notice.
    /// Returns whether the handler ran.
    pub fn run_or_notify(&self, ctx: &mut CommandContext<'_>, name: &str, args: &[Argument]) -> bool {
        match self.run(ctx, name, args) {
            Ok(()) => true,
            Err(err) => {
                ctx.notice(&err.to_string());
                false
            }
        }
    }
}
