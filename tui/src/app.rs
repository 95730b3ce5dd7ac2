//! Wiring shared by the binary's subcommands: configuration in, registry,
//! keymap and session out.

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use chatterm_core::Config;
use tokio_util::sync::CancellationToken;

use crate::commands::CommandContext;
use crate::commands::CommandRegistry;
use crate::commands::parse_invocation;
use crate::dispatch::CommandDispatcher;
use crate::headless::HeadlessViews;
use crate::keymap::KeyPress;
use crate::keymap::KeyResolution;
use crate::keymap::KeySession;
use crate::keymap::Keymap;
use crate::keymap::KeymapError;
use crate::ui::WindowKind;

#[derive(Debug, Clone)]
pub struct App {
    registry: CommandRegistry,
    keymap: Arc<Keymap>,
    chord_timeout: Duration,
}

impl App {
    pub fn from_config(config: &Config) -> Result<Self, KeymapError> {
        let registry = CommandRegistry::builtin();
        let keymap = Keymap::from_config(config, &registry)?;
        Ok(Self {
            registry,
            keymap: Arc::new(keymap),
            chord_timeout: config.chord_timeout,
        })
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn dispatcher(&self) -> CommandDispatcher<'_> {
        CommandDispatcher::new(&self.registry)
    }

    pub fn session(&self) -> KeySession {
        KeySession::new(Arc::clone(&self.keymap), self.chord_timeout)
    }

    /// Palette entries with the chords bound to each.
    pub fn palette_lines(&self) -> Vec<String> {
        self.registry
            .palette()
            .map(|command| {
                let chords: Vec<String> = self
                    .keymap
                    .bindings_for(command.name)
                    .map(|binding| binding.chord.to_string())
                    .collect();
                let keys = if chords.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", chords.join(", "))
                };
                format!(
                    "{:<16}{:<10}{}{keys}",
                    command.name,
                    command.category.join(","),
                    command.description
                )
            })
            .collect()
    }

    /// Every binding as `chord -> command args`.
    pub fn binding_lines(&self) -> Vec<String> {
        self.keymap
            .bindings()
            .iter()
            .map(|binding| {
                let args: Vec<String> = binding
                    .args
                    .iter()
                    .map(|arg| format!("{}={}", arg.name, arg.value))
                    .collect();
                let chord = binding.chord.to_string();
                format!("{chord:<18} -> {} {}", binding.command, args.join(" "))
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    /// A headless view manager whose command window lists the palette and
    /// whose help window lists the bindings.
    pub fn headless_views(&self) -> HeadlessViews {
        let commands = self
            .registry
            .palette()
            .map(|command| command.name.to_string())
            .collect();
        HeadlessViews::default()
            .with_entries(WindowKind::Commands, commands)
            .with_entries(WindowKind::Help, self.binding_lines())
    }

    /// Runs one free-form command line against fresh headless views and
    /// returns the recorded effects.
    pub fn run_line(&self, line: &str) -> color_eyre::Result<Vec<String>> {
        let invocation = parse_invocation(line)?;
        let mut views = self.headless_views();
        let shutdown = CancellationToken::new();
        self.dispatcher().run(
            &mut CommandContext::new(&mut views, &shutdown),
            &invocation.name,
            &invocation.args,
        )?;
        let mut effects = views.take_effects();
        if shutdown.is_cancelled() {
            effects.push("shutdown requested".to_string());
        }
        Ok(effects)
    }
}

/// Feeds one key press into `session` and runs the command it resolves to.
pub fn route_key(
    session: &mut KeySession,
    dispatcher: &CommandDispatcher<'_>,
    ctx: &mut CommandContext<'_>,
    press: KeyPress,
    now: Instant,
) -> KeyResolution {
    let resolution = session.feed(press, now);
    if let KeyResolution::Fire(fired) = &resolution {
        dispatcher.run_or_notify(ctx, &fired.command, &fired.args);
    }
    resolution
}
