use std::str::FromStr;

use chatterm_core::Datatype;
use tracing::debug;

use super::ArgumentDef;
use super::BoundArguments;
use super::Command;
use super::CommandContext;
use super::HIDDEN;
use crate::ui::Direction;
use crate::ui::Dispatch;
use crate::ui::WindowKind;
use crate::ui::back_first;
use crate::ui::scroll_first;
use crate::ui::select_first;
use crate::ui::toggle_first;

const MISC: &str = "Misc";
const WINDOWS: &str = "Windows";
const APP: &str = "App";

const CURSOR_ARGS: &[ArgumentDef] = &[
    ArgumentDef::required("direction", Datatype::String),
    ArgumentDef::required("amount", Datatype::Int),
    ArgumentDef::optional("words", Datatype::Bool),
];

const SCROLL_ARGS: &[ArgumentDef] = &[
    ArgumentDef::required("direction", Datatype::String),
    ArgumentDef::required("amount", Datatype::Int),
];

const MESSAGE_WINDOW_ARGS: &[ArgumentDef] = &[ArgumentDef::optional("message", Datatype::String)];

pub static BUILTIN_COMMANDS: &[Command] = &[
    Command {
        name: "commands",
        description: "Open the command window",
        category: &[HIDDEN],
        args: &[],
        handler: open_commands,
    },
    Command {
        name: "move_cursor",
        description: "Move the cursor in the text input",
        category: &[MISC],
        args: CURSOR_ARGS,
        handler: move_cursor,
    },
    Command {
        name: "erase",
        description: "Erase text in the text input",
        category: &[MISC],
        args: CURSOR_ARGS,
        handler: erase,
    },
    Command {
        name: "servers",
        description: "Open the server list",
        category: &[WINDOWS],
        args: &[],
        handler: open_servers,
    },
    Command {
        name: "channels",
        description: "Open the channel list",
        category: &[WINDOWS],
        args: &[],
        handler: open_channels,
    },
    Command {
        name: "help",
        description: "Show the help window",
        category: &[WINDOWS],
        args: &[],
        handler: open_help,
    },
    Command {
        name: "message_window",
        description: "Open the message selection window",
        category: &[WINDOWS],
        args: MESSAGE_WINDOW_ARGS,
        handler: message_window,
    },
    Command {
        name: "scroll",
        description: "Scroll the focused list or the message log",
        category: &[MISC],
        args: SCROLL_ARGS,
        handler: scroll,
    },
    Command {
        name: "select",
        description: "Select the highlighted item, or send the message",
        category: &[MISC],
        args: &[],
        handler: select,
    },
    Command {
        name: "toggle",
        description: "Toggle the highlighted item",
        category: &[MISC],
        args: &[],
        handler: toggle,
    },
    Command {
        name: "back",
        description: "Go back, closing the current window",
        category: &[WINDOWS],
        args: &[],
        handler: back,
    },
    Command {
        name: "clear_log",
        description: "Clear the log window",
        category: &[APP],
        args: &[],
        handler: clear_log,
    },
    Command {
        name: "reload_theme",
        description: "Reload the theme from disk",
        category: &[APP],
        args: &[],
        handler: reload_theme,
    },
    Command {
        name: "quit",
        description: "Quit chatterm",
        category: &[APP],
        args: &[],
        handler: quit,
    },
];

fn direction_arg(ctx: &mut CommandContext<'_>, args: &BoundArguments) -> Option<Direction> {
    let raw = args.string("direction")?;
    match Direction::from_str(raw) {
        Ok(direction) => Some(direction),
        Err(_) => {
            ctx.notice(&format!("unknown direction '{raw}'"));
            None
        }
    }
}

/// Negative amounts count as zero.
fn amount_arg(args: &BoundArguments) -> usize {
    args.int("amount")
        .and_then(|amount| usize::try_from(amount).ok())
        .unwrap_or(0)
}

fn open_window_if_allowed(ctx: &mut CommandContext<'_>, kind: WindowKind) {
    if ctx.views.can_open_window() {
        ctx.views.open_window(kind);
    } else {
        debug!(%kind, "window blocked");
    }
}

fn open_commands(ctx: &mut CommandContext<'_>, _args: &BoundArguments) {
    ctx.views.open_window(WindowKind::Commands);
}

fn open_servers(ctx: &mut CommandContext<'_>, _args: &BoundArguments) {
    open_window_if_allowed(ctx, WindowKind::Servers);
}

fn open_channels(ctx: &mut CommandContext<'_>, _args: &BoundArguments) {
    open_window_if_allowed(ctx, WindowKind::Channels);
}

fn open_help(ctx: &mut CommandContext<'_>, _args: &BoundArguments) {
    open_window_if_allowed(ctx, WindowKind::Help);
}

fn move_cursor(ctx: &mut CommandContext<'_>, args: &BoundArguments) {
    let Some(direction) = direction_arg(ctx, args) else {
        return;
    };
    let amount = amount_arg(args);
    let words = args.bool("words").unwrap_or(false);
    match ctx.views.active_input() {
        Some(input) if input.is_active() => input.move_cursor(direction, amount, words),
        _ => debug!("move_cursor without an active input"),
    }
}

fn erase(ctx: &mut CommandContext<'_>, args: &BoundArguments) {
    let Some(direction) = direction_arg(ctx, args) else {
        return;
    };
    let amount = amount_arg(args);
    let words = args.bool("words").unwrap_or(false);
    match ctx.views.active_input() {
        Some(input) if input.is_active() => input.erase(direction, amount, words),
        _ => debug!("erase without an active input"),
    }
}

fn message_window(ctx: &mut CommandContext<'_>, args: &BoundArguments) {
    let text = args.string("message").unwrap_or_default();
    match ctx.views.selected_message_view() {
        Some(view) => view.open_message_select_window(text),
        None => debug!("message_window without a message view"),
    }
}

fn scroll(ctx: &mut CommandContext<'_>, args: &BoundArguments) {
    let Some(direction) = direction_arg(ctx, args) else {
        return;
    };
    let amount = amount_arg(args);
    if let Some(window) = ctx.views.current_window() {
        if scroll_first(window, direction, amount) == Dispatch::Unhandled {
            debug!("nothing scrollable in the current window");
        }
        return;
    }
    if let Some(view) = ctx.views.selected_message_view() {
        view.scroll(direction, amount);
    }
}

fn select(ctx: &mut CommandContext<'_>, _args: &BoundArguments) {
    match ctx.views.current_window() {
        Some(window) => {
            if select_first(window) == Dispatch::Unhandled {
                debug!("nothing selectable in the current window");
            }
        }
        None => ctx.views.send_from_text_buffer(),
    }
}

fn toggle(ctx: &mut CommandContext<'_>, _args: &BoundArguments) {
    if let Some(window) = ctx.views.current_window()
        && toggle_first(window) == Dispatch::Unhandled
    {
        debug!("nothing toggleable in the current window");
    }
}

fn back(ctx: &mut CommandContext<'_>, _args: &BoundArguments) {
    let Some(window) = ctx.views.current_window() else {
        return;
    };
    if back_first(window) != Dispatch::Handled {
        ctx.views.close_current_window();
    }
}

fn clear_log(ctx: &mut CommandContext<'_>, _args: &BoundArguments) {
    ctx.views.clear_log();
}

fn reload_theme(ctx: &mut CommandContext<'_>, _args: &BoundArguments) {
    ctx.views.reload_theme();
}

fn quit(ctx: &mut CommandContext<'_>, _args: &BoundArguments) {
    ctx.shutdown.cancel();
}
