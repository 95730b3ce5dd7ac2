//! Interactive key probe: resolves live terminal input through the keymap and
//! prints what each key press does.

use std::io;
use std::io::Write;
use std::time::Instant;

use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::event::EventStream;
use crossterm::execute;
use crossterm::terminal;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::app::App;
use crate::app::route_key;
use crate::commands::CommandContext;
use crate::headless::HeadlessViews;
use crate::input::key_press_from_event;
use crate::keymap::ChordKey;
use crate::keymap::KeyPress;
use crate::keymap::KeyResolution;
use crate::keymap::SpecialKey;
use crate::ui::TextInput;

pub async fn run(app: &App) -> color_eyre::Result<()> {
    let shutdown = CancellationToken::new();
    let worker = tokio::spawn(teardown(shutdown.clone(), restore_terminal));

    let result = match enter_terminal() {
        Ok(()) => event_loop(app, &shutdown).await,
        Err(err) => Err(err.into()),
    };

    // Every exit path, errors included, hands the terminal back through the
    // worker.
    shutdown.cancel();
    worker.await??;
    result
}

fn enter_terminal() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    execute!(io::stdout(), EnableMouseCapture)
}

fn restore_terminal() -> io::Result<()> {
    execute!(io::stdout(), DisableMouseCapture)?;
    terminal::disable_raw_mode()
}

/// Waits for shutdown, then runs `restore` off the event loop.
async fn teardown<F>(shutdown: CancellationToken, restore: F) -> io::Result<()>
where
    F: FnOnce() -> io::Result<()>,
{
    shutdown.cancelled().await;
    info!("shutdown requested, restoring terminal");
    restore()
}

async fn event_loop(app: &App, shutdown: &CancellationToken) -> color_eyre::Result<()> {
    let dispatcher = app.dispatcher();
    let mut session = app.session();
    let mut views = app.headless_views();
    let mut events = EventStream::new();

    print_line("chatterm probe: press keys, `quit` leaves (Ctrl+C if unbound)")?;

    loop {
        let deadline = session.deadline();
        tokio::select! {
            () = shutdown.cancelled() => break,
            () = sleep_until(deadline) => {
                if session.expire(Instant::now()) {
                    print_line("chord timed out")?;
                }
            }
            maybe_event = events.next() => {
                let Some(event) = maybe_event else {
                    break;
                };
                let Some(press) = key_press_from_event(&event?) else {
                    continue;
                };
                let resolution = route_key(
                    &mut session,
                    &dispatcher,
                    &mut CommandContext::new(&mut views, shutdown),
                    press,
                    Instant::now(),
                );
                match &resolution {
                    KeyResolution::Fire(fired) => print_line(&format!("{press} -> {}", fired.command))?,
                    KeyResolution::Pending => {
                        let pending: Vec<String> =
                            session.pending().iter().map(ToString::to_string).collect();
                        print_line(&format!("{} ...", pending.join("-")))?;
                    }
                    KeyResolution::Unmatched => {
                        if press == KeyPress::special(SpecialKey::CtrlC) {
                            shutdown.cancel();
                        }
                        if insert_text(&mut views, press) {
                            print_line(&format!("input: {:?}", views.input().text()))?;
                        } else {
                            print_line(&format!("{press} unbound"))?;
                        }
                    }
                }
                for effect in views.take_effects() {
                    print_line(&format!("  {effect}"))?;
                }
            }
        }
    }

    Ok(())
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending().await,
    }
}

/// Types unmatched printable keys into the line input.
fn insert_text(views: &mut HeadlessViews, press: KeyPress) -> bool {
    if press.alt || !views.input().is_active() {
        return false;
    }
    let ch = match press.key {
        ChordKey::Char(ch) => ch,
        ChordKey::Special(SpecialKey::Space) => ' ',
        ChordKey::Special(_) => return false,
    };
    views.input_mut().insert(ch);
    true
}

fn print_line(line: &str) -> io::Result<()> {
    let mut out = io::stdout();
    write!(out, "{line}\r\n")?;
    out.flush()
}
