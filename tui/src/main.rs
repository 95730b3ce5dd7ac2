use std::path::PathBuf;

use chatterm_core::Config;
use chatterm_core::config::find_chatterm_home;
use chatterm_tui::App;
use chatterm_tui::logging::init_logging;
use chatterm_tui::probe;
use clap::Parser;
use clap::Subcommand;
use color_eyre::eyre::eyre;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "chatterm", version, about = "Keyboard-driven terminal chat client")]
struct Cli {
    /// Configuration directory. Defaults to $CHATTERM_HOME, then the platform
    /// config directory.
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Directory for log files. Defaults to `<config dir>/log`.
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Validate the configuration, then list commands and keybindings.
    Check,
    /// Run one command line, e.g. `chatterm run "scroll direction=up amount=3"`.
    Run { line: String },
    /// Resolve live key presses until `quit` fires. The default.
    Probe,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let home = match cli.config_dir {
        Some(dir) => dir,
        None => find_chatterm_home()
            .ok_or_else(|| eyre!("cannot locate a config directory, set CHATTERM_HOME"))?,
    };
    let log_dir = cli.log_dir.unwrap_or_else(|| home.join("log"));
    let _guard = init_logging(&log_dir)?;

    let config = Config::load(&home)?;
    let app = App::from_config(&config)?;
    info!(
        home = %home.display(),
        bindings = app.keymap().bindings().len(),
        "configuration loaded"
    );

    match cli.mode.unwrap_or(Mode::Probe) {
        Mode::Check => {
            println!("commands:");
            for line in app.palette_lines() {
                println!("  {line}");
            }
            println!("keybindings:");
            for line in app.binding_lines() {
                println!("  {line}");
            }
        }
        Mode::Run { line } => {
            for effect in app.run_line(&line)? {
                println!("{effect}");
            }
        }
        Mode::Probe => probe::run(&app).await?,
    }
    Ok(())
}
