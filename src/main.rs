use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    cursor::Show,
    event::KeyEventKind,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use pomo::{
    app::{App, KeyAction},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    quotes::QuoteBook,
    runtime::{event_channel, CrosstermEventSource, FixedTicker, PomoEvent, Runner, Step},
    scheduler::TickScheduler,
    timer::{TickOutcome, TimerController},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
    time::Duration,
};
use tracing::{debug, info, warn};

const POLL_RATE_MS: u64 = 250;

/// a focused pomodoro timer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A pomodoro timer for the terminal: start, pause and reset a countdown, edit the remaining time by hand, and keep count of completed sessions."
)]
pub struct Cli {
    /// length of a session in minutes (defaults to the saved config, or 25)
    #[clap(short = 'm', long, value_parser = clap::value_parser!(u32).range(1..))]
    minutes: Option<u32>,

    /// what you are working on
    #[clap(short = 't', long)]
    task: Option<String>,

    /// hide the motivational quote
    #[clap(long)]
    no_quote: bool,

    /// store the effective session length and quote setting as the new defaults
    #[clap(long)]
    save_config: bool,

    /// write logs here instead of the default state directory
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Overlay command line flags on the stored preferences
    fn apply(&self, stored: Config) -> Config {
        Config {
            session_minutes: self.minutes.unwrap_or(stored.session_minutes),
            show_quote: stored.show_quote && !self.no_quote,
        }
    }

    fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(AppDirs::log_path)
    }
}

fn build_app(cli: &Cli, config: &Config) -> App {
    let mut timer = TimerController::new(config.session_secs());
    if let Some(task) = &cli.task {
        timer.set_task_label(task.as_str());
    }

    let quote = if config.show_quote {
        match QuoteBook::bundled() {
            Ok(book) => book.pick_random().cloned(),
            Err(err) => {
                warn!(%err, "could not load quotes");
                None
            }
        }
    } else {
        None
    };

    App::new(timer, quote)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // logging is best effort; the timer works without it
    if let Some(path) = cli.log_path() {
        if let Err(err) = logging::init(&path) {
            eprintln!("pomo: logging disabled, cannot open {}: {err}", path.display());
        }
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "saved config");
    }
    info!(
        session_minutes = config.session_minutes,
        show_quote = config.show_quote,
        "starting pomo"
    );

    let mut app = build_app(&cli, &config);

    let guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    drop(guard);

    info!(
        sessions = app.timer.sessions_completed(),
        "exiting pomo"
    );
    result
}

/// Raw mode plus the alternate screen. Dropping it puts the terminal back,
/// whichever way `main` exits.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }

    fn restore<W: Write>(out: &mut W) -> io::Result<()> {
        execute!(out, LeaveAlternateScreen, Show)?;
        disable_raw_mode()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = Self::restore(&mut io::stdout()) {
            warn!(%err, "failed to restore terminal");
        }
    }
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let (tx, rx) = event_channel();
    // the scheduler is dropped on every return path, which cancels its ticker
    let mut scheduler = TickScheduler::new(FixedTicker::seconds(), tx.clone());
    let runner = Runner::new(
        CrosstermEventSource::new(tx, rx),
        FixedTicker::new(Duration::from_millis(POLL_RATE_MS)),
    );

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            Step::Event(PomoEvent::Tick(id)) => {
                if !scheduler.accepts(id) {
                    debug!(?id, "dropped stale tick");
                    continue;
                }
                if let TickOutcome::SessionCompleted { sessions } = app.on_tick() {
                    debug!(sessions, "session rolled over");
                }
            }
            Step::Event(PomoEvent::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.on_key(key) == KeyAction::Quit {
                    break;
                }
            }
            Step::Event(PomoEvent::Resize) => {}
            Step::Idle => continue,
            Step::Closed => break,
        }

        scheduler.sync(app.timer.wants_ticks());
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
