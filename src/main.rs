use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use glimpse::{
    app::{App, Flow},
    config::{Config, ConfigStore, FileConfigStore, MAX_TICK_MS, MIN_TICK_MS},
    exposure::ExposureDuration,
    logging,
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, GameEventSource, Runner, Ticker},
    ui,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};

/// flash-recall tui: a glyph appears for a blink, type what you saw
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A Korean jamo or Latin letter flashes on screen for a fraction of a second. Type the glyph you saw and keep your score going."
)]
pub struct Cli {
    /// seconds each glyph stays visible (0.1 - 1.0, step 0.05)
    #[clap(short = 'd', long)]
    duration: Option<ExposureDuration>,

    /// milliseconds between ui ticks
    #[clap(long, value_parser = clap::value_parser!(u64).range(MIN_TICK_MS..=MAX_TICK_MS))]
    tick_ms: Option<u64>,

    /// write logs to this file (also enabled by setting GLIMPSE_LOG)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// store the effective duration and tick settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Apply command line overrides on top of the stored preferences
    fn resolve(&self, stored: &Config) -> Config {
        Config::new(
            self.duration.unwrap_or_else(|| stored.exposure()),
            self.tick_ms.unwrap_or_else(|| stored.tick_ms()),
        )
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = logging::log_target(cli.log_file.as_deref()) {
        if let Err(err) = logging::init(&path) {
            eprintln!("warning: logging disabled ({}): {err}", path.display());
        }
    }

    let store = FileConfigStore::new();
    let settings = cli.resolve(&store.load());
    if cli.save_config {
        store.save(&settings)?;
        tracing::info!(path = %store.path().display(), "saved config");
    }

    enable_raw_mode()?;
    let restore = RestoreOnDrop::new(restore_terminal);

    execute!(io::stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(settings.exposure());
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(settings.tick_ms())),
    );
    // restore the terminal before surfacing any error from the loop
    let result = run_app(&mut terminal, &mut app, &runner);
    drop(restore);

    tracing::info!(
        score = app.session().score(),
        rounds = app.session().rounds_played(),
        "session ended"
    );

    result
}

/// Runs `restore` when dropped, on early returns and while unwinding alike
struct RestoreOnDrop<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> RestoreOnDrop<F> {
    fn new(restore: F) -> Self {
        Self { restore }
    }
}

impl<F: FnMut()> Drop for RestoreOnDrop<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    if let Err(err) = disable_raw_mode() {
        tracing::warn!("failed to leave raw mode: {err}");
    }
    if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show) {
        tracing::warn!("failed to restore screen: {err}");
    }
}

fn run_app<B: Backend, E: GameEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        match runner.step_until(app.hide_deadline()) {
            GameEvent::Tick => {
                if app.on_tick(Instant::now()) {
                    terminal.draw(|f| ui::draw(app, f))?;
                }
            }
            GameEvent::Resize => {
                terminal.draw(|f| ui::draw(app, f))?;
            }
            GameEvent::Key(key) => {
                if app.on_key(key) == Flow::Quit {
                    break;
                }
                terminal.draw(|f| ui::draw(app, f))?;
            }
            GameEvent::Closed => {
                tracing::error!("terminal input closed, exiting");
                return Err(io::Error::other("terminal input closed").into());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use glimpse::{charset::ScriptedPicker, round::Phase, runtime::TestEventSource};
    use ratatui::backend::TestBackend;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc, Arc,
    };

    fn key(code: KeyCode) -> GameEvent {
        GameEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["glimpse"]);

        assert_eq!(cli.duration, None);
        assert_eq!(cli.tick_ms, None);
        assert_eq!(cli.log_file, None);
        assert!(!cli.save_config);
    }

    #[test]
    fn test_cli_duration() {
        let cli = Cli::parse_from(["glimpse", "-d", "0.5"]);
        assert_eq!(cli.duration.map(|d| d.as_millis()), Some(500));

        let cli = Cli::parse_from(["glimpse", "--duration", "0.15"]);
        assert_eq!(cli.duration.map(|d| d.as_millis()), Some(150));
    }

    #[test]
    fn test_cli_rejects_out_of_range_duration() {
        assert!(Cli::try_parse_from(["glimpse", "-d", "3"]).is_err());
        assert!(Cli::try_parse_from(["glimpse", "-d", "0"]).is_err());
        assert!(Cli::try_parse_from(["glimpse", "-d", "soon"]).is_err());
    }

    #[test]
    fn test_cli_tick_ms_range() {
        let cli = Cli::parse_from(["glimpse", "--tick-ms", "40"]);
        assert_eq!(cli.tick_ms, Some(40));
        assert!(Cli::try_parse_from(["glimpse", "--tick-ms", "1"]).is_err());
        assert!(Cli::try_parse_from(["glimpse", "--tick-ms", "1000"]).is_err());
    }

    #[test]
    fn test_cli_resolve_prefers_flags() {
        let stored = Config::new(ExposureDuration::try_from_secs(0.8).unwrap(), 50);

        let cli = Cli::parse_from(["glimpse"]);
        assert_eq!(cli.resolve(&stored), stored);

        let cli = Cli::parse_from(["glimpse", "-d", "0.3", "--tick-ms", "10"]);
        let resolved = cli.resolve(&stored);
        assert_eq!(resolved.exposure().as_millis(), 300);
        assert_eq!(resolved.tick_ms(), 10);
    }

    #[test]
    fn test_cli_log_file_and_save() {
        let cli = Cli::parse_from(["glimpse", "--log-file", "/tmp/g.log", "--save-config"]);
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/g.log")));
        assert!(cli.save_config);
    }

    #[test]
    fn test_run_app_quits_on_esc() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut app = App::new(ExposureDuration::default());
        let (tx, rx) = mpsc::channel();
        tx.send(key(KeyCode::Esc)).unwrap();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(5)),
        );

        run_app(&mut terminal, &mut app, &runner).unwrap();
        assert_eq!(app.phase(), Phase::Idle);
    }

    #[test]
    fn test_run_app_plays_a_round() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut app = App::with_picker(
            ExposureDuration::try_from_secs(0.1).unwrap(),
            Box::new(ScriptedPicker::new(['ㄱ'])),
        );
        let (tx, rx) = mpsc::channel();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(5)),
        );

        // the loop runs on this thread, so feed keys from another one once the
        // glyph has had time to disappear
        let feeder = std::thread::spawn(move || {
            tx.send(key(KeyCode::Enter)).unwrap();
            std::thread::sleep(Duration::from_millis(400));
            tx.send(key(KeyCode::Char('ㄱ'))).unwrap();
            tx.send(key(KeyCode::Enter)).unwrap();
            tx.send(key(KeyCode::Esc)).unwrap();
        });

        run_app(&mut terminal, &mut app, &runner).unwrap();
        feeder.join().unwrap();

        assert_eq!(app.phase(), Phase::Resolved);
        assert_eq!(app.session().score(), 1);
        assert_eq!(app.session().last_message(), "correct");
    }

    #[test]
    fn test_run_app_stops_when_input_closes() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut app = App::new(ExposureDuration::default());
        let (tx, rx) = mpsc::channel();
        tx.send(key(KeyCode::Enter)).unwrap();
        drop(tx);
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(25)),
        );

        let err = run_app(&mut terminal, &mut app, &runner).unwrap_err();
        assert!(err.to_string().contains("input closed"));
        assert_eq!(app.phase(), Phase::Displaying);
    }

    #[test]
    fn test_restore_runs_on_early_return() {
        let calls = Arc::new(AtomicUsize::new(0));

        let setup = |fail: bool| -> Result<(), Box<dyn Error>> {
            let counter = Arc::clone(&calls);
            let _restore = RestoreOnDrop::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            if fail {
                return Err(io::Error::other("alternate screen unavailable").into());
            }
            Ok(())
        };

        assert!(setup(true).is_err());
        assert!(setup(false).is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_restore_runs_on_panic() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let result = std::panic::catch_unwind(move || {
            let _restore = RestoreOnDrop::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            panic!("draw failed");
        });

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
