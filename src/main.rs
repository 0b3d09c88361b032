mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::{info, warn};
use neon_speed::{
    app_dirs::AppDirs,
    celebration::CelebrationAnimation,
    clock::{Clock, MonotonicClock, Timestamp},
    config::{Config, ConfigStore, FileConfigStore},
    delay::UniformDelay,
    game::ReactionGame,
    input::{action_for, Action},
    logging,
    runtime::{CrosstermEventSource, EventSource, FixedTicker, GameEvent, Runner},
};
use rand::rngs::StdRng;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use webbrowser::Browser;

const SIGNUP_URL: &str = "https://neon.tech/signup?ref=neon-speed-game";

/// can you react faster than a Postgres database gets provisioned?
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A reaction game for the terminal. Wait for the square to turn green, then hit space (or click) as fast as you can and see how you compare with the ~500 ms it takes to provision a Postgres database on Neon."
)]
pub struct Cli {
    /// seed for the random wait, for reproducible sessions
    #[clap(long)]
    seed: Option<u64>,

    /// don't show the celebration on a win
    #[clap(long)]
    no_celebration: bool,

    /// animation tick interval in milliseconds
    #[clap(short = 't', long)]
    tick_rate: Option<u64>,

    /// keyboard only: don't capture the mouse
    #[clap(long)]
    no_mouse: bool,

    /// config file to use instead of the default location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line flags take precedence over the stored config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(tick_rate) = self.tick_rate {
            config.tick_rate_ms = tick_rate;
        }
        if self.no_celebration {
            config.celebration = false;
        }
        if self.no_mouse {
            config.mouse = false;
        }
        config
    }

    fn config_store(&self) -> FileConfigStore {
        self.config
            .as_ref()
            .map(FileConfigStore::with_path)
            .unwrap_or_default()
    }
}

pub type Game = ReactionGame<UniformDelay<StdRng>, CelebrationAnimation>;

#[derive(Debug)]
pub struct App {
    pub game: Game,
    pub config: Config,
}

impl App {
    pub fn new(cli: &Cli, config: Config) -> Self {
        let delays = match cli.seed {
            Some(seed) => UniformDelay::seeded(seed),
            None => UniformDelay::from_entropy(),
        };
        let overlay = if config.celebration {
            CelebrationAnimation::new()
        } else {
            CelebrationAnimation::disabled()
        };

        Self {
            game: ReactionGame::new(delays, overlay),
            config,
        }
    }

    /// Returns false once the app should exit
    pub fn handle_action(&mut self, action: Action, at: Timestamp) -> bool {
        match action {
            Action::Start => {
                self.game.start(at);
            }
            Action::Click => {
                self.game.click(at);
            }
            Action::Reset => {
                self.game.reset();
            }
            Action::OpenSignup => {
                if Browser::is_available() {
                    webbrowser::open(SIGNUP_URL).unwrap_or_default();
                }
            }
            Action::Quit => return false,
        }
        true
    }

    /// Returns false once the app should exit
    pub fn on_event(&mut self, event: &GameEvent) -> bool {
        match event {
            GameEvent::Tick => true,
            GameEvent::Resize(width, height) => {
                self.game.overlay_mut().resize(*width, *height);
                true
            }
            GameEvent::Key(..) | GameEvent::Mouse(..) => {
                match (action_for(event, self.game.state()), event.stamp()) {
                    (Some(action), Some(at)) => self.handle_action(action, at),
                    _ => true,
                }
            }
        }
    }

    /// Fire the ready timer when due and advance the celebration
    pub fn on_tick(&mut self, now: Timestamp) {
        self.game.poll(now);
        self.game.overlay_mut().update(now);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_path() {
        // no log file, no logging; the game works the same
        let _ = logging::init_file_logger(&path);
    }

    let store = cli.config_store();
    let config = match store.load() {
        Ok(config) => config,
        Err(err) => {
            warn!("{}, using defaults", err);
            Config::default()
        }
    };
    let config = cli.apply(config);
    if cli.save_config {
        match store.save(&config) {
            Ok(()) => info!("saved config to {}", store.path().display()),
            Err(err) => warn!("{}", err),
        }
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if config.mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let clock = MonotonicClock::new();
    let runner = Runner::new(
        CrosstermEventSource::new(clock),
        FixedTicker::new(Duration::from_millis(config.tick_rate_ms.max(1))),
    );
    let mut app = App::new(&cli, config.clone());
    let result = start_tui(&mut terminal, &mut app, &runner, &clock);

    disable_raw_mode()?;
    if config.mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: EventSource, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, FixedTicker>,
    clock: &C,
) -> Result<(), Box<dyn Error>> {
    let size = terminal.size()?;
    app.game.overlay_mut().resize(size.width, size.height);
    info!("started in a {}x{} terminal", size.width, size.height);

    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        let remaining = app
            .game
            .next_deadline()
            .map(|due| due.saturating_duration_since(clock.now()));
        let event = runner.step_until(remaining);

        if !app.on_event(&event) {
            break;
        }
        app.on_tick(clock.now());
    }

    app.game.teardown();
    Ok(())
}
