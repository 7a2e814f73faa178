use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use neontype::{
    app::{App, AppOptions, TICK_RATE_MS},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging::init_file_logging,
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, GameEventSource, Runner, Ticker},
    session::{Difficulty, Theme},
    store::SessionStore,
    texts::TextCorpus,
    typing_policy::ErrorPolicy,
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
    time::Duration,
};
use tracing::{info, warn};

/// neon-lit typing races in your terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Race through passages of varying difficulty with live WPM and accuracy, a results chart, and an optional room of simulated rivals."
)]
pub struct Cli {
    /// text tier to draw passages from
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// color theme
    #[clap(short = 't', long, value_enum)]
    theme: Option<Theme>,

    /// custom passage to type instead of the built-in texts
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// join a room and race simulated rivals
    #[clap(long)]
    room: Option<String>,

    /// display name on the leaderboard
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// number of simulated rivals in a room
    #[clap(short = 'r', long)]
    rivals: Option<usize>,

    /// count a wrong key and move on instead of waiting for the right one
    #[clap(long)]
    advance_on_error: bool,

    /// path to the preferences file
    #[clap(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Command-line flags win over saved preferences
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(name) = self.name.as_ref().filter(|n| !n.trim().is_empty()) {
            config.player_name = name.trim().to_string();
        }
        if let Some(rivals) = self.rivals {
            config.rivals = rivals;
        }
        if self.advance_on_error {
            config.error_policy = ErrorPolicy::AdvanceAlways;
        }
        config
    }

    fn options(&self) -> AppOptions {
        AppOptions {
            prompt: self.prompt.clone(),
            room: self.room.clone(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = match init_file_logging(&AppDirs::log_dir()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("logging disabled: {e}");
            None
        }
    };

    let config_store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let config = cli.apply_to(config_store.load());
    let corpus = TextCorpus::embedded()?;
    let store = SessionStore::new().with_policy(config.error_policy);

    info!(
        difficulty = %config.difficulty,
        theme = %config.theme,
        policy = %config.error_policy,
        room = ?cli.room,
        "starting"
    );

    let mut app = App::new(store, corpus, config, cli.options())
        .with_config_store(Box::new(config_store));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        warn!(error = %e, "tui loop ended with error");
    }
    result
}

fn start_tui<B: Backend, E: GameEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui::draw(app, f))?;

    while !app.should_quit() {
        match runner.step() {
            GameEvent::Tick => {
                if !app.store.state().is_playing() {
                    continue;
                }
                app.on_tick();
            }
            GameEvent::Resize => {}
            GameEvent::Key(key) => app.on_key(key),
        }
        terminal.draw(|f| ui::draw(app, f))?;
    }

    info!("quit");
    Ok(())
}
