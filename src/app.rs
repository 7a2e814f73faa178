use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};
use webbrowser::Browser;

use crate::config::{Config, ConfigStore};
use crate::metrics::share_text;
use crate::players::PlayerPatch;
use crate::rivals::RivalPack;
use crate::session::{Difficulty, Phase};
use crate::store::SessionStore;
use crate::texts::TextCorpus;
use crate::time_series::WpmSamples;

pub const TICK_RATE_MS: u64 = 100;

/// Per-run options that are not worth persisting
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// fixed passage used for every race instead of the corpus
    pub prompt: Option<String>,
    pub room: Option<String>,
}

/// Presentation-side state around the store: what to show while idle,
/// simulated rivals, chart samples and preference persistence.
pub struct App {
    pub store: SessionStore,
    corpus: TextCorpus,
    rivals: RivalPack,
    samples: WpmSamples,
    preview: String,
    prompt: Option<String>,
    config: Config,
    config_store: Option<Box<dyn ConfigStore>>,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(mut store: SessionStore, corpus: TextCorpus, config: Config, options: AppOptions) -> Self {
        store.set_difficulty(config.difficulty);
        store.set_theme(config.theme);

        let rivals = match &options.room {
            Some(room) => {
                store.join_room(room.clone(), config.player_name.clone());
                RivalPack::spawn(&mut store, config.rivals, &mut rand::thread_rng())
            }
            None => RivalPack::default(),
        };

        let mut app = Self {
            store,
            corpus,
            rivals,
            samples: WpmSamples::default(),
            preview: String::new(),
            prompt: options.prompt.filter(|p| !p.is_empty()),
            config,
            config_store: None,
            status: None,
            should_quit: false,
        };
        app.pick_preview();
        app
    }

    pub fn with_config_store(mut self, config_store: Box<dyn ConfigStore>) -> Self {
        self.config_store = Some(config_store);
        self
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn samples(&self) -> &WpmSamples {
        &self.samples
    }

    pub fn rivals(&self) -> &RivalPack {
        &self.rivals
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Passage on screen: the live target once a race starts, the preview before
    pub fn display_text(&self) -> &str {
        match self.store.state().phase() {
            Phase::Idle => &self.preview,
            _ => self.store.state().target_text(),
        }
    }

    fn pick_preview(&mut self) {
        self.preview = match &self.prompt {
            Some(prompt) => prompt.clone(),
            None => self
                .corpus
                .random_text(self.store.state().difficulty())
                .to_string(),
        };
    }

    pub fn start(&mut self) {
        self.store.start_session(self.preview.clone());
        self.samples.clear();
        self.status = None;
        self.rivals.reset(&mut self.store);
        self.sync_local_player();
    }

    /// Abandon or close the current race and line up a new passage
    pub fn reset(&mut self) {
        self.store.reset_session();
        self.samples.clear();
        self.status = None;
        self.rivals.reset(&mut self.store);
        self.sync_local_player();
        self.pick_preview();
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if self.store.state().difficulty() == difficulty {
            return;
        }
        self.store.set_difficulty(difficulty);
        if self.store.state().phase() == Phase::Idle {
            self.pick_preview();
        }
        self.config.difficulty = difficulty;
        self.persist();
    }

    pub fn cycle_theme(&mut self) {
        let theme = self.store.state().theme().next();
        self.store.set_theme(theme);
        self.config.theme = theme;
        self.persist();
    }

    fn persist(&self) {
        if let Some(store) = &self.config_store {
            if let Err(e) = store.save(&self.config) {
                warn!(error = %e, "failed to save preferences");
            }
        }
    }

    pub fn on_tick(&mut self) {
        if self.store.state().phase() != Phase::Playing {
            return;
        }
        let elapsed = self.store.elapsed_ms();
        let text_len = self.store.state().target_len();
        self.samples.record(elapsed, self.store.live_wpm());
        self.rivals.advance(&mut self.store, elapsed, text_len);
        self.sync_local_player();
    }

    /// Mirror the local session into the local roster entry
    fn sync_local_player(&mut self) {
        let Some(id) = self
            .store
            .registry()
            .local_player_id()
            .map(str::to_owned)
        else {
            return;
        };
        let state = self.store.state();
        let patch = PlayerPatch {
            wpm: Some(self.store.live_wpm()),
            accuracy: Some(state.accuracy()),
            progress: Some(self.store.progress_percent()),
            is_finished: Some(state.is_finished()),
            ..Default::default()
        };
        self.store.update_player(&id, &patch);
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.store.state().phase() {
            Phase::Idle => self.on_idle_key(key),
            Phase::Playing => self.on_playing_key(key),
            Phase::Finished => self.on_finished_key(key),
        }
    }

    fn on_idle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.start(),
            KeyCode::Tab => self.cycle_theme(),
            KeyCode::Char('1') => self.set_difficulty(Difficulty::Easy),
            KeyCode::Char('2') => self.set_difficulty(Difficulty::Medium),
            KeyCode::Char('3') => self.set_difficulty(Difficulty::Hard),
            KeyCode::Char('4') => self.set_difficulty(Difficulty::Code),
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn on_playing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.reset(),
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.store.end_session();
                self.sync_local_player();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.store.submit_char(c);
                self.sync_local_player();
            }
            KeyCode::Enter => {
                self.store.submit_char('\n');
                self.sync_local_player();
            }
            KeyCode::Backspace => debug!("backspace ignored, attempts are append-only"),
            _ => {}
        }
    }

    fn on_finished_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('r') => self.reset(),
            KeyCode::Char('s') => self.share(),
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn share(&mut self) {
        let state = self.store.state();
        let text = share_text(state.wpm(), state.accuracy());
        if Browser::is_available() {
            let url = format!(
                "https://twitter.com/intent/tweet?text={}",
                encode_query(&text)
            );
            match webbrowser::open(&url) {
                Ok(()) => self.status = Some("opened share dialog in browser".to_string()),
                Err(e) => {
                    warn!(error = %e, "could not open browser");
                    self.status = Some(text);
                }
            }
        } else {
            self.status = Some(text);
        }
    }
}

/// Percent-encode everything but unreserved characters
fn encode_query(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 3);
    for b in text.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
