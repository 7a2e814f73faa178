use ratatui::Frame;

use crate::{app::App, session::Phase};

/// A UI Screen boundary: responsible for rendering one phase
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Idle and playing share the race layout; idle just has nothing typed yet
pub struct RaceScreen;

impl Screen for RaceScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        crate::ui::render_race(app, f);
    }
}

pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        crate::ui::render_results(app, f);
    }
}

/// Helper to construct the appropriate screen for the current phase
pub fn current_screen(phase: Phase) -> Box<dyn Screen> {
    match phase {
        Phase::Idle | Phase::Playing => Box::new(RaceScreen),
        Phase::Finished => Box::new(ResultsScreen),
    }
}
