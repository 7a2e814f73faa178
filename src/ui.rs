pub mod charting;
pub mod leaderboard;
pub mod screen;
pub mod theme;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;
use webbrowser::Browser;

use crate::{
    app::App,
    metrics::{format_clock, performance_level, score, streak},
    session::{CharMark, Difficulty, Phase},
    ui::{
        leaderboard::render_leaderboard,
        screen::current_screen,
        theme::{palette, Palette},
    },
};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

pub fn draw(app: &App, f: &mut Frame) {
    current_screen(app.store.state().phase()).render(app, f);
}

/// Styled lines for the passage, one `Line` per line of the text.
///
/// Newlines are shown as a return glyph so they can be marked like any
/// other character.
pub fn prompt_lines(chars: &[char], marks: &[CharMark], palette: &Palette) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();

    for (idx, &c) in chars.iter().enumerate() {
        let mark = marks.get(idx).copied().unwrap_or(CharMark::Pending);
        let style = match mark {
            CharMark::Pending => Style::default().fg(palette.pending),
            CharMark::Current => bold
                .fg(palette.accent)
                .add_modifier(Modifier::UNDERLINED | Modifier::REVERSED),
            CharMark::Correct => bold.fg(palette.correct),
            CharMark::Corrected => bold.fg(palette.corrected),
            CharMark::Incorrect => bold.fg(palette.incorrect),
        };
        let glyph = match (c, mark) {
            ('\n', _) => "⏎".to_string(),
            (' ', CharMark::Incorrect) => "·".to_string(),
            (c, _) => c.to_string(),
        };
        spans.push(Span::styled(glyph, style));

        if c == '\n' {
            lines.push(Line::from(std::mem::take(&mut spans)));
        }
    }
    lines.push(Line::from(spans));
    lines
}

fn header(app: &App, p: &Palette) -> Paragraph<'static> {
    let state = app.store.state();
    let mut spans = vec![
        Span::styled(
            "NEONTYPE",
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
    ];
    for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
        let style = if *difficulty == state.difficulty() {
            Style::default()
                .fg(p.accent)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(p.pending)
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, difficulty), style));
    }
    spans.push(Span::raw("   theme: "));
    spans.push(Span::styled(
        state.theme().to_string(),
        Style::default().fg(p.secondary),
    ));

    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

fn stat_block(label: &str, value: String, p: &Palette) -> Paragraph<'static> {
    Paragraph::new(Span::styled(
        value,
        Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(p.secondary))
            .title(label.to_string()),
    )
}

fn render_stats(app: &App, p: &Palette, f: &mut Frame, area: Rect) {
    let state = app.store.state();
    let wpm = app.store.live_wpm();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let elapsed_secs = (app.store.elapsed_ms() / 1_000) as u64;
    f.render_widget(stat_block("WPM", wpm.to_string(), p), cells[0]);
    f.render_widget(
        stat_block("Accuracy", format!("{}%", state.accuracy()), p),
        cells[1],
    );
    f.render_widget(stat_block("Time", format_clock(elapsed_secs), p), cells[2]);
    f.render_widget(stat_block("Streak", streak(wpm).to_string(), p), cells[3]);
}

/// Split off a leaderboard column when a room is joined
fn with_sidebar(app: &App, area: Rect) -> (Rect, Option<Rect>) {
    if !app.store.registry().is_multiplayer() {
        return (area, None);
    }
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(area);
    (cols[0], Some(cols[1]))
}

pub fn render_race(app: &App, f: &mut Frame) {
    let state = app.store.state();
    let p = palette(state.theme());
    let area = f.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(3), // stats
            Constraint::Min(3),    // passage (+ leaderboard)
            Constraint::Length(1), // legend
        ])
        .split(area);

    f.render_widget(header(app, &p), rows[0]);
    render_stats(app, &p, f, rows[1]);

    let (main, sidebar) = with_sidebar(app, rows[2]);

    let chars: Vec<char> = app.display_text().chars().collect();
    let marks = match state.phase() {
        Phase::Idle => vec![CharMark::Pending; chars.len()],
        _ => state.char_marks(),
    };
    let single_line = !chars.contains(&'\n')
        && app.display_text().width() + 2 <= main.width as usize;

    let passage = Paragraph::new(prompt_lines(&chars, &marks, &p))
        .alignment(if single_line {
            // a short prompt centered reads calmer
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.accent))
                .title(match state.phase() {
                    Phase::Idle => "press enter to start",
                    _ => "type!",
                }),
        );
    f.render_widget(passage, main);

    if let Some(sidebar) = sidebar {
        render_leaderboard(app.store.registry(), &p, f, sidebar);
    }

    let legend = match state.phase() {
        Phase::Idle => "(enter) start / (1-4) difficulty / (tab) theme / (esc)ape",
        _ => "(esc) reset / (ctrl+e) finish now / (ctrl+c) quit",
    };
    f.render_widget(
        Paragraph::new(Span::styled(
            legend,
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        rows[3],
    );
}

pub fn render_results(app: &App, f: &mut Frame) {
    let state = app.store.state();
    let p = palette(state.theme());
    let area = f.area();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(4),    // chart (+ leaderboard)
            Constraint::Length(1), // level
            Constraint::Length(1), // stats
            Constraint::Length(1), // status
            Constraint::Length(1), // legend
        ])
        .split(area);

    f.render_widget(header(app, &p), rows[0]);

    let (main, sidebar) = with_sidebar(app, rows[1]);

    let elapsed_secs = app.store.elapsed_ms() as f64 / 1_000.0;
    let points = app.samples().as_tuples();
    let (overall_duration, highest_wpm) =
        charting::compute_chart_params(app.samples().points(), elapsed_secs);
    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(Style::default().fg(p.accent))
        .graph_type(GraphType::Line)
        .data(&points)];
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.secondary)),
        )
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([0.0, overall_duration])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(overall_duration), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(highest_wpm), bold_style),
                ]),
        );
    f.render_widget(chart, main);

    if let Some(sidebar) = sidebar {
        render_leaderboard(app.store.registry(), &p, f, sidebar);
    }

    let level = performance_level(state.wpm());
    f.render_widget(
        Paragraph::new(Span::styled(
            format!("{level}!"),
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        rows[2],
    );

    f.render_widget(
        Paragraph::new(Span::styled(
            format!(
                "{} wpm   {}% acc   {}s   score {}",
                state.wpm(),
                state.accuracy(),
                app.store.elapsed_ms() / 1_000,
                score(state.wpm(), state.accuracy())
            ),
            bold_style,
        ))
        .alignment(Alignment::Center),
        rows[3],
    );

    if let Some(status) = app.status() {
        f.render_widget(
            Paragraph::new(Span::styled(
                status.to_string(),
                Style::default().fg(p.secondary).add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center),
            rows[4],
        );
    }

    let legend = if Browser::is_available() {
        "(r)ace again / (s)hare / (esc)ape"
    } else {
        "(r)ace again / (s)how share text / (esc)ape"
    };
    f.render_widget(
        Paragraph::new(Span::styled(
            legend,
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        rows[5],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppOptions;
    use crate::clock::ManualClock;
    use crate::config::Config;
    use crate::session::Theme;
    use crate::store::SessionStore;
    use crate::texts::TextCorpus;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn app_with(prompt: &str, room: Option<&str>) -> (App, ManualClock) {
        let clock = ManualClock::new(0);
        let app = App::new(
            SessionStore::with_clock(clock.clone()),
            TextCorpus::embedded().unwrap(),
            Config::default(),
            AppOptions {
                prompt: Some(prompt.to_string()),
                room: room.map(str::to_string),
            },
        );
        (app, clock)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn prompt_lines_split_on_newline() {
        let chars: Vec<char> = "ab\ncd".chars().collect();
        let marks = vec![CharMark::Pending; chars.len()];
        let lines = prompt_lines(&chars, &marks, &palette(Theme::Neon));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 3);
        assert_eq!(lines[0].spans[2].content, "⏎");
        assert_eq!(lines[1].spans.len(), 2);
    }

    #[test]
    fn prompt_lines_style_marks() {
        let p = palette(Theme::Neon);
        let chars: Vec<char> = "a b".chars().collect();
        let marks = vec![CharMark::Correct, CharMark::Incorrect, CharMark::Current];
        let lines = prompt_lines(&chars, &marks, &p);
        let spans = &lines[0].spans;
        assert_eq!(spans[0].style.fg, Some(p.correct));
        assert_eq!(spans[1].content, "·");
        assert_eq!(spans[1].style.fg, Some(p.incorrect));
        assert!(spans[2].style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn idle_screen_shows_preview_and_hint() {
        let (app, _) = app_with("hello there", None);
        let text = screen_text(&app);
        assert!(text.contains("NEONTYPE"));
        assert!(text.contains("hello there"));
        assert!(text.contains("press enter to start"));
        assert!(!text.contains("Live Leaderboard"));
    }

    #[test]
    fn playing_screen_shows_stats_and_leaderboard() {
        let (mut app, clock) = app_with("hello there", Some("room1"));
        press(&mut app, KeyCode::Enter);
        clock.advance(65_000);
        press(&mut app, KeyCode::Char('h'));
        let text = screen_text(&app);
        assert!(text.contains("Accuracy"));
        assert!(text.contains("1:05"));
        assert!(text.contains("Live Leaderboard"));
        assert!(text.contains("(you)"));
    }

    #[test]
    fn results_screen_shows_level_and_score() {
        let (mut app, clock) = app_with("cat", None);
        press(&mut app, KeyCode::Enter);
        clock.set(60_000);
        for c in "cat".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        let text = screen_text(&app);
        assert!(text.contains("Beginner!"));
        assert!(text.contains("1 wpm   100% acc   60s   score 1"));
        assert!(text.contains("(r)ace again"));
    }
}
