use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::players::PlayerRegistry;
use crate::ui::theme::Palette;

const BAR_WIDTH: usize = 16;

/// Fixed-width text bar for a 0-100 progress value
pub fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn leaderboard_lines(registry: &PlayerRegistry, palette: &Palette) -> Vec<Line<'static>> {
    let local = registry.local_player_id();
    let mut lines = Vec::new();

    for (rank, player) in registry.leaderboard().into_iter().enumerate() {
        let is_local = local == Some(player.id.as_str());
        let name_style = if is_local {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.secondary)
        };

        let mut header = vec![
            Span::styled(format!("#{} ", rank + 1), Style::default().fg(palette.pending)),
            Span::styled(player.name.clone(), name_style),
        ];
        if is_local {
            header.push(Span::styled(" (you)", Style::default().add_modifier(Modifier::ITALIC)));
        }
        lines.push(Line::from(header));

        lines.push(Line::from(format!(
            "   {} WPM • {}% accuracy",
            player.wpm, player.accuracy
        )));

        let status = if player.is_finished {
            Span::styled(" ✓ Finished", Style::default().fg(palette.correct))
        } else {
            Span::styled(" Typing...", Style::default().fg(palette.pending))
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("   {} {:>3}%", progress_bar(player.progress, BAR_WIDTH), player.progress.round()),
                Style::default().fg(palette.secondary),
            ),
            status,
        ]));
        lines.push(Line::default());
    }

    let count = registry.players().len();
    lines.push(Line::from(Span::styled(
        format!(
            "room {} • {} player{} online",
            registry.room_id().unwrap_or("-"),
            count,
            if count == 1 { "" } else { "s" }
        ),
        Style::default().add_modifier(Modifier::DIM),
    )));

    lines
}

pub fn render_leaderboard(registry: &PlayerRegistry, palette: &Palette, f: &mut Frame, area: Rect) {
    let widget = Paragraph::new(leaderboard_lines(registry, palette))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title("Live Leaderboard"),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}
