use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::engine::SessionResult;

pub fn render<L>(frame: &mut Frame, area: Rect, app: &App<L>) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(9),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    if let Some(result) = app.result() {
        render_score_summary(frame, chunks[1], result);
    }
    super::render_notice(frame, chunks[2], app.notice());
    super::render_controls(
        frame,
        chunks[4],
        "r play again  ·  h home  ·  v history  ·  q quit",
    );
}

fn get_grade_color(percentage: u32) -> Color {
    match percentage {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, result: &SessionResult) {
    let percentage = result.percentage();

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZ COMPLETE",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Score: {}/{}  ({}%)", result.score, result.total, percentage),
            Style::default().fg(get_grade_color(percentage)).bold(),
        )),
        Line::from(format!("Time: {}s", result.duration_seconds).fg(Color::Gray)),
        Line::from(""),
        Line::from(
            format!("{} · {}", result.category, result.difficulty).fg(Color::DarkGray),
        ),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_colors() {
        assert_eq!(get_grade_color(100), Color::Green);
        assert_eq!(get_grade_color(75), Color::Cyan);
        assert_eq!(get_grade_color(60), Color::Yellow);
        assert_eq!(get_grade_color(20), Color::Red);
    }
}
