use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Row, Table},
};

use crate::app::App;
use crate::history::TIMESTAMP_FORMAT;

const COLUMNS: [&str; 6] = ["timestamp", "category", "difficulty", "score", "total", "duration (s)"];

pub fn render<L>(frame: &mut Frame, area: Rect, app: &App<L>) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let title = Paragraph::new("ATTEMPT HISTORY")
        .alignment(Alignment::Center)
        .fg(Color::Cyan)
        .bold();
    frame.render_widget(title, chunks[0]);

    if app.history().is_empty() {
        let empty = Paragraph::new("No attempts yet")
            .alignment(Alignment::Center)
            .fg(Color::DarkGray);
        frame.render_widget(empty, chunks[1]);
    } else {
        render_table(frame, chunks[1], app);
    }

    super::render_notice(frame, chunks[2], app.notice());
    super::render_controls(frame, chunks[3], "j/k scroll  ·  esc back  ·  q quit");
}

fn render_table<L>(frame: &mut Frame, area: Rect, app: &App<L>) {
    let rows = app.history().iter().skip(app.history_scroll()).map(|record| {
        Row::new(vec![
            record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            record.category.clone(),
            record.difficulty.clone(),
            record.score.to_string(),
            record.total.to_string(),
            record.duration_seconds.to_string(),
        ])
        .style(Style::default().fg(Color::Gray))
    });

    let widths = [
        Constraint::Length(19),
        Constraint::Fill(2),
        Constraint::Length(10),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(COLUMNS).style(Style::default().fg(Color::Cyan).bold()))
        .column_spacing(2)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Color::DarkGray),
        );
    frame.render_widget(table, area);
}
