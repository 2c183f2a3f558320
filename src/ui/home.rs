use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, HomeField};

pub fn render<L>(frame: &mut Frame, area: Rect, app: &App<L>) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(14),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_selectors(frame, chunks[1], app);
    super::render_notice(frame, chunks[2], app.notice());
    super::render_controls(
        frame,
        chunks[4],
        "j/k field  ·  h/l change  ·  enter start  ·  v history  ·  q quit",
    );
}

fn render_selectors<L>(frame: &mut Frame, area: Rect, app: &App<L>) {
    let settings = app.settings();
    let bank = app.engine().bank();

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "FLASHCARD QUIZ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(
            format!(
                "{} questions · {} categories",
                bank.len(),
                bank.categories().len()
            )
            .fg(Color::DarkGray),
        ),
        Line::from(""),
    ];

    for field in HomeField::ALL {
        let value = match field {
            HomeField::Category => settings.category.to_string(),
            HomeField::Difficulty => settings.difficulty.to_string(),
            HomeField::QuestionCount => settings.question_count().to_string(),
            HomeField::TimeLimit => format!("{}s", settings.time_limit()),
        };
        content.push(selector_line(label(field), value, field == app.focus()));
        content.push(Line::from(""));
    }

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn label(field: HomeField) -> &'static str {
    match field {
        HomeField::Category => "Category",
        HomeField::Difficulty => "Difficulty",
        HomeField::QuestionCount => "Questions",
        HomeField::TimeLimit => "Time per question",
    }
}

fn selector_line(label: &str, value: String, focused: bool) -> Line<'static> {
    let (value_style, arrows) = if focused {
        (Style::default().fg(Color::Cyan).bold(), ("< ", " >"))
    } else {
        (Style::default().fg(Color::Gray), ("  ", "  "))
    };

    Line::from(vec![
        Span::styled(format!("{label:>18}: "), Style::default().fg(Color::DarkGray)),
        Span::styled(arrows.0, value_style),
        Span::styled(value, value_style),
        Span::styled(arrows.1, value_style),
    ])
}
