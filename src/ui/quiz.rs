use ratatui::{
    prelude::*,
    widgets::{Gauge, Paragraph, Wrap},
};

use crate::app::App;

pub fn render<L>(frame: &mut Frame, area: Rect, app: &App<L>) {
    let Some(question) = app.engine().current() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_header(frame, chunks[0], app);
    render_question_text(frame, chunks[2], app, question.text());
    render_countdown(frame, chunks[3], app);
    render_options(frame, chunks[4], app.options(), app.selected_option());
    super::render_controls(
        frame,
        chunks[5],
        "j/k navigate  ·  1-9 pick  ·  enter select  ·  esc home  ·  q quit",
    );
}

fn render_header<L>(frame: &mut Frame, area: Rect, app: &App<L>) {
    let engine = app.engine();
    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let meta = Paragraph::new(format!(
        "Category: {} | Difficulty: {}",
        engine.category(),
        engine.difficulty()
    ))
    .fg(Color::DarkGray)
    .italic();

    let feedback = match app.last_answer() {
        Some(true) => Span::styled("correct  ", Style::default().fg(Color::Green)),
        Some(false) => Span::styled("wrong  ", Style::default().fg(Color::Red)),
        None => Span::raw(""),
    };
    let score = Paragraph::new(Line::from(vec![
        feedback,
        Span::styled(
            format!("Score: {} / {}", engine.score(), engine.total()),
            Style::default().fg(Color::White).bold(),
        ),
    ]))
    .alignment(Alignment::Right);

    frame.render_widget(meta, halves[0]);
    frame.render_widget(score, halves[1]);
}

fn render_question_text<L>(frame: &mut Frame, area: Rect, app: &App<L>, text: &str) {
    let engine = app.engine();
    let widget = Paragraph::new(format!("Q{}/{}: {}", engine.index() + 1, engine.total(), text))
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_countdown<L>(frame: &mut Frame, area: Rect, app: &App<L>) {
    let limit = app.settings().time_limit().max(1);
    let left = app.time_left().min(limit);
    let color = if left * 4 <= limit { Color::Red } else { Color::Cyan };

    let widget = Gauge::default()
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio(f64::from(left) / f64::from(limit))
        .label(format!("Time left: {left}s"));
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, options: &[String], selected: usize) {
    let mut lines: Vec<Line> = Vec::with_capacity(options.len() * 2);

    for (index, option) in options.iter().enumerate() {
        let is_selected = index == selected;
        let style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", option_label(index)), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

/// `A`, `B`, ... for the first 26 options, then numbers.
fn option_label(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => (index + 1).to_string(),
    }
}
