mod history;
mod home;
mod quiz;
mod result;

use ratatui::{prelude::*, widgets::Block};

use crate::app::{App, AppState};

pub fn render<L>(frame: &mut Frame, app: &App<L>) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.state {
        AppState::Home => home::render(frame, area, app),
        AppState::Quiz => quiz::render(frame, area, app),
        AppState::Result => result::render(frame, area, app),
        AppState::History => history::render(frame, area, app),
    }
}

/// Single dimmed line of key hints.
fn render_controls(frame: &mut Frame, area: Rect, hints: &str) {
    let widget = ratatui::widgets::Paragraph::new(hints)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_notice(frame: &mut Frame, area: Rect, notice: Option<&str>) {
    if let Some(text) = notice {
        let widget = ratatui::widgets::Paragraph::new(text)
            .alignment(Alignment::Center)
            .fg(Color::Yellow);
        frame.render_widget(widget, area);
    }
}
