mod email_entry;
mod loading;
mod quiz;
mod report;

use ratatui::{prelude::*, widgets::Block};

use crate::app::{App, AppState};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match &app.state {
        AppState::EmailEntry { input, error } => {
            email_entry::render(frame, area, input, error.as_deref(), app.time_limit_secs())
        }
        AppState::Loading => loading::render_loading(frame, area, app.email()),
        AppState::LoadFailed { message } => loading::render_failed(frame, area, message),
        AppState::Quiz(session) => quiz::render(frame, area, app, session),
        AppState::Report(screen) => report::render(frame, area, screen),
    }
}

/// Centre a fixed-height block vertically.
fn centered(area: Rect, height: u16) -> Rect {
    Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(area)[1]
}
