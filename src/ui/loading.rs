use ratatui::{prelude::*, widgets::Paragraph, widgets::Wrap};

/// Rows the failure message may take before it is cut off.
const MAX_MESSAGE_ROWS: u16 = 8;

pub fn render_loading(frame: &mut Frame, area: Rect, email: &str) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "TRIVIA QUIZ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Loading questions...",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(email.fg(Color::DarkGray)),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, super::centered(area, 7));
}

pub fn render_failed(frame: &mut Frame, area: Rect, message: &str) {
    let [_, heading, body, hint, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Max(MAX_MESSAGE_ROWS),
        Constraint::Length(2),
        Constraint::Fill(1),
    ])
    .horizontal_margin(2)
    .areas(area);

    let widget = Paragraph::new(Span::styled(
        "COULD NOT LOAD QUESTIONS",
        Style::default().fg(Color::Red).bold(),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(widget, heading);

    let widget = Paragraph::new(Span::styled(message, Style::default().fg(Color::Red)))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, body);

    let widget = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "[R] back to start  ·  [Q] quit",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(widget, hint);
}
