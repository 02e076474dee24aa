use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    input: &str,
    error: Option<&str>,
    time_limit_secs: u32,
) {
    let minutes = time_limit_secs.div_ceil(60);
    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "TRIVIA QUIZ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(
            format!("Enter your email to start the {minutes}-minute assessment.").fg(Color::DarkGray),
        ),
        Line::from(""),
        Line::from(vec![
            Span::styled("Email: ", Style::default().fg(Color::White)),
            Span::styled(input, Style::default().fg(Color::Yellow)),
            Span::styled("_", Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
    ];

    content.push(match error {
        Some(err) => Line::from(Span::styled(err, Style::default().fg(Color::Red))),
        None => Line::from(""),
    });

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "[Enter] start quiz  ·  [Esc] quit",
        Style::default().fg(Color::DarkGray),
    )));

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, super::centered(area, 12));
}
