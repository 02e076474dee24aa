use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::{App, OVERVIEW_COLUMNS};
use crate::quiz::{OverviewStatus, QuizSession};

const OVERVIEW_WIDTH: u16 = 28;
const LOW_TIME_SECS: u32 = 60;

pub fn render(frame: &mut Frame, area: Rect, app: &App, session: &QuizSession) {
    let [main, overview] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(OVERVIEW_WIDTH),
    ])
    .areas(area);

    let [header, question, options, controls] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(5),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .areas(main);

    render_header(frame, header, session);
    render_question_text(frame, question, &session.current_question().prompt);
    render_options(frame, options, session, app.option_cursor());
    render_controls(frame, controls, app.overview_cursor().is_some(), session.is_last());
    render_overview(frame, overview, session, app.overview_cursor());
}

fn render_header(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let question = session.current_question();
    let [title, clock] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(8)]).areas(area);

    let mut spans = vec![Span::styled(
        format!("Question {} of {}", session.current() + 1, session.len()),
        Style::default().fg(Color::Cyan).bold(),
    )];
    if !question.category.is_empty() {
        spans.push(Span::styled(
            format!("  ·  {}", question.category),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if !question.difficulty.is_empty() {
        spans.push(Span::styled(
            format!("  ·  {}", question.difficulty),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), title);

    let countdown = session.countdown();
    let clock_color = if countdown.remaining() <= LOW_TIME_SECS {
        Color::Red
    } else {
        Color::Yellow
    };
    let widget = Paragraph::new(countdown.format_clock())
        .alignment(Alignment::Right)
        .style(Style::default().fg(clock_color).bold());
    frame.render_widget(widget, clock);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White).bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, session: &QuizSession, cursor: usize) {
    let chosen = session.answer(session.current());
    let mut lines: Vec<Line> = Vec::new();

    for (index, option) in session.current_question().options.iter().enumerate() {
        let is_cursor = index == cursor;
        let is_chosen = chosen == Some(option.as_str());

        let style = match (is_chosen, is_cursor) {
            (true, _) => Style::default().fg(Color::Green).bold(),
            (false, true) => Style::default().fg(Color::Cyan).bold(),
            (false, false) => Style::default().fg(Color::Gray),
        };
        let marker = if is_cursor { ">" } else { " " };
        let check = if is_chosen { "[x]" } else { "[ ]" };
        let label = char::from(b'A' + (index % 26) as u8);

        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} "), style),
            Span::styled(format!("{check} {label}. "), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Options ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, jumping: bool, is_last: bool) {
    let text = if jumping {
        "arrows move  ·  enter jump  ·  esc cancel".to_string()
    } else {
        let forward = if is_last { "l finish" } else { "h/l prev/next" };
        format!("j/k move  ·  enter choose  ·  c clear  ·  {forward}  ·  g overview  ·  s submit  ·  q quit")
    };

    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn status_style(status: OverviewStatus) -> Style {
    match status {
        OverviewStatus::Current => Style::default().fg(Color::White).bg(Color::Blue).bold(),
        OverviewStatus::Attempted => Style::default().fg(Color::Black).bg(Color::Green),
        OverviewStatus::Visited => Style::default().fg(Color::Yellow),
        OverviewStatus::Left => Style::default().fg(Color::DarkGray),
    }
}

fn render_overview(frame: &mut Frame, area: Rect, session: &QuizSession, cursor: Option<usize>) {
    let mut lines: Vec<Line> = Vec::new();

    let positions: Vec<usize> = (0..session.len()).collect();
    for row in positions.chunks(OVERVIEW_COLUMNS) {
        let cells: Vec<Span> = row
            .iter()
            .map(|&position| {
                let mut style = status_style(session.overview_status(position));
                if cursor == Some(position) {
                    style = style.add_modifier(Modifier::REVERSED | Modifier::UNDERLINED);
                }
                Span::styled(format!("{:>3} ", position + 1), style)
            })
            .collect();
        lines.push(Line::from(cells));
    }

    lines.push(Line::from(""));
    for (status, label) in [
        (OverviewStatus::Current, "Current"),
        (OverviewStatus::Attempted, "Attempted"),
        (OverviewStatus::Visited, "Visited"),
        (OverviewStatus::Left, "Left"),
    ] {
        lines.push(Line::from(vec![
            Span::styled(" ● ", status_style(status)),
            Span::styled(format!(" {label}"), Style::default().fg(Color::Gray)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Answered {} / {}", session.answered_count(), session.len()),
        Style::default().fg(Color::Gray),
    )));

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::LEFT)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Overview ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::new(1, 1, 1, 0)),
    );
    frame.render_widget(widget, area);
}
