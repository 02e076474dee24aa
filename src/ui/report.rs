use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::{ReportScreen, SubmitTrigger};
use crate::quiz::{Report, Status};

const QUESTION_PREVIEW_LENGTH: usize = 60;

pub fn render(frame: &mut Frame, area: Rect, screen: &ReportScreen) {
    let Ok(report) = &screen.report else {
        render_no_data(frame, area);
        return;
    };

    let percentage = report.percentage();
    let grade_color = get_grade_color(percentage);

    let [summary, breakdown, controls] = Layout::vertical([
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .areas(area);

    render_score_summary(frame, summary, screen, report, grade_color);
    render_question_breakdown(frame, breakdown, report, screen.scroll);
    render_controls(frame, controls);
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn status_label(status: Status) -> (&'static str, Color) {
    match status {
        Status::Correct => ("CORRECT", Color::Green),
        Status::Incorrect => ("INCORRECT", Color::Red),
        Status::Skipped => ("SKIPPED", Color::DarkGray),
    }
}

fn render_score_summary(
    frame: &mut Frame,
    area: Rect,
    screen: &ReportScreen,
    report: &Report,
    grade_color: Color,
) {
    let heading = match screen.trigger {
        SubmitTrigger::TimerExpired => "TIME'S UP",
        SubmitTrigger::Manual | SubmitTrigger::Finished => "QUIZ RESULTS",
    };

    let content = vec![
        Line::from(Span::styled(
            heading,
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(screen.context.email.as_str().fg(Color::DarkGray)),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} / {}  ({:.0}%)",
                report.score,
                report.total(),
                report.percentage()
            ),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(vec![
            Span::styled(
                format!("{} correct", report.count(Status::Correct)),
                Style::default().fg(Color::Green),
            ),
            "  ·  ".fg(Color::DarkGray),
            Span::styled(
                format!("{} incorrect", report.count(Status::Incorrect)),
                Style::default().fg(Color::Red),
            ),
            "  ·  ".fg(Color::DarkGray),
            Span::styled(
                format!("{} skipped", report.count(Status::Skipped)),
                Style::default().fg(Color::Gray),
            ),
        ]),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(frame: &mut Frame, area: Rect, report: &Report, scroll: usize) {
    let mut lines: Vec<Line> = Vec::with_capacity(report.total() * 4);

    for outcome in &report.outcomes {
        let (label, color) = status_label(outcome.status);

        lines.push(Line::from(vec![
            Span::styled(
                format!("{:2}. ", outcome.index + 1),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(format!("{label:<10}"), Style::default().fg(color).bold()),
            Span::styled(
                truncate_question(&outcome.prompt),
                Style::default().fg(Color::Gray),
            ),
        ]));

        let your_answer = match &outcome.chosen {
            Some(chosen) => Span::styled(chosen.as_str(), Style::default().fg(color)),
            None => Span::styled(
                "No answer selected",
                Style::default().fg(Color::DarkGray).italic(),
            ),
        };
        lines.push(Line::from(vec![
            Span::styled("    Your answer:    ", Style::default().fg(Color::DarkGray)),
            your_answer,
        ]));
        lines.push(Line::from(vec![
            Span::styled("    Correct answer: ", Style::default().fg(Color::DarkGray)),
            Span::styled(outcome.correct.as_str(), Style::default().fg(Color::White)),
        ]));
        lines.push(Line::from(""));
    }

    // Each question takes four lines.
    let offset = (scroll * 4).min(u16::MAX as usize) as u16;
    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((offset, 0));
    frame.render_widget(widget, area);
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r retake quiz  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_no_data(frame: &mut Frame, area: Rect) {
    let content = vec![
        Line::from(Span::styled(
            "No Quiz Data Found",
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[R] go home  ·  [Q] quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, super::centered(area, 3));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_prompts_are_truncated() {
        let long = "x".repeat(QUESTION_PREVIEW_LENGTH + 5);
        let preview = truncate_question(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), QUESTION_PREVIEW_LENGTH + 3);
        assert_eq!(truncate_question("short"), "short");
    }

    #[test]
    fn grade_colors_follow_percentage() {
        assert_eq!(get_grade_color(100.0), Color::Green);
        assert_eq!(get_grade_color(75.0), Color::Cyan);
        assert_eq!(get_grade_color(33.3), Color::Red);
    }
}
