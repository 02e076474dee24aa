//! Whole-session tests driving the app the way the event loop does.

use crossterm::event::KeyCode;
use rand::SeedableRng;
use rand::rngs::StdRng;
use trivia_quiz::quiz::Status;
use trivia_quiz::{Action, App, AppState, FetchError, Question, QuestionRecord, SubmitTrigger};

fn fetched_questions(count: usize) -> Vec<Question> {
    let mut rng = StdRng::seed_from_u64(2024);
    (0..count)
        .map(|n| {
            let record: QuestionRecord = serde_json::from_value(serde_json::json!({
                "type": "multiple",
                "difficulty": "medium",
                "category": "Entertainment: Books",
                "question": format!("Who wrote &quot;Book {n}&quot;?"),
                "correct_answer": format!("Author &amp; {n}"),
                "incorrect_answers": [format!("Nobody {n}"), format!("Someone {n}"), format!("Everyone {n}")]
            }))
            .unwrap();
            Question::from_record(record, &mut rng)
        })
        .collect()
}

fn press(app: &mut App, key: KeyCode) -> Action {
    app.handle_key(key)
}

fn start_session(count: usize, time_limit: u32) -> App {
    let mut app = App::new(time_limit).with_email(Some("player@example.com".into()));
    assert_eq!(press(&mut app, KeyCode::Enter), Action::Fetch);
    assert!(matches!(app.state, AppState::Loading));
    assert!(app.questions_loaded(Ok(fetched_questions(count))));
    app
}

/// Move the option cursor onto `option` and choose it.
fn answer_current(app: &mut App, option: &str) {
    let target = app
        .session()
        .and_then(|s| s.current_question().option_index(option))
        .expect("option exists");
    while app.option_cursor() != target {
        press(app, KeyCode::Down);
    }
    press(app, KeyCode::Enter);
}

#[test]
fn mixed_answers_produce_expected_report() {
    let mut app = start_session(15, 1800);

    for n in 0..15 {
        let session = app.session().unwrap();
        assert_eq!(session.current(), n);
        assert!(session.is_visited(n));

        match n {
            0..=4 => answer_current(&mut app, &format!("Author & {n}")),
            5..=9 => {}
            _ => answer_current(&mut app, &format!("Nobody {n}")),
        }

        press(&mut app, KeyCode::Right);
    }

    let AppState::Report(screen) = &app.state else {
        panic!("moving past the last question should submit");
    };
    assert_eq!(screen.trigger, SubmitTrigger::Finished);
    assert_eq!(screen.context.email, "player@example.com");

    let (_, report) = app.last_result().unwrap();
    assert_eq!(report.score, 5);
    assert_eq!(report.total(), 15);
    for outcome in &report.outcomes {
        let expected = match outcome.index {
            0..=4 => Status::Correct,
            5..=9 => Status::Skipped,
            _ => Status::Incorrect,
        };
        assert_eq!(outcome.status, expected, "question {}", outcome.index);
    }
    assert_eq!(report.outcomes[7].chosen, None);
    assert_eq!(report.outcomes[12].correct, "Author & 12");
}

#[test]
fn full_countdown_submits_automatically() {
    let mut app = start_session(15, 1800);
    answer_current(&mut app, "Author & 0");

    for _ in 0..1799 {
        app.tick();
    }
    let session = app.session().expect("still running one second before the end");
    assert_eq!(session.countdown().remaining(), 1);
    assert_eq!(session.countdown().format_clock(), "0:01");

    app.tick();
    let AppState::Report(screen) = &app.state else {
        panic!("expiry should submit");
    };
    assert_eq!(screen.trigger, SubmitTrigger::TimerExpired);
    assert_eq!(app.last_result().map(|(_, r)| r.score), Some(1));

    // A late manual submit or tick changes nothing.
    assert!(!app.submit());
    press(&mut app, KeyCode::Char('s'));
    app.tick();
    let AppState::Report(screen) = &app.state else {
        panic!("report should stay up");
    };
    assert_eq!(screen.trigger, SubmitTrigger::TimerExpired);
}

#[test]
fn answers_are_frozen_after_submit() {
    let mut app = start_session(3, 60);
    answer_current(&mut app, "Author & 0");
    press(&mut app, KeyCode::Char('s'));

    // Quiz keys mean something else on the report screen.
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char('c'));

    let (_, report) = app.last_result().unwrap();
    assert_eq!(report.score, 1);
    assert_eq!(report.count(Status::Skipped), 2);
}

#[test]
fn clear_selection_skips_the_question() {
    let mut app = start_session(2, 60);
    answer_current(&mut app, "Author & 0");
    assert_eq!(app.session().unwrap().answered_count(), 1);

    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.session().unwrap().answered_count(), 0);

    press(&mut app, KeyCode::Char('s'));
    let (_, report) = app.last_result().unwrap();
    assert_eq!(report.outcomes[0].status, Status::Skipped);
}

#[test]
fn previous_is_ignored_on_first_question() {
    let mut app = start_session(5, 60);
    press(&mut app, KeyCode::Left);
    assert_eq!(app.session().unwrap().current(), 0);

    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Left);
    assert_eq!(app.session().unwrap().current(), 1);
}

#[test]
fn options_keep_their_order_across_visits() {
    let mut app = start_session(4, 60);
    let first_visit = app.session().unwrap().current_question().options.clone();

    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Char('g'));
    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Enter);

    let session = app.session().unwrap();
    assert_eq!(session.current(), 0);
    assert_eq!(session.current_question().options, first_visit);
}

#[test]
fn failed_fetch_then_retake_starts_fresh() {
    let mut app = App::new(60).with_email(Some("player@example.com".into()));
    press(&mut app, KeyCode::Enter);
    app.questions_loaded(Err(FetchError::Network("connection refused".into())));

    let AppState::LoadFailed { message } = &app.state else {
        panic!("fetch failure must be visible");
    };
    assert!(message.contains("connection refused"));

    press(&mut app, KeyCode::Char('r'));
    assert_eq!(press(&mut app, KeyCode::Enter), Action::Fetch);
    assert!(app.questions_loaded(Ok(fetched_questions(3))));

    let session = app.session().unwrap();
    assert_eq!(session.current(), 0);
    assert_eq!(session.answered_count(), 0);
    assert_eq!(session.countdown().remaining(), 60);
}

#[test]
fn quit_is_available_on_every_screen() {
    let mut app = start_session(2, 60);
    assert_eq!(press(&mut app, KeyCode::Char('q')), Action::Quit);

    app.submit();
    assert_eq!(press(&mut app, KeyCode::Char('q')), Action::Quit);

    let mut loading = App::new(60).with_email(Some("player@example.com".into()));
    press(&mut loading, KeyCode::Enter);
    assert_eq!(press(&mut loading, KeyCode::Esc), Action::Quit);
}
