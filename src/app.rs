use crossterm::event::KeyCode;
use tracing::{error, info, warn};

use crate::data::FetchError;
use crate::email::{EmailStore, validate_email};
use crate::models::Question;
use crate::quiz::{QuizSession, Report, ReportError, SessionContext, Step, Tick, report_for};

/// Questions per row in the overview panel.
pub const OVERVIEW_COLUMNS: usize = 5;
const MAX_EMAIL_LENGTH: usize = 254;

/// What ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    /// The user pressed submit.
    Manual,
    /// The user moved past the last question.
    Finished,
    /// The countdown reached zero.
    TimerExpired,
}

/// Everything the report screen shows.
#[derive(Debug)]
pub struct ReportScreen {
    pub context: SessionContext,
    pub report: Result<Report, ReportError>,
    pub trigger: SubmitTrigger,
    pub scroll: usize,
}

#[derive(Debug)]
pub enum AppState {
    EmailEntry { input: String, error: Option<String> },
    Loading,
    LoadFailed { message: String },
    Quiz(QuizSession),
    Report(ReportScreen),
}

impl Default for AppState {
    fn default() -> Self {
        Self::EmailEntry {
            input: String::new(),
            error: None,
        }
    }
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    /// Start fetching questions for a new session.
    Fetch,
    Quit,
}

pub struct App {
    pub state: AppState,
    time_limit_secs: u32,
    email: String,
    email_store: Option<EmailStore>,
    option_cursor: usize,
    overview_cursor: Option<usize>,
}

impl App {
    pub fn new(time_limit_secs: u32) -> Self {
        Self {
            state: AppState::default(),
            time_limit_secs,
            email: String::new(),
            email_store: None,
            option_cursor: 0,
            overview_cursor: None,
        }
    }

    /// Remember the email in `store` and prefill it from there.
    pub fn with_email_store(mut self, store: Option<EmailStore>) -> Self {
        if let Some(stored) = store.as_ref().and_then(EmailStore::load) {
            self.prefill_email(stored);
        }
        self.email_store = store;
        self
    }

    pub fn with_email(mut self, email: Option<String>) -> Self {
        if let Some(email) = email {
            self.prefill_email(email);
        }
        self
    }

    fn prefill_email(&mut self, email: String) {
        if let AppState::EmailEntry { input, .. } = &mut self.state {
            input.clone_from(&email);
        }
        self.email = email;
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    pub fn option_cursor(&self) -> usize {
        self.option_cursor
    }

    pub fn overview_cursor(&self) -> Option<usize> {
        self.overview_cursor
    }

    pub fn session(&self) -> Option<&QuizSession> {
        match &self.state {
            AppState::Quiz(session) => Some(session),
            _ => None,
        }
    }

    /// The scored result, once a session has been submitted.
    pub fn last_result(&self) -> Option<(&SessionContext, &Report)> {
        match &self.state {
            AppState::Report(ReportScreen {
                context,
                report: Ok(report),
                ..
            }) => Some((context, report)),
            _ => None,
        }
    }

    /// Returns what the event loop should do next.
    pub fn handle_key(&mut self, key: KeyCode) -> Action {
        match self.state {
            AppState::EmailEntry { .. } => self.handle_email_key(key),
            AppState::Loading => match key {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
                _ => Action::None,
            },
            AppState::LoadFailed { .. } => self.handle_failure_key(key),
            AppState::Quiz(_) if self.overview_cursor.is_some() => self.handle_overview_key(key),
            AppState::Quiz(_) => self.handle_quiz_key(key),
            AppState::Report(_) => self.handle_report_key(key),
        }
    }

    /// Deliver the fetch result. Returns true when a session has started.
    pub fn questions_loaded(&mut self, result: Result<Vec<Question>, FetchError>) -> bool {
        if !matches!(self.state, AppState::Loading) {
            warn!("ignoring questions that arrived outside of loading");
            return false;
        }

        let questions = match result {
            Ok(questions) => questions,
            Err(e) => {
                error!(error = %e, "failed to load questions");
                self.state = AppState::LoadFailed {
                    message: e.to_string(),
                };
                return false;
            }
        };

        let context = SessionContext::new(self.email.clone());
        match QuizSession::new(context, questions, self.time_limit_secs) {
            Ok(session) => {
                info!(
                    session = %session.context().id,
                    questions = session.len(),
                    time_limit = self.time_limit_secs,
                    "session started"
                );
                self.option_cursor = 0;
                self.overview_cursor = None;
                self.state = AppState::Quiz(session);
                true
            }
            Err(e) => {
                error!(error = %e, "could not start session");
                self.state = AppState::LoadFailed {
                    message: e.to_string(),
                };
                false
            }
        }
    }

    /// Advance the countdown by one second. Expiry submits the session.
    pub fn tick(&mut self) {
        let AppState::Quiz(session) = &mut self.state else {
            return;
        };

        if session.tick() == Tick::Expired {
            self.submit_with(SubmitTrigger::TimerExpired);
        }
    }

    /// Submit the running session. Returns false when there is none.
    pub fn submit(&mut self) -> bool {
        self.submit_with(SubmitTrigger::Manual)
    }

    fn submit_with(&mut self, trigger: SubmitTrigger) -> bool {
        let session = match std::mem::take(&mut self.state) {
            AppState::Quiz(session) => session,
            other => {
                self.state = other;
                return false;
            }
        };

        let (context, submission) = session.submit();
        let report = report_for(Some(&submission));
        match &report {
            Ok(report) => info!(
                session = %context.id,
                ?trigger,
                score = report.score,
                total = report.total(),
                "session submitted"
            ),
            Err(e) => warn!(session = %context.id, error = %e, "submitted without a report"),
        }

        self.overview_cursor = None;
        self.state = AppState::Report(ReportScreen {
            context,
            report,
            trigger,
            scroll: 0,
        });
        true
    }

    /// Back to the start screen with the last email filled in.
    pub fn restart(&mut self) {
        self.option_cursor = 0;
        self.overview_cursor = None;
        self.state = AppState::EmailEntry {
            input: self.email.clone(),
            error: None,
        };
    }

    fn handle_email_key(&mut self, key: KeyCode) -> Action {
        let AppState::EmailEntry { input, error } = &mut self.state else {
            return Action::None;
        };

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') if input.is_empty() => Action::Quit,
            KeyCode::Esc => Action::Quit,
            KeyCode::Char(c) => {
                *error = None;
                if input.chars().count() < MAX_EMAIL_LENGTH {
                    input.push(c);
                }
                Action::None
            }
            KeyCode::Backspace => {
                *error = None;
                input.pop();
                Action::None
            }
            KeyCode::Enter => match validate_email(input) {
                Ok(email) => {
                    if let Some(store) = &self.email_store {
                        if let Err(e) = store.save(&email) {
                            warn!(
                                path = %store.path().display(),
                                error = %e,
                                "failed to store email"
                            );
                        }
                    }
                    self.email = email;
                    self.state = AppState::Loading;
                    Action::Fetch
                }
                Err(e) => {
                    *error = Some(e.to_string());
                    Action::None
                }
            },
            _ => Action::None,
        }
    }

    fn handle_failure_key(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.restart();
                Action::None
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }

    fn handle_quiz_key(&mut self, key: KeyCode) -> Action {
        let AppState::Quiz(session) = &mut self.state else {
            return Action::None;
        };
        let option_count = session.current_question().options.len();

        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.option_cursor = (self.option_cursor + option_count - 1) % option_count;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.option_cursor = (self.option_cursor + 1) % option_count;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Err(e) = session.choose(self.option_cursor) {
                    warn!(error = %e, "selection rejected");
                }
            }
            KeyCode::Char('c') | KeyCode::Backspace => {
                session.clear_current();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if session.previous().is_ok() {
                    self.sync_option_cursor();
                }
            }
            KeyCode::Right | KeyCode::Char('l') => match session.next() {
                Step::Moved(_) => self.sync_option_cursor(),
                Step::Finish => {
                    self.submit_with(SubmitTrigger::Finished);
                }
            },
            KeyCode::Char('g') => {
                self.overview_cursor = Some(session.current());
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.submit_with(SubmitTrigger::Manual);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => return Action::Quit,
            _ => {}
        }

        Action::None
    }

    fn handle_overview_key(&mut self, key: KeyCode) -> Action {
        let (AppState::Quiz(session), Some(cursor)) = (&mut self.state, self.overview_cursor)
        else {
            return Action::None;
        };
        let last = session.len() - 1;

        match key {
            KeyCode::Left | KeyCode::Char('h') => {
                self.overview_cursor = Some(cursor.saturating_sub(1));
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.overview_cursor = Some((cursor + 1).min(last));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.overview_cursor = Some(cursor.saturating_sub(OVERVIEW_COLUMNS));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.overview_cursor = Some((cursor + OVERVIEW_COLUMNS).min(last));
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Err(e) = session.go_to(cursor) {
                    warn!(error = %e, "jump rejected");
                }
                self.overview_cursor = None;
                self.sync_option_cursor();
            }
            KeyCode::Esc | KeyCode::Char('g') => {
                self.overview_cursor = None;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => return Action::Quit,
            _ => {}
        }

        Action::None
    }

    fn handle_report_key(&mut self, key: KeyCode) -> Action {
        let AppState::Report(screen) = &mut self.state else {
            return Action::None;
        };

        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                let max_scroll = screen
                    .report
                    .as_ref()
                    .map(|r| r.total().saturating_sub(1))
                    .unwrap_or(0);
                screen.scroll = (screen.scroll + 1).min(max_scroll);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                screen.scroll = screen.scroll.saturating_sub(1);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.restart(),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Action::Quit,
            _ => {}
        }

        Action::None
    }

    /// Point the option cursor at the current answer, or the first option.
    fn sync_option_cursor(&mut self) {
        self.option_cursor = self
            .session()
            .and_then(|session| {
                let chosen = session.answer(session.current())?;
                session.current_question().option_index(chosen)
            })
            .unwrap_or(0);
    }
}
