//! # trivia-quiz
//!
//! A timed multiple-choice trivia quiz for the terminal. Questions come from
//! the Open Trivia DB, the session runs against a countdown, and a scored
//! report is shown at the end.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trivia_quiz::{Quiz, QuizConfig, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let quiz = Quiz::new(&QuizConfig::default())?;
//!
//!     // Run the quiz in the terminal
//!     let app = quiz.run().await?;
//!     if let Some((context, report)) = app.last_result() {
//!         println!("{} scored {}", context.email, report.score);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod app;
pub mod config;
mod data;
pub mod email;
mod models;
pub mod quiz;
pub mod terminal;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures_util::StreamExt;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::info;

pub use app::{Action, App, AppState, OVERVIEW_COLUMNS, ReportScreen, SubmitTrigger};
pub use config::{ConfigError, ConfigOverrides, QuizConfig};
pub use data::{FetchError, OpenTdbClient, decode_text};
pub use email::{EmailError, EmailStore, validate_email};
pub use models::{Question, QuestionRecord};

const TICK_PERIOD: Duration = Duration::from_secs(1);

type FetchResult = Result<Vec<Question>, FetchError>;

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Invalid or unreadable configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The question source could not be set up.
    #[error("failed to set up question source: {0}")]
    Fetch(#[from] FetchError),
    /// IO error during quiz execution.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A quiz instance that can be run in the terminal.
pub struct Quiz {
    app: App,
    client: Arc<OpenTdbClient>,
    amount: usize,
}

impl Quiz {
    pub fn new(config: &QuizConfig) -> Result<Self, QuizError> {
        config.validate()?;
        let client = OpenTdbClient::new(&config.api_url, config.request_timeout_secs)?;

        Ok(Self {
            app: App::new(config.time_limit_secs),
            client: Arc::new(client),
            amount: config.amount,
        })
    }

    /// Persist and prefill the email through `store`.
    pub fn with_email_store(mut self, store: Option<EmailStore>) -> Self {
        self.app = self.app.with_email_store(store);
        self
    }

    /// Prefill the start screen with `email`.
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.app = self.app.with_email(email);
        self
    }

    /// Run the quiz in the terminal.
    ///
    /// This takes over the terminal until the user quits and hands back the
    /// final app state.
    pub async fn run(mut self) -> Result<App, QuizError> {
        let mut guard = terminal::init()?;
        let result =
            run_event_loop(guard.terminal(), &mut self.app, &self.client, self.amount).await;
        guard.restore()?;
        result.map(|()| self.app)
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

async fn run_event_loop(
    terminal: &mut terminal::QuizTerminal,
    app: &mut App,
    client: &Arc<OpenTdbClient>,
    amount: usize,
) -> Result<(), QuizError> {
    let mut events = EventStream::new();
    let mut ticker = time::interval(TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let (fetch_tx, mut fetch_rx) = mpsc::unbounded_channel::<FetchResult>();
    let mut fetch_task: Option<JoinHandle<()>> = None;

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match app.handle_key(key.code) {
                        Action::Quit => break,
                        Action::Fetch => {
                            if let Some(previous) = fetch_task.take() {
                                previous.abort();
                            }
                            fetch_task = Some(spawn_fetch(
                                Arc::clone(client),
                                amount,
                                fetch_tx.clone(),
                            ));
                        }
                        Action::None => {}
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            _ = ticker.tick() => app.tick(),
            Some(result) = fetch_rx.recv() => {
                if app.questions_loaded(result) {
                    // The first second of a session starts now.
                    ticker.reset();
                }
            }
        }
    }

    if let Some(task) = fetch_task {
        task.abort();
    }
    Ok(())
}

fn spawn_fetch(
    client: Arc<OpenTdbClient>,
    amount: usize,
    tx: mpsc::UnboundedSender<FetchResult>,
) -> JoinHandle<()> {
    info!(amount, url = client.api_url(), "fetching questions");
    tokio::spawn(async move {
        let result = client.fetch(amount).await;
        let _ = tx.send(result);
    })
}
