//! The in-progress quiz session.
//!
//! A `QuizSession` only exists once questions have loaded, so every
//! operation on it is a Ready-state operation. `submit` consumes the session:
//! the countdown stops in the same call and the answers can no longer change.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::Question;

use super::timer::{Countdown, Tick};

/// Chosen option text keyed by question position. Missing means skipped.
pub type AnswerMap = BTreeMap<usize, String>;

/// Context captured before the session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub email: String,
    pub id: Uuid,
}

impl SessionContext {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            id: Uuid::new_v4(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a session needs at least one question")]
    NoQuestions,

    #[error("question {position} is out of range (0..{len})")]
    InvalidNavigation { position: usize, len: usize },

    #[error("already at the first question")]
    AtFirstQuestion,

    #[error("option is not one of the choices for question {position}")]
    UnknownOption { position: usize },
}

/// Outcome of moving forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved(usize),
    /// `next` was called on the last question; the caller should submit.
    Finish,
}

/// How a position is shown in the overview panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverviewStatus {
    Current,
    Attempted,
    Visited,
    Left,
}

/// The frozen payload handed to the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub questions: Vec<Question>,
    pub answers: AnswerMap,
}

#[derive(Debug)]
pub struct QuizSession {
    context: SessionContext,
    questions: Vec<Question>,
    answers: AnswerMap,
    visited: BTreeSet<usize>,
    current: usize,
    countdown: Countdown,
}

impl QuizSession {
    pub fn new(
        context: SessionContext,
        questions: Vec<Question>,
        time_limit_secs: u32,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }

        Ok(Self {
            context,
            questions,
            answers: AnswerMap::new(),
            visited: BTreeSet::from([0]),
            current: 0,
            countdown: Countdown::new(time_limit_secs),
        })
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn answer(&self, position: usize) -> Option<&str> {
        self.answers.get(&position).map(String::as_str)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn is_visited(&self, position: usize) -> bool {
        self.visited.contains(&position)
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Record `option` as the answer for `position`, replacing any earlier one.
    pub fn select_option(&mut self, position: usize, option: &str) -> Result<(), SessionError> {
        let question = self.question_at(position)?;
        if question.option_index(option).is_none() {
            return Err(SessionError::UnknownOption { position });
        }

        self.answers.insert(position, option.to_string());
        Ok(())
    }

    /// Forget the answer for `position`, returning what was chosen.
    pub fn clear_selection(&mut self, position: usize) -> Result<Option<String>, SessionError> {
        self.question_at(position)?;
        Ok(self.answers.remove(&position))
    }

    /// Answer the current question with the option at `option_index`.
    pub fn choose(&mut self, option_index: usize) -> Result<(), SessionError> {
        let position = self.current;
        let option = self
            .current_question()
            .options
            .get(option_index)
            .cloned()
            .ok_or(SessionError::UnknownOption { position })?;

        self.select_option(position, &option)
    }

    pub fn clear_current(&mut self) -> Option<String> {
        self.answers.remove(&self.current)
    }

    pub fn go_to(&mut self, position: usize) -> Result<(), SessionError> {
        self.question_at(position)?;
        self.current = position;
        self.visited.insert(position);
        Ok(())
    }

    pub fn next(&mut self) -> Step {
        if self.is_last() {
            return Step::Finish;
        }

        self.current += 1;
        self.visited.insert(self.current);
        Step::Moved(self.current)
    }

    pub fn previous(&mut self) -> Result<usize, SessionError> {
        if self.is_first() {
            debug!("previous rejected at the first question");
            return Err(SessionError::AtFirstQuestion);
        }

        self.current -= 1;
        self.visited.insert(self.current);
        Ok(self.current)
    }

    pub fn overview_status(&self, position: usize) -> OverviewStatus {
        if position == self.current {
            OverviewStatus::Current
        } else if self.answers.contains_key(&position) {
            OverviewStatus::Attempted
        } else if self.visited.contains(&position) {
            OverviewStatus::Visited
        } else {
            OverviewStatus::Left
        }
    }

    pub fn tick(&mut self) -> Tick {
        self.countdown.tick()
    }

    /// Finish the session. The countdown stops before anything is handed on.
    pub fn submit(mut self) -> (SessionContext, Submission) {
        self.countdown.stop();

        let submission = Submission {
            questions: self.questions,
            answers: self.answers,
        };
        (self.context, submission)
    }

    fn question_at(&self, position: usize) -> Result<&Question, SessionError> {
        self.questions.get(position).ok_or_else(|| {
            debug!(position, len = self.questions.len(), "rejected out-of-range position");
            SessionError::InvalidNavigation {
                position,
                len: self.questions.len(),
            }
        })
    }
}
