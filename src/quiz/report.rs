//! Scoring of a finished session.

use thiserror::Error;

use crate::models::Question;

use super::session::{AnswerMap, Submission};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Correct,
    Incorrect,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOutcome {
    pub index: usize,
    pub prompt: String,
    pub status: Status,
    pub chosen: Option<String>,
    pub correct: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub outcomes: Vec<QuestionOutcome>,
    pub score: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("no completed quiz session")]
    NoSession,
}

impl Report {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn percentage(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            (self.score as f64 / self.outcomes.len() as f64) * 100.0
        }
    }

    pub fn count(&self, status: Status) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}

/// Classify every question. Answers are compared to the decoded correct
/// answer by exact, case-sensitive text match.
pub fn compute_report(questions: &[Question], answers: &AnswerMap) -> Report {
    let outcomes: Vec<QuestionOutcome> = questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let chosen = answers.get(&index).cloned();
            let status = match &chosen {
                None => Status::Skipped,
                Some(answer) if *answer == question.correct_answer => Status::Correct,
                Some(_) => Status::Incorrect,
            };

            QuestionOutcome {
                index,
                prompt: question.prompt.clone(),
                status,
                chosen,
                correct: question.correct_answer.clone(),
            }
        })
        .collect();

    let score = outcomes
        .iter()
        .filter(|o| o.status == Status::Correct)
        .count();

    Report { outcomes, score }
}

/// Report for a submission, or `NoSession` when there is nothing to score.
pub fn report_for(submission: Option<&Submission>) -> Result<Report, ReportError> {
    match submission {
        Some(submission) if !submission.questions.is_empty() => {
            Ok(compute_report(&submission.questions, &submission.answers))
        }
        _ => Err(ReportError::NoSession),
    }
}
