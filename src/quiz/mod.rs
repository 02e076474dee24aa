//! Quiz core: the session state machine, its countdown and the report.

mod report;
mod session;
mod timer;

pub use report::{QuestionOutcome, Report, ReportError, Status, compute_report, report_for};
pub use session::{
    AnswerMap, OverviewStatus, QuizSession, SessionContext, SessionError, Step, Submission,
};
pub use timer::{Countdown, Tick};

/// Default time allowed for one session, in seconds.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 30 * 60;
