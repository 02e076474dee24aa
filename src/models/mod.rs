mod question;

pub use question::{Question, QuestionRecord};
