use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::data::decode_text;

/// One record as returned by the trivia API. Text fields are HTML-encoded.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRecord {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

/// A question ready for display. Options are shuffled once and never again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    pub correct_answer: String,
    pub options: Vec<String>,
    pub category: String,
    pub difficulty: String,
}

impl Question {
    pub fn from_record<R: Rng + ?Sized>(record: QuestionRecord, rng: &mut R) -> Self {
        let correct_answer = decode_text(&record.correct_answer);

        let mut options: Vec<String> = record
            .incorrect_answers
            .iter()
            .map(|answer| decode_text(answer))
            .collect();
        options.push(correct_answer.clone());
        options.shuffle(rng);

        Self {
            prompt: decode_text(&record.question),
            correct_answer,
            options,
            category: decode_text(&record.category),
            difficulty: record.difficulty,
        }
    }

    /// Position of `option` within the frozen option order.
    pub fn option_index(&self, option: &str) -> Option<usize> {
        self.options.iter().position(|candidate| candidate == option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn record() -> QuestionRecord {
        serde_json::from_value(serde_json::json!({
            "type": "multiple",
            "difficulty": "easy",
            "category": "Science &amp; Nature",
            "question": "What is the chemical symbol for &quot;gold&quot;?",
            "correct_answer": "Au",
            "incorrect_answers": ["Ag", "Gd", "Go"]
        }))
        .unwrap()
    }

    #[test]
    fn decodes_text_fields() {
        let question = Question::from_record(record(), &mut StdRng::seed_from_u64(7));
        assert_eq!(question.prompt, "What is the chemical symbol for \"gold\"?");
        assert_eq!(question.category, "Science & Nature");
        assert_eq!(question.difficulty, "easy");
        assert_eq!(question.correct_answer, "Au");
    }

    #[test]
    fn options_are_a_permutation_of_all_answers() {
        let question = Question::from_record(record(), &mut StdRng::seed_from_u64(42));

        let mut options = question.options.clone();
        options.sort();
        assert_eq!(options, vec!["Ag", "Au", "Gd", "Go"]);
    }

    #[test]
    fn duplicate_answers_are_kept() {
        let mut raw = record();
        raw.incorrect_answers = vec!["Au".into(), "Ag".into()];

        let question = Question::from_record(raw, &mut StdRng::seed_from_u64(1));
        assert_eq!(question.options.len(), 3);
        assert_eq!(question.options.iter().filter(|o| *o == "Au").count(), 2);
    }

    #[test]
    fn boolean_questions_have_two_options() {
        let raw: QuestionRecord = serde_json::from_value(serde_json::json!({
            "type": "boolean",
            "difficulty": "medium",
            "category": "History",
            "question": "The Great Wall is visible from the Moon.",
            "correct_answer": "False",
            "incorrect_answers": ["True"]
        }))
        .unwrap();

        let question = Question::from_record(raw, &mut StdRng::seed_from_u64(3));
        assert_eq!(question.options.len(), 2);
        assert!(question.option_index("False").is_some());
        assert!(question.option_index("Maybe").is_none());
    }
}
