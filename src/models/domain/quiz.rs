use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::quiz_question::Question;
use crate::models::domain::sentence::Sentence;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate, JsonSchema)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[validate(length(min = 1), nested)]
    pub sentences: Vec<Sentence>,
    #[validate(length(min = 1), nested)]
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Questions whose `correctAnswer` is not the Spanish text of any sentence.
    ///
    /// The model is asked to reuse its sentences as answers but nothing forces it to,
    /// so this is reported rather than rejected.
    pub fn unmatched_answers(&self) -> Vec<(usize, &Question)> {
        let spanish: HashSet<&str> = self.sentences.iter().map(|s| s.spanish.as_str()).collect();

        self.questions
            .iter()
            .enumerate()
            .filter(|(_, q)| !spanish.contains(q.correct_answer.as_str()))
            .collect()
    }
}
