use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog entry in the `TMUA` collection. `ques_number` is the identity
/// used for lookups, deduplication and upserts.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Question {
    pub ques_number: i64,
    pub question: String,
    pub options: String, // raw option text as authored in the sheet
    pub solution: String,
    pub correct_answer: String,
    pub topic: String,
    pub difficulty: String,
    pub source: String,
    pub q_type: i16,
    pub image: Option<String>,
    pub solution_image: Option<String>,
    pub created_at: DateTime<Utc>, // set on first insert, never rewritten
}

/// Every mutable field of a [`Question`]. This is what create, update and
/// import hand to the store; the store owns `created_at`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionDraft {
    pub ques_number: i64,
    pub question: String,
    pub options: String,
    pub solution: String,
    pub correct_answer: String,
    pub topic: String,
    pub difficulty: String,
    pub source: String,
    pub q_type: i16,
    pub image: Option<String>,
    pub solution_image: Option<String>,
}

impl QuestionDraft {
    pub fn into_question(self, created_at: DateTime<Utc>) -> Question {
        Question {
            ques_number: self.ques_number,
            question: self.question,
            options: self.options,
            solution: self.solution,
            correct_answer: self.correct_answer,
            topic: self.topic,
            difficulty: self.difficulty,
            source: self.source,
            q_type: self.q_type,
            image: self.image,
            solution_image: self.solution_image,
            created_at,
        }
    }
}

impl From<Question> for QuestionDraft {
    fn from(question: Question) -> Self {
        QuestionDraft {
            ques_number: question.ques_number,
            question: question.question,
            options: question.options,
            solution: question.solution,
            correct_answer: question.correct_answer,
            topic: question.topic,
            difficulty: question.difficulty,
            source: question.source,
            q_type: question.q_type,
            image: question.image,
            solution_image: question.solution_image,
        }
    }
}
