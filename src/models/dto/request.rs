use async_graphql::InputObject;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::domain::QuestionDraft;

/// Body of a create or update call.
#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct QuestionPayload {
    pub ques_number: i64,

    #[validate(custom(function = "not_blank"))]
    pub question: String,

    #[validate(custom(function = "not_blank"))]
    pub options: String,

    #[validate(custom(function = "not_blank"))]
    pub solution: String,

    #[validate(custom(function = "not_blank"))]
    pub correct_answer: String,

    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub topic: String,

    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub difficulty: String,

    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub source: String,

    pub q_type: i16,

    #[validate(length(max = 2048))]
    #[serde(default)]
    pub image: Option<String>,

    #[validate(length(max = 2048))]
    #[serde(default)]
    pub solution_image: Option<String>,
}

impl QuestionPayload {
    /// Categorical fields are stored trimmed, the same form list filters and
    /// imported cells take, so exact-match filtering finds them.
    pub fn into_draft(self) -> QuestionDraft {
        QuestionDraft {
            ques_number: self.ques_number,
            question: self.question,
            options: self.options,
            solution: self.solution,
            correct_answer: self.correct_answer,
            topic: self.topic.trim().to_string(),
            difficulty: self.difficulty.trim().to_string(),
            source: self.source.trim().to_string(),
            q_type: self.q_type,
            image: none_if_blank(self.image),
            solution_image: none_if_blank(self.solution_image),
        }
    }
}

/// Raw list-query parameters. Everything arrives as text so that malformed
/// pagination can be clamped instead of failing extraction; keys not listed
/// here are ignored.
#[derive(Debug, Clone, Default, Deserialize, InputObject)]
pub struct FilterParams {
    pub topic: Option<String>,
    pub difficulty: Option<String>,
    pub source: Option<String>,
    pub q_type: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
}

impl FilterParams {
    pub fn with_topic(mut self, topic: &str) -> Self {
        self.topic = Some(topic.to_string());
        self
    }

    pub fn with_page(mut self, offset: i64, limit: i64) -> Self {
        self.offset = Some(offset.to_string());
        self.limit = Some(limit.to_string());
        self
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be empty".into());
        return Err(error);
    }
    Ok(())
}

pub(crate) fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
