#[cfg(test)]
pub mod fixtures {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};

    use crate::{
        auth::{IdentityContext, Role},
        models::{
            domain::{ImportRow, Question, QuestionDraft},
            dto::request::QuestionPayload,
        },
    };

    pub const CANONICAL_HEADERS: [&str; 11] = [
        "ques_number",
        "question",
        "options",
        "solution",
        "correct_answer",
        "topic",
        "difficulty",
        "source",
        "q_type",
        "image",
        "solution_image",
    ];

    pub fn sample_draft(ques_number: i64) -> QuestionDraft {
        QuestionDraft {
            ques_number,
            question: format!("Question {}: solve x^2 - 5x + 6 = 0", ques_number),
            options: "A) 1, 6 B) 2, 3 C) -2, -3 D) 0, 5".to_string(),
            solution: "Factorise as (x - 2)(x - 3)".to_string(),
            correct_answer: "B".to_string(),
            topic: "Algebra".to_string(),
            difficulty: "Medium".to_string(),
            source: "TMUA 2019 Paper 1".to_string(),
            q_type: 1,
            image: None,
            solution_image: None,
        }
    }

    pub fn sample_question(ques_number: i64) -> Question {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        sample_draft(ques_number).into_question(created_at)
    }

    pub fn sample_payload(ques_number: i64) -> QuestionPayload {
        let draft = sample_draft(ques_number);
        QuestionPayload {
            ques_number,
            question: draft.question,
            options: draft.options,
            solution: draft.solution,
            correct_answer: draft.correct_answer,
            topic: draft.topic,
            difficulty: draft.difficulty,
            source: draft.source,
            q_type: draft.q_type,
            image: None,
            solution_image: None,
        }
    }

    /// A fully valid row under [`CANONICAL_HEADERS`] with `overrides` applied.
    pub fn import_row(row_number: usize, overrides: &[(&str, &str)]) -> ImportRow {
        let mut cells: BTreeMap<String, String> = [
            ("ques_number", "1"),
            ("question", "What is 2 + 2?"),
            ("options", "A) 3 B) 4 C) 5"),
            ("solution", "Add the numbers"),
            ("correct_answer", "B"),
            ("topic", "Arithmetic"),
            ("difficulty", "Easy"),
            ("source", "TMUA 2018"),
            ("q_type", "1"),
            ("image", ""),
            ("solution_image", ""),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        for (header, value) in overrides {
            cells.insert(header.to_string(), value.to_string());
        }
        ImportRow::new(row_number, cells)
    }

    pub fn admin() -> IdentityContext {
        IdentityContext::new("admin-1", Role::Admin)
    }

    pub fn student() -> IdentityContext {
        IdentityContext::new("student-1", Role::User)
    }

    pub fn anonymous() -> IdentityContext {
        IdentityContext::anonymous()
    }
}

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Arc;

    use actix_web::http::{header::AUTHORIZATION, StatusCode};

    use crate::{
        app_state::AppState,
        auth::{JwtService, Role},
        config::Config,
        repositories::MockQuestionRepository,
    };

    /// App state over a mocked store with anonymous reads disabled.
    pub fn test_app_state(repository: MockQuestionRepository) -> AppState {
        AppState::with_repository(Config::test_config(), Arc::new(repository))
    }

    /// An `Authorization` header carrying a token signed with the test secret.
    pub fn bearer(role: Role) -> (actix_web::http::header::HeaderName, String) {
        let config = Config::test_config();
        let token = JwtService::new(&config.jwt_secret, 1)
            .create_token(&format!("{}-1", role), role)
            .expect("test token");
        (AUTHORIZATION, format!("Bearer {}", token))
    }

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{fixtures::*, test_helpers::*};
    use actix_web::http::StatusCode;
    use validator::Validate;

    #[test]
    fn test_fixtures_are_valid() {
        assert!(sample_payload(1).validate().is_ok());
        assert_eq!(sample_question(9).ques_number, 9);
        assert_eq!(import_row(2, &[]).cells.len(), CANONICAL_HEADERS.len());
    }

    #[test]
    fn test_import_row_overrides() {
        let row = import_row(5, &[("topic", "Geometry")]);
        assert_eq!(row.row_number, 5);
        assert_eq!(row.cell("topic"), Some("Geometry"));
    }

    #[test]
    fn test_status_helpers() {
        assert_error_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_success_status(StatusCode::CREATED);
    }
}
