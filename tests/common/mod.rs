#![allow(dead_code)]

use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;
use tokio::sync::RwLock;

use tmua_server::{
    app_state::AppState,
    auth::{JwtService, Role},
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Question, QuestionDraft},
    repositories::QuestionRepository,
    services::FilterSpec,
};

pub const TEST_SECRET: &str = "integration_test_secret_that_is_long_enough";

/// Store double backed by a `BTreeMap`, so iteration is already ordered by
/// `ques_number`. Numbers in `failing` make `upsert` fail with a storage error.
#[derive(Clone, Default)]
pub struct InMemoryQuestionRepository {
    questions: Arc<RwLock<BTreeMap<i64, Question>>>,
    failing: Arc<RwLock<HashSet<i64>>>,
    writes: Arc<RwLock<Vec<i64>>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, question: Question) {
        self.questions
            .write()
            .await
            .insert(question.ques_number, question);
    }

    pub async fn fail_upserts_for(&self, ques_number: i64) {
        self.failing.write().await.insert(ques_number);
    }

    pub async fn snapshot(&self) -> BTreeMap<i64, Question> {
        self.questions.read().await.clone()
    }

    pub async fn writes(&self) -> Vec<i64> {
        self.writes.read().await.clone()
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn find_by_number(&self, ques_number: i64) -> AppResult<Option<Question>> {
        Ok(self.questions.read().await.get(&ques_number).cloned())
    }

    async fn find_by_numbers(&self, ques_numbers: &[i64]) -> AppResult<Vec<Question>> {
        let questions = self.questions.read().await;
        Ok(ques_numbers
            .iter()
            .filter_map(|n| questions.get(n).cloned())
            .collect())
    }

    async fn query(&self, spec: &FilterSpec) -> AppResult<(Vec<Question>, u64)> {
        let questions = self.questions.read().await;
        let matching: Vec<&Question> = questions.values().filter(|q| spec.matches(q)).collect();

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(spec.offset() as usize)
            .take(spec.limit() as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn insert(&self, draft: QuestionDraft) -> AppResult<Question> {
        let mut questions = self.questions.write().await;
        if questions.contains_key(&draft.ques_number) {
            return Err(AppError::AlreadyExists(format!(
                "Question {} already exists",
                draft.ques_number
            )));
        }

        let question = draft.into_question(Utc::now());
        questions.insert(question.ques_number, question.clone());
        self.writes.write().await.push(question.ques_number);
        Ok(question)
    }

    async fn upsert(&self, draft: QuestionDraft) -> AppResult<Question> {
        if self.failing.read().await.contains(&draft.ques_number) {
            return Err(AppError::DatabaseError(format!(
                "simulated write failure for {}",
                draft.ques_number
            )));
        }

        let mut questions = self.questions.write().await;
        let created_at = questions
            .get(&draft.ques_number)
            .map(|existing| existing.created_at)
            .unwrap_or_else(Utc::now);

        let question = draft.into_question(created_at);
        questions.insert(question.ques_number, question.clone());
        self.writes.write().await.push(question.ques_number);
        Ok(question)
    }

    async fn delete(&self, ques_number: i64) -> AppResult<()> {
        self.writes.write().await.push(ques_number);
        self.questions
            .write()
            .await
            .remove(&ques_number)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Question {} not found", ques_number)))
    }

    async fn distinct_values(&self, field: &'static str) -> AppResult<Vec<String>> {
        let questions = self.questions.read().await;
        let mut values: Vec<String> = questions
            .values()
            .filter_map(|q| match field {
                "topic" => Some(q.topic.clone()),
                "difficulty" => Some(q.difficulty.clone()),
                "source" => Some(q.source.clone()),
                _ => None,
            })
            .collect();
        values.sort();
        values.dedup();
        Ok(values)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

pub fn test_config() -> Config {
    let mut config = Config::from_env();
    config.app_env = "test".to_string();
    config.jwt_secret = SecretString::from(TEST_SECRET.to_string());
    config.allow_anonymous_read = false;
    config.max_page_size = 100;
    config.default_page_size = 20;
    config.max_upload_bytes = 1024 * 1024;
    config
}

pub fn app_state(repository: InMemoryQuestionRepository) -> AppState {
    AppState::with_repository(test_config(), Arc::new(repository))
}

pub fn bearer(role: Role) -> (&'static str, String) {
    let token = JwtService::new(&SecretString::from(TEST_SECRET.to_string()), 1)
        .create_token(&format!("{}-it", role), role)
        .expect("token");
    ("Authorization", format!("Bearer {}", token))
}

pub fn draft(ques_number: i64, topic: &str, difficulty: &str) -> QuestionDraft {
    QuestionDraft {
        ques_number,
        question: format!("Question {}", ques_number),
        options: "A) 1 B) 2 C) 3".to_string(),
        solution: "Worked solution".to_string(),
        correct_answer: "A".to_string(),
        topic: topic.to_string(),
        difficulty: difficulty.to_string(),
        source: "TMUA 2021".to_string(),
        q_type: 1,
        image: None,
        solution_image: None,
    }
}
