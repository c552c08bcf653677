use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, to_document, Bson, Document},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{Question, QuestionDraft},
    services::filter_builder::FilterSpec,
};

/// Persistent catalog access. Implementations own the stored records; every
/// method is a single round-trip and record-level atomicity is delegated to
/// the backing store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn find_by_number(&self, ques_number: i64) -> AppResult<Option<Question>>;
    async fn find_by_numbers(&self, ques_numbers: &[i64]) -> AppResult<Vec<Question>>;
    /// One page of matches ordered by `ques_number`, plus the size of the
    /// whole matching set.
    async fn query(&self, spec: &FilterSpec) -> AppResult<(Vec<Question>, u64)>;
    /// Inserts a new record with `created_at = now`. Fails with
    /// `AlreadyExists` when the `ques_number` is taken, never overwrites.
    async fn insert(&self, draft: QuestionDraft) -> AppResult<Question>;
    /// Inserts with `created_at = now`, or replaces every field except
    /// `created_at` when the `ques_number` already exists.
    async fn upsert(&self, draft: QuestionDraft) -> AppResult<Question>;
    async fn delete(&self, ques_number: i64) -> AppResult<()>;
    async fn distinct_values(&self, field: &'static str) -> AppResult<Vec<String>>;
    async fn ping(&self) -> AppResult<()>;
}

pub struct MongoQuestionRepository {
    db: Database,
    collection: Collection<Question>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self {
            db: db.clone(),
            collection,
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for {} collection", self.collection.name());

        let number_index = IndexModel::builder()
            .keys(doc! { "ques_number": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("ques_number_unique".to_string())
                    .build(),
            )
            .build();

        let filter_index = IndexModel::builder()
            .keys(doc! { "topic": 1, "difficulty": 1, "source": 1, "ques_number": 1 })
            .options(
                IndexOptions::builder()
                    .name("catalog_filters".to_string())
                    .build(),
            )
            .build();

        self.collection
            .create_indexes([number_index, filter_index])
            .await?;

        log::info!("Successfully created indexes for {} collection", self.collection.name());
        Ok(())
    }
}

pub(crate) fn filter_document(spec: &FilterSpec) -> Document {
    let mut filter = Document::new();
    if let Some(topic) = spec.topic() {
        filter.insert("topic", topic);
    }
    if let Some(difficulty) = spec.difficulty() {
        filter.insert("difficulty", difficulty);
    }
    if let Some(source) = spec.source() {
        filter.insert("source", source);
    }
    if let Some(q_type) = spec.q_type() {
        filter.insert("q_type", i32::from(q_type));
    }
    filter
}

/// `$set` carries every draft field; `created_at` is only written on insert.
pub(crate) fn update_document(draft: &QuestionDraft, now: DateTime<Utc>) -> AppResult<Document> {
    Ok(doc! {
        "$set": to_document(draft)?,
        "$setOnInsert": { "created_at": to_bson(&now)? },
    })
}

const DUPLICATE_KEY_CODE: i32 = 11000;

fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        _ => false,
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn find_by_number(&self, ques_number: i64) -> AppResult<Option<Question>> {
        let question = self
            .collection
            .find_one(doc! { "ques_number": ques_number })
            .await?;
        Ok(question)
    }

    async fn find_by_numbers(&self, ques_numbers: &[i64]) -> AppResult<Vec<Question>> {
        if ques_numbers.is_empty() {
            return Ok(Vec::new());
        }

        let cursor = self
            .collection
            .find(doc! { "ques_number": { "$in": ques_numbers.to_vec() } })
            .await?;
        let questions: Vec<Question> = cursor.try_collect().await?;
        Ok(questions)
    }

    async fn query(&self, spec: &FilterSpec) -> AppResult<(Vec<Question>, u64)> {
        let filter = filter_document(spec);

        let total = self.collection.count_documents(filter.clone()).await?;

        let find_options = FindOptions::builder()
            .sort(doc! { "ques_number": 1 })
            .skip(Some(spec.offset()))
            .limit(Some(spec.limit() as i64))
            .build();

        let cursor = self.collection.find(filter).with_options(find_options).await?;
        let items: Vec<Question> = cursor.try_collect().await?;

        Ok((items, total))
    }

    async fn insert(&self, draft: QuestionDraft) -> AppResult<Question> {
        let question = draft.into_question(Utc::now());

        match self.collection.insert_one(&question).await {
            Ok(_) => Ok(question),
            Err(err) if is_duplicate_key(&err) => Err(AppError::AlreadyExists(format!(
                "Question {} already exists",
                question.ques_number
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn upsert(&self, draft: QuestionDraft) -> AppResult<Question> {
        let ques_number = draft.ques_number;
        let update = update_document(&draft, Utc::now())?;

        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        self.collection
            .find_one_and_update(doc! { "ques_number": ques_number }, update)
            .with_options(options)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "Upsert of question {} returned no document",
                    ques_number
                ))
            })
    }

    async fn delete(&self, ques_number: i64) -> AppResult<()> {
        let result = self
            .collection
            .delete_one(doc! { "ques_number": ques_number })
            .await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Question {} not found",
                ques_number
            )));
        }

        Ok(())
    }

    async fn distinct_values(&self, field: &'static str) -> AppResult<Vec<String>> {
        let values = self.collection.distinct(field, doc! {}).await?;

        let mut values: Vec<String> = values
            .into_iter()
            .filter_map(|value| match value {
                Bson::String(s) if !s.is_empty() => Some(s),
                _ => None,
            })
            .collect();
        values.sort();
        Ok(values)
    }

    async fn ping(&self) -> AppResult<()> {
        self.db.health_check().await
    }
}
