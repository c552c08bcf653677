use std::{collections::HashMap, sync::Arc};

use validator::Validate;

use crate::{
    auth::{AccessPolicy, IdentityContext, Operation},
    errors::{AppError, AppResult},
    models::{
        domain::{ImportAction, ImportOutcome, ParsedSheet, Question},
        dto::{
            request::{FilterParams, QuestionPayload},
            response::{BulkImportReport, FilterOptions, QuestionPage, RowReport, RowStatus},
        },
    },
    repositories::QuestionRepository,
    services::{
        filter_builder::CatalogFilterBuilder,
        import_reconciler::{ColumnMap, ImportReconciler},
        spreadsheet::{parse_spreadsheet, SpreadsheetUpload},
    },
};

pub const DIFFICULTY_LEVELS: [&str; 3] = ["Easy", "Medium", "Hard"];

/// Entry point for every catalog operation. Each call is authorized before
/// anything else happens, so a denied caller never reaches the store.
pub struct CatalogService {
    repository: Arc<dyn QuestionRepository>,
    policy: AccessPolicy,
    filter_builder: CatalogFilterBuilder,
}

impl CatalogService {
    pub fn new(
        repository: Arc<dyn QuestionRepository>,
        policy: AccessPolicy,
        filter_builder: CatalogFilterBuilder,
    ) -> Self {
        Self {
            repository,
            policy,
            filter_builder,
        }
    }

    /// Runs the access policy on its own, for boundaries that want to refuse a
    /// caller before doing any work of their own.
    pub fn authorize(&self, operation: Operation, identity: &IdentityContext) -> AppResult<()> {
        self.policy.authorize(operation, identity).inspect_err(|err| {
            log::warn!("Denied {} for {}: {}", operation, identity.display_name(), err);
        })
    }

    pub async fn list_questions(
        &self,
        identity: &IdentityContext,
        params: &FilterParams,
    ) -> AppResult<QuestionPage> {
        self.authorize(Operation::Read, identity)?;

        let spec = self.filter_builder.build(params)?;
        let (items, total) = self.repository.query(&spec).await?;

        Ok(QuestionPage::new(items, total, spec.offset(), spec.limit()))
    }

    pub async fn get_question(
        &self,
        identity: &IdentityContext,
        ques_number: i64,
    ) -> AppResult<Question> {
        self.authorize(Operation::Read, identity)?;

        self.repository
            .find_by_number(ques_number)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question {} not found", ques_number)))
    }

    pub async fn filter_options(&self, identity: &IdentityContext) -> AppResult<FilterOptions> {
        self.authorize(Operation::Read, identity)?;

        let topics = self.repository.distinct_values("topic").await?;
        let sources = self.repository.distinct_values("source").await?;

        Ok(FilterOptions {
            topics,
            difficulties: DIFFICULTY_LEVELS.iter().map(|d| d.to_string()).collect(),
            sources,
        })
    }

    pub async fn create_question(
        &self,
        identity: &IdentityContext,
        payload: QuestionPayload,
    ) -> AppResult<Question> {
        self.authorize(Operation::Create, identity)?;
        payload.validate()?;

        let question = self.repository.insert(payload.into_draft()).await?;
        log::info!("Question {} created by {}", question.ques_number, identity.display_name());
        Ok(question)
    }

    pub async fn update_question(
        &self,
        identity: &IdentityContext,
        ques_number: i64,
        payload: QuestionPayload,
    ) -> AppResult<Question> {
        self.authorize(Operation::Update, identity)?;

        if payload.ques_number != ques_number {
            return Err(AppError::ValidationError(format!(
                "ques_number {} in body does not match {} in path",
                payload.ques_number, ques_number
            )));
        }
        payload.validate()?;

        if self.repository.find_by_number(ques_number).await?.is_none() {
            return Err(AppError::NotFound(format!("Question {} not found", ques_number)));
        }

        let question = self.repository.upsert(payload.into_draft()).await?;
        log::info!("Question {} updated by {}", ques_number, identity.display_name());
        Ok(question)
    }

    pub async fn delete_question(
        &self,
        identity: &IdentityContext,
        ques_number: i64,
    ) -> AppResult<()> {
        self.authorize(Operation::Delete, identity)?;

        self.repository.delete(ques_number).await?;
        log::info!("Question {} deleted by {}", ques_number, identity.display_name());
        Ok(())
    }

    /// Parses the upload, reconciles it against the catalog and persists the
    /// accepted rows one by one in file order. Rows written before a failure
    /// (or before the request is dropped) stay written.
    pub async fn bulk_import(
        &self,
        identity: &IdentityContext,
        upload: SpreadsheetUpload,
    ) -> AppResult<BulkImportReport> {
        self.authorize(Operation::BulkImport, identity)?;

        log::info!(
            "Bulk import of '{}' ({} bytes) by {}",
            upload.file_name,
            upload.bytes.len(),
            identity.display_name()
        );

        let sheet = tokio::task::spawn_blocking(move || parse_spreadsheet(&upload))
            .await
            .map_err(|e| AppError::InternalError(format!("Spreadsheet parser failed: {}", e)))??;

        self.import_sheet(sheet).await
    }

    async fn import_sheet(&self, sheet: ParsedSheet) -> AppResult<BulkImportReport> {
        if sheet.headers.is_empty() && sheet.rows.is_empty() {
            return Ok(BulkImportReport::from_rows(Vec::new()));
        }

        let reconciler = ImportReconciler::new(ColumnMap::resolve(&sheet.headers)?);

        let candidates = reconciler.candidate_numbers(&sheet.rows);
        let existing: HashMap<i64, Question> = self
            .repository
            .find_by_numbers(&candidates)
            .await?
            .into_iter()
            .map(|q| (q.ques_number, q))
            .collect();

        let outcomes = reconciler.reconcile(&sheet.rows, &existing);
        log::debug!(
            "{} of {} rows accepted for persistence",
            outcomes.iter().filter(|o| o.is_accepted()).count(),
            outcomes.len()
        );

        let mut reports = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            reports.push(self.apply_outcome(outcome).await);
        }

        let report = BulkImportReport::from_rows(reports);
        log::info!(
            "Bulk import finished: {} rows, {} inserted, {} updated, {} rejected, {} superseded, {} failed",
            report.total_rows,
            report.inserted,
            report.updated,
            report.rejected.len(),
            report.superseded.len(),
            report.persistence_failures.len()
        );
        Ok(report)
    }

    async fn apply_outcome(&self, outcome: ImportOutcome) -> RowReport {
        let row_number = outcome.row_number();
        let ques_number = outcome.ques_number();

        let (status, message) = match outcome {
            ImportOutcome::Accepted {
                action, question, ..
            } => match self.repository.upsert(question).await {
                Ok(_) => match action {
                    ImportAction::Insert => (RowStatus::Inserted, None),
                    ImportAction::Update => (RowStatus::Updated, None),
                },
                Err(err) => {
                    log::error!(
                        "Row {} (question {:?}) failed to persist, retryable={}: {}",
                        row_number,
                        ques_number,
                        err.is_retryable(),
                        err
                    );
                    (RowStatus::PersistenceFailed, Some(err.to_string()))
                }
            },
            ImportOutcome::Superseded { superseded_by, .. } => (
                RowStatus::Superseded,
                Some(format!("superseded by row {}", superseded_by)),
            ),
            ImportOutcome::Rejected { error, .. } => {
                log::warn!("Row {} rejected: {}", row_number, error);
                (RowStatus::Rejected, Some(error.to_string()))
            }
        };

        RowReport {
            row_number,
            ques_number,
            status,
            message,
        }
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
