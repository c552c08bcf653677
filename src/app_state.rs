use std::sync::Arc;

use crate::{
    auth::{AccessPolicy, IdentityProvider, JwtService},
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{MongoQuestionRepository, QuestionRepository},
    services::{CatalogFilterBuilder, CatalogService},
};

#[derive(Clone)]
pub struct AppState {
    pub catalog_service: Arc<CatalogService>,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Builds the production graph on top of an already connected store.
    pub async fn new(config: Config, db: &Database) -> AppResult<Self> {
        let repository = Arc::new(MongoQuestionRepository::new(db, &config.questions_collection));
        repository.ensure_indexes().await?;

        Ok(Self::with_repository(config, repository))
    }

    pub fn with_repository(config: Config, repository: Arc<dyn QuestionRepository>) -> Self {
        let catalog_service = Arc::new(CatalogService::new(
            repository,
            AccessPolicy::new(config.allow_anonymous_read),
            CatalogFilterBuilder::new(config.max_page_size, config.default_page_size),
        ));
        let identity_provider = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        ));

        Self {
            catalog_service,
            identity_provider,
            config: Arc::new(config),
        }
    }
}
