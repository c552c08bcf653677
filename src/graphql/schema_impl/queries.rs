use async_graphql::{Context, Object};

use crate::{
    graphql::helpers::{app_state, caller_identity, into_graphql},
    models::{
        domain::Question,
        dto::{
            request::FilterParams,
            response::{FilterOptions, QuestionPage},
        },
    },
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Filtered, paginated questions ordered by `ques_number`.
    async fn questions(
        &self,
        ctx: &Context<'_>,
        filter: Option<FilterParams>,
    ) -> async_graphql::Result<QuestionPage> {
        let state = app_state(ctx)?;
        let identity = caller_identity(ctx);
        let params = filter.unwrap_or_default();

        into_graphql(state.catalog_service.list_questions(&identity, &params).await)
    }

    async fn question(
        &self,
        ctx: &Context<'_>,
        ques_number: i64,
    ) -> async_graphql::Result<Question> {
        let state = app_state(ctx)?;
        let identity = caller_identity(ctx);

        into_graphql(state.catalog_service.get_question(&identity, ques_number).await)
    }

    async fn question_filters(&self, ctx: &Context<'_>) -> async_graphql::Result<FilterOptions> {
        let state = app_state(ctx)?;
        let identity = caller_identity(ctx);

        into_graphql(state.catalog_service.filter_options(&identity).await)
    }
}
