use async_graphql::{Context, Object};

use crate::{
    graphql::helpers::{app_state, caller_identity, into_graphql},
    models::{
        domain::Question,
        dto::{request::QuestionPayload, response::DeleteQuestionResponse},
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_question(
        &self,
        ctx: &Context<'_>,
        input: QuestionPayload,
    ) -> async_graphql::Result<Question> {
        let state = app_state(ctx)?;
        let identity = caller_identity(ctx);

        into_graphql(state.catalog_service.create_question(&identity, input).await)
    }

    async fn update_question(
        &self,
        ctx: &Context<'_>,
        ques_number: i64,
        input: QuestionPayload,
    ) -> async_graphql::Result<Question> {
        let state = app_state(ctx)?;
        let identity = caller_identity(ctx);

        into_graphql(
            state
                .catalog_service
                .update_question(&identity, ques_number, input)
                .await,
        )
    }

    async fn delete_question(
        &self,
        ctx: &Context<'_>,
        ques_number: i64,
    ) -> async_graphql::Result<DeleteQuestionResponse> {
        let state = app_state(ctx)?;
        let identity = caller_identity(ctx);

        into_graphql(state.catalog_service.delete_question(&identity, ques_number).await)?;

        Ok(DeleteQuestionResponse {
            ques_number,
            message: format!("Question {} deleted", ques_number),
        })
    }
}
