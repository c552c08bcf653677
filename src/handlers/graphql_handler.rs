use actix_web::{get, post, web, HttpResponse};
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::{auth::CallerIdentity, graphql::Schema};

/// Executes a GraphQL request as the caller resolved by the auth middleware.
#[post("/graphql")]
pub async fn graphql(
    schema: web::Data<Schema>,
    caller: CallerIdentity,
    request: GraphQLRequest,
) -> GraphQLResponse {
    schema
        .execute(request.into_inner().data(caller.0))
        .await
        .into()
}

#[get("/graphiql")]
pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}
