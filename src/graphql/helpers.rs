use async_graphql::{Context, ErrorExtensions};

use crate::{app_state::AppState, auth::IdentityContext, errors::AppResult};

/// The caller attached to the GraphQL request by the HTTP handler. Requests
/// executed without one (for example in tests) run as anonymous.
pub fn caller_identity(ctx: &Context<'_>) -> IdentityContext {
    ctx.data_opt::<IdentityContext>()
        .cloned()
        .unwrap_or_else(IdentityContext::anonymous)
}

pub fn app_state<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a AppState> {
    ctx.data::<AppState>()
}

/// Converts a service result so the GraphQL error carries the same `code`
/// extension the REST body does.
pub fn into_graphql<T>(result: AppResult<T>) -> async_graphql::Result<T> {
    result.map_err(|err| err.extend())
}
