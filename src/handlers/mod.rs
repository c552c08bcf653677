pub mod graphql_handler;
pub mod health_handler;
pub mod import_handler;
pub mod question_handler;

use actix_web::web;

pub use graphql_handler::{graphiql, graphql};
pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use import_handler::bulk_upload;
pub use question_handler::{
    create_question, delete_question, get_question, list_questions, question_filters,
    update_question,
};

/// Registers every route. `question_filters` and `bulk_upload` must precede
/// the `{ques_number}` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(health_check_ready)
        .service(list_questions)
        .service(question_filters)
        .service(bulk_upload)
        .service(get_question)
        .service(create_question)
        .service(update_question)
        .service(delete_question)
        .service(graphql)
        .service(graphiql);
}
