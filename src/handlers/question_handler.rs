use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::CallerIdentity,
    errors::AppError,
    models::dto::{
        request::{FilterParams, QuestionPayload},
        response::DeleteQuestionResponse,
    },
};

#[get("/api/questions")]
pub async fn list_questions(
    state: web::Data<AppState>,
    query: web::Query<FilterParams>,
    caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let page = state
        .catalog_service
        .list_questions(&caller.0, &query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

// Registered ahead of `/{ques_number}` so "filters" is not read as an id.
#[get("/api/questions/filters")]
pub async fn question_filters(
    state: web::Data<AppState>,
    caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let options = state.catalog_service.filter_options(&caller.0).await?;
    Ok(HttpResponse::Ok().json(options))
}

#[get("/api/questions/{ques_number}")]
pub async fn get_question(
    state: web::Data<AppState>,
    ques_number: web::Path<i64>,
    caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let question = state
        .catalog_service
        .get_question(&caller.0, ques_number.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(question))
}

#[post("/api/questions")]
pub async fn create_question(
    state: web::Data<AppState>,
    payload: web::Json<QuestionPayload>,
    caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let question = state
        .catalog_service
        .create_question(&caller.0, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(question))
}

#[put("/api/questions/{ques_number}")]
pub async fn update_question(
    state: web::Data<AppState>,
    ques_number: web::Path<i64>,
    payload: web::Json<QuestionPayload>,
    caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let question = state
        .catalog_service
        .update_question(&caller.0, ques_number.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(question))
}

#[delete("/api/questions/{ques_number}")]
pub async fn delete_question(
    state: web::Data<AppState>,
    ques_number: web::Path<i64>,
    caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let ques_number = ques_number.into_inner();
    state
        .catalog_service
        .delete_question(&caller.0, ques_number)
        .await?;

    Ok(HttpResponse::Ok().json(DeleteQuestionResponse {
        ques_number,
        message: format!("Question {} deleted", ques_number),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{AuthMiddleware, Role},
        repositories::MockQuestionRepository,
        test_utils::{
            fixtures::{sample_payload, sample_question},
            test_helpers::{bearer, test_app_state},
        },
    };
    use actix_web::{http::StatusCode, test, App};

    macro_rules! init_app {
        ($repo:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(test_app_state($repo)))
                    .wrap(AuthMiddleware)
                    .service(list_questions)
                    .service(question_filters)
                    .service(get_question)
                    .service(create_question)
                    .service(update_question)
                    .service(delete_question),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_list_requires_credentials_by_default() {
        let mut repo = MockQuestionRepository::new();
        repo.expect_query().never();
        let app = init_app!(repo);

        let req = test::TestRequest::get().uri("/api/questions").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_list_returns_page_with_metadata() {
        let mut repo = MockQuestionRepository::new();
        repo.expect_query()
            .withf(|spec| spec.offset() == 2 && spec.limit() == 2 && spec.topic() == Some("Algebra"))
            .returning(|_| Ok((vec![sample_question(3), sample_question(4)], 5)));
        let app = init_app!(repo);

        let req = test::TestRequest::get()
            .uri("/api/questions?topic=Algebra&offset=2&limit=2&colour=blue")
            .insert_header(bearer(Role::User))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total_count"], 5);
        assert_eq!(body["page"], 2);
        assert_eq!(body["has_next"], true);
        assert_eq!(body["items"][0]["ques_number"], 3);
    }

    #[actix_web::test]
    async fn test_non_numeric_q_type_is_bad_request() {
        let app = init_app!(MockQuestionRepository::new());

        let req = test::TestRequest::get()
            .uri("/api/questions?q_type=mcq")
            .insert_header(bearer(Role::User))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_filters_route_is_not_an_id() {
        let mut repo = MockQuestionRepository::new();
        repo.expect_find_by_number().never();
        repo.expect_distinct_values().returning(|_| Ok(vec!["x".to_string()]));
        let app = init_app!(repo);

        let req = test::TestRequest::get()
            .uri("/api/questions/filters")
            .insert_header(bearer(Role::User))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["difficulties"], serde_json::json!(["Easy", "Medium", "Hard"]));
    }

    #[actix_web::test]
    async fn test_get_missing_question_is_404() {
        let mut repo = MockQuestionRepository::new();
        repo.expect_find_by_number().returning(|_| Ok(None));
        let app = init_app!(repo);

        let req = test::TestRequest::get()
            .uri("/api/questions/99")
            .insert_header(bearer(Role::User))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_student_cannot_delete() {
        let mut repo = MockQuestionRepository::new();
        repo.expect_delete().never();
        let app = init_app!(repo);

        let req = test::TestRequest::delete()
            .uri("/api/questions/7")
            .insert_header(bearer(Role::User))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_admin_creates_question() {
        let mut repo = MockQuestionRepository::new();
        repo.expect_insert()
            .times(1)
            .returning(|draft| Ok(draft.into_question(chrono::Utc::now())));
        let app = init_app!(repo);

        let req = test::TestRequest::post()
            .uri("/api/questions")
            .insert_header(bearer(Role::Admin))
            .set_json(sample_payload_json(11))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn test_invalid_token_is_rejected() {
        let app = init_app!(MockQuestionRepository::new());

        let req = test::TestRequest::get()
            .uri("/api/questions")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    fn sample_payload_json(ques_number: i64) -> serde_json::Value {
        let payload = sample_payload(ques_number);
        serde_json::json!({
            "ques_number": payload.ques_number,
            "question": payload.question,
            "options": payload.options,
            "solution": payload.solution,
            "correct_answer": payload.correct_answer,
            "topic": payload.topic,
            "difficulty": payload.difficulty,
            "source": payload.source,
            "q_type": payload.q_type,
        })
    }
}
