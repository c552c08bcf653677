use actix_multipart::Multipart;
use actix_web::{post, web, HttpRequest, HttpResponse};
use futures::StreamExt;

use crate::{
    app_state::AppState,
    auth::{CallerIdentity, Operation},
    errors::{AppError, AppResult},
    middleware::get_request_id,
    services::SpreadsheetUpload,
};

const FILE_FIELD: &str = "file";

/// Bulk upload of a question spreadsheet. The response always carries the
/// per-row report, even when every row was rejected.
#[post("/api/questions/bulk-upload")]
pub async fn bulk_upload(
    req: HttpRequest,
    state: web::Data<AppState>,
    caller: CallerIdentity,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    // Reject before buffering the body when the caller cannot import anyway.
    state
        .catalog_service
        .authorize(Operation::BulkImport, &caller.0)?;

    let upload = read_upload(payload, state.config.max_upload_bytes).await?;
    let report = state.catalog_service.bulk_import(&caller.0, upload).await?;
    log::info!(
        "Bulk upload {} finished with status {:?}",
        get_request_id(&req).as_deref().unwrap_or("-"),
        report.status
    );
    Ok(HttpResponse::Ok().json(report))
}

async fn read_upload(mut payload: Multipart, max_bytes: usize) -> AppResult<SpreadsheetUpload> {
    while let Some(item) = payload.next().await {
        let mut field = item
            .map_err(|e| AppError::ValidationError(format!("Malformed multipart body: {}", e)))?;

        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(str::to_string));
        if name.as_deref() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(str::to_string))
            .unwrap_or_default();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| AppError::ValidationError(format!("Upload interrupted: {}", e)))?;
            if bytes.len() + chunk.len() > max_bytes {
                return Err(AppError::ValidationError(format!(
                    "File exceeds the {} byte upload limit",
                    max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        return Ok(SpreadsheetUpload::new(file_name, bytes));
    }

    Err(AppError::ValidationError(format!(
        "Multipart field '{}' is required",
        FILE_FIELD
    )))
}
