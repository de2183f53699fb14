//! Angioplasty request endpoints: form validation, numbering, and the
//! printable document in JSON and PDF form.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::document::{compose_request_document, export_pdf_to_file, render_pdf, RequestDocument};
use crate::models::{AngioplastyRequestData, Clinic, RequestNumber};
use crate::validation::{validate_materials, validate_request, RequestForm};

#[derive(Debug, Serialize)]
pub struct ValidatedRequest {
    pub request: RequestForm,
}

/// `POST /api/requests/validate`
pub async fn validate(Json(form): Json<RequestForm>) -> Result<Json<ValidatedRequest>, ApiError> {
    let request = validate_request(form)?;
    Ok(Json(ValidatedRequest { request }))
}

#[derive(Debug, Serialize)]
pub struct RequestNumberResponse {
    pub request_number: RequestNumber,
}

/// `POST /api/requests/number`: a fresh number dated today.
pub async fn next_number() -> Json<RequestNumberResponse> {
    Json(RequestNumberResponse {
        request_number: RequestNumber::generate(Local::now().date_naive()),
    })
}

/// Clinic letterhead plus the request to print on it.
#[derive(Debug, Deserialize)]
pub struct DocumentBody {
    pub clinic: Clinic,
    pub request: AngioplastyRequestData,
}

fn compose(ctx: &ApiContext, body: &DocumentBody) -> Result<RequestDocument, ApiError> {
    validate_materials(&body.request.materials)?;
    let doc_ctx = ctx.core.document_context(Local::now().date_naive());
    Ok(compose_request_document(&body.clinic, &body.request, &doc_ctx))
}

/// Fetch the letterhead logo, then lay out the PDF off the async runtime.
async fn render(ctx: &ApiContext, document: RequestDocument) -> Result<Vec<u8>, ApiError> {
    let logo = match &document.header.logo {
        Some(slot) => ctx.core.fetch_logo(&slot.url).await,
        None => None,
    };
    tokio::task::spawn_blocking(move || render_pdf(&document, logo.as_deref()))
        .await
        .map_err(|e| ApiError::Internal(format!("render task failed: {e}")))?
        .map_err(ApiError::from)
}

/// Keep the request number usable as a file name.
fn pdf_file_name(number: &RequestNumber) -> String {
    let stem: String = number
        .as_str()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if stem.is_empty() {
        "solicitacao.pdf".to_string()
    } else {
        format!("{stem}.pdf")
    }
}

/// `POST /api/requests/document`: the composed document as JSON.
pub async fn document(
    State(ctx): State<ApiContext>,
    Json(body): Json<DocumentBody>,
) -> Result<Json<RequestDocument>, ApiError> {
    Ok(Json(compose(&ctx, &body)?))
}

/// `POST /api/requests/document/pdf`: the composed document as a PDF.
pub async fn document_pdf(
    State(ctx): State<ApiContext>,
    Json(body): Json<DocumentBody>,
) -> Result<impl IntoResponse, ApiError> {
    let file_name = pdf_file_name(&body.request.request_number);
    let bytes = render(&ctx, compose(&ctx, &body)?).await?;
    tracing::info!(file_name = %file_name, bytes = bytes.len(), "Request PDF rendered");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    ))
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub path: String,
}

/// `POST /api/requests/document/export`: render and write the PDF to the
/// exports directory.
pub async fn export(
    State(ctx): State<ApiContext>,
    Json(body): Json<DocumentBody>,
) -> Result<Json<ExportResponse>, ApiError> {
    let file_name = pdf_file_name(&body.request.request_number);
    let bytes = render(&ctx, compose(&ctx, &body)?).await?;
    let dir = ctx.core.config.exports_dir.clone();

    let path = tokio::task::spawn_blocking(move || export_pdf_to_file(&bytes, &file_name, &dir))
        .await
        .map_err(|e| ApiError::Internal(format!("export task failed: {e}")))??;

    Ok(Json(ExportResponse {
        path: path.display().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_from_request_number() {
        let number = RequestNumber("ANG-20261016-1A2B3C4D".into());
        assert_eq!(pdf_file_name(&number), "ANG-20261016-1A2B3C4D.pdf");
    }

    #[test]
    fn file_name_drops_path_separators() {
        let number = RequestNumber("../../etc/passwd".into());
        assert_eq!(pdf_file_name(&number), "etcpasswd.pdf");
    }

    #[test]
    fn file_name_falls_back_when_nothing_survives() {
        let number = RequestNumber("//".into());
        assert_eq!(pdf_file_name(&number), "solicitacao.pdf");
    }
}
