use axum::{extract::Multipart, Json};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::parser::{extract_pdf_text, parse_resume, ParsedResume};

#[derive(Deserialize)]
pub struct ParseTextRequest {
    pub text: String,
}

/// POST /api/v1/resumes/parse
pub async fn handle_parse_text(
    Json(req): Json<ParseTextRequest>,
) -> Result<Json<ParsedResume>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }
    Ok(Json(parse_resume(&req.text)))
}

/// POST /api/v1/resumes/parse-pdf
///
/// Expects a multipart body with the PDF in the `file` field.
pub async fn handle_parse_pdf(mut multipart: Multipart) -> Result<Json<ParsedResume>, AppError> {
    let mut pdf: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
            pdf = Some(data);
            break;
        }
    }

    let pdf = pdf.ok_or_else(|| AppError::Validation("missing multipart field `file`".to_string()))?;
    if pdf.is_empty() {
        return Err(AppError::Validation("uploaded file is empty".to_string()));
    }
    info!("Parsing uploaded PDF ({} bytes)", pdf.len());

    // PDF decoding is CPU-bound.
    let text = tokio::task::spawn_blocking(move || extract_pdf_text(&pdf))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))??;
    Ok(Json(parse_resume(&text)))
}
