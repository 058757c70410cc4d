use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{Batch, Document};
use crate::services::Combiner;
use crate::state::AppState;

/// Multipart field carrying the uploaded files, repeated once per file.
pub const DOCUMENTS_FIELD: &str = "documents";

pub async fn combine_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Response> {
    let start = Instant::now();
    let config = &state.config;

    info!("Starting combine request");

    let mut multipart = multipart.map_err(|e| {
        error!(operation = "intake", error = %e, "Rejected multipart request");
        AppError::malformed(e.body_text())
    })?;

    let batch = match read_documents(&mut multipart, config).await {
        Ok(batch) => {
            info!(
                documents = batch.len(),
                total_bytes = batch.total_bytes(),
                "Documents received"
            );
            batch
        }
        Err(e) => {
            error!(operation = "intake", error = %e, "Failed to read uploaded documents");
            return Err(e);
        }
    };

    let combiner = Combiner::new(&state.converter, config.conversion_concurrency);
    let result = match tokio::time::timeout(config.request_timeout(), combiner.combine(batch)).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            error!(operation = operation_for(&e), error = %e, "Combine failed");
            return Err(e);
        }
        Err(elapsed) => {
            error!(
                operation = "combine",
                timeout_seconds = config.request_timeout_seconds,
                "Processing deadline exceeded, outbound calls cancelled"
            );
            return Err(elapsed.into());
        }
    };

    info!(
        documents = result.documents,
        converted = result.converted,
        merged_size = result.pdf.len(),
        processing_time_ms = result.processing_time_ms,
        total_time_ms = start.elapsed().as_millis() as u64,
        "Success, sending combined file"
    );

    let disposition = format!("attachment; filename={}", config.output_filename);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        result.pdf,
    )
        .into_response())
}

/// Reads every `documents` part fully into memory, in upload order.
async fn read_documents(multipart: &mut Multipart, config: &Config) -> AppResult<Batch> {
    let mut batch = Batch::new(config.max_files);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, config))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != DOCUMENTS_FIELD {
            debug!(field = %field_name, "Ignoring unexpected form field");
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("document-{}", batch.len()));

        let data = field.bytes().await.map_err(|e| multipart_error(e, config))?;

        debug!(file_name = %file_name, file_size = data.len(), "Read uploaded document");

        batch.push(Document::new(file_name, data))?;
    }

    if batch.is_empty() {
        return Err(AppError::MissingFile);
    }

    Ok(batch)
}

fn multipart_error(err: MultipartError, config: &Config) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::UploadTooLarge {
            limit: config.max_upload_mb,
        }
    } else {
        AppError::malformed(err.body_text())
    }
}

fn operation_for(err: &AppError) -> &'static str {
    match err {
        AppError::UnsupportedType { .. } => "validate",
        AppError::ConversionFailed { .. } => "convert",
        AppError::MergeFailed { .. } => "merge",
        _ => "combine",
    }
}
