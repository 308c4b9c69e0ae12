//! PDF upload and text extraction.

use axum::{http::StatusCode, response::Response};
use axum_extra::extract::Multipart;
use tracing::{error, info};
use traductio_core::{extract_text, join_pages};

use crate::helpers::{ResultExt, RouteResult, fragment, is_pdf_upload};
use crate::templates::{ErrorTemplate, ExtractedTemplate};

/// Errors go to the result panel so the textarea keeps its content.
const ERROR_TARGET: &str = "#result";

/// Extract text from an uploaded PDF - returns the filled source textarea.
///
/// HTMX: Replaces `#source-area`; failures are retargeted to `#result`.
pub async fn extract_pdf(mut multipart: Multipart) -> RouteResult<Response> {
    while let Some(field) = multipart.next_field().await.or_bad_request()? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("document.pdf").to_string();
        if !is_pdf_upload(field.content_type(), Some(&file_name)) {
            return fragment(
                &ErrorTemplate::new("Please select a valid PDF file."),
                Some(ERROR_TARGET),
            );
        }

        let data = field.bytes().await.or_bad_request()?;

        // mupdf is blocking; keep it off the async runtime
        let pages = tokio::task::spawn_blocking(move || extract_text(data.to_vec()))
            .await
            .map_err(|e| {
                error!("PDF extraction task panicked: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PDF extraction failed".to_string(),
                )
            })?;

        return match pages {
            Ok(pages) => {
                info!("Extracted {} pages from {}", pages.len(), file_name);
                fragment(
                    &ExtractedTemplate {
                        text: join_pages(&pages),
                        page_count: pages.len(),
                        file_name,
                    },
                    None,
                )
            }
            Err(e) => {
                error!("Failed to extract {}: {}", file_name, e);
                fragment(
                    &ErrorTemplate::new(format!("Could not extract text from the PDF: {e}")),
                    Some(ERROR_TARGET),
                )
            }
        };
    }

    fragment(&ErrorTemplate::new("No file uploaded."), Some(ERROR_TARGET))
}
