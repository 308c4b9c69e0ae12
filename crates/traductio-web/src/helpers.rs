//! Helper types and traits for cleaner route handlers.
//!
//! Provides extension traits for converting `Result` types into
//! HTTP-appropriate error responses, reducing boilerplate in routes.

use askama::Template;
use axum::{
    body::Body,
    http::{StatusCode, header},
    response::Response,
};

/// Standard result type for route handlers returning HTML.
pub type RouteResult<T> = Result<T, (StatusCode, String)>;

/// Extension trait for converting `Result<T, E>` to `RouteResult<T>`.
pub trait ResultExt<T, E: std::fmt::Display> {
    /// Converts the error to 500 Internal Server Error.
    fn or_internal_error(self) -> RouteResult<T>;

    /// Converts the error to 400 Bad Request.
    fn or_bad_request(self) -> RouteResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T, E> for Result<T, E> {
    fn or_internal_error(self) -> RouteResult<T> {
        self.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
    }

    fn or_bad_request(self) -> RouteResult<T> {
        self.map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
    }
}

/// Render a fragment as a `200 OK` HTML response.
///
/// `retarget` sets `HX-Retarget` so HTMX swaps the fragment somewhere other
/// than the requesting element's target.
pub fn fragment(template: &impl Template, retarget: Option<&str>) -> RouteResult<Response> {
    let html = template.render().or_internal_error()?;

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8");
    if let Some(selector) = retarget {
        builder = builder.header("HX-Retarget", selector);
    }
    builder.body(Body::from(html)).or_internal_error()
}

/// Whether an upload looks like a PDF, judged by its declared content type
/// or, failing that, its file name.
pub fn is_pdf_upload(content_type: Option<&str>, file_name: Option<&str>) -> bool {
    match content_type {
        Some("application/pdf") => true,
        Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => false,
        _ => file_name.is_some_and(|name| {
            std::path::Path::new(name)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        }),
    }
}
