use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::layout::page::{Page, PageGeometry};
use crate::layout::LayoutEngine;
use crate::render::ExportError;
use crate::state::{Action, AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub page_count: usize,
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

/// GET /api/v1/preview
pub async fn handle_preview(State(state): State<AppState>) -> Json<PreviewResponse> {
    let document = state.session.lock().await.document().clone();
    let pages = LayoutEngine::new(&state.page_config, state.measure.as_ref()).paginate(&document);
    Json(PreviewResponse {
        page_count: pages.len(),
        geometry: state.page_config.geometry,
        pages,
    })
}

/// POST /api/v1/export
///
/// Lays out and renders on a blocking thread; the session stays editable meanwhile.
pub async fn handle_export(State(state): State<AppState>) -> Result<Response, AppError> {
    let _guard = state
        .in_flight
        .begin(Action::Export)
        .ok_or(AppError::Busy(Action::Export.label()))?;

    let document = state.session.lock().await.document().clone();
    let file_name = document.export_file_name();

    let page_config = state.page_config.clone();
    let measure = state.measure.clone();
    let renderer = state.renderer.clone();
    let content_type = renderer.content_type();

    let bytes = tokio::task::spawn_blocking(move || {
        let pages = LayoutEngine::new(&page_config, measure.as_ref()).paginate(&document);
        renderer.render(&pages, &page_config.geometry)
    })
    .await
    .map_err(|e| ExportError::Task(e.to_string()))??;

    tracing::info!(file = %file_name, bytes = bytes.len(), "document exported");

    let disposition = HeaderValue::from_str(&content_disposition(&file_name))
        .map_err(|e| ExportError::Task(e.to_string()))?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// `attachment` disposition with an ASCII fallback name and an RFC 5987 UTF-8 name.
fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let encoded: String = file_name
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b"-._~".contains(&b) {
                (b as char).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect();
    format!("attachment; filename=\"{ascii}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_ascii_name() {
        assert_eq!(
            content_disposition("CV_Ada_Lovelace.pdf"),
            "attachment; filename=\"CV_Ada_Lovelace.pdf\"; filename*=UTF-8''CV_Ada_Lovelace.pdf"
        );
    }

    #[test]
    fn test_content_disposition_non_ascii_name() {
        let value = content_disposition("CV_José_\"Pepe\".pdf");
        assert!(value.contains("filename=\"CV_Jos___Pepe_.pdf\""));
        assert!(value.contains("filename*=UTF-8''CV_Jos%C3%A9_%22Pepe%22.pdf"));
        assert!(HeaderValue::from_str(&value).is_ok());
    }
}
