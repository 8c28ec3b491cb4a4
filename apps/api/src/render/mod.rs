// Export target. Renderers turn laid-out pages into file bytes; they never
// make layout decisions of their own.

pub mod handlers;
pub mod pdf;

use thiserror::Error;

use crate::layout::page::{Page, PageGeometry};

pub use pdf::PdfRenderer;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: no pages")]
    NoPages,

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("export task failed: {0}")]
    Task(String),
}

/// Port for page-sequence serialization. Synchronous; callers run it on a
/// blocking thread.
pub trait PageRenderer: Send + Sync {
    fn render(&self, pages: &[Page], geometry: &PageGeometry) -> Result<Vec<u8>, ExportError>;

    fn content_type(&self) -> &'static str;
}
