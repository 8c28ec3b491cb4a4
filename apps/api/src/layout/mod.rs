// Pagination/layout engine shared by the preview and the PDF export.
// Layout is synchronous and pure; callers clone the document before handing it in.

pub mod dates;
pub mod engine;
pub mod font_metrics;
pub mod page;
pub mod wrap;

// Re-export the public API consumed by the routes and the renderer.
pub use engine::LayoutEngine;
pub use font_metrics::{StandardFontMeasure, TextMeasure};
pub use page::{default_page_config, PageConfig};
