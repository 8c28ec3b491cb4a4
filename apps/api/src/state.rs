use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::enhancement::TextEnhancer;
use crate::layout::{default_page_config, PageConfig, StandardFontMeasure, TextMeasure};
use crate::persistence::DocumentStore;
use crate::render::{PageRenderer, PdfRenderer};
use crate::wizard::{ActivityFlags, WizardSession};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// The single wizard session. Never held across an LLM call.
    pub session: Arc<Mutex<WizardSession>>,
    pub enhancer: Arc<dyn TextEnhancer>,
    pub renderer: Arc<dyn PageRenderer>,
    /// Shared by the layout engine and the renderer so both measure text identically.
    pub measure: Arc<dyn TextMeasure>,
    pub page_config: PageConfig,
    pub in_flight: Arc<InFlight>,
}

impl AppState {
    /// Restores the session from `store` and wires the PDF renderer to the A4 page config.
    pub fn new(
        config: Config,
        store: Arc<dyn DocumentStore>,
        enhancer: Arc<dyn TextEnhancer>,
    ) -> Self {
        let page_config = default_page_config();
        let measure: Arc<dyn TextMeasure> =
            Arc::new(StandardFontMeasure::new(page_config.scale.clone()));
        let renderer: Arc<dyn PageRenderer> = Arc::new(PdfRenderer::new(
            page_config.scale.clone(),
            measure.clone(),
        ));

        Self {
            config,
            session: Arc::new(Mutex::new(WizardSession::start(store))),
            enhancer,
            renderer,
            measure,
            page_config,
            in_flight: Arc::new(InFlight::default()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-flight guards
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Improve,
    Export,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Improve => "text improvement",
            Action::Export => "export",
        }
    }
}

/// One flag per long-running action. A second start while one runs is refused.
#[derive(Debug, Default)]
pub struct InFlight {
    improving: AtomicBool,
    exporting: AtomicBool,
}

impl InFlight {
    fn flag(&self, action: Action) -> &AtomicBool {
        match action {
            Action::Improve => &self.improving,
            Action::Export => &self.exporting,
        }
    }

    /// Marks `action` as running. `None` if it already is.
    pub fn begin(&self, action: Action) -> Option<InFlightGuard<'_>> {
        self.flag(action)
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                flag: self.flag(action),
            })
    }

    pub fn flags(&self) -> ActivityFlags {
        ActivityFlags {
            improving: self.improving.load(Ordering::Acquire),
            exporting: self.exporting.load(Ordering::Acquire),
        }
    }
}

/// Clears its flag on drop, including when the handler errors out.
pub struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
