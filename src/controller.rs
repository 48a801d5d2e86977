//! Ties the pipeline, the view and the exporters together. Every error stops
//! here and becomes a status message.

use std::path::PathBuf;

use tracing::{error, warn};

use crate::clients::GenerationApi;
use crate::config::ExportConfig;
use crate::error::NicheScoutError;
use crate::export::{ExportFormat, Exporter};
use crate::orchestrator::RequestOrchestrator;
use crate::render::{ResultRenderer, ResultView};
use crate::schemas::QueryParams;

pub struct ScoutController<A: GenerationApi> {
    orchestrator: RequestOrchestrator<A>,
    renderer: ResultRenderer,
    export_config: ExportConfig,
}

impl<A: GenerationApi> ScoutController<A> {
    pub fn new(
        orchestrator: RequestOrchestrator<A>,
        renderer: ResultRenderer,
        export_config: ExportConfig,
    ) -> Self {
        Self {
            orchestrator,
            renderer,
            export_config,
        }
    }

    pub fn view(&self) -> &ResultView {
        self.renderer.view()
    }

    pub fn renderer(&self) -> &ResultRenderer {
        &self.renderer
    }

    pub fn orchestrator(&self) -> &RequestOrchestrator<A> {
        &self.orchestrator
    }

    /// Run one submission and update the view. Returns true on success.
    pub async fn submit(&mut self, params: &QueryParams) -> bool {
        // Missing fields are reported without clearing the current view
        if let Err(e) = RequestOrchestrator::<A>::validate(params) {
            warn!("{}", e);
            self.renderer.notify(e.user_message());
            return false;
        }

        self.renderer.begin_loading();
        match self.orchestrator.submit(params).await {
            Ok(result) => {
                self.renderer.render_result(&result);
                true
            }
            Err(NicheScoutError::Superseded { .. }) => false,
            Err(e) => {
                error!("Generation failed: {}", e);
                self.renderer.render_error(e.user_message());
                false
            }
        }
    }

    /// Export the last successful result; errors become the returned message.
    pub async fn export(&mut self, format: ExportFormat) -> Result<PathBuf, String> {
        let exporter = Exporter::new(
            self.orchestrator.api(),
            self.orchestrator.session().as_ref(),
            &self.export_config,
        );
        match exporter.export(format).await {
            Ok(path) => {
                self.renderer
                    .notify(format!("Saved {}", path.display()));
                Ok(path)
            }
            Err(e) => {
                error!("Export failed: {}", e);
                let message = e.user_message();
                self.renderer.notify(message.clone());
                Err(message)
            }
        }
    }
}
