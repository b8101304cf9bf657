//! Station state: configuration plus the wired-up lifecycle controller.

use std::sync::Arc;

use kot_service::{
    ConfigResult, DirectoryShareService, DocumentPipeline, DocumentRenderService, FileStore, KotConfig,
    LocalFileStore, MarkupFileRenderer, OrderAggregator, PrintService, ShareService, SpoolPrintService,
    TicketLifecycle,
};
use tracing::info;

use super::ConsoleEmitter;

/// Everything a command needs.
pub struct StationState {
    config: KotConfig,
    lifecycle: Arc<TicketLifecycle>,
    notices: Arc<ConsoleEmitter>,
}

impl StationState {
    /// Builds the station with the file-system capabilities from
    /// `[storage]`.
    pub fn from_config(config: KotConfig) -> ConfigResult<Self> {
        let renderer = Arc::new(MarkupFileRenderer::new(&config.storage.temp_dir));
        let printer = Arc::new(SpoolPrintService::new(&config.storage.spool_dir));
        let sharer = Arc::new(DirectoryShareService::new(&config.storage.share_dir));
        Self::with_services(config, renderer, Arc::new(LocalFileStore), printer, sharer)
    }

    /// Builds the station around caller-supplied capabilities.
    pub fn with_services(
        config: KotConfig,
        renderer: Arc<dyn DocumentRenderService>,
        store: Arc<dyn FileStore>,
        printer: Arc<dyn PrintService>,
        sharer: Arc<dyn ShareService>,
    ) -> ConfigResult<Self> {
        let menu = Arc::new(config.menu_catalog()?);
        let aggregator = Arc::new(OrderAggregator::new(
            menu,
            config.numbering(),
            config.station.table_no.clone(),
            config.station.waiter.clone(),
        ));
        let pipeline = DocumentPipeline::new(renderer, store, config.storage.documents_root.clone());
        let notices = Arc::new(ConsoleEmitter::new());
        let lifecycle = Arc::new(TicketLifecycle::with_emitter(
            aggregator,
            pipeline,
            printer,
            sharer,
            notices.clone(),
        ));

        info!(
            table_no = %config.station.table_no,
            waiter = %config.station.waiter,
            documents = ?config.storage.documents_root,
            "Station ready"
        );

        Ok(StationState {
            config,
            lifecycle,
            notices,
        })
    }

    pub fn config(&self) -> &KotConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> &Arc<TicketLifecycle> {
        &self.lifecycle
    }

    pub fn aggregator(&self) -> &Arc<OrderAggregator> {
        self.lifecycle.aggregator()
    }

    pub fn notices(&self) -> &ConsoleEmitter {
        &self.notices
    }
}
