//! Declarative test setup: a panel wired to in-memory stores.

use crate::fixtures;
use crate::stores::{MemoryCatalogService, MemoryNotesStore, MemoryViewStore};
use fieldscope_runtime::{Panel, PanelConfig, PanelEvent};
use fieldscope_types::DatasetId;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// A `Panel` plus handles to the stores behind it.
pub struct PanelWorld {
    pub catalog_service: Arc<MemoryCatalogService>,
    pub notes_store: Arc<MemoryNotesStore>,
    pub view_store: Arc<MemoryViewStore>,
    pub panel: Panel,
    events: UnboundedReceiver<PanelEvent>,
}

impl PanelWorld {
    /// Panel over empty stores, opened on the given dataset.
    pub fn new(dataset: &str) -> Self {
        let catalog_service = Arc::new(MemoryCatalogService::new());
        let notes_store = Arc::new(MemoryNotesStore::new());
        let view_store = Arc::new(MemoryViewStore::new());

        let (panel, events) = Panel::new(PanelConfig {
            dataset: DatasetId::from(dataset),
            catalog_service: catalog_service.clone(),
            notes_store: notes_store.clone(),
            view_store: view_store.clone(),
        });

        Self {
            catalog_service,
            notes_store,
            view_store,
            panel,
            events,
        }
    }

    /// World seeded with the image catalog fixture for `dataset`.
    pub fn with_image_catalog(dataset: &str) -> Self {
        let world = Self::new(dataset);
        world
            .catalog_service
            .seed_catalog(dataset, fixtures::image_catalog());
        world
            .catalog_service
            .seed_statistics(dataset, fixtures::image_statistics());
        world
    }

    /// Drain all events emitted so far.
    pub fn drain_events(&mut self) -> Vec<PanelEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }
}
