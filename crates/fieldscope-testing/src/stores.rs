//! In-memory store implementations with failure injection and call
//! recording, for driving a `Panel` without a live host.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use fieldscope_runtime::{FieldCatalogService, NotesStore, SaveViewRequest, ViewStore};
use fieldscope_types::{
    DatasetId, FieldCatalog, SavedViewListing, SavedViewSummary, StatisticsReport,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Catalog service backed by per-dataset seeded snapshots.
#[derive(Default)]
pub struct MemoryCatalogService {
    catalogs: Mutex<HashMap<String, FieldCatalog>>,
    statistics: Mutex<HashMap<String, StatisticsReport>>,
    fail_catalog: AtomicBool,
    fail_statistics: AtomicBool,
    catalog_fetches: AtomicUsize,
}

impl MemoryCatalogService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_catalog(&self, dataset: &str, catalog: FieldCatalog) {
        self.catalogs
            .lock()
            .unwrap()
            .insert(dataset.to_string(), catalog);
    }

    pub fn seed_statistics(&self, dataset: &str, report: StatisticsReport) {
        self.statistics
            .lock()
            .unwrap()
            .insert(dataset.to_string(), report);
    }

    pub fn fail_catalog_fetches(&self, fail: bool) {
        self.fail_catalog.store(fail, Ordering::SeqCst);
    }

    pub fn fail_statistics_fetches(&self, fail: bool) {
        self.fail_statistics.store(fail, Ordering::SeqCst);
    }

    /// Number of catalog fetches issued so far.
    pub fn catalog_fetch_count(&self) -> usize {
        self.catalog_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FieldCatalogService for MemoryCatalogService {
    async fn fetch_catalog(&self, dataset: &DatasetId) -> Result<FieldCatalog> {
        self.catalog_fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_catalog.load(Ordering::SeqCst) {
            bail!("catalog service unavailable");
        }
        self.catalogs
            .lock()
            .unwrap()
            .get(dataset.as_str())
            .cloned()
            .ok_or_else(|| anyhow!("unknown dataset: {}", dataset))
    }

    async fn fetch_statistics(&self, dataset: &DatasetId) -> Result<StatisticsReport> {
        if self.fail_statistics.load(Ordering::SeqCst) {
            bail!("statistics service unavailable");
        }
        self.statistics
            .lock()
            .unwrap()
            .get(dataset.as_str())
            .cloned()
            .ok_or_else(|| anyhow!("unknown dataset: {}", dataset))
    }
}

/// One recorded `update_notes` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteUpdate {
    pub dataset: String,
    pub field_name: String,
    pub notes: String,
}

/// Notes store keyed by (dataset, field). Empty notes remove the
/// entry instead of persisting an empty string.
#[derive(Default)]
pub struct MemoryNotesStore {
    notes: Mutex<HashMap<(String, String), String>>,
    updates: Mutex<Vec<NoteUpdate>>,
    fail: AtomicBool,
}

impl MemoryNotesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn note_for(&self, dataset: &str, field_name: &str) -> Option<String> {
        self.notes
            .lock()
            .unwrap()
            .get(&(dataset.to_string(), field_name.to_string()))
            .cloned()
    }

    /// Every update call received, including failed ones.
    pub fn updates(&self) -> Vec<NoteUpdate> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotesStore for MemoryNotesStore {
    async fn update_notes(
        &self,
        dataset: &DatasetId,
        field_name: &str,
        notes: &str,
    ) -> Result<()> {
        self.updates.lock().unwrap().push(NoteUpdate {
            dataset: dataset.as_str().to_string(),
            field_name: field_name.to_string(),
            notes: notes.to_string(),
        });

        if self.fail.load(Ordering::SeqCst) {
            bail!("notes store unavailable");
        }

        let key = (dataset.as_str().to_string(), field_name.to_string());
        let mut stored = self.notes.lock().unwrap();
        if notes.is_empty() {
            stored.remove(&key);
        } else {
            stored.insert(key, notes.to_string());
        }
        Ok(())
    }
}

/// View store holding per-dataset listings in save order, recording
/// every apply/load/delete call.
#[derive(Default)]
pub struct MemoryViewStore {
    views: Mutex<HashMap<String, Vec<SavedViewSummary>>>,
    applied: Mutex<Vec<BTreeSet<String>>>,
    loaded: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    fail_apply: AtomicBool,
    fail_save: AtomicBool,
    fail_list: AtomicBool,
    fail_delete: AtomicBool,
}

impl MemoryViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_views(&self, dataset: &str, views: Vec<SavedViewSummary>) {
        self.views
            .lock()
            .unwrap()
            .insert(dataset.to_string(), views);
    }

    pub fn fail_applies(&self, fail: bool) {
        self.fail_apply.store(fail, Ordering::SeqCst);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_save.store(fail, Ordering::SeqCst);
    }

    pub fn fail_listings(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Selections received by `apply_selection`, in call order.
    pub fn applied_selections(&self) -> Vec<BTreeSet<String>> {
        self.applied.lock().unwrap().clone()
    }

    pub fn loaded_views(&self) -> Vec<String> {
        self.loaded.lock().unwrap().clone()
    }

    pub fn deleted_views(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    /// Current store-order names for a dataset.
    pub fn view_names(&self, dataset: &str) -> Vec<String> {
        self.views
            .lock()
            .unwrap()
            .get(dataset)
            .map(|views| views.iter().map(|v| v.name.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ViewStore for MemoryViewStore {
    async fn apply_selection(
        &self,
        _dataset: &DatasetId,
        selected: &BTreeSet<String>,
    ) -> Result<()> {
        self.applied.lock().unwrap().push(selected.clone());
        if self.fail_apply.load(Ordering::SeqCst) {
            bail!("apply rejected by host");
        }
        Ok(())
    }

    async fn save_view(&self, dataset: &DatasetId, request: SaveViewRequest) -> Result<String> {
        if self.fail_save.load(Ordering::SeqCst) {
            bail!("save rejected by host");
        }

        let summary = SavedViewSummary::new(
            request.name.clone(),
            request.description.unwrap_or_default(),
        );

        let mut views = self.views.lock().unwrap();
        let listing = views.entry(dataset.as_str().to_string()).or_default();
        // Saving over an existing name overwrites it in place.
        match listing.iter_mut().find(|v| v.name == request.name) {
            Some(existing) => *existing = summary,
            None => listing.push(summary),
        }
        Ok(request.name)
    }

    async fn list_views(&self, dataset: &DatasetId) -> Result<SavedViewListing> {
        if self.fail_list.load(Ordering::SeqCst) {
            bail!("listing unavailable");
        }
        let views = self
            .views
            .lock()
            .unwrap()
            .get(dataset.as_str())
            .cloned()
            .unwrap_or_default();
        Ok(SavedViewListing::new(views))
    }

    async fn load_view(&self, _dataset: &DatasetId, name: &str) -> Result<()> {
        self.loaded.lock().unwrap().push(name.to_string());
        Ok(())
    }

    async fn delete_view(&self, dataset: &DatasetId, name: &str) -> Result<()> {
        self.deleted.lock().unwrap().push(name.to_string());
        if self.fail_delete.load(Ordering::SeqCst) {
            bail!("delete rejected by host");
        }
        if let Some(views) = self.views.lock().unwrap().get_mut(dataset.as_str()) {
            views.retain(|v| v.name != name);
        }
        Ok(())
    }
}
