use anyhow::Result;
use async_trait::async_trait;
use fieldscope_types::{DatasetId, FieldCatalog, SavedViewListing, StatisticsReport};
use std::collections::BTreeSet;

/// Dataset schema introspection and statistics computation
///
/// Responsibilities:
/// - Produce the normalized field catalog for a dataset
/// - Compute per-field label statistics
///
/// Both operations are idempotent, read-only remote calls. Schema
/// traversal and label counting live entirely behind this boundary.
#[async_trait]
pub trait FieldCatalogService: Send + Sync {
    /// Fetch the full labeled-field catalog for a dataset.
    async fn fetch_catalog(&self, dataset: &DatasetId) -> Result<FieldCatalog>;

    /// Fetch label statistics for every field of a dataset.
    async fn fetch_statistics(&self, dataset: &DatasetId) -> Result<StatisticsReport>;
}

/// Persisted per-field notes store
///
/// Responsibilities:
/// - Persist one notes value per (dataset, field) pair
/// - Treat an empty notes value as removal of the stored entry
#[async_trait]
pub trait NotesStore: Send + Sync {
    async fn update_notes(&self, dataset: &DatasetId, field_name: &str, notes: &str)
        -> Result<()>;
}

/// Parameters for persisting the current selection as a named view.
/// The interactive prompt that collects them is owned by the host;
/// this core only carries the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveViewRequest {
    pub name: String,
    pub description: Option<String>,
    /// Optional RGB color string like `#FF6D04`.
    pub color: Option<String>,
}

impl SaveViewRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            color: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Named-view persistence and host view-state mutation
///
/// Responsibilities:
/// - Apply a field selection to the host's current view; evaluation
///   side-fields associated with a hidden field are hidden by this
///   collaborator, not by the core
/// - Save, list, load, and delete named views; saving over an
///   existing name overwrites it
/// - Filter listings down to views this panel created
#[async_trait]
pub trait ViewStore: Send + Sync {
    /// Update the external view to display exactly the selected
    /// fields. Fire-and-forget from the core's perspective.
    async fn apply_selection(
        &self,
        dataset: &DatasetId,
        selected: &BTreeSet<String>,
    ) -> Result<()>;

    /// Persist the current view state under a name; returns the name
    /// the view was stored as.
    async fn save_view(&self, dataset: &DatasetId, request: SaveViewRequest) -> Result<String>;

    /// List this panel's saved views, oldest first.
    async fn list_views(&self, dataset: &DatasetId) -> Result<SavedViewListing>;

    /// Load a named view into the host.
    async fn load_view(&self, dataset: &DatasetId, name: &str) -> Result<()>;

    /// Delete a named view.
    async fn delete_view(&self, dataset: &DatasetId, name: &str) -> Result<()>;
}
