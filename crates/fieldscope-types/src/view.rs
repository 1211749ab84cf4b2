use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Listing entry for a persisted, named field-selection view.
///
/// Names are unique per dataset. Creation and deletion happen in the
/// external view store; this core only caches listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedViewSummary {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<DateTime<Utc>>,
}

impl SavedViewSummary {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            created_at: None,
            last_modified_at: None,
        }
    }
}

/// Saved-view listing as returned by the store, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedViewListing {
    pub views: Vec<SavedViewSummary>,
    pub total_count: usize,
}

impl SavedViewListing {
    pub fn new(views: Vec<SavedViewSummary>) -> Self {
        let total_count = views.len();
        Self { views, total_count }
    }
}
