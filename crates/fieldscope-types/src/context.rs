use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the dataset a catalog, statistics report, or saved-view
/// listing belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(String);

impl DatasetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DatasetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DatasetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for DatasetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The tab currently presented by the panel. Each tab owns one
/// fetch-on-demand resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelTab {
    Fields,
    Statistics,
    SavedViews,
}

/// Request-identity key for in-flight external calls.
///
/// Every fetch captures the context it was issued under; responses
/// arriving after the context moved on are discarded as stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelContext {
    pub dataset: DatasetId,
    pub tab: PanelTab,
}

impl PanelContext {
    pub fn new(dataset: DatasetId, tab: PanelTab) -> Self {
        Self { dataset, tab }
    }

    /// True when both responses belong to the same dataset, regardless
    /// of which tab issued them.
    pub fn same_dataset(&self, other: &PanelContext) -> bool {
        self.dataset == other.dataset
    }
}
