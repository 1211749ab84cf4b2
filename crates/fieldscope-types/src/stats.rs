use crate::field::FieldLevel;
use serde::{Deserialize, Serialize};

/// Per-field label statistics, fetched independently of the catalog
/// and joined to fields by name lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStatistic {
    pub name: String,

    pub level: FieldLevel,

    #[serde(rename = "type")]
    pub field_type: String,

    /// Total label instances across the dataset.
    #[serde(default)]
    pub total_labels: u64,

    /// Distinct class labels, sorted and deduped by the service.
    #[serde(default)]
    pub classes: Vec<String>,

    #[serde(default)]
    pub notes: String,
}

/// Statistics for every labeled field of a dataset, split by level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub sample_fields: Vec<FieldStatistic>,
    pub frame_fields: Vec<FieldStatistic>,
}

impl StatisticsReport {
    pub fn new(sample_fields: Vec<FieldStatistic>, frame_fields: Vec<FieldStatistic>) -> Self {
        Self {
            sample_fields,
            frame_fields,
        }
    }

    /// Look up one field's statistics by name, either level.
    pub fn for_field(&self, name: &str) -> Option<&FieldStatistic> {
        self.sample_fields
            .iter()
            .chain(self.frame_fields.iter())
            .find(|s| s.name == name)
    }
}
