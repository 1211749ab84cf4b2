use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a field is attached per-sample or per-frame.
///
/// Frame-level fields only exist on sequence-style datasets (video);
/// their presence gates the by-level grouping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldLevel {
    Sample,
    Frame,
}

impl fmt::Display for FieldLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldLevel::Sample => write!(f, "sample"),
            FieldLevel::Frame => write!(f, "frame"),
        }
    }
}

/// Role a field plays within an evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalRole {
    Prediction,
    GroundTruth,
}

/// Membership of a field in a named evaluation run.
///
/// A single field can be referenced by several runs (e.g., one
/// ground-truth field compared against multiple prediction fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRef {
    pub eval_key: String,
    pub role: EvalRole,
}

impl EvaluationRef {
    pub fn new(eval_key: impl Into<String>, role: EvalRole) -> Self {
        Self {
            eval_key: eval_key.into(),
            role,
        }
    }
}

/// A labeled field of the dataset schema, as reported by the catalog
/// service. Names are unique across the sample+frame union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,

    /// Semantic label type tag (e.g., "Detections", "Classification").
    #[serde(rename = "type")]
    pub field_type: String,

    pub level: FieldLevel,

    /// Evaluation runs this field participates in, in service order.
    #[serde(default)]
    pub evaluations: Vec<EvaluationRef>,

    /// Persisted per-field notes; empty string when none exist.
    #[serde(default)]
    pub notes: String,
}

/// Normalized, read-only snapshot of the labeled fields of one
/// dataset. Replaced wholesale on refetch; never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCatalog {
    pub sample_fields: Vec<Field>,
    pub frame_fields: Vec<Field>,
    pub total_count: usize,
}

impl FieldCatalog {
    /// Build a catalog from field lists, computing the total count.
    pub fn new(sample_fields: Vec<Field>, frame_fields: Vec<Field>) -> Self {
        let total_count = sample_fields.len() + frame_fields.len();
        Self {
            sample_fields,
            frame_fields,
            total_count,
        }
    }

    /// Empty catalog - a valid terminal display state, not an error.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// True for video-style datasets carrying frame-level fields.
    pub fn has_frame_fields(&self) -> bool {
        !self.frame_fields.is_empty()
    }

    /// All fields in presentation order: sample fields then frame fields.
    pub fn all_fields(&self) -> impl Iterator<Item = &Field> {
        self.sample_fields.iter().chain(self.frame_fields.iter())
    }

    /// All field names in presentation order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.all_fields().map(|f| f.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.all_fields().any(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.all_fields().find(|f| f.name == name)
    }
}
