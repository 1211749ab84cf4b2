//! Catalog and listing fixtures shared across fieldscope tests.

use fieldscope_types::{
    EvalRole, EvaluationRef, Field, FieldCatalog, FieldLevel, FieldStatistic, SavedViewSummary,
    StatisticsReport,
};

/// A plain field with no evaluations and no notes.
pub fn field(name: &str, field_type: &str, level: FieldLevel) -> Field {
    Field {
        name: name.to_string(),
        field_type: field_type.to_string(),
        level,
        evaluations: vec![],
        notes: String::new(),
    }
}

/// A field carrying evaluation memberships.
pub fn eval_field(
    name: &str,
    field_type: &str,
    level: FieldLevel,
    refs: &[(&str, EvalRole)],
) -> Field {
    Field {
        evaluations: refs
            .iter()
            .map(|(key, role)| EvaluationRef::new(*key, *role))
            .collect(),
        ..field(name, field_type, level)
    }
}

/// A field with persisted notes.
pub fn noted_field(name: &str, field_type: &str, level: FieldLevel, notes: &str) -> Field {
    Field {
        notes: notes.to_string(),
        ..field(name, field_type, level)
    }
}

/// Image-style dataset: sample fields only, one ground-truth field
/// shared across two evaluation runs.
pub fn image_catalog() -> FieldCatalog {
    FieldCatalog::new(
        vec![
            eval_field("ground_truth", "Detections", FieldLevel::Sample, &[
                ("eval_v1", EvalRole::GroundTruth),
                ("eval_v2", EvalRole::GroundTruth),
            ]),
            eval_field("predictions_v1", "Detections", FieldLevel::Sample, &[(
                "eval_v1",
                EvalRole::Prediction,
            )]),
            eval_field("predictions_v2", "Detections", FieldLevel::Sample, &[(
                "eval_v2",
                EvalRole::Prediction,
            )]),
            noted_field(
                "weather",
                "Classification",
                FieldLevel::Sample,
                "auto-tagged, spot check before release",
            ),
        ],
        vec![],
    )
}

/// Video-style dataset carrying frame-level fields, which unlocks
/// by-level grouping.
pub fn video_catalog() -> FieldCatalog {
    FieldCatalog::new(
        vec![field("events", "TemporalDetections", FieldLevel::Sample)],
        vec![
            eval_field("frame_gt", "Detections", FieldLevel::Frame, &[(
                "frame_eval",
                EvalRole::GroundTruth,
            )]),
            eval_field("frame_pred", "Detections", FieldLevel::Frame, &[(
                "frame_eval",
                EvalRole::Prediction,
            )]),
        ],
    )
}

/// Statistics matching [`image_catalog`] by field name.
pub fn image_statistics() -> StatisticsReport {
    StatisticsReport::new(
        vec![
            FieldStatistic {
                name: "ground_truth".to_string(),
                level: FieldLevel::Sample,
                field_type: "Detections".to_string(),
                total_labels: 1234,
                classes: vec!["car".to_string(), "person".to_string()],
                notes: String::new(),
            },
            FieldStatistic {
                name: "predictions_v1".to_string(),
                level: FieldLevel::Sample,
                field_type: "Detections".to_string(),
                total_labels: 1518,
                classes: vec!["car".to_string(), "person".to_string(), "truck".to_string()],
                notes: String::new(),
            },
        ],
        vec![],
    )
}

/// Saved-view summaries in store order (oldest first).
pub fn saved_views(names: &[&str]) -> Vec<SavedViewSummary> {
    names
        .iter()
        .map(|name| SavedViewSummary::new(*name, ""))
        .collect()
}
