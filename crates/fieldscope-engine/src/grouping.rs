use fieldscope_types::{EvalRole, Field, FieldCatalog};
use serde::Serialize;

/// Title of the synthetic group collecting fields with no evaluation
/// membership. Appended after all evaluation-keyed groups when
/// non-empty.
pub const NO_EVALUATIONS_GROUP: &str = "No Evaluations";

/// Grouping mode for the derived field view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// Sample fields then frame fields, catalog order.
    Level,
    /// Partitioned by semantic label type, first-seen order.
    FieldType,
    /// One group per evaluation run, fields replicated per membership.
    Evaluation,
}

impl GroupBy {
    /// Modes a host may offer for the given catalog. By-level grouping
    /// only makes sense when frame-level fields exist.
    pub fn available_for(catalog: &FieldCatalog) -> Vec<GroupBy> {
        if catalog.has_frame_fields() {
            vec![GroupBy::Level, GroupBy::FieldType, GroupBy::Evaluation]
        } else {
            vec![GroupBy::FieldType, GroupBy::Evaluation]
        }
    }
}

/// One field's appearance within a group. Evaluation grouping
/// replicates a field into every run it belongs to, so entries are
/// fresh records rather than aliases of shared catalog state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupEntry {
    pub field: Field,

    /// Role within the group's evaluation run; `None` outside
    /// evaluation grouping and in the no-evaluations group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<EvalRole>,
}

/// Ordered partition of the filtered catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldGroup {
    pub title: String,
    pub entries: Vec<GroupEntry>,
}

/// Result of a derivation: ordered groups of ordered entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedView {
    pub mode: GroupBy,
    pub groups: Vec<FieldGroup>,
}

impl GroupedView {
    /// Total entries across all groups (counts replicas).
    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }
}

/// Derive a grouped view of the catalog for the given search term and
/// mode. Pure: no I/O, deterministic, idempotent for an unchanged
/// catalog and filter.
pub fn derive(catalog: &FieldCatalog, search_term: &str, group_by: GroupBy) -> GroupedView {
    let term = search_term.to_lowercase();
    let groups = match group_by {
        GroupBy::Level => by_level(catalog, &term),
        GroupBy::FieldType => by_type(catalog, &term),
        GroupBy::Evaluation => by_evaluation(catalog, &term),
    };

    GroupedView {
        mode: group_by,
        groups,
    }
}

/// Case-insensitive substring match on name or type; empty term
/// passes everything.
fn matches(field: &Field, term: &str) -> bool {
    term.is_empty()
        || field.name.to_lowercase().contains(term)
        || field.field_type.to_lowercase().contains(term)
}

fn entry(field: &Field, role: Option<EvalRole>) -> GroupEntry {
    GroupEntry {
        field: field.clone(),
        role,
    }
}

fn by_level(catalog: &FieldCatalog, term: &str) -> Vec<FieldGroup> {
    let partitions = [
        ("Sample fields", &catalog.sample_fields),
        ("Frame fields", &catalog.frame_fields),
    ];

    partitions
        .iter()
        .map(|(title, fields)| FieldGroup {
            title: title.to_string(),
            entries: fields
                .iter()
                .filter(|f| matches(f, term))
                .map(|f| entry(f, None))
                .collect(),
        })
        .filter(|g| !g.entries.is_empty())
        .collect()
}

fn by_type(catalog: &FieldCatalog, term: &str) -> Vec<FieldGroup> {
    let mut groups: Vec<FieldGroup> = Vec::new();

    for field in catalog.all_fields().filter(|f| matches(f, term)) {
        match groups.iter_mut().find(|g| g.title == field.field_type) {
            Some(group) => group.entries.push(entry(field, None)),
            None => groups.push(FieldGroup {
                title: field.field_type.clone(),
                entries: vec![entry(field, None)],
            }),
        }
    }

    groups
}

fn by_evaluation(catalog: &FieldCatalog, term: &str) -> Vec<FieldGroup> {
    let mut groups: Vec<FieldGroup> = Vec::new();
    let mut unevaluated: Vec<GroupEntry> = Vec::new();

    for field in catalog.all_fields().filter(|f| matches(f, term)) {
        if field.evaluations.is_empty() {
            unevaluated.push(entry(field, None));
            continue;
        }

        for eval_ref in &field.evaluations {
            let replica = entry(field, Some(eval_ref.role));
            match groups.iter_mut().find(|g| g.title == eval_ref.eval_key) {
                Some(group) => group.entries.push(replica),
                None => groups.push(FieldGroup {
                    title: eval_ref.eval_key.clone(),
                    entries: vec![replica],
                }),
            }
        }
    }

    // Stable sort: ground truth first, ties keep catalog order.
    for group in &mut groups {
        group.entries.sort_by_key(|e| role_rank(e.role));
    }

    if !unevaluated.is_empty() {
        groups.push(FieldGroup {
            title: NO_EVALUATIONS_GROUP.to_string(),
            entries: unevaluated,
        });
    }

    groups
}

fn role_rank(role: Option<EvalRole>) -> u8 {
    match role {
        Some(EvalRole::GroundTruth) => 0,
        Some(EvalRole::Prediction) | None => 1,
    }
}
