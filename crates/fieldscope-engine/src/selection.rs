use crate::error::{Error, Result};
use fieldscope_types::FieldCatalog;
use std::collections::BTreeSet;

/// The set of currently chosen field names, plus the universe of
/// names the current catalog allows.
///
/// Lifecycle is tied to catalog refresh: `initialize` runs once per
/// fresh catalog and resets the selection to all fields, which also
/// guarantees no dangling names survive a reload.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    universe: BTreeSet<String>,
    selected: BTreeSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to "all fields selected" for a fresh catalog. An explicit
    /// overwrite, never a merge with prior state.
    pub fn initialize(&mut self, catalog: &FieldCatalog) {
        self.universe = catalog.field_names().map(str::to_string).collect();
        self.selected = self.universe.clone();
    }

    /// Flip membership for one field. Names outside the current
    /// catalog are rejected with an error rather than silently
    /// ignored.
    pub fn toggle(&mut self, name: &str) -> Result<()> {
        if !self.universe.contains(name) {
            return Err(Error::UnknownField(name.to_string()));
        }
        if !self.selected.remove(name) {
            self.selected.insert(name.to_string());
        }
        Ok(())
    }

    /// Set the selection to exactly the given visible names.
    pub fn select_all(&mut self, visible: &[String]) {
        self.selected = visible.iter().cloned().collect();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// The unordered name set handed to the external apply operation.
    pub fn selected_names(&self) -> BTreeSet<String> {
        self.selected.clone()
    }

    /// Count of catalog fields left out of the selection.
    pub fn excluded_count(&self) -> usize {
        self.universe.len() - self.selected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldscope_types::{Field, FieldLevel};

    fn catalog(names: &[&str]) -> FieldCatalog {
        FieldCatalog::new(
            names
                .iter()
                .map(|name| Field {
                    name: name.to_string(),
                    field_type: "Detections".to_string(),
                    level: FieldLevel::Sample,
                    evaluations: vec![],
                    notes: String::new(),
                })
                .collect(),
            vec![],
        )
    }

    #[test]
    fn initialize_selects_every_field() {
        let mut state = SelectionState::new();
        state.initialize(&catalog(&["a", "b", "c"]));

        assert_eq!(state.len(), 3);
        assert!(state.is_selected("b"));
        assert_eq!(state.excluded_count(), 0);
    }

    #[test]
    fn initialize_overwrites_prior_selection() {
        let mut state = SelectionState::new();
        state.initialize(&catalog(&["predictions_v1", "other"]));
        state.deselect_all();
        state.toggle("predictions_v1").unwrap();
        assert_eq!(state.selected_names().len(), 1);

        // Fresh catalog load resets to all fields, not the prior pick.
        state.initialize(&catalog(&["predictions_v1", "other"]));
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn initialize_prunes_names_missing_from_new_catalog() {
        let mut state = SelectionState::new();
        state.initialize(&catalog(&["stale", "kept"]));
        state.initialize(&catalog(&["kept"]));

        assert!(!state.is_selected("stale"));
        assert!(state.toggle("stale").is_err());
    }

    #[test]
    fn toggle_flips_membership() {
        let mut state = SelectionState::new();
        state.initialize(&catalog(&["a", "b"]));

        state.toggle("a").unwrap();
        assert!(!state.is_selected("a"));
        state.toggle("a").unwrap();
        assert!(state.is_selected("a"));
    }

    #[test]
    fn toggle_rejects_unknown_name() {
        let mut state = SelectionState::new();
        state.initialize(&catalog(&["a"]));

        assert_eq!(
            state.toggle("missing"),
            Err(Error::UnknownField("missing".to_string()))
        );
    }

    #[test]
    fn select_all_then_deselect_all_is_empty() {
        let mut state = SelectionState::new();
        state.initialize(&catalog(&["a", "b"]));

        state.select_all(&["a".to_string(), "b".to_string()]);
        state.deselect_all();
        assert!(state.is_empty());

        // Terminal states are idempotent regardless of prior history.
        state.deselect_all();
        assert!(state.is_empty());
    }

    #[test]
    fn select_all_sets_exactly_the_visible_names() {
        let mut state = SelectionState::new();
        state.initialize(&catalog(&["a", "b", "c"]));
        state.deselect_all();

        state.select_all(&["b".to_string()]);
        assert_eq!(state.len(), 1);
        assert!(state.is_selected("b"));
        assert_eq!(state.excluded_count(), 2);
    }
}
