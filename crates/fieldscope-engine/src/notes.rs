use crate::error::{Error, Result};
use fieldscope_types::FieldCatalog;
use std::collections::BTreeMap;

/// Lifecycle of one field's note edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotePhase {
    /// Displayed value equals the committed value.
    Clean,
    /// A local edit exists that has not been sent to the store.
    Editing,
    /// A commit is in flight; its response has not arrived yet.
    Committing,
}

/// Payload for one `UpdateNotes` store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCommit {
    pub field_name: String,
    pub value: String,
}

impl NoteCommit {
    /// Empty notes mean "remove the note" at the store boundary, so
    /// stores can drop the key instead of persisting an empty string.
    pub fn is_removal(&self) -> bool {
        self.value.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
struct NoteEntry {
    committed: String,
    pending: Option<String>,
    in_flight: Option<String>,
}

impl NoteEntry {
    fn display(&self) -> &str {
        self.pending
            .as_deref()
            .or(self.in_flight.as_deref())
            .unwrap_or(&self.committed)
    }

    fn phase(&self) -> NotePhase {
        if self.in_flight.is_some() {
            NotePhase::Committing
        } else if self.pending.is_some() {
            NotePhase::Editing
        } else {
            NotePhase::Clean
        }
    }
}

/// Per-field optimistic edit buffer over the catalog's persisted
/// notes.
///
/// Commits are best-effort: the locally edited value becomes the new
/// committed value regardless of remote outcome, so the display never
/// flickers back to stale server state. Overlay state does not
/// survive a catalog reload; only store-persisted notes do.
#[derive(Debug, Clone, Default)]
pub struct NotesOverlay {
    entries: BTreeMap<String, NoteEntry>,
}

impl NotesOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace committed values from a fresh catalog and drop any
    /// editing or committing residue.
    pub fn reload(&mut self, catalog: &FieldCatalog) {
        self.entries = catalog
            .all_fields()
            .map(|f| {
                (
                    f.name.clone(),
                    NoteEntry {
                        committed: f.notes.clone(),
                        pending: None,
                        in_flight: None,
                    },
                )
            })
            .collect();
    }

    /// Record a local edit. Tracks every keystroke; commit timing is
    /// the caller's concern (typically focus loss). An edit while a
    /// commit is in flight simply overwrites the eventual display
    /// (last-write-wins).
    pub fn edit(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))?;
        entry.pending = Some(value.into());
        Ok(())
    }

    /// Move the pending edit into flight and return the store
    /// payload. `None` when there is nothing to commit.
    pub fn begin_commit(&mut self, name: &str) -> Result<Option<NoteCommit>> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))?;

        match entry.pending.take() {
            Some(value) => {
                entry.in_flight = Some(value.clone());
                Ok(Some(NoteCommit {
                    field_name: name.to_string(),
                    value,
                }))
            }
            None => Ok(None),
        }
    }

    /// Settle an in-flight commit, success or failure alike. The
    /// committed value becomes the value that was sent; an edit made
    /// while the commit was in flight stays pending.
    pub fn finish_commit(&mut self, name: &str) {
        // A reload may have dropped the entry while the commit was in
        // flight; the late completion must not resurrect it.
        if let Some(entry) = self.entries.get_mut(name)
            && let Some(value) = entry.in_flight.take()
        {
            entry.committed = value;
        }
    }

    /// Value to present for a field: pending edit wins, then the
    /// in-flight value, then the committed one.
    pub fn display_value(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(NoteEntry::display)
    }

    pub fn phase(&self, name: &str) -> Option<NotePhase> {
        self.entries.get(name).map(NoteEntry::phase)
    }

    /// True when any field has an uncommitted or in-flight edit.
    pub fn has_unsettled_edits(&self) -> bool {
        self.entries
            .values()
            .any(|e| e.phase() != NotePhase::Clean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldscope_types::{Field, FieldLevel};

    fn catalog_with_notes(notes: &[(&str, &str)]) -> FieldCatalog {
        FieldCatalog::new(
            notes
                .iter()
                .map(|(name, text)| Field {
                    name: name.to_string(),
                    field_type: "Detections".to_string(),
                    level: FieldLevel::Sample,
                    evaluations: vec![],
                    notes: text.to_string(),
                })
                .collect(),
            vec![],
        )
    }

    #[test]
    fn reload_seeds_committed_values() {
        let mut overlay = NotesOverlay::new();
        overlay.reload(&catalog_with_notes(&[("predictions", "baseline model")]));

        assert_eq!(overlay.display_value("predictions"), Some("baseline model"));
        assert_eq!(overlay.phase("predictions"), Some(NotePhase::Clean));
    }

    #[test]
    fn edit_then_commit_round_trip() {
        let mut overlay = NotesOverlay::new();
        overlay.reload(&catalog_with_notes(&[("predictions", "")]));

        overlay.edit("predictions", "draft").unwrap();
        assert_eq!(overlay.phase("predictions"), Some(NotePhase::Editing));
        assert_eq!(overlay.display_value("predictions"), Some("draft"));
        assert!(overlay.has_unsettled_edits());

        let commit = overlay.begin_commit("predictions").unwrap().unwrap();
        assert_eq!(commit.value, "draft");
        assert_eq!(overlay.phase("predictions"), Some(NotePhase::Committing));
        // Display holds the in-flight value while committing.
        assert_eq!(overlay.display_value("predictions"), Some("draft"));

        overlay.finish_commit("predictions");
        assert_eq!(overlay.phase("predictions"), Some(NotePhase::Clean));
        assert_eq!(overlay.display_value("predictions"), Some("draft"));
        assert!(!overlay.has_unsettled_edits());
    }

    #[test]
    fn failed_commit_keeps_local_value() {
        let mut overlay = NotesOverlay::new();
        overlay.reload(&catalog_with_notes(&[("predictions", "server text")]));

        overlay.edit("predictions", "local text").unwrap();
        overlay.begin_commit("predictions").unwrap();
        // finish_commit runs on failure too; local value is kept.
        overlay.finish_commit("predictions");

        assert_eq!(overlay.display_value("predictions"), Some("local text"));
        assert_eq!(overlay.phase("predictions"), Some(NotePhase::Clean));
    }

    #[test]
    fn reload_discards_overlay_state() {
        let mut overlay = NotesOverlay::new();
        overlay.reload(&catalog_with_notes(&[("predictions", "old")]));

        overlay.edit("predictions", "draft").unwrap();
        overlay.begin_commit("predictions").unwrap();

        // Catalog comes back with unrelated persisted notes.
        overlay.reload(&catalog_with_notes(&[("predictions", "final")]));
        assert_eq!(overlay.display_value("predictions"), Some("final"));
        assert_eq!(overlay.phase("predictions"), Some(NotePhase::Clean));

        // Late completion of the pre-reload commit is a no-op.
        overlay.finish_commit("predictions");
        assert_eq!(overlay.display_value("predictions"), Some("final"));
    }

    #[test]
    fn edit_while_committing_is_last_write_wins() {
        let mut overlay = NotesOverlay::new();
        overlay.reload(&catalog_with_notes(&[("predictions", "")]));

        overlay.edit("predictions", "first").unwrap();
        overlay.begin_commit("predictions").unwrap();
        overlay.edit("predictions", "second").unwrap();

        assert_eq!(overlay.display_value("predictions"), Some("second"));

        overlay.finish_commit("predictions");
        // The settled commit promoted "first"; the newer edit is still
        // pending and drives the display.
        assert_eq!(overlay.phase("predictions"), Some(NotePhase::Editing));
        assert_eq!(overlay.display_value("predictions"), Some("second"));

        let commit = overlay.begin_commit("predictions").unwrap().unwrap();
        assert_eq!(commit.value, "second");
    }

    #[test]
    fn empty_value_is_a_removal() {
        let mut overlay = NotesOverlay::new();
        overlay.reload(&catalog_with_notes(&[("predictions", "obsolete")]));

        overlay.edit("predictions", "").unwrap();
        let commit = overlay.begin_commit("predictions").unwrap().unwrap();
        assert!(commit.is_removal());
    }

    #[test]
    fn begin_commit_without_edit_returns_none() {
        let mut overlay = NotesOverlay::new();
        overlay.reload(&catalog_with_notes(&[("predictions", "text")]));

        assert_eq!(overlay.begin_commit("predictions").unwrap(), None);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut overlay = NotesOverlay::new();
        overlay.reload(&catalog_with_notes(&[("predictions", "")]));

        assert!(overlay.edit("missing", "x").is_err());
        assert!(overlay.begin_commit("missing").is_err());
    }
}
