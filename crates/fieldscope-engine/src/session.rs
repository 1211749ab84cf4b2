use fieldscope_types::SavedViewSummary;
use std::collections::BTreeSet;

/// Session-local state around the saved-views listing: which view the
/// host currently has loaded, which one was just created by a save,
/// and which ones are optimistically hidden while deletes are in
/// flight.
///
/// Reset wholesale whenever the dataset identity changes.
#[derive(Debug, Clone, Default)]
pub struct ViewSession {
    active_view: Option<String>,
    just_created: Option<String>,
    pending_deletes: BTreeSet<String>,
}

impl ViewSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything; called on dataset change.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record a successful save. The saved view gets "just created"
    /// framing until the user navigates away or loads another view.
    pub fn view_saved(&mut self, name: impl Into<String>) {
        self.just_created = Some(name.into());
    }

    /// Navigation away from the saved-views context drops the
    /// "just created" framing.
    pub fn leave_saved_views(&mut self) {
        self.just_created = None;
    }

    /// A load supersedes "just created" framing immediately, before
    /// the external call resolves.
    pub fn view_loaded(&mut self) {
        self.just_created = None;
    }

    /// Optimistically hide a view ahead of its delete round-trip.
    pub fn begin_delete(&mut self, name: impl Into<String>) {
        self.pending_deletes.insert(name.into());
    }

    /// Clear all optimistic hides. Called when the post-delete listing
    /// refetch settles (success or failure); a failed delete may
    /// transiently reappear then, which is the accepted staleness
    /// window.
    pub fn deletes_settled(&mut self) {
        self.pending_deletes.clear();
    }

    /// Record the host's currently loaded view name, an externally
    /// observed signal passed in at each decision point.
    pub fn mark_active(&mut self, host_loaded_view: Option<&str>) {
        self.active_view = host_loaded_view.map(str::to_string);
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active_view.as_deref() == Some(name)
    }

    pub fn is_just_created(&self, name: &str) -> bool {
        self.just_created.as_deref() == Some(name)
    }

    pub fn just_created(&self) -> Option<&str> {
        self.just_created.as_deref()
    }

    pub fn has_pending_deletes(&self) -> bool {
        !self.pending_deletes.is_empty()
    }

    /// The listing as presented: most-recent-first (reverse of store
    /// order) with optimistically deleted views hidden.
    pub fn visible_listing(&self, store_order: &[SavedViewSummary]) -> Vec<SavedViewSummary> {
        store_order
            .iter()
            .rev()
            .filter(|v| !self.pending_deletes.contains(&v.name))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(names: &[&str]) -> Vec<SavedViewSummary> {
        names
            .iter()
            .map(|n| SavedViewSummary::new(*n, ""))
            .collect()
    }

    fn visible_names(session: &ViewSession, store_order: &[SavedViewSummary]) -> Vec<String> {
        session
            .visible_listing(store_order)
            .into_iter()
            .map(|v| v.name)
            .collect()
    }

    #[test]
    fn listing_presents_most_recent_first() {
        let session = ViewSession::new();
        let views = listing(&["oldest", "middle", "newest"]);

        assert_eq!(
            visible_names(&session, &views),
            vec!["newest", "middle", "oldest"]
        );
    }

    #[test]
    fn delete_hides_view_before_round_trip_resolves() {
        let mut session = ViewSession::new();
        let views = listing(&["A", "B"]);

        session.begin_delete("A");
        assert_eq!(visible_names(&session, &views), vec!["B"]);
        assert!(session.has_pending_deletes());
    }

    #[test]
    fn settled_deletes_clear_wholesale() {
        let mut session = ViewSession::new();
        session.begin_delete("A");
        session.begin_delete("B");

        session.deletes_settled();
        assert!(!session.has_pending_deletes());
        assert_eq!(visible_names(&session, &listing(&["A"])), vec!["A"]);
    }

    #[test]
    fn save_sets_just_created_until_navigation_away() {
        let mut session = ViewSession::new();
        session.view_saved("[Model Picker] Demo");
        assert!(session.is_just_created("[Model Picker] Demo"));

        session.leave_saved_views();
        assert_eq!(session.just_created(), None);
    }

    #[test]
    fn load_supersedes_just_created_framing() {
        let mut session = ViewSession::new();
        session.view_saved("fresh");

        session.view_loaded();
        assert_eq!(session.just_created(), None);
    }

    #[test]
    fn active_view_follows_host_signal() {
        let mut session = ViewSession::new();
        session.mark_active(Some("Comparison A"));
        assert!(session.is_active("Comparison A"));
        assert!(!session.is_active("Comparison B"));

        session.mark_active(None);
        assert!(!session.is_active("Comparison A"));
    }

    #[test]
    fn reset_clears_all_session_state() {
        let mut session = ViewSession::new();
        session.view_saved("kept");
        session.begin_delete("gone");
        session.mark_active(Some("kept"));

        session.reset();
        assert_eq!(session.just_created(), None);
        assert!(!session.has_pending_deletes());
        assert!(!session.is_active("kept"));
    }
}
