use crate::error::{Error, Result};
use fieldscope_engine::{
    derive, GroupBy, GroupedView, NoteCommit, NotesOverlay, SelectionState, ViewSession,
};
use fieldscope_types::{
    DatasetId, FieldCatalog, PanelContext, PanelTab, SavedViewListing, SavedViewSummary,
    StatisticsReport,
};
use std::collections::BTreeSet;

/// Content state of one tab.
///
/// An empty catalog is `Ready`, not `Failed`: zero fields is a valid
/// terminal display state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabPhase {
    /// Nothing fetched yet for this tab.
    Idle,
    /// A fetch is in flight; the host renders a loading state.
    Loading,
    /// Content is present and current.
    Ready,
    /// The fetch failed; the message replaces the tab's content.
    Failed(String),
}

/// Fetch the controller instructs its driver to issue next. Each plan
/// carries the request-identity context captured at decision time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPlan {
    None,
    Catalog(PanelContext),
    Statistics(PanelContext),
    Listing(PanelContext),
}

/// Whether a completion was applied or discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Stale,
}

/// Local summary of what an apply covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub selected_count: usize,
    pub excluded_count: usize,
}

/// The panel's single-threaded reconciliation core.
///
/// Owns the catalog snapshot, selection, notes overlay, and view
/// session exclusively; all mutation flows through these methods in
/// response to discrete events. External calls are issued by a driver
/// (see [`Panel`](crate::Panel)) from the returned [`FetchPlan`]s, and
/// their completions are delivered back here with the context they
/// were issued under. Completions for a context the panel has moved
/// past are discarded, which makes out-of-order arrival safe.
#[derive(Debug)]
pub struct PanelController {
    context: PanelContext,
    catalog: Option<FieldCatalog>,
    statistics: Option<StatisticsReport>,
    listing: Vec<SavedViewSummary>,
    selection: SelectionState,
    notes: NotesOverlay,
    session: ViewSession,
    fields_phase: TabPhase,
    stats_phase: TabPhase,
    views_phase: TabPhase,
}

impl PanelController {
    /// Start on the fields tab of the given dataset. Nothing is
    /// fetched until the first `switch_tab`/`switch_dataset`.
    pub fn new(dataset: DatasetId) -> Self {
        Self {
            context: PanelContext::new(dataset, PanelTab::Fields),
            catalog: None,
            statistics: None,
            listing: Vec::new(),
            selection: SelectionState::new(),
            notes: NotesOverlay::new(),
            session: ViewSession::new(),
            fields_phase: TabPhase::Idle,
            stats_phase: TabPhase::Idle,
            views_phase: TabPhase::Idle,
        }
    }

    pub fn context(&self) -> &PanelContext {
        &self.context
    }

    pub fn catalog(&self) -> Option<&FieldCatalog> {
        self.catalog.as_ref()
    }

    pub fn statistics(&self) -> Option<&StatisticsReport> {
        self.statistics.as_ref()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn notes(&self) -> &NotesOverlay {
        &self.notes
    }

    pub fn session(&self) -> &ViewSession {
        &self.session
    }

    pub fn phase(&self, tab: PanelTab) -> &TabPhase {
        match tab {
            PanelTab::Fields => &self.fields_phase,
            PanelTab::Statistics => &self.stats_phase,
            PanelTab::SavedViews => &self.views_phase,
        }
    }

    // --- Context lifecycle ---

    /// Move to another dataset: every cache and session state resets,
    /// and the active tab's resource is refetched under the new
    /// identity.
    pub fn switch_dataset(&mut self, dataset: DatasetId) -> FetchPlan {
        self.context.dataset = dataset;
        self.catalog = None;
        self.statistics = None;
        self.listing.clear();
        self.selection = SelectionState::new();
        self.notes = NotesOverlay::new();
        self.session.reset();
        self.fields_phase = TabPhase::Idle;
        self.stats_phase = TabPhase::Idle;
        self.views_phase = TabPhase::Idle;
        self.plan_active_tab()
    }

    /// Activate a tab. Each activation refetches the tab's resource;
    /// leaving the saved-views tab drops "just created" framing.
    pub fn switch_tab(&mut self, tab: PanelTab) -> FetchPlan {
        if self.context.tab == PanelTab::SavedViews && tab != PanelTab::SavedViews {
            self.session.leave_saved_views();
        }
        self.context.tab = tab;
        self.plan_active_tab()
    }

    fn plan_active_tab(&mut self) -> FetchPlan {
        let ctx = self.context.clone();
        match self.context.tab {
            PanelTab::Fields => {
                self.fields_phase = TabPhase::Loading;
                FetchPlan::Catalog(ctx)
            }
            PanelTab::Statistics => {
                self.stats_phase = TabPhase::Loading;
                FetchPlan::Statistics(ctx)
            }
            PanelTab::SavedViews => {
                self.views_phase = TabPhase::Loading;
                FetchPlan::Listing(ctx)
            }
        }
    }

    // --- Fetch completions ---

    /// Apply a completed catalog fetch. Resets the selection to all
    /// fields and reseeds the notes overlay; prior local state never
    /// survives a catalog refresh.
    pub fn catalog_loaded(&mut self, ctx: PanelContext, catalog: FieldCatalog) -> FetchOutcome {
        if ctx != self.context {
            return FetchOutcome::Stale;
        }
        self.selection.initialize(&catalog);
        self.notes.reload(&catalog);
        self.catalog = Some(catalog);
        self.fields_phase = TabPhase::Ready;
        FetchOutcome::Applied
    }

    pub fn catalog_failed(&mut self, ctx: PanelContext, message: String) -> FetchOutcome {
        if ctx != self.context {
            return FetchOutcome::Stale;
        }
        self.fields_phase = TabPhase::Failed(message);
        FetchOutcome::Applied
    }

    pub fn statistics_loaded(
        &mut self,
        ctx: PanelContext,
        report: StatisticsReport,
    ) -> FetchOutcome {
        if ctx != self.context {
            return FetchOutcome::Stale;
        }
        self.statistics = Some(report);
        self.stats_phase = TabPhase::Ready;
        FetchOutcome::Applied
    }

    pub fn statistics_failed(&mut self, ctx: PanelContext, message: String) -> FetchOutcome {
        if ctx != self.context {
            return FetchOutcome::Stale;
        }
        self.stats_phase = TabPhase::Failed(message);
        FetchOutcome::Applied
    }

    /// Apply a completed listing fetch. Listings belong to the
    /// dataset rather than a tab, so only the dataset identity is
    /// checked. Settles any optimistic deletes.
    pub fn listing_loaded(&mut self, ctx: PanelContext, listing: SavedViewListing) -> FetchOutcome {
        if !ctx.same_dataset(&self.context) {
            return FetchOutcome::Stale;
        }
        self.listing = listing.views;
        self.session.deletes_settled();
        self.views_phase = TabPhase::Ready;
        FetchOutcome::Applied
    }

    pub fn listing_failed(&mut self, ctx: PanelContext, message: String) -> FetchOutcome {
        if !ctx.same_dataset(&self.context) {
            return FetchOutcome::Stale;
        }
        // Deletes settle even on a failed refetch; a view whose delete
        // failed reappears no earlier than the next successful fetch.
        self.session.deletes_settled();
        self.views_phase = TabPhase::Failed(message);
        FetchOutcome::Applied
    }

    // --- Field view ---

    /// Derive the grouped field view for the current catalog.
    pub fn grouped(&self, search_term: &str, group_by: GroupBy) -> Option<GroupedView> {
        self.catalog
            .as_ref()
            .map(|catalog| derive(catalog, search_term, group_by))
    }

    // --- Selection ---

    pub fn toggle_field(&mut self, name: &str) -> Result<()> {
        self.selection.toggle(name)?;
        Ok(())
    }

    pub fn select_all_visible(&mut self, visible: &[String]) {
        self.selection.select_all(visible);
    }

    pub fn deselect_all(&mut self) {
        self.selection.deselect_all();
    }

    /// Validate and stage an apply: returns the name set for the
    /// external call plus the local outcome summary. An empty
    /// selection is rejected before any call is issued.
    pub fn apply_selection(&self) -> Result<(BTreeSet<String>, ApplyOutcome)> {
        if self.selection.is_empty() {
            return Err(Error::EmptySelection);
        }
        let names = self.selection.selected_names();
        let outcome = ApplyOutcome {
            selected_count: self.selection.len(),
            excluded_count: self.selection.excluded_count(),
        };
        Ok((names, outcome))
    }

    // --- Notes ---

    pub fn edit_note(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        self.notes.edit(name, value)?;
        Ok(())
    }

    pub fn begin_note_commit(&mut self, name: &str) -> Result<Option<NoteCommit>> {
        Ok(self.notes.begin_commit(name)?)
    }

    pub fn finish_note_commit(&mut self, name: &str) {
        self.notes.finish_commit(name);
    }

    // --- Saved views ---

    /// The saved-views listing as presented: most-recent-first with
    /// optimistic deletes hidden.
    pub fn visible_views(&self) -> Vec<SavedViewSummary> {
        self.session.visible_listing(&self.listing)
    }

    /// Record the host's currently loaded view name (external signal).
    pub fn mark_active(&mut self, host_loaded_view: Option<&str>) {
        self.session.mark_active(host_loaded_view);
    }

    /// Handle a successful save: the view gets "just created" framing
    /// and the panel switches to the saved-views presentation with a
    /// fresh listing. A save that resolves after a dataset switch is
    /// discarded.
    pub fn view_save_succeeded(&mut self, ctx: PanelContext, name: impl Into<String>) -> FetchPlan {
        if !ctx.same_dataset(&self.context) {
            return FetchPlan::None;
        }
        self.session.view_saved(name);
        self.context.tab = PanelTab::SavedViews;
        self.views_phase = TabPhase::Loading;
        FetchPlan::Listing(self.context.clone())
    }

    /// Stage a view load: "just created" framing clears immediately,
    /// before the external call resolves.
    pub fn begin_load_view(&mut self) {
        self.session.view_loaded();
    }

    /// Optimistically hide a view ahead of its delete call.
    pub fn begin_delete_view(&mut self, name: impl Into<String>) {
        self.session.begin_delete(name);
    }

    /// A delete round-trip finished (success or failure): refetch the
    /// listing. Pending hides stay in place until that refetch
    /// settles. A delete resolving after a dataset switch plans
    /// nothing; the switch already reset the session.
    pub fn delete_completed(&mut self, ctx: PanelContext) -> FetchPlan {
        if !ctx.same_dataset(&self.context) {
            return FetchPlan::None;
        }
        self.views_phase = TabPhase::Loading;
        FetchPlan::Listing(self.context.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldscope_types::{EvalRole, EvaluationRef, Field, FieldLevel};

    fn field(name: &str) -> Field {
        Field {
            name: name.to_string(),
            field_type: "Detections".to_string(),
            level: FieldLevel::Sample,
            evaluations: vec![EvaluationRef::new("eval_v1", EvalRole::Prediction)],
            notes: String::new(),
        }
    }

    fn catalog(names: &[&str]) -> FieldCatalog {
        FieldCatalog::new(names.iter().map(|n| field(n)).collect(), vec![])
    }

    fn listing(names: &[&str]) -> SavedViewListing {
        SavedViewListing::new(
            names
                .iter()
                .map(|n| SavedViewSummary::new(*n, ""))
                .collect(),
        )
    }

    fn controller_on(dataset: &str) -> (PanelController, PanelContext) {
        let mut controller = PanelController::new(DatasetId::from(dataset));
        let plan = controller.switch_tab(PanelTab::Fields);
        let FetchPlan::Catalog(ctx) = plan else {
            panic!("expected a catalog plan");
        };
        (controller, ctx)
    }

    #[test]
    fn tab_activation_plans_the_tab_resource() {
        let mut controller = PanelController::new(DatasetId::from("quickstart"));

        assert!(matches!(
            controller.switch_tab(PanelTab::Statistics),
            FetchPlan::Statistics(_)
        ));
        assert_eq!(*controller.phase(PanelTab::Statistics), TabPhase::Loading);

        assert!(matches!(
            controller.switch_tab(PanelTab::SavedViews),
            FetchPlan::Listing(_)
        ));
    }

    #[test]
    fn catalog_completion_applies_under_matching_context() {
        let (mut controller, ctx) = controller_on("quickstart");

        let outcome = controller.catalog_loaded(ctx, catalog(&["a", "b"]));
        assert_eq!(outcome, FetchOutcome::Applied);
        assert_eq!(*controller.phase(PanelTab::Fields), TabPhase::Ready);
        assert_eq!(controller.selection().len(), 2);
    }

    #[test]
    fn stale_catalog_completion_is_discarded() {
        let (mut controller, old_ctx) = controller_on("quickstart");

        // Dataset moved on before the fetch resolved.
        controller.switch_dataset(DatasetId::from("other"));

        let outcome = controller.catalog_loaded(old_ctx, catalog(&["a"]));
        assert_eq!(outcome, FetchOutcome::Stale);
        assert!(controller.catalog().is_none());
        assert_eq!(*controller.phase(PanelTab::Fields), TabPhase::Loading);
    }

    #[test]
    fn tab_switch_makes_in_flight_fetch_stale() {
        let (mut controller, old_ctx) = controller_on("quickstart");

        controller.switch_tab(PanelTab::Statistics);
        assert_eq!(
            controller.catalog_loaded(old_ctx, catalog(&["a"])),
            FetchOutcome::Stale
        );
    }

    #[test]
    fn fetch_failure_replaces_tab_content() {
        let (mut controller, ctx) = controller_on("quickstart");

        controller.catalog_failed(ctx, "connection refused".to_string());
        assert_eq!(
            *controller.phase(PanelTab::Fields),
            TabPhase::Failed("connection refused".to_string())
        );
    }

    #[test]
    fn empty_catalog_is_ready_not_failed() {
        let (mut controller, ctx) = controller_on("quickstart");

        controller.catalog_loaded(ctx, FieldCatalog::empty());
        assert_eq!(*controller.phase(PanelTab::Fields), TabPhase::Ready);
        assert!(controller.catalog().unwrap().is_empty());
    }

    #[test]
    fn selection_resets_on_every_catalog_refresh() {
        let (mut controller, ctx) = controller_on("quickstart");
        controller.catalog_loaded(ctx.clone(), catalog(&["predictions_v1", "other"]));

        controller.deselect_all();
        controller.toggle_field("predictions_v1").unwrap();
        let (names, _) = controller.apply_selection().unwrap();
        assert_eq!(names.len(), 1);

        // Refetch: the prior selection does not persist.
        controller.catalog_loaded(ctx, catalog(&["predictions_v1", "other"]));
        assert_eq!(controller.selection().len(), 2);
    }

    #[test]
    fn apply_with_empty_selection_is_rejected() {
        let (mut controller, ctx) = controller_on("quickstart");
        controller.catalog_loaded(ctx, catalog(&["a"]));

        controller.deselect_all();
        assert_eq!(controller.apply_selection(), Err(Error::EmptySelection));
    }

    #[test]
    fn apply_outcome_counts_selected_and_excluded() {
        let (mut controller, ctx) = controller_on("quickstart");
        controller.catalog_loaded(ctx, catalog(&["a", "b", "c"]));

        controller.toggle_field("c").unwrap();
        let (names, outcome) = controller.apply_selection().unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(outcome.selected_count, 2);
        assert_eq!(outcome.excluded_count, 1);
    }

    #[test]
    fn dataset_switch_resets_caches_and_session() {
        let (mut controller, ctx) = controller_on("quickstart");
        controller.catalog_loaded(ctx, catalog(&["a"]));
        controller.begin_delete_view("stale");
        controller
            .view_save_succeeded(controller.context().clone(), "kept");

        let plan = controller.switch_dataset(DatasetId::from("other"));
        // Save switched the panel to the saved-views tab, so the new
        // dataset starts by fetching its listing.
        assert!(matches!(plan, FetchPlan::Listing(_)));
        assert!(controller.catalog().is_none());
        assert_eq!(controller.session().just_created(), None);
        assert!(!controller.session().has_pending_deletes());
    }

    #[test]
    fn save_success_switches_to_saved_views_and_refetches() {
        let (mut controller, _) = controller_on("quickstart");

        let ctx = controller.context().clone();
        let plan = controller.view_save_succeeded(ctx, "[Model Picker] Demo");

        assert!(matches!(plan, FetchPlan::Listing(_)));
        assert_eq!(controller.context().tab, PanelTab::SavedViews);
        assert!(controller.session().is_just_created("[Model Picker] Demo"));

        // Navigating away clears the framing.
        controller.switch_tab(PanelTab::Fields);
        assert_eq!(controller.session().just_created(), None);
    }

    #[test]
    fn save_resolving_after_dataset_switch_is_discarded() {
        let (mut controller, _) = controller_on("quickstart");
        let ctx = controller.context().clone();

        controller.switch_dataset(DatasetId::from("other"));
        let plan = controller.view_save_succeeded(ctx, "late");

        assert_eq!(plan, FetchPlan::None);
        assert_eq!(controller.session().just_created(), None);
    }

    #[test]
    fn delete_hides_immediately_and_settles_on_refetched_listing() {
        let mut controller = PanelController::new(DatasetId::from("quickstart"));
        let FetchPlan::Listing(ctx) = controller.switch_tab(PanelTab::SavedViews) else {
            panic!("expected a listing plan");
        };
        controller.listing_loaded(ctx, listing(&["A", "B"]));

        controller.begin_delete_view("A");
        let visible: Vec<String> = controller
            .visible_views()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(visible, vec!["B"]);

        let plan = controller.delete_completed(controller.context().clone());
        let FetchPlan::Listing(refetch_ctx) = plan else {
            panic!("expected a listing refetch");
        };
        controller.listing_loaded(refetch_ctx, listing(&["B"]));

        assert!(!controller.session().has_pending_deletes());
        assert_eq!(controller.visible_views().len(), 1);
    }

    #[test]
    fn load_clears_just_created_immediately() {
        let (mut controller, _) = controller_on("quickstart");
        let ctx = controller.context().clone();
        controller.view_save_succeeded(ctx, "fresh");

        controller.begin_load_view();
        assert_eq!(controller.session().just_created(), None);
    }

    #[test]
    fn grouped_requires_a_catalog() {
        let (mut controller, ctx) = controller_on("quickstart");
        assert!(controller.grouped("", GroupBy::FieldType).is_none());

        controller.catalog_loaded(ctx, catalog(&["a"]));
        let view = controller.grouped("", GroupBy::Evaluation).unwrap();
        assert_eq!(view.groups[0].title, "eval_v1");
    }
}
