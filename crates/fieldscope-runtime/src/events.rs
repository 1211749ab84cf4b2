use crate::controller::ApplyOutcome;
use fieldscope_types::PanelContext;

/// Observable panel transitions, emitted by [`Panel`](crate::Panel)
/// on its event channel. Hosts render from controller state; the
/// event stream exists for logging, toasts, and tests.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// A fetch was issued under the given request context.
    FetchStarted { context: PanelContext },

    /// A catalog fetch completed and was applied.
    CatalogLoaded {
        context: PanelContext,
        field_count: usize,
    },

    /// A statistics fetch completed and was applied.
    StatisticsLoaded { context: PanelContext },

    /// A saved-view listing fetch completed and was applied.
    ListingLoaded {
        context: PanelContext,
        view_count: usize,
    },

    /// A fetch failed; the tab's content is replaced by an error state.
    FetchFailed {
        context: PanelContext,
        message: String,
    },

    /// A response arrived for a context the panel has moved past.
    StaleResponseDiscarded { context: PanelContext },

    /// The selection was pushed to the external view.
    SelectionApplied { outcome: ApplyOutcome },

    /// The apply call failed; the local selection is kept as-is.
    ApplyFailed { message: String },

    /// A notes commit settled successfully.
    NoteCommitted { field_name: String },

    /// A notes commit failed; the local value is kept regardless.
    /// Whether hosts surface this is their policy call.
    NoteCommitFailed { field_name: String, message: String },

    /// A view was saved and the panel switched to the saved-views
    /// presentation.
    ViewSaved { name: String },

    SaveFailed { message: String },

    /// A view load was handed to the host.
    ViewLoadRequested { name: String },

    LoadFailed { name: String, message: String },

    /// A view was optimistically hidden and its delete issued.
    ViewDeleteRequested { name: String },

    DeleteFailed { name: String, message: String },
}
