use crate::controller::{ApplyOutcome, FetchOutcome, FetchPlan, PanelController};
use crate::error::{Error, Result};
use crate::events::PanelEvent;
use crate::stores::{FieldCatalogService, NotesStore, SaveViewRequest, ViewStore};
use fieldscope_engine::{GroupBy, GroupedView};
use fieldscope_types::{DatasetId, PanelContext, PanelTab};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// External collaborators and the dataset the panel opens on.
pub struct PanelConfig {
    pub dataset: DatasetId,
    pub catalog_service: Arc<dyn FieldCatalogService>,
    pub notes_store: Arc<dyn NotesStore>,
    pub view_store: Arc<dyn ViewStore>,
}

/// Async driver wiring [`PanelController`] to the external stores.
///
/// Methods run one event to completion before returning; suspension
/// happens only at the store boundary. Fetch failures land in the
/// tab's phase and are also returned; mutation failures are reported
/// on the event channel and swallowed, per the panel's best-effort
/// contract.
pub struct Panel {
    controller: PanelController,
    catalog_service: Arc<dyn FieldCatalogService>,
    notes_store: Arc<dyn NotesStore>,
    view_store: Arc<dyn ViewStore>,
    events: UnboundedSender<PanelEvent>,
}

impl Panel {
    pub fn new(config: PanelConfig) -> (Self, UnboundedReceiver<PanelEvent>) {
        let (tx, rx) = unbounded_channel();
        let panel = Self {
            controller: PanelController::new(config.dataset),
            catalog_service: config.catalog_service,
            notes_store: config.notes_store,
            view_store: config.view_store,
            events: tx,
        };
        (panel, rx)
    }

    /// Read access to the reconciliation core; hosts render from this.
    pub fn controller(&self) -> &PanelController {
        &self.controller
    }

    fn emit(&self, event: PanelEvent) {
        // A dropped receiver only means nobody is observing.
        let _ = self.events.send(event);
    }

    // --- Lifecycle ---

    /// Activate the panel's current tab, fetching its resource.
    pub async fn open(&mut self) -> Result<()> {
        let tab = self.controller.context().tab;
        let plan = self.controller.switch_tab(tab);
        self.run_plan(plan).await
    }

    pub async fn switch_tab(&mut self, tab: PanelTab) -> Result<()> {
        let plan = self.controller.switch_tab(tab);
        self.run_plan(plan).await
    }

    pub async fn switch_dataset(&mut self, dataset: DatasetId) -> Result<()> {
        let plan = self.controller.switch_dataset(dataset);
        self.run_plan(plan).await
    }

    async fn run_plan(&mut self, plan: FetchPlan) -> Result<()> {
        match plan {
            FetchPlan::None => Ok(()),
            FetchPlan::Catalog(ctx) => self.fetch_catalog(ctx).await,
            FetchPlan::Statistics(ctx) => self.fetch_statistics(ctx).await,
            FetchPlan::Listing(ctx) => self.fetch_listing(ctx).await,
        }
    }

    async fn fetch_catalog(&mut self, ctx: PanelContext) -> Result<()> {
        self.emit(PanelEvent::FetchStarted {
            context: ctx.clone(),
        });
        match self.catalog_service.fetch_catalog(&ctx.dataset).await {
            Ok(catalog) => {
                let field_count = catalog.total_count;
                match self.controller.catalog_loaded(ctx.clone(), catalog) {
                    FetchOutcome::Applied => self.emit(PanelEvent::CatalogLoaded {
                        context: ctx,
                        field_count,
                    }),
                    FetchOutcome::Stale => {
                        self.emit(PanelEvent::StaleResponseDiscarded { context: ctx })
                    }
                }
                Ok(())
            }
            Err(err) => self.fetch_failed(ctx, err, |c, m, x| c.catalog_failed(m, x)),
        }
    }

    async fn fetch_statistics(&mut self, ctx: PanelContext) -> Result<()> {
        self.emit(PanelEvent::FetchStarted {
            context: ctx.clone(),
        });
        match self.catalog_service.fetch_statistics(&ctx.dataset).await {
            Ok(report) => {
                match self.controller.statistics_loaded(ctx.clone(), report) {
                    FetchOutcome::Applied => {
                        self.emit(PanelEvent::StatisticsLoaded { context: ctx })
                    }
                    FetchOutcome::Stale => {
                        self.emit(PanelEvent::StaleResponseDiscarded { context: ctx })
                    }
                }
                Ok(())
            }
            Err(err) => self.fetch_failed(ctx, err, |c, m, x| c.statistics_failed(m, x)),
        }
    }

    async fn fetch_listing(&mut self, ctx: PanelContext) -> Result<()> {
        self.emit(PanelEvent::FetchStarted {
            context: ctx.clone(),
        });
        match self.view_store.list_views(&ctx.dataset).await {
            Ok(listing) => {
                let view_count = listing.total_count;
                match self.controller.listing_loaded(ctx.clone(), listing) {
                    FetchOutcome::Applied => self.emit(PanelEvent::ListingLoaded {
                        context: ctx,
                        view_count,
                    }),
                    FetchOutcome::Stale => {
                        self.emit(PanelEvent::StaleResponseDiscarded { context: ctx })
                    }
                }
                Ok(())
            }
            Err(err) => self.fetch_failed(ctx, err, |c, m, x| c.listing_failed(m, x)),
        }
    }

    fn fetch_failed(
        &mut self,
        ctx: PanelContext,
        err: anyhow::Error,
        record: impl FnOnce(&mut PanelController, PanelContext, String) -> FetchOutcome,
    ) -> Result<()> {
        let message = err.to_string();
        match record(&mut self.controller, ctx.clone(), message.clone()) {
            FetchOutcome::Applied => self.emit(PanelEvent::FetchFailed {
                context: ctx,
                message: message.clone(),
            }),
            FetchOutcome::Stale => self.emit(PanelEvent::StaleResponseDiscarded { context: ctx }),
        }
        Err(Error::Fetch(message))
    }

    // --- Field view ---

    pub fn grouped(&self, search_term: &str, group_by: GroupBy) -> Option<GroupedView> {
        self.controller.grouped(search_term, group_by)
    }

    // --- Selection ---

    pub fn toggle_field(&mut self, name: &str) -> Result<()> {
        self.controller.toggle_field(name)
    }

    pub fn select_all_visible(&mut self, visible: &[String]) {
        self.controller.select_all_visible(visible);
    }

    pub fn deselect_all(&mut self) {
        self.controller.deselect_all();
    }

    /// Push the current selection to the external view. Rejected
    /// locally when empty; a failed store call is reported and
    /// swallowed without rolling back the selection.
    pub async fn apply_selection(&mut self) -> Result<ApplyOutcome> {
        let (names, outcome) = self.controller.apply_selection()?;
        match self.push_selection(&names).await {
            Ok(()) => self.emit(PanelEvent::SelectionApplied { outcome }),
            Err(err) => self.emit(PanelEvent::ApplyFailed {
                message: err.to_string(),
            }),
        }
        Ok(outcome)
    }

    async fn push_selection(&self, names: &BTreeSet<String>) -> Result<()> {
        let dataset = self.controller.context().dataset.clone();
        self.view_store
            .apply_selection(&dataset, names)
            .await
            .map_err(|e| Error::Mutation(e.to_string()))
    }

    // --- Notes ---

    pub fn edit_note(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        self.controller.edit_note(name, value)
    }

    /// Commit a field's pending note edit. Best-effort: the overlay
    /// settles to the local value whether or not the store accepted
    /// it. No-op when nothing is pending.
    pub async fn commit_note(&mut self, name: &str) -> Result<()> {
        let Some(commit) = self.controller.begin_note_commit(name)? else {
            return Ok(());
        };

        let dataset = self.controller.context().dataset.clone();
        let result = self
            .notes_store
            .update_notes(&dataset, &commit.field_name, &commit.value)
            .await;

        self.controller.finish_note_commit(name);
        match result {
            Ok(()) => self.emit(PanelEvent::NoteCommitted {
                field_name: commit.field_name,
            }),
            Err(err) => self.emit(PanelEvent::NoteCommitFailed {
                field_name: commit.field_name,
                message: Error::Mutation(err.to_string()).to_string(),
            }),
        }
        Ok(())
    }

    // --- Saved views ---

    /// Persist the currently applied selection as a named view. On
    /// success the panel switches to the saved-views presentation with
    /// a fresh listing; failures are reported and swallowed.
    pub async fn save_view(&mut self, request: SaveViewRequest) -> Result<()> {
        let ctx = self.controller.context().clone();
        match self.view_store.save_view(&ctx.dataset, request).await {
            Ok(name) => {
                self.emit(PanelEvent::ViewSaved { name: name.clone() });
                let plan = self.controller.view_save_succeeded(ctx, name);
                self.run_plan(plan).await
            }
            Err(err) => {
                self.emit(PanelEvent::SaveFailed {
                    message: Error::Mutation(err.to_string()).to_string(),
                });
                Ok(())
            }
        }
    }

    /// Hand a view load to the host. Load failures are the host
    /// surface's concern; this core only reports them.
    pub async fn load_view(&mut self, name: &str) -> Result<()> {
        self.controller.begin_load_view();
        self.emit(PanelEvent::ViewLoadRequested {
            name: name.to_string(),
        });

        let dataset = self.controller.context().dataset.clone();
        if let Err(err) = self.view_store.load_view(&dataset, name).await {
            self.emit(PanelEvent::LoadFailed {
                name: name.to_string(),
                message: Error::Mutation(err.to_string()).to_string(),
            });
        }
        Ok(())
    }

    /// Delete a view: hidden from the listing immediately, then the
    /// listing is refetched once the store call settles either way.
    pub async fn delete_view(&mut self, name: &str) -> Result<()> {
        self.controller.begin_delete_view(name);
        self.emit(PanelEvent::ViewDeleteRequested {
            name: name.to_string(),
        });

        let ctx = self.controller.context().clone();
        if let Err(err) = self.view_store.delete_view(&ctx.dataset, name).await {
            self.emit(PanelEvent::DeleteFailed {
                name: name.to_string(),
                message: Error::Mutation(err.to_string()).to_string(),
            });
        }

        let plan = self.controller.delete_completed(ctx);
        self.run_plan(plan).await
    }

    /// Record the host's currently loaded view name (external signal,
    /// passed in at each decision point).
    pub fn mark_active(&mut self, host_loaded_view: Option<&str>) {
        self.controller.mark_active(host_loaded_view);
    }
}
