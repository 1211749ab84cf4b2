pub mod controller;
pub mod error;
pub mod events;
pub mod panel;
pub mod stores;

pub use controller::{ApplyOutcome, FetchOutcome, FetchPlan, PanelController, TabPhase};
pub use error::{Error, Result};
pub use events::PanelEvent;
pub use panel::{Panel, PanelConfig};
pub use stores::{FieldCatalogService, NotesStore, SaveViewRequest, ViewStore};
