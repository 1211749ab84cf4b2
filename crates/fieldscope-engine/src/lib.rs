// Engine module - pure derivation and local panel state
// This layer sits between the normalized catalog (types) and runtime orchestration

pub mod error;
pub mod grouping;
pub mod notes;
pub mod selection;
pub mod session;

pub use error::{Error, Result};
pub use grouping::{
    derive, FieldGroup, GroupBy, GroupEntry, GroupedView, NO_EVALUATIONS_GROUP,
};
pub use notes::{NoteCommit, NotePhase, NotesOverlay};
pub use selection::SelectionState;
pub use session::ViewSession;
