//! Testing infrastructure for fieldscope integration tests.
//!
//! This crate provides utilities for writing robust integration tests:
//! - `PanelWorld`: a panel wired to in-memory stores
//! - `fixtures`: catalog, statistics, and listing sample data
//! - `stores`: in-memory store implementations with failure injection

pub mod fixtures;
pub mod stores;
pub mod world;

pub use stores::{MemoryCatalogService, MemoryNotesStore, MemoryViewStore, NoteUpdate};
pub use world::PanelWorld;
