//! Shared type definitions for the timeline atlas.
//!
//! This crate is the single source of truth for the records exchanged
//! between the data source, the layout core, and the rendering widgets.
//! Types defined here flow downstream to `TypeScript` via `ts-rs` for the
//! timeline and map front end.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe integer wrappers for event and category identifiers
//! - [`enums`] -- Date precision and display item kind
//! - [`structs`] -- Source records, viewport inputs, and display payloads

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{DateResolution, ItemKind};
pub use ids::{CategoryId, EventId};
pub use structs::{
    Category, DisplayGroup, DisplayItem, Event, FuzzyDate, GeoBounds, VisibleWindow,
};
