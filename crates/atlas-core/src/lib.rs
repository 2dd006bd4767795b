//! Admission and layout core for the timeline atlas.
//!
//! Given a pool of historical events with fuzzy dates and a viewport, this
//! crate decides which events the timeline shows, which labels are drawn,
//! and how each admitted event is positioned and styled.
//!
//! # Modules
//!
//! - [`temporal`] -- Fuzzy date resolution and temporal extents.
//! - [`geo`] -- Geographic bound filtering.
//! - [`threshold`] -- Importance threshold as a function of visible span.
//! - [`capacity`] -- Maximum admitted events as a function of visible span.
//! - [`selector`] -- Concurrency-bounded greedy admission.
//! - [`labels`] -- Label suppression for short, unimportant events.
//! - [`materialize`] -- Conversion of events into display items.
//! - [`groups`] -- Category rows for the timeline widget.
//! - [`pipeline`] -- The full selection pass, [`select_events`].
//! - [`config`] -- Configuration loading from `atlas-config.yaml` into
//!   strongly-typed structs.
//! - [`source`] -- Decoding of paginated event and category payloads.
//!
//! [`select_events`]: pipeline::select_events

pub mod capacity;
pub mod config;
pub mod geo;
pub mod groups;
pub mod labels;
pub mod materialize;
pub mod pipeline;
pub mod selector;
pub mod source;
pub mod temporal;
pub mod threshold;

pub use config::{AtlasConfig, ConfigError, DisplayOptions};
pub use pipeline::{Selection, TimelineView, Viewport, build_view, select_display_items, select_events};
pub use source::SourceError;
pub use temporal::TemporalExtent;
