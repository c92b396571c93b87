//! # Facebook Provider
//!
//! Exports a user's Facebook events as calendar events, one Graph API page
//! per `export` call.

pub mod events;
pub mod exporter;
pub mod types;

pub use events::{EventTranslator, EventsSource, GRAPH_API_BASE};
pub use exporter::FacebookEventsExporter;
