pub mod defs;
pub mod state;

pub use defs::{RawItem, SchemaError, StandardizedItem, StandardizedMetadata, UNKNOWN_AUTHOR};
pub use state::SinkError;

// Object style note:
// Ingestion and publication run as short lived single-task processes that
// hand data to each other through files. The types here describe those files;
// nothing in this crate keeps state between runs.
