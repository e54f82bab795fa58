//! Export trained classification trees (C4.5/J48 style) to Graphviz DOT,
//! yEd GraphML and the nested JSON read by the chatbot builder.
//!
//! Branches never reached by a training instance can be pruned from the
//! export, in which case the single-child chains left behind are compressed
//! into one edge.
mod node;

// Modules
pub mod config;
pub mod constants;
pub mod errors;
pub mod export;
pub mod sanitize;
pub mod tree;
pub mod utils;
pub mod walker;

// Individual classes, and functions
pub use config::{ExportOptions, JsonIO};
pub use errors::ExportError;
pub use export::{export, export_to_path, export_to_string, ExportFormat};
pub use node::{Branch, ClassificationNode, InstanceTable};
pub use sanitize::PlatformEscaping;
pub use tree::ClassificationTree;
pub use walker::ExportSummary;
