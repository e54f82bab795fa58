//! Export
//!
//! Renders a [`ClassificationTree`] to one of the supported text formats:
//! - **DOT**: Graphviz `digraph`
//! - **GraphML**: yEd flavored GraphML, with plain `desc` data for other editors
//! - **JSON**: nested label/children objects consumed by the chatbot builder
//!
//! Every format is rendered fully in memory before the sink is touched.
mod dot;
mod graphml;
mod json;
pub mod xml;

pub use dot::DotEncoder;
pub use graphml::GraphMLEncoder;
pub use json::JsonEncoder;

use crate::config::ExportOptions;
use crate::errors::ExportError;
use crate::tree::ClassificationTree;
use crate::utils::items_to_strings;
use crate::walker::{walk, ExportSummary};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Supported output formats.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ExportFormat {
    #[default]
    Dot,
    GraphML,
    Json,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dot" => Ok(ExportFormat::Dot),
            "graphml" => Ok(ExportFormat::GraphML),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::ParseString(
                s.to_string(),
                "ExportFormat".to_string(),
                items_to_strings(vec!["dot", "graphml", "json"]),
            )),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ExportFormat::Dot => "DOT",
            ExportFormat::GraphML => "GraphML",
            ExportFormat::Json => "JSON",
        };
        write!(f, "{}", s)
    }
}

/// Render the tree in the format selected by `options`.
///
/// Platform escaping is applied to DOT and JSON buffers only.
pub fn export_to_string(
    tree: &ClassificationTree,
    options: &ExportOptions,
) -> Result<(String, ExportSummary), ExportError> {
    let (buffer, summary) = match options.format {
        ExportFormat::Dot => {
            let mut encoder = DotEncoder::new(options.restore_placeholder);
            let summary = walk(&tree.root, options.pruning, &mut encoder)?;
            (options.platform_escaping.apply(encoder.finish()), summary)
        }
        ExportFormat::GraphML => {
            let mut encoder = GraphMLEncoder::new(options.restore_placeholder);
            let summary = walk(&tree.root, options.pruning, &mut encoder)?;
            (encoder.finish(), summary)
        }
        ExportFormat::Json => {
            let mut encoder = JsonEncoder::new(options.restore_placeholder);
            let summary = walk(&tree.root, options.pruning, &mut encoder)?;
            (options.platform_escaping.apply(encoder.finish()), summary)
        }
    };
    Ok((buffer, summary))
}

/// Export the tree to `sink`.
///
/// The document is rendered completely before anything is written, so a
/// malformed tree never leaves a partial document behind.
///
/// * `tree` - The tree to export, left untouched.
/// * `sink` - Destination of the document, flushed before returning.
/// * `options` - Format, pruning and escaping options.
pub fn export<W: Write>(
    tree: &ClassificationTree,
    sink: W,
    options: &ExportOptions,
) -> Result<ExportSummary, ExportError> {
    let (buffer, summary) = export_to_string(tree, options)?;
    write_buffer(sink, &buffer, options.format)?;
    log_summary(options.format, &summary);
    Ok(summary)
}

/// Export the tree to a file, created or truncated at `path`.
pub fn export_to_path<P: AsRef<Path>>(
    tree: &ClassificationTree,
    path: P,
    options: &ExportOptions,
) -> Result<ExportSummary, ExportError> {
    let (buffer, summary) = export_to_string(tree, options)?;
    let file = File::create(path.as_ref()).map_err(|e| ExportError::SinkUnavailable {
        format: options.format,
        reason: format!("{}: {}", path.as_ref().display(), e),
    })?;
    write_buffer(BufWriter::new(file), &buffer, options.format)?;
    log_summary(options.format, &summary);
    Ok(summary)
}

fn write_buffer<W: Write>(mut sink: W, buffer: &str, format: ExportFormat) -> Result<(), ExportError> {
    sink.write_all(buffer.as_bytes())
        .and_then(|_| sink.flush())
        .map_err(|e| ExportError::SinkUnavailable {
            format,
            reason: e.to_string(),
        })
}

fn log_summary(format: ExportFormat, summary: &ExportSummary) {
    info!(
        "{} export completed: {} nodes, {} edges ({} elided, {} dropped).",
        format, summary.nodes, summary.edges, summary.elided, summary.dropped
    );
}
