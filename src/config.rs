//! Export Configuration
//!
//! Defines the options shared by every export format and the JSON persistence
//! used for both options and trees.
use crate::errors::ExportError;
use crate::export::ExportFormat;
use crate::sanitize::PlatformEscaping;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options of a single export call.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(default)]
pub struct ExportOptions {
    /// Output format.
    pub format: ExportFormat,
    /// Drop subtrees never reached by a training instance and compress the
    /// single-child chains left behind.
    pub pruning: bool,
    /// Rewrite `= _` edge labels back to ` = `.
    pub restore_placeholder: bool,
    /// Quote escaping applied to the finished DOT or JSON buffer.
    pub platform_escaping: PlatformEscaping,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            format: ExportFormat::Dot,
            pruning: false,
            restore_placeholder: false,
            platform_escaping: PlatformEscaping::None,
        }
    }
}

impl ExportOptions {
    /// Set the output format.
    /// * `format` - One of DOT, GraphML or JSON.
    pub fn set_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Set pruning of branches without training instances.
    /// * `pruning` - Whether to prune and compress.
    pub fn set_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    /// Set placeholder restoration on edge labels.
    /// * `restore_placeholder` - Whether `= _` should read back as ` = `.
    pub fn set_restore_placeholder(mut self, restore_placeholder: bool) -> Self {
        self.restore_placeholder = restore_placeholder;
        self
    }

    /// Set the buffer-wide quote escaping.
    /// * `platform_escaping` - Convention expected by the consumer of the stream.
    pub fn set_platform_escaping(mut self, platform_escaping: PlatformEscaping) -> Self {
        self.platform_escaping = platform_escaping;
        self
    }
}

/// IO
pub trait JsonIO: Serialize + DeserializeOwned + Sized {
    /// Save as a json object to a file.
    ///
    /// * `path` - Path to save to.
    fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        fs::write(path, self.json_dump()?).map_err(|e| ExportError::UnableToWrite(e.to_string()))
    }

    /// Dump as a json object
    fn json_dump(&self) -> Result<String, ExportError> {
        serde_json::to_string(self).map_err(|e| ExportError::UnableToWrite(e.to_string()))
    }

    /// Load from Json string
    ///
    /// * `json_str` - String object, which can be serialized to json.
    fn from_json(json_str: &str) -> Result<Self, ExportError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| ExportError::UnableToRead(e.to_string()))
    }

    /// Load from a path to a json object.
    ///
    /// * `path` - Path to load from.
    fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let json_str = fs::read_to_string(path).map_err(|e| ExportError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

impl JsonIO for ExportOptions {}
