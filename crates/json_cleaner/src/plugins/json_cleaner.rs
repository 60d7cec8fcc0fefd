use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use path_clean::PathClean;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::compiler::Context;
use crate::config::{JsonCleanerConfig, Space};
use crate::plugin::Plugin;

const SCHEMA_KEY: &str = "$schema";
const DEFAULT_INDENT: &str = "\t";
const MAX_INDENT: usize = 10;

#[derive(Debug, Error)]
pub enum JsonCleanerError {
    #[error("Read json error: {path:?}, reason: {reason:?}")]
    Read { path: String, reason: String },
    #[error("Parse json error: {path:?}, reason: {reason:?}")]
    Parse { path: String, reason: String },
    #[error("Serialize json error: {path:?}, reason: {reason:?}")]
    Serialize { path: String, reason: String },
    #[error("Create dir error: {path:?}, reason: {reason:?}")]
    CreateDir { path: String, reason: String },
    #[error("Write json error: {path:?}, reason: {reason:?}")]
    Write { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indent {
    Compact,
    Pretty(String),
}

impl Indent {
    pub fn from_config(config: &JsonCleanerConfig) -> Self {
        // minify always wins over space
        if config.minify {
            return Indent::Compact;
        }
        let indent = match &config.space {
            None => DEFAULT_INDENT.to_string(),
            Some(Space::Width(width)) => {
                let width = width.floor().min(MAX_INDENT as f64);
                if width >= 1.0 {
                    " ".repeat(width as usize)
                } else {
                    String::new()
                }
            }
            Some(Space::Text(text)) => text.chars().take(MAX_INDENT).collect(),
        };
        if indent.is_empty() {
            Indent::Compact
        } else {
            Indent::Pretty(indent)
        }
    }
}

/// Removes `$schema` and the configured tags from the top level of `value`.
///
/// Missing keys are ignored, the order of the remaining keys is kept.
pub fn clean(value: &mut Value, config: &JsonCleanerConfig) {
    let Some(map) = value.as_object_mut() else {
        if config.remove_schema || !config.remove_tags.is_empty() {
            warn!("top level of json is not an object, nothing to remove");
        }
        return;
    };
    if config.remove_schema {
        map.shift_remove(SCHEMA_KEY);
    }
    for tag in &config.remove_tags {
        map.shift_remove(tag);
    }
}

pub fn stringify(value: &Value, indent: &Indent) -> serde_json::Result<String> {
    match indent {
        Indent::Compact => serde_json::to_string(value),
        Indent::Pretty(indent) => {
            let mut buf = Vec::new();
            let formatter = PrettyFormatter::with_indent(indent.as_bytes());
            let mut ser = Serializer::with_formatter(&mut buf, formatter);
            value.serialize(&mut ser)?;
            String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)
        }
    }
}

/// `out` relative to the output path, without root or prefix and with `.`/`..` folded.
pub fn normalize_out(out: &Path) -> PathBuf {
    out.components()
        .filter(|c| !matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect::<PathBuf>()
        .clean()
}

pub fn resolve_output_path(output_path: &Path, out: &Path) -> PathBuf {
    output_path.join(normalize_out(out)).clean()
}

pub struct JsonCleanerPlugin {
    config: JsonCleanerConfig,
}

impl JsonCleanerPlugin {
    pub fn new(config: JsonCleanerConfig) -> Self {
        Self { config }
    }

    /// Reads `src`, cleans it and writes it to `dest`.
    ///
    /// Nothing is written when reading, parsing or serializing fails.
    pub fn clean_file(&self, src: &Path, dest: &Path) -> Result<(), JsonCleanerError> {
        debug!("json cleaner read: {:?}", src);
        let bytes = fs::read(src).map_err(|e| JsonCleanerError::Read {
            path: src.to_string_lossy().to_string(),
            reason: e.to_string(),
        })?;
        let content = String::from_utf8(bytes).map_err(|e| JsonCleanerError::Parse {
            path: src.to_string_lossy().to_string(),
            reason: e.to_string(),
        })?;
        let mut json: Value =
            serde_json::from_str(&content).map_err(|e| JsonCleanerError::Parse {
                path: src.to_string_lossy().to_string(),
                reason: e.to_string(),
            })?;

        clean(&mut json, &self.config);

        let indent = Indent::from_config(&self.config);
        let content = stringify(&json, &indent).map_err(|e| JsonCleanerError::Serialize {
            path: src.to_string_lossy().to_string(),
            reason: e.to_string(),
        })?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| JsonCleanerError::CreateDir {
                path: parent.to_string_lossy().to_string(),
                reason: e.to_string(),
            })?;
        }
        fs::write(dest, content).map_err(|e| JsonCleanerError::Write {
            path: dest.to_string_lossy().to_string(),
            reason: e.to_string(),
        })?;
        info!("json cleaner write: {:?}", dest);
        Ok(())
    }
}

impl Plugin for JsonCleanerPlugin {
    fn name(&self) -> &str {
        "json-cleaner"
    }

    fn id(&self) -> String {
        format!(
            "{}:{}",
            self.name(),
            normalize_out(&self.config.out).to_string_lossy()
        )
    }

    fn build_end(&self, context: &Arc<Context>) -> Result<()> {
        let src = context.root.join(&self.config.src);
        let dest = resolve_output_path(&context.config.output.path, &self.config.out);
        self.clean_file(&src, &dest)?;
        Ok(())
    }
}
