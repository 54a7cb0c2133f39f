/*!
 * The document a pipeline run works on.
 *
 * A `Document` is created when a run starts, filled from the source file,
 * translated in place and finally rendered for the target file. It belongs
 * to exactly one run.
 */

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::PipelineError;

/// Default indentation of rendered documents
pub const DEFAULT_INDENT: usize = 4;

/// Where a document is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    Loading,
    Walking,
    Serializing,
    Persisted,
    Failed,
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Loading => "loading",
            Self::Walking => "walking",
            Self::Serializing => "serializing",
            Self::Persisted => "persisted",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A JSON document travelling from source to target
#[derive(Debug)]
pub struct Document {
    pub root: Value,
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    state: DocumentState,
}

impl Document {
    /// Empty document in the `Loading` state
    pub fn new(source_path: impl Into<PathBuf>, target_path: impl Into<PathBuf>) -> Self {
        Self {
            root: Value::Null,
            source_path: source_path.into(),
            target_path: target_path.into(),
            state: DocumentState::Loading,
        }
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    /// Move to the next state; `Failed` is terminal
    pub fn advance(&mut self, next: DocumentState) {
        if self.state != DocumentState::Failed {
            log::debug!("{}: {} -> {}", self.source_path.display(), self.state, next);
            self.state = next;
        }
    }

    pub fn fail(&mut self) {
        self.state = DocumentState::Failed;
    }

    /// Read and parse the source file into `root`
    pub fn load(&mut self) -> Result<(), PipelineError> {
        let content = std::fs::read_to_string(&self.source_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PipelineError::NotFound {
                path: self.source_path.clone(),
            },
            ErrorKind::InvalidData => PipelineError::MalformedInput {
                path: self.source_path.clone(),
                detail: "source is not valid UTF-8".to_string(),
            },
            _ => PipelineError::ReadFailure {
                path: self.source_path.clone(),
                detail: e.to_string(),
            },
        })?;

        self.root = parse_document(&self.source_path, &content)?;
        Ok(())
    }

    /// Render `root` as the bytes written to the target file
    pub fn render(&self, indent: usize) -> Result<String, PipelineError> {
        render_json(&self.root, indent).map_err(|e| PipelineError::WriteFailure {
            path: self.target_path.clone(),
            detail: format!("serialization failed: {}", e),
        })
    }
}

/// Parse JSON text, reporting the parser's position on failure
pub fn parse_document(path: &Path, content: &str) -> Result<Value, PipelineError> {
    // A UTF-8 BOM is common in files saved by Windows editors
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    serde_json::from_str(content).map_err(|e| PipelineError::MalformedInput {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Pretty-print with a fixed indent and a trailing newline
///
/// Object keys come out in insertion order, so rendering a parsed document
/// keeps the source's key order.
pub fn render_json(value: &Value, indent: usize) -> Result<String, serde_json::Error> {
    let indent = " ".repeat(indent);
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    buffer.push(b'\n');
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8(buffer).unwrap_or_default())
}
