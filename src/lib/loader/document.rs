// SPDX-License-Identifier: Apache-2.0

use std::{
    io::Read,
    path::{Path, PathBuf},
};

use serde_yaml::Value;

use crate::{netdef::document::Document, ErrorKind, NetplanError};

/// One YAML source with its parse tree. `value` is `Null` for empty
/// documents.
#[derive(Debug, Clone)]
pub(crate) struct SourceDocument {
    pub(crate) path: PathBuf,
    pub(crate) text: String,
    pub(crate) value: Value,
}

impl SourceDocument {
    pub(crate) fn from_file(path: &Path) -> Result<Self, NetplanError> {
        warn_if_world_readable(path);
        let text = std::fs::read_to_string(path)
            .map_err(|e| NetplanError::file_error(path, e))?;
        Self::from_text(path, text)
    }

    pub(crate) fn from_reader<R: Read>(
        mut reader: R,
        path: &Path,
    ) -> Result<Self, NetplanError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| NetplanError::file_error(path, e))?;
        Self::from_text(path, text)
    }

    /// Parse `text`, failing on YAML syntax errors only.
    pub(crate) fn from_text(
        path: &Path,
        text: String,
    ) -> Result<Self, NetplanError> {
        let value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str::<Value>(&text)
                .map_err(|e| yaml_error(ErrorKind::InvalidYaml, path, &e))?
        };
        Ok(Self {
            path: path.to_path_buf(),
            text,
            value,
        })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.value.is_null()
    }

    /// Check the whole document against the schema, errors carry the
    /// location of the offending node.
    pub(crate) fn check_schema(&self) -> Result<(), NetplanError> {
        if self.is_empty() {
            return Ok(());
        }
        serde_yaml::from_str::<Document>(&self.text)
            .map(|_| ())
            .map_err(|e| yaml_error(ErrorKind::InvalidConfig, &self.path, &e))
    }

    /// The `network` mapping, `None` when absent or empty.
    pub(crate) fn network(&self) -> Option<&serde_yaml::Mapping> {
        self.value.get("network").and_then(|v| v.as_mapping())
    }

    pub(crate) fn network_mut(&mut self) -> Option<&mut serde_yaml::Mapping> {
        self.value
            .get_mut("network")
            .and_then(|v| v.as_mapping_mut())
    }
}

/// Map a serde_yaml error to a parser error, keeping the location when
/// serde_yaml knows it.
pub(crate) fn yaml_error(
    kind: ErrorKind,
    path: &Path,
    e: &serde_yaml::Error,
) -> NetplanError {
    let detail = strip_location(e);
    match e.location() {
        Some(loc) => NetplanError::parser_at(
            kind,
            path,
            loc.line(),
            loc.column(),
            &detail,
        ),
        None => NetplanError::new(
            kind,
            format!(
                "{}: Error in network definition: {detail}",
                path.display()
            ),
        ),
    }
}

// serde_yaml appends " at line X column Y" to its message, the location is
// already in our prefix.
fn strip_location(e: &serde_yaml::Error) -> String {
    let msg = e.to_string();
    match msg.rfind(" at line ") {
        Some(pos) => msg[..pos].to_string(),
        None => msg,
    }
}

#[cfg(unix)]
fn warn_if_world_readable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(meta) = std::fs::metadata(path) {
        if meta.permissions().mode() & 0o077 != 0 {
            log::warn!(
                "Permissions for {} are too open. Netplan configuration \
                 should NOT be accessible by others.",
                path.display()
            );
        }
    }
}

#[cfg(not(unix))]
fn warn_if_world_readable(_path: &Path) {}
