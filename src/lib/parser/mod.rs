// SPDX-License-Identifier: Apache-2.0

mod collection;
mod context;
mod merge;

use std::{
    io::Read,
    path::{Path, PathBuf},
};

use serde_yaml::{Mapping, Value};

pub(crate) use self::collection::{RawCollection, RawDefinition};
use self::context::{LoadOverrides, MergeContext, NullOverride};
use crate::{
    enumerate_hierarchy,
    loader::{
        nullable::{
            display_path, get_path, key_to_string, null_paths, remove_path,
        },
        SourceDocument,
    },
    netdef::document::{check_global, check_stanza},
    DefinitionKind, ErrorKind, FilePrecedence, NetplanError, NetplanOptions,
};

const DELETIONS_LABEL: &str = "<deletions>";

pub(crate) struct ParsedParts {
    pub(crate) options: NetplanOptions,
    pub(crate) collection: RawCollection,
    pub(crate) ignored_errors: Vec<NetplanError>,
    pub(crate) sources: Vec<PathBuf>,
}

/// Mutable collection of definitions merged from YAML sources in
/// precedence order. Consumed by [crate::build_state()].
///
/// ```no_run
/// use netplan::{NetplanOptions, NetplanParser};
///
/// let mut parser = NetplanParser::with_options(
///     NetplanOptions::new().set_ignore_errors(true),
/// );
/// parser.load_hierarchy(std::path::Path::new("/")).unwrap();
/// let state = netplan::build_state(parser).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct NetplanParser {
    options: NetplanOptions,
    pub(crate) collection: RawCollection,
    overrides: LoadOverrides,
    ignored_errors: Vec<NetplanError>,
    sources: Vec<PathBuf>,
}

impl NetplanParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: NetplanOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn options(&self) -> &NetplanOptions {
        &self.options
    }

    /// Errors skipped because of `ignore_errors`.
    pub fn ignored_errors(&self) -> &[NetplanError] {
        self.ignored_errors.as_slice()
    }

    /// Number of definitions merged so far.
    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.collection.get(id).is_some()
    }

    /// Kind of the definition `id` merged so far.
    pub fn kind_of(&self, id: &str) -> Option<DefinitionKind> {
        self.collection.get(id).map(|d| d.kind)
    }

    /// Files merged so far, in load order.
    pub fn sources(&self) -> &[PathBuf] {
        self.sources.as_slice()
    }

    pub(crate) fn into_parts(self) -> ParsedParts {
        ParsedParts {
            options: self.options,
            collection: self.collection,
            ignored_errors: self.ignored_errors,
            sources: self.sources,
        }
    }

    /// Merge every YAML file of the hierarchy under `root`.
    pub fn load_hierarchy(&mut self, root: &Path) -> Result<(), NetplanError> {
        let files = enumerate_hierarchy(root)?;
        log::info!(
            "Loading {} configuration files from {}",
            files.len(),
            root.display()
        );
        for file in files {
            self.load_file(&file)?;
        }
        Ok(())
    }

    pub fn load_file(&mut self, path: &Path) -> Result<(), NetplanError> {
        log::debug!("Loading {}", path.display());
        let doc = SourceDocument::from_file(path);
        self.merge_source(doc)
    }

    /// Merge a document read from `reader`, `origin` is recorded as the
    /// source of the definitions it holds.
    pub fn load_reader<R: Read>(
        &mut self,
        reader: R,
        origin: &Path,
    ) -> Result<(), NetplanError> {
        log::debug!("Loading {}", origin.display());
        let doc = SourceDocument::from_reader(reader, origin);
        self.merge_source(doc)
    }

    /// Load deletion markers: every `null` leaf of the document becomes
    /// absent in all sources merged afterwards.
    pub fn load_deletions<R: Read>(
        &mut self,
        reader: R,
    ) -> Result<(), NetplanError> {
        self.load_null_overrides(reader, None)
    }

    /// Like [Self::load_deletions()], but only sources with a precedence
    /// lower than or equal to `constraint` lose the deleted settings.
    pub fn load_deletions_with_constraint<R: Read>(
        &mut self,
        reader: R,
        constraint: &str,
    ) -> Result<(), NetplanError> {
        self.load_null_overrides(
            reader,
            Some(FilePrecedence::from_constraint(constraint)),
        )
    }

    fn load_null_overrides<R: Read>(
        &mut self,
        reader: R,
        constraint: Option<FilePrecedence>,
    ) -> Result<(), NetplanError> {
        let doc =
            SourceDocument::from_reader(reader, Path::new(DELETIONS_LABEL))?;
        doc.check_schema()?;
        for path in null_paths(&doc.value) {
            log::debug!(
                "Setting {} is deleted for {}",
                display_path(&path),
                constraint
                    .as_ref()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "all files".to_string())
            );
            self.overrides.null_fields.insert(
                path,
                NullOverride {
                    constraint: constraint.clone(),
                },
            );
        }
        Ok(())
    }

    /// Mark the global settings and definitions of the document as owned
    /// by the output file `constraint`: other sources contributing them
    /// are skipped.
    pub fn load_origin_hint<R: Read>(
        &mut self,
        reader: R,
        constraint: &str,
    ) -> Result<(), NetplanError> {
        let owner = FilePrecedence::from_constraint(constraint);
        let doc = SourceDocument::from_reader(reader, Path::new(constraint))?;
        doc.check_schema()?;
        for path in self.overrides.null_fields.keys() {
            if get_path(&doc.value, path).is_some_and(|v| !v.is_null()) {
                return Err(NetplanError::new(
                    ErrorKind::InvalidConfig,
                    format!(
                        "{constraint}: Error in network definition: \
                         '{}' is deleted but also set",
                        display_path(path)
                    ),
                ));
            }
        }
        let Some(network) = doc.network() else {
            return Ok(());
        };
        for (key, value) in network {
            let Some(key) = key_to_string(key) else {
                continue;
            };
            if DefinitionKind::from_section(&key).is_some() {
                for id in value
                    .as_mapping()
                    .into_iter()
                    .flat_map(|m| m.keys())
                    .filter_map(key_to_string)
                    .filter(|id| id != "renderer")
                {
                    log::debug!("{id} is owned by {owner}");
                    self.overrides.id_owners.insert(id, owner.clone());
                }
            } else if !value.is_null() && key != "version" {
                log::debug!("Global {key} is owned by {owner}");
                self.overrides.global_owners.insert(key, owner.clone());
            }
        }
        Ok(())
    }

    fn merge_source(
        &mut self,
        doc: Result<SourceDocument, NetplanError>,
    ) -> Result<(), NetplanError> {
        let mut doc = match doc {
            Ok(doc) => doc,
            Err(e) if e.kind() == ErrorKind::InvalidYaml => {
                return self.ignore_or_fail(e);
            }
            Err(e) => return Err(e),
        };
        if doc.is_empty() {
            log::debug!("{} is empty", doc.path.display());
            return Ok(());
        }
        if let Err(e) = doc.check_schema() {
            self.ignore_or_fail(e)?;
            if !self.drop_invalid_parts(&mut doc) {
                log::warn!("Ignoring {}", doc.path.display());
                return Ok(());
            }
        }
        let mut ctx = MergeContext::new(
            &doc.path,
            &self.overrides,
            self.options.ignore_errors,
        );
        for (path, null_override) in self.overrides.null_fields.iter() {
            if null_override.applies_to(&ctx.precedence)
                && remove_path(&mut doc.value, path)
            {
                log::debug!(
                    "Dropping deleted setting {} from {}",
                    display_path(path),
                    doc.path.display()
                );
            }
        }
        let network = match doc.network() {
            Some(network) => network.clone(),
            None => return Ok(()),
        };
        if !self.sources.contains(&doc.path) {
            self.sources.push(doc.path.clone());
        }
        let result = self.collection.merge_network(&mut ctx, network);
        let skipped = ctx.take_ignored();
        self.ignored_errors.extend(skipped);
        result
    }

    fn ignore_or_fail(&mut self, e: NetplanError) -> Result<(), NetplanError> {
        if self.options.ignore_errors {
            log::warn!("Ignoring error: {e}");
            self.ignored_errors.push(e);
            Ok(())
        } else {
            Err(e)
        }
    }

    // Drop the definitions failing the schema from `doc`. Returns false
    // when the file as a whole has to be dropped.
    fn drop_invalid_parts(&mut self, doc: &mut SourceDocument) -> bool {
        let path = doc.path.clone();
        let Some(top) = doc.value.as_mapping() else {
            return false;
        };
        if top.len() != 1 {
            return false;
        }
        let Some(network) = doc.network_mut() else {
            return false;
        };
        for (key, value) in network.iter_mut() {
            let Some(key) = key_to_string(key) else {
                return false;
            };
            match DefinitionKind::from_section(&key) {
                Some(kind) => {
                    let errors = match drop_invalid_stanzas(kind, value) {
                        Some(errors) => errors,
                        None => return false,
                    };
                    for (id, e) in errors {
                        let e = NetplanError::new(
                            ErrorKind::InvalidConfig,
                            format!(
                                "{}: Error in network definition: {id}: {e}",
                                path.display()
                            ),
                        );
                        log::warn!("Ignoring definition {id}: {e}");
                        self.ignored_errors.push(e);
                    }
                }
                None => {
                    if let Err(e) = check_global(&key, value) {
                        log::warn!(
                            "Invalid global setting {key} in {}: {e}",
                            path.display()
                        );
                        return false;
                    }
                }
            }
        }
        true
    }
}

// Remove the stanzas of `section` failing the schema of `kind`, `None`
// when the section itself is malformed.
fn drop_invalid_stanzas(
    kind: DefinitionKind,
    section: &mut Value,
) -> Option<Vec<(String, serde_yaml::Error)>> {
    let map: &mut Mapping = match section {
        Value::Null => return Some(Vec::new()),
        Value::Mapping(m) => m,
        _ => return None,
    };
    let mut errors = Vec::new();
    let mut invalid = Vec::new();
    for (key, stanza) in map.iter() {
        let id = key_to_string(key)?;
        if id == "renderer" {
            check_global("renderer", stanza).ok()?;
            continue;
        }
        if let Err(e) = check_stanza(kind, stanza) {
            invalid.push(key.clone());
            errors.push((id, e));
        }
    }
    for key in invalid {
        map.remove(&key);
    }
    Some(errors)
}

/// Create a parser with default options and merge the hierarchy under
/// `root` into it.
pub fn load_hierarchy(root: &Path) -> Result<NetplanParser, NetplanError> {
    let mut parser = NetplanParser::new();
    parser.load_hierarchy(root)?;
    Ok(parser)
}

/// Merge the YAML file `path` into `parser`.
pub fn load_file(
    parser: &mut NetplanParser,
    path: &Path,
) -> Result<(), NetplanError> {
    parser.load_file(path)
}

/// Merge deletion markers read from `reader` into `parser`.
pub fn load_deletions<R: Read>(
    parser: &mut NetplanParser,
    reader: R,
) -> Result<(), NetplanError> {
    parser.load_deletions(reader)
}

/// Mark what `reader` holds as owned by the output file `constraint`.
pub fn load_origin_hint<R: Read>(
    parser: &mut NetplanParser,
    reader: R,
    constraint: &str,
) -> Result<(), NetplanError> {
    parser.load_origin_hint(reader, constraint)
}
