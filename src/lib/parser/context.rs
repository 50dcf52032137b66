// SPDX-License-Identifier: Apache-2.0

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{DefinitionKind, FilePrecedence, NetplanError};

/// Deletion request recorded by `load_deletions*()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NullOverride {
    /// Sources up to this precedence lose the setting, `None` means every
    /// source loaded afterwards.
    pub(crate) constraint: Option<FilePrecedence>,
}

impl NullOverride {
    pub(crate) fn applies_to(&self, precedence: &FilePrecedence) -> bool {
        match self.constraint.as_ref() {
            Some(constraint) => precedence <= constraint,
            None => true,
        }
    }
}

/// Rules collected before the hierarchy walk, they never change while a
/// source is being merged.
#[derive(Debug, Clone, Default)]
pub(crate) struct LoadOverrides {
    pub(crate) null_fields: HashMap<String, NullOverride>,
    /// Global keys (`renderer`, `openvswitch`) owned by an origin hint.
    pub(crate) global_owners: HashMap<String, FilePrecedence>,
    /// Definition IDs owned by an origin hint.
    pub(crate) id_owners: HashMap<String, FilePrecedence>,
}

/// State of the merge of a single source.
#[derive(Debug)]
pub(crate) struct MergeContext<'a> {
    pub(crate) path: &'a Path,
    pub(crate) precedence: FilePrecedence,
    pub(crate) overrides: &'a LoadOverrides,
    ids_in_file: HashMap<String, DefinitionKind>,
    ignore_errors: bool,
    ignored: Vec<NetplanError>,
}

impl<'a> MergeContext<'a> {
    pub(crate) fn new(
        path: &'a Path,
        overrides: &'a LoadOverrides,
        ignore_errors: bool,
    ) -> Self {
        Self {
            path,
            precedence: FilePrecedence::of_path(path),
            overrides,
            ids_in_file: HashMap::new(),
            ignore_errors,
            ignored: Vec::new(),
        }
    }

    /// Skip the stanza which failed with `e` when errors are ignored,
    /// otherwise hand `e` back.
    pub(crate) fn ignore_or_fail(
        &mut self,
        e: NetplanError,
    ) -> Result<(), NetplanError> {
        if self.ignore_errors {
            log::warn!("Ignoring error: {e}");
            self.ignored.push(e);
            Ok(())
        } else {
            Err(e)
        }
    }

    pub(crate) fn take_ignored(&mut self) -> Vec<NetplanError> {
        std::mem::take(&mut self.ignored)
    }

    pub(crate) fn origin(&self) -> PathBuf {
        self.path.to_path_buf()
    }

    /// Remember `id` as defined by this source. Returns the kind it was
    /// already defined with in this source, if any.
    pub(crate) fn mark_seen(
        &mut self,
        id: &str,
        kind: DefinitionKind,
    ) -> Option<DefinitionKind> {
        self.ids_in_file.insert(id.to_string(), kind)
    }

    /// Whether an origin hint handed `id` to another file.
    pub(crate) fn id_owned_elsewhere(&self, id: &str) -> bool {
        self.overrides
            .id_owners
            .get(id)
            .is_some_and(|owner| owner != &self.precedence)
    }

    pub(crate) fn global_owned_elsewhere(&self, key: &str) -> bool {
        self.overrides
            .global_owners
            .get(key)
            .is_some_and(|owner| owner != &self.precedence)
    }
}
