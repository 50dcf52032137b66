// SPDX-License-Identifier: Apache-2.0

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{
    Backend, GlobalOvsSettings, InterfaceDefinition, LinkKind, NetplanError,
    NetplanOptions, Renderer,
};

/// Global setting with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GlobalSetting<T> {
    pub(crate) value: T,
    pub(crate) origin: PathBuf,
}

/// Immutable, validated set of definitions.
///
/// Iteration follows the order in which the IDs first showed up in the
/// hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct NetplanState {
    pub(crate) defs: Vec<InterfaceDefinition>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) renderer: Option<GlobalSetting<Renderer>>,
    pub(crate) openvswitch: Option<GlobalSetting<GlobalOvsSettings>>,
    pub(crate) options: NetplanOptions,
    pub(crate) ignored_errors: Vec<NetplanError>,
    pub(crate) sources: Vec<PathBuf>,
}

impl NetplanState {
    pub fn iter(&self) -> impl Iterator<Item = &InterfaceDefinition> {
        self.defs.iter()
    }

    pub fn get(&self, id: &str) -> Option<&InterfaceDefinition> {
        self.index.get(id).and_then(|i| self.defs.get(*i))
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Definition `def` refers to through `kind`.
    pub fn link(
        &self,
        def: &InterfaceDefinition,
        kind: LinkKind,
    ) -> Option<&InterfaceDefinition> {
        def.links.get(kind).and_then(|i| self.defs.get(i))
    }

    /// Definitions whose bridge, bond or VRF is `def`.
    pub fn members<'a>(
        &'a self,
        def: &'a InterfaceDefinition,
    ) -> impl Iterator<Item = &'a InterfaceDefinition> + 'a {
        let pos = self.index.get(def.id()).copied();
        self.defs.iter().filter(move |d| {
            pos.is_some()
                && [LinkKind::Bridge, LinkKind::Bond, LinkKind::Vrf]
                    .into_iter()
                    .any(|k| d.links.get(k) == pos)
        })
    }

    /// Top level `renderer`, if any.
    pub fn global_renderer(&self) -> Option<Renderer> {
        self.renderer.as_ref().map(|r| r.value)
    }

    /// Backend of definitions without any `renderer` in scope.
    pub fn default_backend(&self) -> Backend {
        self.options.default_backend
    }

    /// Top level `openvswitch` settings. Patch ports are available as
    /// definitions of kind port.
    pub fn ovs_settings(&self) -> Option<&GlobalOvsSettings> {
        self.openvswitch.as_ref().map(|o| &o.value)
    }

    pub fn options(&self) -> &NetplanOptions {
        &self.options
    }

    /// Errors skipped while loading and building because of
    /// `ignore_errors`.
    pub fn ignored_errors(&self) -> &[NetplanError] {
        self.ignored_errors.as_slice()
    }

    /// Every file merged into the state, in load order. Unlike
    /// [Self::origins()], this includes files whose settings were all
    /// overridden by later files.
    pub fn sources(&self) -> &[PathBuf] {
        self.sources.as_slice()
    }

    /// Files which contributed to the global settings or to any
    /// definition, in state order.
    pub fn origins(&self) -> Vec<&Path> {
        let mut ret: Vec<&Path> = Vec::new();
        let globals = [
            self.renderer.as_ref().map(|r| r.origin.as_path()),
            self.openvswitch.as_ref().map(|o| o.origin.as_path()),
        ];
        for origin in globals
            .into_iter()
            .flatten()
            .chain(self.defs.iter().filter_map(|d| d.origin()))
        {
            if !ret.contains(&origin) {
                ret.push(origin);
            }
        }
        ret
    }
}

impl<'a> IntoIterator for &'a NetplanState {
    type Item = &'a InterfaceDefinition;
    type IntoIter = std::slice::Iter<'a, InterfaceDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.defs.iter()
    }
}
