// SPDX-License-Identifier: Apache-2.0

use std::{collections::HashMap, path::PathBuf};

use serde_yaml::{Mapping, Value};

use super::{
    context::MergeContext,
    merge::{deep_merge, merge_stanza},
};
use crate::{
    loader::nullable::key_to_string, DefinitionKind, NetplanError,
};

const KEY_RENDERER: &str = "renderer";
const KEY_OPENVSWITCH: &str = "openvswitch";
const KEY_PORTS: &str = "ports";
const KEY_VERSION: &str = "version";

/// Merged but unchecked stanza of one definition.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawDefinition {
    pub(crate) id: String,
    pub(crate) kind: DefinitionKind,
    pub(crate) settings: Mapping,
    /// Last source which contributed to this definition
    pub(crate) origin: Option<PathBuf>,
    /// `renderer` of the section holding the stanza in `origin`
    pub(crate) section_renderer: Option<Value>,
}

/// Merged global setting with the source it came from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawGlobal<T> {
    pub(crate) value: T,
    pub(crate) origin: PathBuf,
}

/// Definitions in order of first appearance, keyed by ID.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawCollection {
    pub(crate) defs: Vec<RawDefinition>,
    index: HashMap<String, usize>,
    pub(crate) renderer: Option<RawGlobal<Value>>,
    pub(crate) openvswitch: Option<RawGlobal<Mapping>>,
}

impl RawCollection {
    pub(crate) fn get(&self, id: &str) -> Option<&RawDefinition> {
        self.index.get(id).and_then(|i| self.defs.get(*i))
    }

    pub(crate) fn len(&self) -> usize {
        self.defs.len()
    }

    /// Merge the `network` mapping of one source.
    pub(crate) fn merge_network(
        &mut self,
        ctx: &mut MergeContext,
        network: Mapping,
    ) -> Result<(), NetplanError> {
        for (key, value) in network {
            let Some(key) = key_to_string(&key) else {
                continue;
            };
            match key.as_str() {
                KEY_VERSION => (),
                KEY_RENDERER => self.merge_renderer(ctx, value),
                KEY_OPENVSWITCH => self.merge_openvswitch(ctx, value)?,
                section => {
                    if let Some(kind) = DefinitionKind::from_section(section)
                    {
                        self.merge_section(ctx, kind, value)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn merge_renderer(&mut self, ctx: &MergeContext, value: Value) {
        if value.is_null() {
            return;
        }
        if ctx.global_owned_elsewhere(KEY_RENDERER) {
            log::debug!(
                "Global renderer is owned by another file, ignoring {}",
                ctx.path.display()
            );
            return;
        }
        self.renderer = Some(RawGlobal {
            value,
            origin: ctx.origin(),
        });
    }

    fn merge_openvswitch(
        &mut self,
        ctx: &mut MergeContext,
        value: Value,
    ) -> Result<(), NetplanError> {
        let Value::Mapping(mut ovs) = value else {
            return Ok(());
        };
        if ctx.global_owned_elsewhere(KEY_OPENVSWITCH) {
            log::debug!(
                "Global openvswitch settings are owned by another file, \
                 ignoring {}",
                ctx.path.display()
            );
            return Ok(());
        }
        if let Some(Value::Sequence(pairs)) = ovs.remove(KEY_PORTS) {
            for pair in pairs {
                if let Err(e) = self.merge_port_pair(ctx, &pair) {
                    ctx.ignore_or_fail(e)?;
                }
            }
        }
        match self.openvswitch.as_mut() {
            Some(global) => {
                let mut merged = Value::Mapping(std::mem::take(
                    &mut global.value,
                ));
                deep_merge(&mut merged, Value::Mapping(ovs));
                global.value = match merged {
                    Value::Mapping(m) => m,
                    _ => Mapping::new(),
                };
                global.origin = ctx.origin();
            }
            None => {
                if !ovs.is_empty() {
                    self.openvswitch = Some(RawGlobal {
                        value: ovs,
                        origin: ctx.origin(),
                    });
                }
            }
        }
        Ok(())
    }

    // Each `[a, b]` pair of `openvswitch.ports` becomes two port
    // definitions peered with each other.
    fn merge_port_pair(
        &mut self,
        ctx: &mut MergeContext,
        pair: &Value,
    ) -> Result<(), NetplanError> {
        let ids: Vec<String> = pair
            .as_sequence()
            .map(|s| s.iter().filter_map(key_to_string).collect())
            .unwrap_or_default();
        let [first, second] = ids.as_slice() else {
            return Err(NetplanError::validation(
                Some(ctx.path),
                "openvswitch: a port pair needs exactly two port names"
                    .to_string(),
            ));
        };
        if first == second {
            return Err(NetplanError::validation(
                Some(ctx.path),
                format!("openvswitch: port '{first}' cannot be its own peer"),
            ));
        }
        for (id, peer) in [(first, second), (second, first)] {
            let mut stanza = Mapping::new();
            stanza.insert(
                Value::String("peer".to_string()),
                Value::String(peer.to_string()),
            );
            self.merge_definition(
                ctx,
                DefinitionKind::Port,
                id,
                Value::Mapping(stanza),
                None,
            )?;
        }
        Ok(())
    }

    fn merge_section(
        &mut self,
        ctx: &mut MergeContext,
        kind: DefinitionKind,
        value: Value,
    ) -> Result<(), NetplanError> {
        let Value::Mapping(section) = value else {
            return Ok(());
        };
        let section_renderer = section
            .get(KEY_RENDERER)
            .filter(|v| !v.is_null())
            .cloned();
        for (key, stanza) in section {
            let Some(id) = key_to_string(&key) else {
                continue;
            };
            if id == KEY_RENDERER {
                continue;
            }
            if let Err(e) = self.merge_definition(
                ctx,
                kind,
                &id,
                stanza,
                section_renderer.as_ref(),
            ) {
                ctx.ignore_or_fail(e)?;
            }
        }
        Ok(())
    }

    fn merge_definition(
        &mut self,
        ctx: &mut MergeContext,
        kind: DefinitionKind,
        id: &str,
        stanza: Value,
        section_renderer: Option<&Value>,
    ) -> Result<(), NetplanError> {
        if ctx.id_owned_elsewhere(id) {
            log::debug!(
                "{id} is owned by another file, ignoring it in {}",
                ctx.path.display()
            );
            return Ok(());
        }
        if ctx.mark_seen(id, kind).is_some() {
            return Err(NetplanError::validation(
                Some(ctx.path),
                format!("Duplicate net definition ID '{id}'"),
            ));
        }
        let stanza = match stanza {
            Value::Mapping(m) => m,
            _ => Mapping::new(),
        };
        match self.index.get(id).and_then(|i| self.defs.get_mut(*i)) {
            Some(def) => {
                if def.kind != kind {
                    return Err(NetplanError::validation(
                        Some(ctx.path),
                        format!(
                            "Updated definition '{id}' changes device type"
                        ),
                    ));
                }
                log::debug!(
                    "Merging {kind} {id} from {}",
                    ctx.path.display()
                );
                merge_stanza(&mut def.settings, stanza);
                def.origin = Some(ctx.origin());
                if let Some(renderer) = section_renderer {
                    def.section_renderer = Some(renderer.clone());
                }
            }
            None => {
                log::debug!("New {kind} {id} from {}", ctx.path.display());
                let mut settings = Mapping::new();
                merge_stanza(&mut settings, stanza);
                self.index.insert(id.to_string(), self.defs.len());
                self.defs.push(RawDefinition {
                    id: id.to_string(),
                    kind,
                    settings,
                    origin: Some(ctx.origin()),
                    section_renderer: section_renderer.cloned(),
                });
            }
        }
        Ok(())
    }
}
