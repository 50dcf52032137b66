// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::{
    netdef::document::SUPPORTED_VERSION, DefinitionKind, ErrorKind,
    LinkKind, NetplanError, NetplanState,
};

fn key(name: &str) -> Value {
    Value::String(name.to_string())
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, NetplanError> {
    serde_yaml::to_value(value).map_err(|e| {
        NetplanError::new(
            ErrorKind::EmitterFailure,
            format!("Failed to serialize network settings: {e}"),
        )
    })
}

/// Build the YAML document of everything in `state` whose origin is
/// accepted by `filter`, global settings included.
pub(crate) fn state_to_yaml<F>(
    state: &NetplanState,
    filter: F,
) -> Result<Value, NetplanError>
where
    F: Fn(Option<&Path>) -> bool,
{
    let mut network = Mapping::new();
    network.insert(key("version"), Value::Number(SUPPORTED_VERSION.into()));

    if let Some(renderer) = state
        .renderer
        .as_ref()
        .filter(|r| filter(Some(r.origin.as_path())))
    {
        network.insert(key("renderer"), to_value(&renderer.value)?);
    }

    let mut ovs = match state
        .openvswitch
        .as_ref()
        .filter(|o| filter(Some(o.origin.as_path())))
    {
        Some(global) => match to_value(&global.value)? {
            Value::Mapping(m) => m,
            _ => Mapping::new(),
        },
        None => Mapping::new(),
    };
    ovs.remove("ports");
    let ports = port_pairs(state, &filter);
    if !ports.is_empty() {
        ovs.insert(key("ports"), Value::Sequence(ports));
    }
    if !ovs.is_empty() {
        network.insert(key("openvswitch"), Value::Mapping(ovs));
    }

    for kind in DefinitionKind::SECTIONS {
        let Some(section_name) = kind.section() else {
            continue;
        };
        let mut section = Mapping::new();
        for def in state
            .iter()
            .filter(|d| d.kind() == kind && filter(d.origin()))
        {
            section.insert(key(def.id()), def.settings().to_yaml()?);
        }
        if !section.is_empty() {
            network.insert(key(section_name), Value::Mapping(section));
        }
    }

    let mut top = Mapping::new();
    top.insert(key("network"), Value::Mapping(network));
    Ok(Value::Mapping(top))
}

/// Whether the document built by [state_to_yaml()] holds anything besides
/// `version`.
pub(crate) fn has_settings(document: &Value) -> bool {
    document
        .get("network")
        .and_then(Value::as_mapping)
        .is_some_and(|network| network.keys().any(|k| k != "version"))
}

// Port definitions are written back as `openvswitch.ports`, each pair once.
fn port_pairs<F>(state: &NetplanState, filter: &F) -> Vec<Value>
where
    F: Fn(Option<&Path>) -> bool,
{
    let mut ret = Vec::new();
    let mut done: Vec<&str> = Vec::new();
    for def in state
        .iter()
        .filter(|d| d.kind() == DefinitionKind::Port && filter(d.origin()))
    {
        if done.contains(&def.id()) {
            continue;
        }
        let Some(peer) = state.link(def, LinkKind::Peer) else {
            continue;
        };
        done.push(def.id());
        done.push(peer.id());
        ret.push(Value::Sequence(vec![key(def.id()), key(peer.id())]));
    }
    ret
}
