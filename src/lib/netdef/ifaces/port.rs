// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{
    netdef::SanitizeDefinition, CommonSettings, DefinitionKind,
    NetplanDefinition,
};

/// Open vSwitch patch port. Never written in a section: created in pairs
/// from `openvswitch.ports` and emitted back the same way.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct PortSettings {
    #[serde(flatten)]
    pub common: CommonSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer: Option<String>,
}

impl NetplanDefinition for PortSettings {
    const KIND: DefinitionKind = DefinitionKind::Port;

    fn common(&self) -> &CommonSettings {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonSettings {
        &mut self.common
    }
}

impl SanitizeDefinition for PortSettings {}
