// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{
    netdef::SanitizeDefinition, CommonSettings, DefinitionKind,
    NetplanDefinition,
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct DummySettings {
    #[serde(flatten)]
    pub common: CommonSettings,
}

impl NetplanDefinition for DummySettings {
    const KIND: DefinitionKind = DefinitionKind::Dummy;

    fn common(&self) -> &CommonSettings {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonSettings {
        &mut self.common
    }
}

impl SanitizeDefinition for DummySettings {}
