// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{
    deserializer::option_bool_or_string,
    netdef::{DefinitionContext, SanitizeDefinition},
    CommonSettings, DefinitionKind, NetplanDefinition, NetplanError,
    PhysicalSettings,
};

/// Stanza of the `modems` section, keys are passed to ModemManager.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct ModemSettings {
    #[serde(flatten)]
    pub common: CommonSettings,
    #[serde(flatten)]
    pub physical: PhysicalSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apn: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub auto_config: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sim_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sim_operator_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl NetplanDefinition for ModemSettings {
    const KIND: DefinitionKind = DefinitionKind::Modem;

    fn common(&self) -> &CommonSettings {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonSettings {
        &mut self.common
    }

    fn physical(&self) -> Option<&PhysicalSettings> {
        Some(&self.physical)
    }
}

impl SanitizeDefinition for ModemSettings {
    fn sanitize_specific(
        &mut self,
        ctx: &DefinitionContext,
    ) -> Result<(), NetplanError> {
        self.physical.sanitize(ctx)
    }
}
