// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{
    deserializer::option_u16_or_string,
    netdef::{DefinitionContext, SanitizeDefinition},
    CommonSettings, DefinitionKind, NetplanDefinition, NetplanError,
};

const VLAN_ID_MAX: u16 = 4094;

/// Stanza of the `vlans` section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct VlanSettings {
    #[serde(flatten)]
    pub common: CommonSettings,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u16_or_string"
    )]
    pub id: Option<u16>,
    /// Parent device
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl NetplanDefinition for VlanSettings {
    const KIND: DefinitionKind = DefinitionKind::Vlan;

    fn common(&self) -> &CommonSettings {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonSettings {
        &mut self.common
    }
}

impl SanitizeDefinition for VlanSettings {
    fn sanitize_specific(
        &mut self,
        ctx: &DefinitionContext,
    ) -> Result<(), NetplanError> {
        match self.id {
            None => return Err(ctx.error("missing 'id' property")),
            Some(id) if id > VLAN_ID_MAX => {
                return Err(ctx.error(format!(
                    "invalid id '{id}' (allowed values are 0 to {VLAN_ID_MAX})"
                )));
            }
            _ => (),
        }
        if self.link.is_none() {
            return Err(ctx.error("missing 'link' property"));
        }
        Ok(())
    }
}
