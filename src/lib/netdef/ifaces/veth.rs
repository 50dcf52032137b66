// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{
    netdef::{DefinitionContext, SanitizeDefinition},
    CommonSettings, DefinitionKind, NetplanDefinition, NetplanError,
};

/// Stanza of the `virtual-ethernets` section. Both ends are declared and
/// name each other as `peer`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct VethSettings {
    #[serde(flatten)]
    pub common: CommonSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer: Option<String>,
}

impl NetplanDefinition for VethSettings {
    const KIND: DefinitionKind = DefinitionKind::Veth;

    fn common(&self) -> &CommonSettings {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonSettings {
        &mut self.common
    }
}

impl SanitizeDefinition for VethSettings {
    fn sanitize_specific(
        &mut self,
        ctx: &DefinitionContext,
    ) -> Result<(), NetplanError> {
        match self.peer.as_deref() {
            None => Err(ctx.error("virtual-ethernet missing 'peer' property")),
            Some(peer) if peer == ctx.id => Err(ctx.error(
                "virtual-ethernet peer cannot be the interface itself",
            )),
            Some(_) => Ok(()),
        }
    }
}
