// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{
    netdef::{DefinitionContext, SanitizeDefinition},
    CommonSettings, DefinitionKind, NetplanDefinition, NetplanError,
};

/// Stanza of the `nm-devices` section: a NetworkManager connection profile
/// netplan does not understand, carried through `networkmanager.passthrough`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct NmDeviceSettings {
    #[serde(flatten)]
    pub common: CommonSettings,
}

impl NetplanDefinition for NmDeviceSettings {
    const KIND: DefinitionKind = DefinitionKind::NmDevice;

    fn common(&self) -> &CommonSettings {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonSettings {
        &mut self.common
    }
}

impl SanitizeDefinition for NmDeviceSettings {
    fn sanitize_specific(
        &mut self,
        ctx: &DefinitionContext,
    ) -> Result<(), NetplanError> {
        if self.common.networkmanager.is_none() {
            Err(ctx.error(
                "network type 'nm-devices:' needs to provide a \
                 'networkmanager' mapping",
            ))
        } else {
            Ok(())
        }
    }
}
