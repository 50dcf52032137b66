// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{
    deserializer::{option_bool_or_string, option_u32_or_string},
    netdef::{DefinitionContext, SanitizeDefinition},
    AuthSettings, CommonSettings, DefinitionKind, NetplanDefinition,
    NetplanError, PhysicalSettings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum EmbeddedSwitchMode {
    Switchdev,
    Legacy,
}

impl std::fmt::Display for EmbeddedSwitchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Switchdev => "switchdev",
                Self::Legacy => "legacy",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum InfinibandMode {
    Datagram,
    Connected,
}

/// Stanza of the `ethernets` section.
///
/// An ethernet with `link` is a SR-IOV virtual function of the named
/// physical function:
/// ```yml
/// ethernets:
///   enp3s0:
///     virtual-function-count: 2
///     embedded-switch-mode: switchdev
///   enp3s0f0v0:
///     link: enp3s0
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct EthernetSettings {
    #[serde(flatten)]
    pub common: CommonSettings,
    #[serde(flatten)]
    pub physical: PhysicalSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthSettings>,
    /// SR-IOV physical function of this virtual function.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub virtual_function_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedded_switch_mode: Option<EmbeddedSwitchMode>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub delay_virtual_functions_rebind: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infiniband_mode: Option<InfinibandMode>,
}

impl EthernetSettings {
    /// Whether this device is configured as SR-IOV physical function.
    pub fn is_sriov_pf(&self) -> bool {
        self.virtual_function_count.is_some()
            || self.embedded_switch_mode.is_some()
    }
}

impl NetplanDefinition for EthernetSettings {
    const KIND: DefinitionKind = DefinitionKind::Ethernet;

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

impl SanitizeDefinition for EthernetSettings {
    fn sanitize_specific(
        &mut self,
        ctx: &DefinitionContext,
    ) -> Result<(), NetplanError> {
        self.physical.sanitize(ctx)?;
        if self.link.as_deref() == Some(ctx.id) {
            return Err(ctx.error(
                "SR-IOV virtual function cannot be its own physical function",
            ));
        }
        if self.delay_virtual_functions_rebind == Some(true)
            && !self.is_sriov_pf()
        {
            return Err(ctx.error(
                "'delay-virtual-functions-rebind' requires \
                 'virtual-function-count' or 'embedded-switch-mode'",
            ));
        }
        Ok(())
    }
}
