// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use super::is_valid_mac;
use crate::{
    deserializer::option_bool_or_string, netdef::DefinitionContext,
    NetplanError,
};

/// `driver` accepts a single glob or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum DriverMatch {
    Single(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct MatchConfig {
    /// Kernel interface name glob
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macaddress: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<DriverMatch>,
}

/// Settings only valid on devices existing in hardware.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub struct PhysicalSettings {
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_config: Option<MatchConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_name: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub wakeonlan: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub emit_lldp: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub receive_checksum_offload: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub transmit_checksum_offload: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub tcp_segmentation_offload: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub tcp6_segmentation_offload: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub generic_segmentation_offload: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub generic_receive_offload: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub large_receive_offload: Option<bool>,
}

impl PhysicalSettings {
    /// Name the kernel will use for this device, `None` when only known at
    /// runtime through `match`.
    pub(crate) fn effective_name<'a>(&'a self, id: &'a str) -> Option<&'a str> {
        if let Some(name) = self.set_name.as_deref() {
            Some(name)
        } else if self.match_config.is_some() {
            None
        } else {
            Some(id)
        }
    }

    /// Rules shared by all physical kinds.
    pub(crate) fn sanitize(
        &self,
        ctx: &DefinitionContext,
    ) -> Result<(), NetplanError> {
        if self.set_name.is_some() && self.match_config.is_none() {
            return Err(ctx.error("'set-name' requires 'match' properties"));
        }
        if let Some(mac) = self
            .match_config
            .as_ref()
            .and_then(|m| m.macaddress.as_deref())
        {
            if !is_valid_mac(mac) {
                return Err(ctx.error(format!(
                    "match: invalid MAC address '{mac}', \
                     must be XX:XX:XX:XX:XX:XX"
                )));
            }
        }
        if self.match_config.as_ref().is_some_and(|m| {
            m.name.is_none() && m.macaddress.is_none() && m.driver.is_none()
        }) && self.set_name.is_some()
        {
            return Err(ctx.error(
                "'set-name' requires 'match' to select at least one device \
                 property",
            ));
        }
        Ok(())
    }
}
