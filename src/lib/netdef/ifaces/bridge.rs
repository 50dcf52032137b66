// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::is_valid_timing;
use crate::{
    deserializer::{
        option_bool_or_string, option_number_as_string, option_u32_or_string,
    },
    netdef::{DefinitionContext, SanitizeDefinition},
    CommonSettings, DefinitionKind, NetplanDefinition, NetplanError,
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct BridgeParameters {
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_number_as_string"
    )]
    pub ageing_time: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub priority: Option<u32>,
    /// Port priority keyed by member ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_priority: Option<BTreeMap<String, u32>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_number_as_string"
    )]
    pub forward_delay: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_number_as_string"
    )]
    pub hello_time: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_number_as_string"
    )]
    pub max_age: Option<String>,
    /// Path cost keyed by member ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_cost: Option<BTreeMap<String, u32>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub stp: Option<bool>,
}

impl BridgeParameters {
    fn timings(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("ageing-time", self.ageing_time.as_deref()),
            ("forward-delay", self.forward_delay.as_deref()),
            ("hello-time", self.hello_time.as_deref()),
            ("max-age", self.max_age.as_deref()),
        ]
    }
}

/// Stanza of the `bridges` section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct BridgeSettings {
    #[serde(flatten)]
    pub common: CommonSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BridgeParameters>,
}

impl NetplanDefinition for BridgeSettings {
    const KIND: DefinitionKind = DefinitionKind::Bridge;

    fn common(&self) -> &CommonSettings {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonSettings {
        &mut self.common
    }

    fn members(&self) -> &[String] {
        self.interfaces.as_deref().unwrap_or_default()
    }
}

impl SanitizeDefinition for BridgeSettings {
    fn sanitize_specific(
        &mut self,
        ctx: &DefinitionContext,
    ) -> Result<(), NetplanError> {
        let Some(params) = self.parameters.as_ref() else {
            return Ok(());
        };
        for (name, value) in params.timings() {
            if let Some(value) = value {
                if !is_valid_timing(value) {
                    return Err(ctx.error(format!(
                        "invalid time value '{value}' for '{name}'"
                    )));
                }
            }
        }
        if let Some(priority) = params.priority {
            if priority > u16::MAX.into() {
                return Err(ctx.error(format!(
                    "bridge priority {priority} is out of range 0-65535"
                )));
            }
        }
        for (key, map) in [
            ("port-priority", params.port_priority.as_ref()),
            ("path-cost", params.path_cost.as_ref()),
        ] {
            for member in map.into_iter().flat_map(|m| m.keys()) {
                if !self.members().contains(member) {
                    return Err(ctx.error(format!(
                        "{key}: interface '{member}' is not a member of \
                         this bridge"
                    )));
                }
            }
        }
        if let Some(priority) = params
            .port_priority
            .as_ref()
            .and_then(|p| p.values().find(|p| **p > 63))
        {
            return Err(ctx.error(format!(
                "port-priority {priority} is out of range 0-63"
            )));
        }
        Ok(())
    }
}
