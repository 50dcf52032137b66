// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{
    deserializer::option_u32_or_string,
    netdef::{DefinitionContext, SanitizeDefinition},
    CommonSettings, DefinitionKind, NetplanDefinition, NetplanError,
};

/// Stanza of the `vrfs` section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct VrfSettings {
    #[serde(flatten)]
    pub common: CommonSettings,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub table: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<Vec<String>>,
}

impl NetplanDefinition for VrfSettings {
    const KIND: DefinitionKind = DefinitionKind::Vrf;

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

impl SanitizeDefinition for VrfSettings {
    /// Routes and rules of the VRF live in the VRF table, unset tables are
    /// filled in.
    fn sanitize_specific(
        &mut self,
        ctx: &DefinitionContext,
    ) -> Result<(), NetplanError> {
        let Some(table) = self.table else {
            return Err(ctx.error("missing 'table' property"));
        };
        for route in self.common.routes.iter_mut().flatten() {
            match route.table {
                Some(t) if t != table => {
                    return Err(ctx.error(format!(
                        "VRF routes table mismatch ({table} != {t})"
                    )));
                }
                Some(_) => (),
                None => route.table = Some(table),
            }
        }
        for rule in self.common.routing_policy.iter_mut().flatten() {
            match rule.table {
                Some(t) if t != table => {
                    return Err(ctx.error(format!(
                        "VRF routing table mismatch ({table} != {t})"
                    )));
                }
                Some(_) => (),
                None => rule.table = Some(table),
            }
        }
        Ok(())
    }
}
