// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::is_valid_mac;
use crate::{
    deserializer::{option_bool_or_string, option_u32_or_string},
    netdef::{DefinitionContext, SanitizeDefinition},
    AuthSettings, CommonSettings, DefinitionKind, NetplanDefinition,
    NetplanError, NetworkManagerSettings, PhysicalSettings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum WifiMode {
    Infrastructure,
    Adhoc,
    Ap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum WifiBand {
    #[serde(rename = "5GHz")]
    FiveGhz,
    #[serde(rename = "2.4GHz")]
    TwoDotFourGhz,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct AccessPoint {
    /// WPA passphrase, kept opaque.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<WifiMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bssid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<WifiBand>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub channel: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networkmanager: Option<NetworkManagerSettings>,
}

/// Stanza of the `wifis` section, access points are keyed by SSID.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct WifiSettings {
    #[serde(flatten)]
    pub common: CommonSettings,
    #[serde(flatten)]
    pub physical: PhysicalSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_points: Option<BTreeMap<String, Option<AccessPoint>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wakeonwlan: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regulatory_domain: Option<String>,
}

impl WifiSettings {
    pub fn ssids(&self) -> Vec<&str> {
        self.access_points
            .as_ref()
            .map(|aps| aps.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

impl NetplanDefinition for WifiSettings {
    const KIND: DefinitionKind = DefinitionKind::Wifi;

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

impl SanitizeDefinition for WifiSettings {
    fn sanitize_specific(
        &mut self,
        ctx: &DefinitionContext,
    ) -> Result<(), NetplanError> {
        self.physical.sanitize(ctx)?;
        for (ssid, ap) in self.access_points.iter().flatten() {
            if ssid.is_empty() || ssid.len() > 32 {
                return Err(ctx.error(format!(
                    "access point SSID '{ssid}' must be 1 to 32 bytes long"
                )));
            }
            let Some(ap) = ap else {
                continue;
            };
            if let Some(bssid) = ap.bssid.as_deref() {
                if !is_valid_mac(bssid) {
                    return Err(ctx.error(format!(
                        "{ssid}: invalid bssid '{bssid}'"
                    )));
                }
            }
            if ap.channel.is_some() && ap.band.is_none() {
                return Err(ctx.error(format!(
                    "{ssid}: 'channel' requires 'band' to be set"
                )));
            }
        }
        if let Some(domain) = self.regulatory_domain.as_deref() {
            if domain.len() != 2
                || !domain.chars().all(|c| c.is_ascii_alphanumeric())
            {
                return Err(ctx.error(format!(
                    "invalid regulatory-domain '{domain}', expecting a \
                     two letter country code"
                )));
            }
        }
        Ok(())
    }
}
