// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    deserializer::{option_bool_or_string, option_u32_or_string},
    AddressEntry, DhcpIdentifier, DhcpOverrides, Ipv6AddressGeneration,
    LinkLocal, Nameservers, OvsSettings, Renderer, Route, RoutingPolicy,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum ActivationMode {
    Manual,
    Off,
}

/// Settings shared by every kind of definition.
///
/// Flattened into the per kind structs, so the keys live at the top level of
/// each YAML stanza.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub struct CommonSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renderer: Option<Renderer>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub dhcp4: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub dhcp6: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp4_overrides: Option<DhcpOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp6_overrides: Option<DhcpOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_identifier: Option<DhcpIdentifier>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub accept_ra: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<AddressEntry>>,
    /// Deprecated in favor of a default route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway4: Option<String>,
    /// Deprecated in favor of a default route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway6: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nameservers: Option<Nameservers>,
    /// MAC address to set on the device, or one of the NetworkManager
    /// keywords `permanent`, `random`, `stable` and `preserve`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macaddress: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub mtu: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub ipv6_mtu: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub ipv6_privacy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6_address_generation: Option<Ipv6AddressGeneration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6_address_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_local: Option<Vec<LinkLocal>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub critical: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub optional: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_addresses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_mode: Option<ActivationMode>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub ignore_carrier: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<Route>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_policy: Option<Vec<RoutingPolicy>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networkmanager: Option<NetworkManagerSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openvswitch: Option<OvsSettings>,
}

impl CommonSettings {
    /// All `ip/prefix` strings of `addresses`.
    pub fn address_strings(&self) -> Vec<&str> {
        self.addresses
            .as_deref()
            .unwrap_or_default()
            .iter()
            .flat_map(|a| a.addresses())
            .collect()
    }
}

/// Keys only consumed by the NetworkManager backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct NetworkManagerSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stable_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Raw keyfile settings as `group.key: value`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passthrough: Option<BTreeMap<String, String>>,
}
