// SPDX-License-Identifier: Apache-2.0

use std::net::IpAddr;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::{
    deserializer::{
        option_number_as_string, option_u16_or_string, option_u32_or_string,
    },
    netdef::{
        ip::parse_ip_or_network, DefinitionContext, SanitizeDefinition,
    },
    AddressFamily, CommonSettings, DefinitionKind, NetplanDefinition,
    NetplanError,
};

const WIREGUARD_KEY_LEN: usize = 32;
const VXLAN_VNI_MAX: u32 = (1 << 24) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum TunnelMode {
    Ipip,
    Gre,
    Sit,
    Isatap,
    Vti,
    Gretap,
    #[serde(rename = "ip6ip6")]
    Ip6ip6,
    #[serde(rename = "ipip6")]
    Ipip6,
    #[serde(rename = "ip6gre")]
    Ip6gre,
    #[serde(rename = "vti6")]
    Vti6,
    #[serde(rename = "ip6gretap")]
    Ip6gretap,
    Wireguard,
    Vxlan,
}

impl TunnelMode {
    /// Family of the tunnel endpoints, `None` when both are allowed.
    pub fn family(&self) -> Option<AddressFamily> {
        match self {
            Self::Ipip
            | Self::Gre
            | Self::Sit
            | Self::Isatap
            | Self::Vti
            | Self::Gretap => Some(AddressFamily::Ipv4),
            Self::Ip6ip6
            | Self::Ipip6
            | Self::Ip6gre
            | Self::Vti6
            | Self::Ip6gretap => Some(AddressFamily::Ipv6),
            Self::Wireguard | Self::Vxlan => None,
        }
    }
}

impl std::fmt::Display for TunnelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Ipip => "ipip",
                Self::Gre => "gre",
                Self::Sit => "sit",
                Self::Isatap => "isatap",
                Self::Vti => "vti",
                Self::Gretap => "gretap",
                Self::Ip6ip6 => "ip6ip6",
                Self::Ipip6 => "ipip6",
                Self::Ip6gre => "ip6gre",
                Self::Vti6 => "vti6",
                Self::Ip6gretap => "ip6gretap",
                Self::Wireguard => "wireguard",
                Self::Vxlan => "vxlan",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct TunnelKeys {
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_number_as_string"
    )]
    pub input: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_number_as_string"
    )]
    pub output: Option<String>,
    /// WireGuard private key, base64 or absolute path of a key file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct WireguardPeerKeys {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct WireguardPeer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<WireguardPeerKeys>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_ips: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub keepalive: Option<u32>,
}

impl WireguardPeer {
    pub fn public_key(&self) -> Option<&str> {
        self.keys.as_ref().and_then(|k| k.public.as_deref())
    }
}

/// Whether `key` is a base64 encoded 32 bytes WireGuard key.
pub(crate) fn is_wireguard_key(key: &str) -> bool {
    STANDARD
        .decode(key)
        .map(|k| k.len() == WIREGUARD_KEY_LEN)
        .unwrap_or_default()
}

/// Stanza of the `tunnels` section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct TunnelSettings {
    #[serde(flatten)]
    pub common: CommonSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<TunnelMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub ttl: Option<u32>,
    /// Shorthand for both input and output key, or the WireGuard private
    /// key.
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_number_as_string"
    )]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<TunnelKeys>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub mark: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u16_or_string"
    )]
    pub port: Option<u16>,
    /// VXLAN network identifier
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peers: Option<Vec<WireguardPeer>>,
}

impl TunnelSettings {
    pub fn private_key(&self) -> Option<&str> {
        self.keys
            .as_ref()
            .and_then(|k| k.private.as_deref())
            .or(self.key.as_deref())
    }

    /// Peers whose public key is not a valid WireGuard key are dropped with
    /// a warning, they would never complete a handshake.
    fn drop_invalid_peers(&mut self, id: &str) {
        if let Some(peers) = self.peers.as_mut() {
            peers.retain(|peer| match peer.public_key() {
                Some(key) if is_wireguard_key(key) => true,
                key => {
                    log::warn!(
                        "{id}: dropping wireguard peer with invalid public \
                         key {key:?}"
                    );
                    false
                }
            });
        }
    }

    fn sanitize_wireguard(
        &mut self,
        ctx: &DefinitionContext,
    ) -> Result<(), NetplanError> {
        match self.private_key() {
            None => {
                return Err(ctx.error("missing 'key' property (private key)"))
            }
            Some(key) if !key.starts_with('/') && !is_wireguard_key(key) => {
                return Err(ctx.error(
                    "invalid wireguard private key, expecting a base64 \
                     encoded 32 bytes key or an absolute path",
                ));
            }
            _ => (),
        }
        self.drop_invalid_peers(ctx.id);
        for peer in self.peers.iter().flatten() {
            let Some(allowed_ips) = peer.allowed_ips.as_ref() else {
                return Err(ctx.error(
                    "wireguard peer is missing 'allowed-ips' property",
                ));
            };
            if let Some(ip) = allowed_ips
                .iter()
                .find(|ip| parse_ip_or_network(ip).is_none())
            {
                return Err(ctx.error(format!(
                    "wireguard peer has invalid allowed-ips entry '{ip}'"
                )));
            }
        }
        Ok(())
    }

    fn endpoint_family(
        ctx: &DefinitionContext,
        name: &str,
        value: Option<&str>,
    ) -> Result<Option<AddressFamily>, NetplanError> {
        match value {
            Some(v) => v
                .parse::<IpAddr>()
                .map(|ip| Some(AddressFamily::of(&ip)))
                .map_err(|_| {
                    ctx.error(format!("invalid {name} address '{v}'"))
                }),
            None => Ok(None),
        }
    }
}

impl NetplanDefinition for TunnelSettings {
    const KIND: DefinitionKind = DefinitionKind::Tunnel;

    fn common(&self) -> &CommonSettings {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonSettings {
        &mut self.common
    }
}

impl SanitizeDefinition for TunnelSettings {
    /// * `mode` is mandatory.
    /// * WireGuard needs a private key and peers with `allowed-ips`.
    /// * VXLAN needs `id`.
    /// * Other modes need `local` and `remote` of the mode family.
    fn sanitize_specific(
        &mut self,
        ctx: &DefinitionContext,
    ) -> Result<(), NetplanError> {
        let Some(mode) = self.mode else {
            return Err(ctx.error("missing 'mode' property for tunnel"));
        };
        if mode == TunnelMode::Wireguard {
            return self.sanitize_wireguard(ctx);
        }
        if self.peers.is_some() {
            return Err(ctx.error(format!(
                "'peers' is only valid for wireguard tunnels, not {mode}"
            )));
        }
        let local = Self::endpoint_family(ctx, "local", self.local.as_deref())?;
        let remote =
            Self::endpoint_family(ctx, "remote", self.remote.as_deref())?;
        if mode == TunnelMode::Vxlan {
            match self.id {
                None => return Err(ctx.error("missing 'id' property")),
                Some(id) if id > VXLAN_VNI_MAX => {
                    return Err(ctx.error(format!(
                        "VXLAN id {id} is out of range 0-{VXLAN_VNI_MAX}"
                    )));
                }
                _ => (),
            }
        } else {
            if local.is_none() {
                return Err(ctx.error("missing 'local' property for tunnel"));
            }
            if remote.is_none() {
                return Err(ctx.error("missing 'remote' property for tunnel"));
            }
        }
        if let (Some(l), Some(r)) = (local, remote) {
            if l != r {
                return Err(ctx.error(
                    "'local' and 'remote' must be of the same address family",
                ));
            }
        }
        if let (Some(expected), Some(family)) = (mode.family(), local) {
            if expected != family {
                return Err(ctx.error(format!(
                    "tunnel mode {mode} requires {expected} addresses"
                )));
            }
        }
        Ok(())
    }
}
