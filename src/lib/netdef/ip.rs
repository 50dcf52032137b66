// SPDX-License-Identifier: Apache-2.0

use std::{collections::BTreeMap, net::IpAddr, str::FromStr};

use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};

use crate::deserializer::{option_bool_or_string, option_u32_or_string};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
#[non_exhaustive]
pub enum AddressFamily {
    #[serde(rename = "AF_INET")]
    Ipv4,
    #[serde(rename = "AF_INET6")]
    Ipv6,
}

impl AddressFamily {
    pub fn of(ip: &IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => Self::Ipv4,
            IpAddr::V6(_) => Self::Ipv6,
        }
    }

    pub fn of_network(net: &IpNetwork) -> Self {
        match net {
            IpNetwork::V4(_) => Self::Ipv4,
            IpNetwork::V6(_) => Self::Ipv6,
        }
    }
}

impl std::fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Ipv4 => "AF_INET",
                Self::Ipv6 => "AF_INET6",
            }
        )
    }
}

/// Parse `ip/prefix`, the prefix is mandatory.
pub(crate) fn parse_prefixed(value: &str) -> Option<IpNetwork> {
    if !value.contains('/') {
        return None;
    }
    IpNetwork::from_str(value).ok()
}

/// Parse either `ip` or `ip/prefix`.
pub(crate) fn parse_ip_or_network(value: &str) -> Option<IpNetwork> {
    if value.contains('/') {
        IpNetwork::from_str(value).ok()
    } else {
        IpAddr::from_str(value).ok().map(IpNetwork::from)
    }
}

/// Entry of `addresses`: either a plain `ip/prefix` string or a single key
/// mapping carrying per address options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum AddressEntry {
    Plain(String),
    WithOptions(BTreeMap<String, AddressOptions>),
}

impl AddressEntry {
    /// The `ip/prefix` strings of this entry.
    pub fn addresses(&self) -> Vec<&str> {
        match self {
            Self::Plain(a) => vec![a.as_str()],
            Self::WithOptions(m) => m.keys().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct AddressOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct Nameservers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct DhcpOverrides {
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub use_dns: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub use_ntp: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub send_hostname: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub use_hostname: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub use_mtu: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub use_routes: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub route_metric: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_domains: Option<String>,
}

impl DhcpOverrides {
    /// Names of the settings which differ between `self` and `other`.
    pub(crate) fn conflicts_with(&self, other: &Self) -> Vec<&'static str> {
        let mut ret = Vec::new();
        if self.use_dns != other.use_dns {
            ret.push("use-dns");
        }
        if self.use_ntp != other.use_ntp {
            ret.push("use-ntp");
        }
        if self.send_hostname != other.send_hostname {
            ret.push("send-hostname");
        }
        if self.use_hostname != other.use_hostname {
            ret.push("use-hostname");
        }
        if self.use_mtu != other.use_mtu {
            ret.push("use-mtu");
        }
        if self.hostname != other.hostname {
            ret.push("hostname");
        }
        if self.use_routes != other.use_routes {
            ret.push("use-routes");
        }
        if self.route_metric != other.route_metric {
            ret.push("route-metric");
        }
        if self.use_domains != other.use_domains {
            ret.push("use-domains");
        }
        ret
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum DhcpIdentifier {
    Duid,
    Mac,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum Ipv6AddressGeneration {
    Eui64,
    StablePrivacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum LinkLocal {
    Ipv4,
    Ipv6,
}
