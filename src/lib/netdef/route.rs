// SPDX-License-Identifier: Apache-2.0

use std::{net::IpAddr, str::FromStr};

use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};

use super::ip::{parse_ip_or_network, AddressFamily};
use crate::deserializer::{option_bool_or_string, option_u32_or_string};

/// Kernel main routing table, used when `table` is unset.
pub const RT_TABLE_MAIN: u32 = 254;

const DEFAULT_ROUTE: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum RouteType {
    Unicast,
    Unreachable,
    Blackhole,
    Prohibit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum RouteScope {
    Global,
    Link,
    Host,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct Route {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub on_link: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub metric: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub route_type: Option<RouteType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<RouteScope>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub table: Option<u32>,
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
    pub congestion_window: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub advertised_receive_window: Option<u32>,
}

/// Comparable form of a route or rule, with `default` spelled out for the
/// family and the table made explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RouteKey {
    family: AddressFamily,
    to: Option<IpNetwork>,
    via: Option<IpAddr>,
    from: Option<IpNetwork>,
    table: u32,
    metric: Option<u32>,
    extra: Option<u32>,
}

fn default_network(family: AddressFamily) -> IpNetwork {
    let ip = match family {
        AddressFamily::Ipv4 => IpAddr::from([0u8; 4]),
        AddressFamily::Ipv6 => IpAddr::from([0u8; 16]),
    };
    IpNetwork::new(ip, 0).unwrap_or_else(|_| IpNetwork::from(ip))
}

fn is_default(value: &str) -> bool {
    value == DEFAULT_ROUTE
}

/// Address family implied by the given endpoints, `None` when all of them
/// are `default`.
pub(crate) fn family_of<'a>(
    endpoints: impl IntoIterator<Item = &'a str>,
) -> Result<Option<AddressFamily>, String> {
    let mut ret: Option<AddressFamily> = None;
    for endpoint in endpoints {
        if is_default(endpoint) {
            continue;
        }
        let net = parse_ip_or_network(endpoint)
            .ok_or_else(|| format!("invalid IP address '{endpoint}'"))?;
        let family = AddressFamily::of_network(&net);
        match ret {
            Some(f) if f != family => {
                return Err(format!(
                    "address family mismatch: '{endpoint}' is not {f}"
                ));
            }
            _ => ret = Some(family),
        }
    }
    Ok(ret)
}

impl Route {
    pub fn is_default(&self) -> bool {
        match self.to.as_deref() {
            Some(DEFAULT_ROUTE) => true,
            Some(to) => parse_ip_or_network(to)
                .map(|n| n.prefix() == 0 && n.ip().is_unspecified())
                .unwrap_or_default(),
            None => false,
        }
    }

    /// Family of the route derived from `to`, `via` and `from`, they must
    /// agree. Routes only spelling `default` are IPv4.
    pub fn family(&self) -> Result<AddressFamily, String> {
        Ok(family_of(
            [&self.to, &self.via, &self.from]
                .into_iter()
                .filter_map(|v| v.as_deref()),
        )?
        .unwrap_or(AddressFamily::Ipv4))
    }

    pub(crate) fn key(&self) -> Option<RouteKey> {
        let family = self.family().ok()?;
        let to = match self.to.as_deref() {
            Some(_) if self.is_default() => Some(default_network(family)),
            Some(to) => Some(parse_ip_or_network(to)?),
            None => None,
        };
        let via = match self.via.as_deref() {
            Some(via) => Some(IpAddr::from_str(via).ok()?),
            None => None,
        };
        let from = match self.from.as_deref() {
            Some(from) => Some(parse_ip_or_network(from)?),
            None => None,
        };
        Some(RouteKey {
            family,
            to,
            via,
            from,
            table: self.table.unwrap_or(RT_TABLE_MAIN),
            metric: self.metric,
            extra: None,
        })
    }

    /// Whether both describe the same kernel route: same family, same
    /// table and same endpoints once `default` is normalized.
    pub fn is_same_route(&self, other: &Self) -> bool {
        match (self.key(), other.key()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct RoutingPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub table: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub priority: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub mark: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub type_of_service: Option<u32>,
}

impl RoutingPolicy {
    pub fn family(&self) -> Result<AddressFamily, String> {
        Ok(family_of(
            [&self.from, &self.to]
                .into_iter()
                .filter_map(|v| v.as_deref()),
        )?
        .unwrap_or(AddressFamily::Ipv4))
    }

    pub(crate) fn key(&self) -> Option<RouteKey> {
        let family = self.family().ok()?;
        let parse = |v: Option<&str>| -> Option<Option<IpNetwork>> {
            match v {
                Some(v) if is_default(v) => Some(Some(default_network(family))),
                Some(v) => parse_ip_or_network(v).map(Some),
                None => Some(None),
            }
        };
        Some(RouteKey {
            family,
            to: parse(self.to.as_deref())?,
            via: None,
            from: parse(self.from.as_deref())?,
            table: self.table.unwrap_or(RT_TABLE_MAIN),
            metric: self.priority,
            extra: self.mark,
        })
    }

    pub fn is_same_rule(&self, other: &Self) -> bool {
        match (self.key(), other.key()) {
            (Some(a), Some(b)) => {
                a == b && self.type_of_service == other.type_of_service
            }
            _ => self == other,
        }
    }
}
