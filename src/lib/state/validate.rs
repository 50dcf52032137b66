// SPDX-License-Identifier: Apache-2.0

use std::{
    collections::{BTreeMap, HashMap},
    net::IpAddr,
    str::FromStr,
};

use super::candidate::{Candidate, DefFailure};
use crate::{
    netdef::{ip::parse_prefixed, is_mac_keyword, is_valid_mac},
    AddressFamily, Backend, DefinitionKind, DefinitionSettings,
    EmbeddedSwitchMode, LinkKind, NetplanError,
};

/// Kernel limit of interface names, trailing NUL included.
const IFNAMSIZ: usize = 16;
const IPV6_MIN_MTU: u32 = 1280;

/// Field rules shared by every kind of definition.
pub(crate) fn check_definitions(defs: &[Candidate]) -> Result<(), DefFailure> {
    for (pos, def) in defs.iter().enumerate() {
        check_definition(def).map_err(|e| DefFailure::new(pos, e))?;
    }
    Ok(())
}

fn check_definition(def: &Candidate) -> Result<(), NetplanError> {
    check_name(def)?;
    check_macaddress(def)?;
    check_addressing(def)?;
    check_routing(def)?;
    check_ovs(def)?;
    check_networkmanager(def)?;
    if def.backend == Backend::Networkd {
        check_dhcp_overrides(def)?;
    }
    Ok(())
}

fn check_name(def: &Candidate) -> Result<(), NetplanError> {
    if def.kind() == DefinitionKind::NmDevice {
        return Ok(());
    }
    let name = match def.settings.physical() {
        Some(physical) => physical.effective_name(&def.id),
        None => Some(def.id.as_str()),
    };
    match name {
        Some(name) if name.len() >= IFNAMSIZ => Err(def.error(format!(
            "interface name '{name}' is too long, at most {} characters \
             are allowed",
            IFNAMSIZ - 1
        ))),
        _ => Ok(()),
    }
}

fn check_macaddress(def: &Candidate) -> Result<(), NetplanError> {
    let Some(mac) = def.settings.common().macaddress.as_deref() else {
        return Ok(());
    };
    if is_valid_mac(mac) {
        Ok(())
    } else if is_mac_keyword(mac) {
        if def.backend == Backend::NetworkManager {
            Ok(())
        } else {
            Err(def.error(format!(
                "MAC address keyword '{mac}' is only supported by the \
                 NetworkManager renderer"
            )))
        }
    } else {
        Err(def.error(format!(
            "invalid MAC address '{mac}', must be XX:XX:XX:XX:XX:XX or one \
             of 'permanent', 'random', 'stable', 'preserve'"
        )))
    }
}

fn check_gateway(
    def: &Candidate,
    key: &str,
    gateway: Option<&str>,
    family: AddressFamily,
) -> Result<(), NetplanError> {
    let Some(gateway) = gateway else {
        return Ok(());
    };
    log::warn!(
        "{}: `{key}` has been deprecated, use default routes instead",
        def.id
    );
    match IpAddr::from_str(gateway) {
        Ok(ip) if AddressFamily::of(&ip) == family => Ok(()),
        _ => Err(def.error(format!(
            "invalid {family} gateway address '{gateway}'"
        ))),
    }
}

fn check_addressing(def: &Candidate) -> Result<(), NetplanError> {
    let common = def.settings.common();
    if let Some(mtu) = common.ipv6_mtu {
        if mtu < IPV6_MIN_MTU {
            return Err(def.error(format!(
                "ipv6-mtu {mtu} is below the minimum of {IPV6_MIN_MTU}"
            )));
        }
    }
    for address in common.address_strings() {
        if parse_prefixed(address).is_none() {
            return Err(def.error(format!(
                "invalid address '{address}', must be in ip/prefix notation"
            )));
        }
    }
    check_gateway(
        def,
        "gateway4",
        common.gateway4.as_deref(),
        AddressFamily::Ipv4,
    )?;
    check_gateway(
        def,
        "gateway6",
        common.gateway6.as_deref(),
        AddressFamily::Ipv6,
    )?;
    for address in common
        .nameservers
        .as_ref()
        .and_then(|n| n.addresses.as_deref())
        .unwrap_or_default()
    {
        if IpAddr::from_str(address).is_err() {
            return Err(def.error(format!(
                "invalid nameserver address '{address}'"
            )));
        }
    }
    Ok(())
}

fn check_routing(def: &Candidate) -> Result<(), NetplanError> {
    let common = def.settings.common();
    for route in common.routes.as_deref().unwrap_or_default() {
        if route.to.is_none() {
            return Err(def.error("route: missing 'to' property"));
        }
        route
            .family()
            .map_err(|e| def.error(format!("route: {e}")))?;
    }
    for rule in common.routing_policy.as_deref().unwrap_or_default() {
        if rule.from.is_none() && rule.to.is_none() {
            return Err(def.error(
                "routing-policy: needs either 'from' or 'to' property",
            ));
        }
        rule.family()
            .map_err(|e| def.error(format!("routing-policy: {e}")))?;
    }
    Ok(())
}

fn check_ovs(def: &Candidate) -> Result<(), NetplanError> {
    let Some(ovs) = def.settings.common().openvswitch.as_ref() else {
        return Ok(());
    };
    let kind = def.kind();
    if ovs.lacp.is_some() && kind != DefinitionKind::Bond {
        return Err(def.error(
            "openvswitch: key 'lacp' is only valid for bonds",
        ));
    }
    if kind != DefinitionKind::Bridge {
        if let Some(key) = ovs.bridge_only_keys().first() {
            return Err(def.error(format!(
                "openvswitch: key '{key}' is only valid for bridges"
            )));
        }
    }
    Ok(())
}

fn check_networkmanager(def: &Candidate) -> Result<(), NetplanError> {
    let uuid = def
        .settings
        .common()
        .networkmanager
        .as_ref()
        .and_then(|nm| nm.uuid.as_deref());
    match uuid {
        Some(uuid) if uuid::Uuid::parse_str(uuid).is_err() => Err(
            def.error(format!("networkmanager: invalid UUID '{uuid}'")),
        ),
        _ => Ok(()),
    }
}

// networkd only has one set of DHCP settings for both families.
fn check_dhcp_overrides(def: &Candidate) -> Result<(), NetplanError> {
    let common = def.settings.common();
    if common.dhcp4 != Some(true) || common.dhcp6 != Some(true) {
        return Ok(());
    }
    let dhcp4 = common.dhcp4_overrides.clone().unwrap_or_default();
    let dhcp6 = common.dhcp6_overrides.clone().unwrap_or_default();
    match dhcp4.conflicts_with(&dhcp6).first() {
        Some(key) => Err(def.error(format!(
            "networkd requires that {key} has the same value in both \
             dhcp4-overrides and dhcp6-overrides"
        ))),
        None => Ok(()),
    }
}

/// The virtual functions of a physical function must fit in its
/// `virtual-function-count` and agree on the embedded switch mode.
pub(crate) fn check_sriov(defs: &[Candidate]) -> Result<(), DefFailure> {
    let mut vf_count: BTreeMap<usize, u32> = BTreeMap::new();
    let mut eswitch: HashMap<usize, (EmbeddedSwitchMode, &str)> =
        HashMap::new();
    for (pos, def) in defs.iter().enumerate() {
        let Some(pf) = def.links.get(LinkKind::SriovLink) else {
            continue;
        };
        *vf_count.entry(pf).or_default() += 1;
        let (DefinitionSettings::Ethernet(vf), Some(pf_def)) =
            (&def.settings, defs.get(pf))
        else {
            continue;
        };
        let pf_mode = match &pf_def.settings {
            DefinitionSettings::Ethernet(eth) => eth
                .embedded_switch_mode
                .map(|m| (m, pf_def.id.as_str())),
            _ => None,
        };
        let Some(mode) = vf.embedded_switch_mode else {
            continue;
        };
        let expected = pf_mode.or_else(|| eswitch.get(&pf).copied());
        match expected {
            Some((other, owner)) if other != mode => {
                return Err(DefFailure::new(
                    pos,
                    def.error(format!(
                        "embedded-switch-mode '{mode}' conflicts with \
                         '{other}' of '{owner}' on physical function '{}'",
                        pf_def.id
                    )),
                ));
            }
            Some(_) => (),
            None => {
                eswitch.insert(pf, (mode, def.id.as_str()));
            }
        }
    }
    for (pf, count) in vf_count {
        let Some(pf_def) = defs.get(pf) else {
            continue;
        };
        if let DefinitionSettings::Ethernet(eth) = &pf_def.settings {
            if let Some(declared) = eth.virtual_function_count {
                if count > declared {
                    return Err(DefFailure::new(
                        pf,
                        pf_def.error(format!(
                            "more VFs allocated than the explicit size \
                             declared: {count} > {declared}"
                        )),
                    ));
                }
            }
        }
    }
    Ok(())
}
