// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[non_exhaustive]
#[serde(rename_all = "kebab-case")]
/// Kind of network definition, fixed by the YAML section it was first
/// declared in.
pub enum DefinitionKind {
    /// Section `ethernets`
    Ethernet,
    /// Section `modems`
    Modem,
    /// Section `wifis`
    Wifi,
    /// Section `bridges`
    Bridge,
    /// Section `bonds`
    Bond,
    /// Section `tunnels`
    Tunnel,
    /// Section `vlans`
    Vlan,
    /// Section `vrfs`
    Vrf,
    /// Section `dummy-devices`
    Dummy,
    /// Section `virtual-ethernets`
    Veth,
    /// Section `nm-devices`
    NmDevice,
    /// Open vSwitch patch port synthesized from `openvswitch.ports`.
    /// Has no section of its own.
    Port,
}

impl DefinitionKind {
    /// Sections in the order they are emitted.
    pub const SECTIONS: [Self; 11] = [
        Self::Ethernet,
        Self::Modem,
        Self::Wifi,
        Self::Bridge,
        Self::Bond,
        Self::Tunnel,
        Self::Vlan,
        Self::Vrf,
        Self::Dummy,
        Self::Veth,
        Self::NmDevice,
    ];

    /// YAML key of the section holding this kind, `None` for [Self::Port].
    pub fn section(&self) -> Option<&'static str> {
        match self {
            Self::Ethernet => Some("ethernets"),
            Self::Modem => Some("modems"),
            Self::Wifi => Some("wifis"),
            Self::Bridge => Some("bridges"),
            Self::Bond => Some("bonds"),
            Self::Tunnel => Some("tunnels"),
            Self::Vlan => Some("vlans"),
            Self::Vrf => Some("vrfs"),
            Self::Dummy => Some("dummy-devices"),
            Self::Veth => Some("virtual-ethernets"),
            Self::NmDevice => Some("nm-devices"),
            Self::Port => None,
        }
    }

    pub fn from_section(section: &str) -> Option<Self> {
        Self::SECTIONS
            .iter()
            .find(|k| k.section() == Some(section))
            .copied()
    }

    pub fn is_physical(&self) -> bool {
        matches!(self, Self::Ethernet | Self::Wifi | Self::Modem)
    }

    /// Whether the device is created by the backend instead of existing
    /// in hardware.
    pub fn is_virtual(&self) -> bool {
        !self.is_physical() && *self != Self::NmDevice
    }

    /// Whether other definitions can be enslaved to it through
    /// `interfaces`.
    pub fn is_controller(&self) -> bool {
        matches!(self, Self::Bridge | Self::Bond | Self::Vrf)
    }
}

impl std::fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Ethernet => "ethernet",
                Self::Modem => "modem",
                Self::Wifi => "wifi",
                Self::Bridge => "bridge",
                Self::Bond => "bond",
                Self::Tunnel => "tunnel",
                Self::Vlan => "vlan",
                Self::Vrf => "vrf",
                Self::Dummy => "dummy",
                Self::Veth => "veth",
                Self::NmDevice => "nm-device",
                Self::Port => "port",
            }
        )
    }
}
