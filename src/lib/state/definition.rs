// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Backend, CommonSettings, DefinitionKind, DefinitionSettings};

/// Structural reference between two definitions of a state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum LinkKind {
    /// Bridge holding this device in `interfaces`
    Bridge,
    /// Bond holding this device in `interfaces`
    Bond,
    /// VRF holding this device in `interfaces`
    Vrf,
    /// Parent device of a VLAN
    VlanLink,
    /// SR-IOV physical function of a virtual function
    SriovLink,
    /// Other end of a veth pair or of an OVS patch port
    Peer,
}

impl LinkKind {
    /// Links pointing from a device to the device it depends on.
    pub(crate) const PARENTS: [Self; 5] = [
        Self::Bridge,
        Self::Bond,
        Self::Vrf,
        Self::VlanLink,
        Self::SriovLink,
    ];
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Bridge => "bridge",
                Self::Bond => "bond",
                Self::Vrf => "vrf",
                Self::VlanLink => "vlan link",
                Self::SriovLink => "SR-IOV link",
                Self::Peer => "peer",
            }
        )
    }
}

/// Resolved references, as positions in the owning state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct DefinitionLinks {
    bridge: Option<usize>,
    bond: Option<usize>,
    vrf: Option<usize>,
    vlan_link: Option<usize>,
    sriov_link: Option<usize>,
    peer: Option<usize>,
}

impl DefinitionLinks {
    pub(crate) fn get(&self, kind: LinkKind) -> Option<usize> {
        match kind {
            LinkKind::Bridge => self.bridge,
            LinkKind::Bond => self.bond,
            LinkKind::Vrf => self.vrf,
            LinkKind::VlanLink => self.vlan_link,
            LinkKind::SriovLink => self.sriov_link,
            LinkKind::Peer => self.peer,
        }
    }

    pub(crate) fn set(&mut self, kind: LinkKind, pos: usize) {
        let slot = match kind {
            LinkKind::Bridge => &mut self.bridge,
            LinkKind::Bond => &mut self.bond,
            LinkKind::Vrf => &mut self.vrf,
            LinkKind::VlanLink => &mut self.vlan_link,
            LinkKind::SriovLink => &mut self.sriov_link,
            LinkKind::Peer => &mut self.peer,
        };
        *slot = Some(pos);
    }

    /// Positions of the definitions this one depends on.
    pub(crate) fn parents(&self) -> impl Iterator<Item = usize> + '_ {
        LinkKind::PARENTS.into_iter().filter_map(|k| self.get(k))
    }
}

/// One validated network definition.
///
/// Owned by a [crate::NetplanState], references to other definitions are
/// resolved through [crate::NetplanState::link()].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct InterfaceDefinition {
    pub(crate) id: String,
    pub(crate) settings: DefinitionSettings,
    pub(crate) backend: Backend,
    pub(crate) origin: Option<PathBuf>,
    pub(crate) links: DefinitionLinks,
}

impl InterfaceDefinition {
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn kind(&self) -> DefinitionKind {
        self.settings.kind()
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Last YAML file which contributed to this definition.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    pub fn settings(&self) -> &DefinitionSettings {
        &self.settings
    }

    pub fn common(&self) -> &CommonSettings {
        self.settings.common()
    }

    pub fn is_virtual(&self) -> bool {
        self.kind().is_virtual()
    }

    /// Kernel name of the device: `set-name`, the ID, or `None` when the
    /// device is selected by `match` and only named at runtime.
    pub fn effective_name(&self) -> Option<&str> {
        match self.settings.physical() {
            Some(physical) => physical.effective_name(&self.id),
            None => Some(self.id.as_str()),
        }
    }

    /// Names of the files the backend writers generate for this
    /// definition.
    pub fn output_filenames(&self) -> Vec<String> {
        let id = self.id.as_str();
        match self.backend {
            Backend::Networkd => {
                let mut ret = vec![format!("10-netplan-{id}.network")];
                if self.is_virtual() {
                    ret.push(format!("10-netplan-{id}.netdev"));
                }
                if self
                    .settings
                    .physical()
                    .is_some_and(|p| p.match_config.is_some())
                {
                    ret.push(format!("10-netplan-{id}.link"));
                }
                ret
            }
            Backend::NetworkManager => match &self.settings {
                DefinitionSettings::Wifi(wifi) if !wifi.ssids().is_empty() => {
                    wifi.ssids()
                        .into_iter()
                        .map(|ssid| {
                            format!(
                                "netplan-{id}-{}.nmconnection",
                                urlencoding::encode(ssid)
                            )
                        })
                        .collect()
                }
                _ => vec![format!("netplan-{id}.nmconnection")],
            },
            Backend::Ovs => vec![format!("netplan-ovs-{id}.service")],
            // Only virtual functions are created, nothing per definition
            Backend::Sriov => Vec::new(),
        }
    }
}
