// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Value of a `renderer` key, globally, per section or per definition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[non_exhaustive]
pub enum Renderer {
    #[serde(rename = "networkd")]
    Networkd,
    #[serde(rename = "NetworkManager")]
    NetworkManager,
    /// Only configure SR-IOV virtual functions, leave addressing alone.
    #[serde(rename = "sriov")]
    Sriov,
}

impl std::fmt::Display for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Backend::from(*self))
    }
}

/// Backend resolved for a definition once the state is built.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[non_exhaustive]
pub enum Backend {
    /// systemd-networkd
    #[default]
    #[serde(rename = "networkd")]
    Networkd,
    #[serde(rename = "NetworkManager")]
    NetworkManager,
    /// Open vSwitch
    #[serde(rename = "OpenVSwitch")]
    Ovs,
    #[serde(rename = "sriov")]
    Sriov,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Networkd => "networkd",
                Self::NetworkManager => "NetworkManager",
                Self::Ovs => "OpenVSwitch",
                Self::Sriov => "sriov",
            }
        )
    }
}

impl From<Renderer> for Backend {
    fn from(v: Renderer) -> Self {
        match v {
            Renderer::Networkd => Self::Networkd,
            Renderer::NetworkManager => Self::NetworkManager,
            Renderer::Sriov => Self::Sriov,
        }
    }
}
