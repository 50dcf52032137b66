// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;

use super::{DefinitionContext, SanitizeDefinition};
use crate::{
    BondSettings, BridgeSettings, CommonSettings, DefinitionKind,
    DummySettings, EthernetSettings, ModemSettings, NetplanDefinition,
    NetplanError, NmDeviceSettings, PhysicalSettings, PortSettings,
    TunnelSettings, VethSettings, VlanSettings, VrfSettings, WifiSettings,
};

/// Kind specific settings of a definition. The variant is fixed when the ID
/// is first seen and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum DefinitionSettings {
    Ethernet(Box<EthernetSettings>),
    Modem(Box<ModemSettings>),
    Wifi(Box<WifiSettings>),
    Bridge(Box<BridgeSettings>),
    Bond(Box<BondSettings>),
    Tunnel(Box<TunnelSettings>),
    Vlan(Box<VlanSettings>),
    Vrf(Box<VrfSettings>),
    Dummy(Box<DummySettings>),
    Veth(Box<VethSettings>),
    NmDevice(Box<NmDeviceSettings>),
    Port(Box<PortSettings>),
}

macro_rules! dispatch {
    ( $settings:expr, $inner:ident => $body:expr ) => {
        match $settings {
            DefinitionSettings::Ethernet($inner) => $body,
            DefinitionSettings::Modem($inner) => $body,
            DefinitionSettings::Wifi($inner) => $body,
            DefinitionSettings::Bridge($inner) => $body,
            DefinitionSettings::Bond($inner) => $body,
            DefinitionSettings::Tunnel($inner) => $body,
            DefinitionSettings::Vlan($inner) => $body,
            DefinitionSettings::Vrf($inner) => $body,
            DefinitionSettings::Dummy($inner) => $body,
            DefinitionSettings::Veth($inner) => $body,
            DefinitionSettings::NmDevice($inner) => $body,
            DefinitionSettings::Port($inner) => $body,
        }
    };
}

fn from_value<T: NetplanDefinition>(
    value: serde_yaml::Value,
) -> Result<Box<T>, serde_yaml::Error> {
    if value.is_null() {
        Ok(Box::default())
    } else {
        serde_yaml::from_value(value).map(Box::new)
    }
}

impl DefinitionSettings {
    /// Deserialize a merged YAML stanza into the settings of `kind`.
    pub(crate) fn from_yaml(
        kind: DefinitionKind,
        value: serde_yaml::Value,
    ) -> Result<Self, serde_yaml::Error> {
        Ok(match kind {
            DefinitionKind::Ethernet => Self::Ethernet(from_value(value)?),
            DefinitionKind::Modem => Self::Modem(from_value(value)?),
            DefinitionKind::Wifi => Self::Wifi(from_value(value)?),
            DefinitionKind::Bridge => Self::Bridge(from_value(value)?),
            DefinitionKind::Bond => Self::Bond(from_value(value)?),
            DefinitionKind::Tunnel => Self::Tunnel(from_value(value)?),
            DefinitionKind::Vlan => Self::Vlan(from_value(value)?),
            DefinitionKind::Vrf => Self::Vrf(from_value(value)?),
            DefinitionKind::Dummy => Self::Dummy(from_value(value)?),
            DefinitionKind::Veth => Self::Veth(from_value(value)?),
            DefinitionKind::NmDevice => Self::NmDevice(from_value(value)?),
            DefinitionKind::Port => Self::Port(from_value(value)?),
        })
    }

    pub(crate) fn to_yaml(&self) -> Result<serde_yaml::Value, NetplanError> {
        serde_yaml::to_value(self).map_err(|e| {
            NetplanError::new(
                crate::ErrorKind::EmitterFailure,
                format!("Failed to serialize definition settings: {e}"),
            )
        })
    }

    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::Ethernet(_) => DefinitionKind::Ethernet,
            Self::Modem(_) => DefinitionKind::Modem,
            Self::Wifi(_) => DefinitionKind::Wifi,
            Self::Bridge(_) => DefinitionKind::Bridge,
            Self::Bond(_) => DefinitionKind::Bond,
            Self::Tunnel(_) => DefinitionKind::Tunnel,
            Self::Vlan(_) => DefinitionKind::Vlan,
            Self::Vrf(_) => DefinitionKind::Vrf,
            Self::Dummy(_) => DefinitionKind::Dummy,
            Self::Veth(_) => DefinitionKind::Veth,
            Self::NmDevice(_) => DefinitionKind::NmDevice,
            Self::Port(_) => DefinitionKind::Port,
        }
    }

    pub fn common(&self) -> &CommonSettings {
        dispatch!(self, s => s.common())
    }

    pub fn common_mut(&mut self) -> &mut CommonSettings {
        dispatch!(self, s => s.common_mut())
    }

    pub fn physical(&self) -> Option<&PhysicalSettings> {
        dispatch!(self, s => s.physical())
    }

    pub fn members(&self) -> &[String] {
        dispatch!(self, s => s.members())
    }

    pub(crate) fn sanitize_specific(
        &mut self,
        ctx: &DefinitionContext,
    ) -> Result<(), NetplanError> {
        dispatch!(self, s => s.sanitize_specific(ctx))
    }

    /// Name of the parent device: VLAN link or SR-IOV physical function.
    pub fn link(&self) -> Option<&str> {
        match self {
            Self::Vlan(s) => s.link.as_deref(),
            Self::Ethernet(s) => s.link.as_deref(),
            _ => None,
        }
    }

    /// Veth or OVS patch port peer.
    pub fn peer(&self) -> Option<&str> {
        match self {
            Self::Veth(s) => s.peer.as_deref(),
            Self::Port(s) => s.peer.as_deref(),
            _ => None,
        }
    }
}
