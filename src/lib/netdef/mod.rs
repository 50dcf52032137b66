// SPDX-License-Identifier: Apache-2.0

mod backend;
mod def_kind;
mod def_trait;
pub(crate) mod document;
mod ifaces;
pub(crate) mod ip;
mod route;
mod settings;

pub use self::backend::{Backend, Renderer};
pub use self::def_kind::DefinitionKind;
pub(crate) use self::def_trait::{
    DefinitionContext, SanitizeDefinition,
};
pub use self::def_trait::NetplanDefinition;
pub(crate) use self::ifaces::{is_mac_keyword, is_valid_mac};
pub use self::ifaces::{
    AccessPoint, ActivationMode, AuthSettings, BondMode, BondParameters,
    BondSettings, BridgeParameters, BridgeSettings, CommonSettings,
    DriverMatch, DummySettings, EapMethod, EmbeddedSwitchMode,
    EthernetSettings, GlobalOvsSettings, InfinibandMode, KeyManagement,
    LacpRate, MatchConfig, ModemSettings, NetworkManagerSettings,
    NmDeviceSettings, OvsController, OvsFailMode, OvsLacp, OvsSettings,
    OvsSsl, PhysicalSettings, PortSettings, TunnelKeys, TunnelMode,
    TunnelSettings, VethSettings, VlanSettings, VrfSettings, WifiBand,
    WifiMode, WifiSettings, WireguardPeer, WireguardPeerKeys,
};
pub use self::ip::{
    AddressEntry, AddressFamily, AddressOptions, DhcpIdentifier,
    DhcpOverrides, Ipv6AddressGeneration, LinkLocal, Nameservers,
};
pub use self::route::{
    Route, RouteScope, RouteType, RoutingPolicy, RT_TABLE_MAIN,
};
pub use self::settings::DefinitionSettings;
