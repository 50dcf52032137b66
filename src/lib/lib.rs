// SPDX-License-Identifier: Apache-2.0

//! Compiler of layered netplan YAML configuration.
//!
//! YAML files of the `lib/netplan`, `etc/netplan` and `run/netplan`
//! directories are merged by a [NetplanParser] in precedence order, then
//! validated into an immutable [NetplanState] by [build_state()]. The state
//! can be written back to YAML with [dump()], [write_filtered()] and
//! [update_hierarchy()].

mod deserializer;
mod emit;
mod error;
mod loader;
mod netdef;
mod options;
mod parser;
mod state;


pub use self::emit::{dump, dump_to_string, update_hierarchy, write_filtered};
pub use self::error::{ErrorDomain, ErrorKind, ErrorLocation, NetplanError};
pub use self::loader::{enumerate_hierarchy, ConfigTier, FilePrecedence};
pub use self::netdef::{
    AccessPoint, ActivationMode, AddressEntry, AddressFamily, AddressOptions,
    AuthSettings, Backend, BondMode, BondParameters, BondSettings,
    BridgeParameters, BridgeSettings, CommonSettings, DefinitionKind,
    DefinitionSettings, DhcpIdentifier, DhcpOverrides, DriverMatch,
    DummySettings, EapMethod, EmbeddedSwitchMode, EthernetSettings,
    GlobalOvsSettings, InfinibandMode, Ipv6AddressGeneration,
    KeyManagement, LacpRate, LinkLocal, MatchConfig, ModemSettings,
    Nameservers, NetplanDefinition, NetworkManagerSettings, NmDeviceSettings,
    OvsController, OvsFailMode, OvsLacp, OvsSettings, OvsSsl,
    PhysicalSettings, PortSettings, Renderer, Route, RouteScope, RouteType,
    RoutingPolicy, TunnelKeys, TunnelMode, TunnelSettings, VethSettings,
    VlanSettings, VrfSettings, WifiBand, WifiMode, WifiSettings,
    WireguardPeer, WireguardPeerKeys, RT_TABLE_MAIN,
};
pub use self::options::NetplanOptions;
pub use self::parser::{
    load_deletions, load_file, load_hierarchy, load_origin_hint,
    NetplanParser,
};
pub use self::state::{
    build_state, InterfaceDefinition, LinkKind, NetplanState,
};
