// SPDX-License-Identifier: Apache-2.0

mod auth;
mod base;
mod bond;
mod bridge;
mod dummy;
mod ethernet;
mod modem;
mod nm_device;
mod ovs;
mod physical;
mod port;
mod tunnel;
mod veth;
mod vlan;
mod vrf;
mod wifi;

use std::sync::OnceLock;

use regex::Regex;

pub use self::auth::{AuthSettings, EapMethod, KeyManagement};
pub use self::base::{ActivationMode, CommonSettings, NetworkManagerSettings};
pub use self::bond::{BondMode, BondParameters, BondSettings, LacpRate};
pub use self::bridge::{BridgeParameters, BridgeSettings};
pub use self::dummy::DummySettings;
pub use self::ethernet::{
    EmbeddedSwitchMode, EthernetSettings, InfinibandMode,
};
pub use self::modem::ModemSettings;
pub use self::nm_device::NmDeviceSettings;
pub use self::ovs::{
    GlobalOvsSettings, OvsController, OvsFailMode, OvsLacp, OvsSettings,
    OvsSsl,
};
pub use self::physical::{DriverMatch, MatchConfig, PhysicalSettings};
pub use self::port::PortSettings;
pub use self::tunnel::{
    TunnelKeys, TunnelMode, TunnelSettings, WireguardPeer, WireguardPeerKeys,
};
pub use self::veth::VethSettings;
pub use self::vlan::VlanSettings;
pub use self::vrf::VrfSettings;
pub use self::wifi::{AccessPoint, WifiBand, WifiMode, WifiSettings};

const MAC_KEYWORDS: [&str; 4] = ["permanent", "random", "stable", "preserve"];

/// Whether `value` is 6 colon separated hex octets.
pub(crate) fn is_valid_mac(value: &str) -> bool {
    let octets: Vec<&str> = value.split(':').collect();
    octets.len() == 6
        && octets
            .iter()
            .all(|o| o.len() == 2 && u8::from_str_radix(o, 16).is_ok())
}

pub(crate) fn is_mac_keyword(value: &str) -> bool {
    MAC_KEYWORDS.contains(&value)
}

/// Durations such as `15`, `100ms`, `2.5s` or `1min`.
pub(crate) fn is_valid_timing(value: &str) -> bool {
    static TIMING_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    TIMING_REGEX
        .get_or_init(|| Regex::new(r"^[0-9]+(\.[0-9]+)?(us|ms|s|min|h)?$").ok())
        .as_ref()
        .map(|r| r.is_match(value))
        .unwrap_or_default()
}
