// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::deserializer::option_bool_or_string;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum OvsLacp {
    Active,
    Passive,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum OvsFailMode {
    Secure,
    Standalone,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct OvsController {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_mode: Option<String>,
}

/// `openvswitch` mapping of a single definition. Having one on a bridge or
/// bond hands the device to Open vSwitch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct OvsSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_ids: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_config: Option<BTreeMap<String, String>>,
    /// Bond only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lacp: Option<OvsLacp>,
    /// Bridge only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_mode: Option<OvsFailMode>,
    /// Bridge only
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub mcast_snooping: Option<bool>,
    /// Bridge only
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub rstp: Option<bool>,
    /// Bridge only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocols: Option<Vec<String>>,
    /// Bridge only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<OvsController>,
}

impl OvsSettings {
    /// Keys set which only make sense on bridges.
    pub(crate) fn bridge_only_keys(&self) -> Vec<&'static str> {
        let mut ret = Vec::new();
        if self.fail_mode.is_some() {
            ret.push("fail-mode");
        }
        if self.mcast_snooping.is_some() {
            ret.push("mcast-snooping");
        }
        if self.rstp.is_some() {
            ret.push("rstp");
        }
        if self.protocols.is_some() {
            ret.push("protocols");
        }
        if self.controller.is_some() {
            ret.push("controller");
        }
        ret
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct OvsSsl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

/// Top level `network.openvswitch` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct GlobalOvsSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_ids: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_config: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocols: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl: Option<OvsSsl>,
    /// Patch port pairs, each side becomes a port definition peered with
    /// the other.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<(String, String)>>,
}

impl GlobalOvsSettings {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
