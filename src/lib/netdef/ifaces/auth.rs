// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum KeyManagement {
    None,
    Psk,
    Eap,
    #[serde(rename = "eap-sha256")]
    EapSha256,
    #[serde(rename = "eap-suite-b-192")]
    EapSuiteB192,
    Sae,
    #[serde(rename = "802.1x")]
    Ieee8021x,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum EapMethod {
    Tls,
    Peap,
    Ttls,
    Leap,
    Pwd,
}

/// 802.1x and WPA credentials. Secrets are carried as opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct AuthSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_management: Option<KeyManagement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<EapMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymous_identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_certificate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_certificate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_key_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase2_auth: Option<String>,
}
