// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{Backend, ErrorKind, NetplanError};

const ENV_IGNORE_ERRORS: &str = "NETPLAN_IGNORE_ERRORS";
const ENV_DEFAULT_BACKEND: &str = "NETPLAN_DEFAULT_BACKEND";

/// Knobs shared by the parser and the state builder.
///
/// The boot time generator runs with `ignore_errors` enabled so that a
/// typo in one definition never blocks the whole network from coming up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct NetplanOptions {
    /// Drop malformed definitions instead of failing the whole load.
    #[serde(default)]
    pub ignore_errors: bool,
    /// Backend used when neither the definition, its section nor the
    /// global `renderer` pick one.
    #[serde(default)]
    pub default_backend: Backend,
}

impl Default for NetplanOptions {
    fn default() -> Self {
        Self {
            ignore_errors: false,
            default_backend: Backend::Networkd,
        }
    }
}

impl NetplanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ignore_errors(mut self, value: bool) -> Self {
        self.ignore_errors = value;
        self
    }

    pub fn set_default_backend(mut self, backend: Backend) -> Self {
        self.default_backend = backend;
        self
    }

    /// Build options from `NETPLAN_IGNORE_ERRORS` and
    /// `NETPLAN_DEFAULT_BACKEND`, unset variables keep the defaults.
    pub fn from_env() -> Result<Self, NetplanError> {
        Self::from_vars(
            std::env::var(ENV_IGNORE_ERRORS).ok().as_deref(),
            std::env::var(ENV_DEFAULT_BACKEND).ok().as_deref(),
        )
    }

    pub(crate) fn from_vars(
        ignore_errors: Option<&str>,
        default_backend: Option<&str>,
    ) -> Result<Self, NetplanError> {
        let mut ret = Self::default();
        if let Some(value) = ignore_errors {
            ret.ignore_errors = match value.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                _ => {
                    return Err(NetplanError::new(
                        ErrorKind::InvalidFormat,
                        format!(
                            "Invalid {ENV_IGNORE_ERRORS} value '{value}', \
                             expecting 1|0|true|false|yes|no"
                        ),
                    ));
                }
            };
        }
        if let Some(value) = default_backend {
            ret.default_backend = match value {
                "networkd" => Backend::Networkd,
                "NetworkManager" => Backend::NetworkManager,
                _ => {
                    return Err(NetplanError::new(
                        ErrorKind::InvalidFormat,
                        format!(
                            "Invalid {ENV_DEFAULT_BACKEND} value '{value}', \
                             expecting networkd|NetworkManager"
                        ),
                    ));
                }
            };
        }
        log::debug!("Netplan options: {ret:?}");
        Ok(ret)
    }
}
