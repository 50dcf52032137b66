// SPDX-License-Identifier: Apache-2.0

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use super::is_valid_timing;
use crate::{
    deserializer::{
        option_bool_or_string, option_number_as_string, option_u32_or_string,
    },
    netdef::{DefinitionContext, SanitizeDefinition},
    CommonSettings, DefinitionKind, NetplanDefinition, NetplanError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BondMode {
    #[serde(rename = "balance-rr")]
    RoundRobin,
    #[serde(rename = "active-backup")]
    ActiveBackup,
    #[serde(rename = "balance-xor")]
    XOR,
    #[serde(rename = "broadcast")]
    Broadcast,
    #[serde(rename = "802.3ad")]
    LACP,
    #[serde(rename = "balance-tlb")]
    TLB,
    #[serde(rename = "balance-alb")]
    ALB,
}

impl std::fmt::Display for BondMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::RoundRobin => "balance-rr",
                Self::ActiveBackup => "active-backup",
                Self::XOR => "balance-xor",
                Self::Broadcast => "broadcast",
                Self::LACP => "802.3ad",
                Self::TLB => "balance-tlb",
                Self::ALB => "balance-alb",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum LacpRate {
    Slow,
    Fast,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct BondParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<BondMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lacp_rate: Option<LacpRate>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_number_as_string"
    )]
    pub mii_monitor_interval: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub min_links: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmit_hash_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_select: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_bool_or_string"
    )]
    pub all_slaves_active: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_number_as_string"
    )]
    pub arp_interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arp_ip_targets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arp_validate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arp_all_targets: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_number_as_string"
    )]
    pub up_delay: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_number_as_string"
    )]
    pub down_delay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_over_mac_policy: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub gratuitous_arp: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub packets_per_slave: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_reselect_policy: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_u32_or_string"
    )]
    pub resend_igmp: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "option_number_as_string"
    )]
    pub learn_packet_interval: Option<String>,
    /// Preferred member, must be listed in `interfaces`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
}

impl BondParameters {
    fn timings(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("mii-monitor-interval", self.mii_monitor_interval.as_deref()),
            ("arp-interval", self.arp_interval.as_deref()),
            ("up-delay", self.up_delay.as_deref()),
            ("down-delay", self.down_delay.as_deref()),
            ("learn-packet-interval", self.learn_packet_interval.as_deref()),
        ]
    }

    fn check_mode_options(&self) -> Result<(), String> {
        let mode = self.mode;
        let mode_str = mode
            .map(|m| m.to_string())
            .unwrap_or_else(|| "balance-rr".to_string());
        if self.lacp_rate.is_some() && mode != Some(BondMode::LACP) {
            return Err(format!(
                "'lacp-rate' is only valid for mode 802.3ad, not {mode_str}"
            ));
        }
        if self.transmit_hash_policy.is_some()
            && !matches!(
                mode,
                Some(BondMode::XOR) | Some(BondMode::LACP) | Some(BondMode::TLB)
            )
        {
            return Err(format!(
                "'transmit-hash-policy' is only valid for modes balance-xor, \
                 802.3ad and balance-tlb, not {mode_str}"
            ));
        }
        if self.arp_interval.is_some()
            && matches!(
                mode,
                Some(BondMode::LACP) | Some(BondMode::TLB) | Some(BondMode::ALB)
            )
        {
            return Err(format!(
                "'arp-interval' is not supported with mode {mode_str}"
            ));
        }
        if self.primary.is_some()
            && !matches!(
                mode,
                Some(BondMode::ActiveBackup)
                    | Some(BondMode::TLB)
                    | Some(BondMode::ALB)
            )
        {
            return Err(format!(
                "'primary' is only valid for modes active-backup, \
                 balance-tlb and balance-alb, not {mode_str}"
            ));
        }
        if let Some(targets) = self.arp_ip_targets.as_ref() {
            if self.arp_interval.is_none() {
                return Err(
                    "'arp-ip-targets' requires 'arp-interval'".to_string()
                );
            }
            if let Some(target) =
                targets.iter().find(|t| t.parse::<Ipv4Addr>().is_err())
            {
                return Err(format!(
                    "arp-ip-targets: '{target}' is not an IPv4 address"
                ));
            }
        }
        Ok(())
    }
}

/// Stanza of the `bonds` section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct BondSettings {
    #[serde(flatten)]
    pub common: CommonSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BondParameters>,
}

impl BondSettings {
    pub fn mode(&self) -> Option<BondMode> {
        self.parameters.as_ref().and_then(|p| p.mode)
    }
}

impl NetplanDefinition for BondSettings {
    const KIND: DefinitionKind = DefinitionKind::Bond;

    fn common(&self) -> &CommonSettings {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonSettings {
        &mut self.common
    }

    fn members(&self) -> &[String] {
        self.interfaces.as_deref().unwrap_or_default()
    }
}

impl SanitizeDefinition for BondSettings {
    /// * Timing parameters must be a number with an optional unit.
    /// * Mode specific options only with their mode.
    /// * `primary` must be a member of the bond.
    fn sanitize_specific(
        &mut self,
        ctx: &DefinitionContext,
    ) -> Result<(), NetplanError> {
        let Some(params) = self.parameters.as_ref() else {
            return Ok(());
        };
        for (name, value) in params.timings() {
            if let Some(value) = value {
                if !is_valid_timing(value) {
                    return Err(ctx.error(format!(
                        "invalid time value '{value}' for '{name}'"
                    )));
                }
            }
        }
        params.check_mode_options().map_err(|e| ctx.error(e))?;
        if let Some(primary) = params.primary.as_ref() {
            if !self.members().contains(primary) {
                return Err(ctx.error(format!(
                    "bond primary '{primary}' is not a member of this bond"
                )));
            }
        }
        Ok(())
    }
}
