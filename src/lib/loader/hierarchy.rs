// SPDX-License-Identifier: Apache-2.0

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::NetplanError;

const YAML_SUFFIX: &str = ".yaml";

/// Configuration directory tier, lowest precedence first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum ConfigTier {
    /// `lib/netplan`, shipped by the distribution
    Vendor,
    /// `etc/netplan`, written by the administrator
    Admin,
    /// `run/netplan`, runtime overrides
    Runtime,
}

impl ConfigTier {
    pub const ALL: [Self; 3] = [Self::Vendor, Self::Admin, Self::Runtime];

    /// Directory of this tier relative to the root directory.
    pub fn dir(&self) -> &'static str {
        match self {
            Self::Vendor => "lib/netplan",
            Self::Admin => "etc/netplan",
            Self::Runtime => "run/netplan",
        }
    }

    /// Tier of the directory holding `path`, files outside of any tier
    /// count as administrator files.
    pub fn of_path(path: &Path) -> Self {
        let Some(parent) = path.parent() else {
            return Self::Admin;
        };
        Self::ALL
            .into_iter()
            .find(|t| parent.ends_with(t.dir()))
            .unwrap_or(Self::Admin)
    }
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Vendor => "vendor",
                Self::Admin => "admin",
                Self::Runtime => "runtime",
            }
        )
    }
}

/// Total order of configuration sources: by tier first, then by file name.
/// Later sources override earlier ones.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[non_exhaustive]
pub struct FilePrecedence {
    pub tier: ConfigTier,
    pub name: String,
}

impl FilePrecedence {
    pub fn new(tier: ConfigTier, name: &str) -> Self {
        Self {
            tier,
            name: name.to_string(),
        }
    }

    pub fn of_path(path: &Path) -> Self {
        Self {
            tier: ConfigTier::of_path(path),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
        }
    }

    /// A constraint may be a bare file name, placed in the administrator
    /// tier, or a path inside one of the tiers.
    pub fn from_constraint(constraint: &str) -> Self {
        Self::of_path(Path::new(constraint))
    }
}

impl std::fmt::Display for FilePrecedence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.tier.dir(), self.name)
    }
}

fn is_config_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    !name.starts_with('.') && name.ends_with(YAML_SUFFIX) && path.is_file()
}

/// List the YAML files of the hierarchy under `root` in merge order.
///
/// Files of the same tier are sorted by name. A file masks the file of the
/// same name in any lower tier.
pub fn enumerate_hierarchy(
    root: &Path,
) -> Result<Vec<PathBuf>, NetplanError> {
    let mut by_name: BTreeMap<String, (ConfigTier, PathBuf)> =
        BTreeMap::new();
    for tier in ConfigTier::ALL {
        let dir = root.join(tier.dir());
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(NetplanError::file_error(&dir, e)),
        };
        for entry in entries {
            let path = entry
                .map_err(|e| NetplanError::file_error(&dir, e))?
                .path();
            if !is_config_file(&path) {
                continue;
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if let Some((lower_tier, lower)) = by_name.get(&name) {
                log::debug!(
                    "{} masks {} file {}",
                    path.display(),
                    lower_tier,
                    lower.display()
                );
            }
            by_name.insert(name, (tier, path));
        }
    }
    let mut files: Vec<(ConfigTier, String, PathBuf)> = by_name
        .into_iter()
        .map(|(name, (tier, path))| (tier, name, path))
        .collect();
    files.sort();
    Ok(files.into_iter().map(|(_, _, path)| path).collect())
}
