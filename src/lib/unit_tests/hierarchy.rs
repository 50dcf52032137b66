// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use super::TestHierarchy;
use crate::{enumerate_hierarchy, ConfigTier, FilePrecedence};

const ETH0_MTU_1000: &str = r#"---
network:
  ethernets:
    eth0:
      mtu: 1000
"#;

const ETH0_MTU_1500: &str = r#"---
network:
  ethernets:
    eth0:
      mtu: 1500
"#;

fn file_names(files: &[std::path::PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
        .collect()
}

#[test]
fn test_enumerate_sorted_by_tier_then_name() {
    let hierarchy = TestHierarchy::new();
    hierarchy.write(ConfigTier::Runtime, "01-run.yaml", "");
    hierarchy.write(ConfigTier::Admin, "50-b.yaml", "");
    hierarchy.write(ConfigTier::Admin, "10-a.yaml", "");
    hierarchy.write(ConfigTier::Vendor, "99-lib.yaml", "");

    let files = enumerate_hierarchy(hierarchy.root()).unwrap();

    assert_eq!(
        file_names(&files),
        vec!["99-lib.yaml", "10-a.yaml", "50-b.yaml", "01-run.yaml"]
    );
}

#[test]
fn test_enumerate_masks_lower_tier() {
    let hierarchy = TestHierarchy::new();
    hierarchy.write(ConfigTier::Vendor, "50-cloud.yaml", "");
    hierarchy.write(ConfigTier::Runtime, "50-cloud.yaml", "");
    hierarchy.write(ConfigTier::Admin, "60-admin.yaml", "");

    let files = enumerate_hierarchy(hierarchy.root()).unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(files[0], hierarchy.path(ConfigTier::Admin, "60-admin.yaml"));
    assert_eq!(
        files[1],
        hierarchy.path(ConfigTier::Runtime, "50-cloud.yaml")
    );
}

#[test]
fn test_enumerate_skips_hidden_and_other_suffix() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(".hidden.yaml", "");
    hierarchy.admin("README", "");
    hierarchy.admin("01-netcfg.yml", "");
    hierarchy.admin("01-netcfg.yaml", "");

    let files = enumerate_hierarchy(hierarchy.root()).unwrap();

    assert_eq!(file_names(&files), vec!["01-netcfg.yaml"]);
}

#[test]
fn test_enumerate_without_any_tier() {
    let hierarchy = TestHierarchy::new();

    assert!(enumerate_hierarchy(hierarchy.root()).unwrap().is_empty());
}

#[test]
fn test_later_file_overrides_scalar() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin("10-a.yaml", ETH0_MTU_1000);
    hierarchy.admin("20-b.yaml", ETH0_MTU_1500);

    let state = hierarchy.build().unwrap();
    let eth0 = state.get("eth0").unwrap();

    assert_eq!(eth0.common().mtu, Some(1500));
    assert_eq!(
        eth0.origin(),
        Some(hierarchy.path(ConfigTier::Admin, "20-b.yaml").as_path())
    );
}

#[test]
fn test_tier_wins_over_file_name() {
    let hierarchy = TestHierarchy::new();
    hierarchy.write(ConfigTier::Runtime, "01-early.yaml", ETH0_MTU_1000);
    hierarchy.write(ConfigTier::Admin, "99-late.yaml", ETH0_MTU_1500);

    let state = hierarchy.build().unwrap();

    assert_eq!(state.get("eth0").unwrap().common().mtu, Some(1000));
}

#[test]
fn test_merge_keeps_settings_of_both_files() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  version: 2
  ethernets:
    eth0:
      dhcp4: true
      mtu: 1000
"#,
    );
    hierarchy.admin(
        "20-b.yaml",
        r#"---
network:
  ethernets:
    eth0:
      dhcp6: true
"#,
    );

    let state = hierarchy.build().unwrap();
    let common = state.get("eth0").unwrap().common();

    assert_eq!(common.dhcp4, Some(true));
    assert_eq!(common.dhcp6, Some(true));
    assert_eq!(common.mtu, Some(1000));
}

#[test]
fn test_empty_file_is_ignored() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin("00-empty.yaml", "");
    hierarchy.admin("10-a.yaml", ETH0_MTU_1000);

    let state = hierarchy.build().unwrap();

    assert_eq!(state.len(), 1);
}

#[test]
fn test_file_precedence_order() {
    let vendor = FilePrecedence::new(ConfigTier::Vendor, "99-z.yaml");
    let admin_a = FilePrecedence::new(ConfigTier::Admin, "10-a.yaml");
    let admin_b = FilePrecedence::new(ConfigTier::Admin, "20-b.yaml");
    let runtime = FilePrecedence::new(ConfigTier::Runtime, "00-a.yaml");

    assert!(vendor < admin_a);
    assert!(admin_a < admin_b);
    assert!(admin_b < runtime);
}

#[test]
fn test_file_precedence_from_constraint() {
    assert_eq!(
        FilePrecedence::from_constraint("90-edit.yaml"),
        FilePrecedence::new(ConfigTier::Admin, "90-edit.yaml")
    );
    assert_eq!(
        FilePrecedence::from_constraint("/run/netplan/90-edit.yaml"),
        FilePrecedence::new(ConfigTier::Runtime, "90-edit.yaml")
    );
    assert_eq!(
        ConfigTier::of_path(Path::new("/lib/netplan/a.yaml")),
        ConfigTier::Vendor
    );
    assert_eq!(
        ConfigTier::of_path(Path::new("/tmp/a.yaml")),
        ConfigTier::Admin
    );
}
