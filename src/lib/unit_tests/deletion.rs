// SPDX-License-Identifier: Apache-2.0

use super::TestHierarchy;
use crate::{
    build_state, load_origin_hint, ConfigTier, ErrorKind, NetplanParser,
    Renderer,
};

const DELETE_ETH0_MTU: &str = r#"---
network:
  ethernets:
    eth0:
      mtu: null
"#;

fn eth0_mtu(mtu: u32) -> String {
    format!(
        r#"---
network:
  ethernets:
    eth0:
      dhcp4: true
      mtu: {mtu}
"#
    )
}

#[test]
fn test_deletion_applies_to_every_file() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin("10-a.yaml", &eth0_mtu(1000));
    hierarchy.write(ConfigTier::Runtime, "20-b.yaml", &eth0_mtu(1500));

    let mut parser = NetplanParser::new();
    parser.load_deletions(DELETE_ETH0_MTU.as_bytes()).unwrap();
    parser.load_hierarchy(hierarchy.root()).unwrap();
    let state = build_state(parser).unwrap();
    let common = state.get("eth0").unwrap().common();

    assert_eq!(common.mtu, None);
    assert_eq!(common.dhcp4, Some(true));
}

#[test]
fn test_deletion_with_constraint() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin("10-a.yaml", &eth0_mtu(1000));
    hierarchy.admin("20-b.yaml", &eth0_mtu(1200));
    hierarchy.admin(
        "95-c.yaml",
        r#"---
network:
  ethernets:
    eth1:
      mtu: 1400
"#,
    );

    let mut parser = NetplanParser::new();
    parser
        .load_deletions_with_constraint(
            DELETE_ETH0_MTU.as_bytes(),
            "90-edit.yaml",
        )
        .unwrap();
    parser.load_hierarchy(hierarchy.root()).unwrap();
    let state = build_state(parser).unwrap();

    assert_eq!(state.get("eth0").unwrap().common().mtu, None);
    assert_eq!(state.get("eth1").unwrap().common().mtu, Some(1400));
}

#[test]
fn test_deletion_constraint_spares_higher_precedence() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin("10-a.yaml", &eth0_mtu(1000));
    hierarchy.admin("95-c.yaml", &eth0_mtu(1400));

    let mut parser = NetplanParser::new();
    parser
        .load_deletions_with_constraint(
            DELETE_ETH0_MTU.as_bytes(),
            "90-edit.yaml",
        )
        .unwrap();
    parser.load_hierarchy(hierarchy.root()).unwrap();
    let state = build_state(parser).unwrap();

    assert_eq!(state.get("eth0").unwrap().common().mtu, Some(1400));
}

#[test]
fn test_deleted_definition() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin("10-a.yaml", &eth0_mtu(1000));

    let mut parser = NetplanParser::new();
    parser
        .load_deletions(
            r#"---
network:
  ethernets:
    eth0: null
"#
            .as_bytes(),
        )
        .unwrap();
    parser.load_hierarchy(hierarchy.root()).unwrap();

    assert!(!parser.contains("eth0"));
}

#[test]
fn test_origin_hint_contradicting_deletion() {
    let mut parser = NetplanParser::new();
    parser.load_deletions(DELETE_ETH0_MTU.as_bytes()).unwrap();

    let e = load_origin_hint(
        &mut parser,
        eth0_mtu(9000).as_bytes(),
        "90-edit.yaml",
    )
    .unwrap_err();

    assert_eq!(e.kind(), ErrorKind::InvalidConfig);
    assert!(e
        .msg()
        .contains("'network.ethernets.eth0.mtu' is deleted but also set"));
}

#[test]
fn test_origin_hint_owns_definition_and_globals() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  renderer: NetworkManager
  ethernets:
    eth0:
      mtu: 1000
    eth1:
      mtu: 1000
"#,
    );
    hierarchy.admin(
        "90-edit.yaml",
        r#"---
network:
  renderer: networkd
  ethernets:
    eth0:
      mtu: 1500
"#,
    );
    hierarchy.admin(
        "95-late.yaml",
        r#"---
network:
  renderer: NetworkManager
  ethernets:
    eth0:
      mtu: 9000
"#,
    );

    let mut parser = NetplanParser::new();
    parser
        .load_origin_hint(
            r#"---
network:
  renderer: networkd
  ethernets:
    eth0:
      mtu: 1500
"#
            .as_bytes(),
            "90-edit.yaml",
        )
        .unwrap();
    parser.load_hierarchy(hierarchy.root()).unwrap();
    let state = build_state(parser).unwrap();
    let edit = hierarchy.path(ConfigTier::Admin, "90-edit.yaml");
    let base = hierarchy.path(ConfigTier::Admin, "10-a.yaml");

    assert_eq!(state.global_renderer(), Some(Renderer::Networkd));
    assert_eq!(state.get("eth0").unwrap().common().mtu, Some(1500));
    assert_eq!(state.get("eth0").unwrap().origin(), Some(edit.as_path()));
    assert_eq!(state.get("eth1").unwrap().origin(), Some(base.as_path()));
}
