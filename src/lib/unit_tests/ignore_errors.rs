// SPDX-License-Identifier: Apache-2.0

use super::TestHierarchy;
use crate::{
    build_state, DefinitionKind, ErrorKind, NetplanOptions, NetplanParser,
    NetplanState,
};

const GOOD_CONFIG: &str = r#"---
network:
  ethernets:
    eth0:
      dhcp4: true
"#;

fn ignoring() -> NetplanOptions {
    NetplanOptions::new().set_ignore_errors(true)
}

fn build_ignoring(hierarchy: &TestHierarchy) -> NetplanState {
    build_state(hierarchy.parser_with(ignoring())).unwrap()
}

#[test]
fn test_invalid_yaml_fails_by_default() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin("10-bad.yaml", "network: [\n");
    hierarchy.admin("20-good.yaml", GOOD_CONFIG);

    let e = NetplanParser::new()
        .load_hierarchy(hierarchy.root())
        .unwrap_err();

    assert_eq!(e.kind(), ErrorKind::InvalidYaml);
    assert!(e.msg().contains("10-bad.yaml"));
}

#[test]
fn test_invalid_yaml_file_is_skipped() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin("10-bad.yaml", "network: [\n");
    hierarchy.admin("20-good.yaml", GOOD_CONFIG);

    let state = build_ignoring(&hierarchy);

    assert_eq!(state.len(), 1);
    assert!(state.get("eth0").is_some());
    assert_eq!(state.ignored_errors().len(), 1);
    assert_eq!(state.ignored_errors()[0].kind(), ErrorKind::InvalidYaml);
}

#[test]
fn test_stanza_failing_schema_is_dropped() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0:
      dhcp4: true
    eth1:
      no-such-key: 1
"#,
    );

    let state = build_ignoring(&hierarchy);

    assert!(state.get("eth0").is_some());
    assert!(state.get("eth1").is_none());
    assert!(state
        .ignored_errors()
        .iter()
        .any(|e| e.msg().contains("eth1")));
}

#[test]
fn test_unknown_top_level_key_drops_file() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth1: {}
  no-such-section: {}
"#,
    );
    hierarchy.admin("20-b.yaml", GOOD_CONFIG);

    let state = build_ignoring(&hierarchy);

    assert!(state.get("eth0").is_some());
    assert!(state.get("eth1").is_none());
    assert!(!state.ignored_errors().is_empty());
}

#[test]
fn test_invalid_definition_and_dependents_are_dropped() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0: {}
  bridges:
    br0:
      interfaces: [eth9]
  vlans:
    vlan10:
      id: 10
      link: br0
"#,
    );

    let state = build_ignoring(&hierarchy);

    assert_eq!(state.len(), 1);
    assert!(state.get("eth0").is_some());
    let ignored = state.ignored_errors();
    assert_eq!(ignored.len(), 2);
    assert!(ignored[0].msg().contains("br0: interface 'eth9'"));
    assert!(ignored[1].msg().contains("vlan10: interface 'br0'"));
}

#[test]
fn test_invalid_global_renderer_is_ignored() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  renderer: sriov
  ethernets:
    eth0: {}
"#,
    );

    let e = hierarchy.build().unwrap_err();
    assert!(e.msg().contains("'renderer: sriov' is not supported"));

    let state = build_ignoring(&hierarchy);
    assert_eq!(state.global_renderer(), None);
    assert!(state.get("eth0").is_some());
    assert_eq!(state.ignored_errors().len(), 1);
}

#[test]
fn test_failing_definitions_keep_going_until_valid() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0:
      ipv6-mtu: 100
    eth1:
      macaddress: "zz:zz"
    eth2:
      dhcp4: true
"#,
    );

    let state = build_ignoring(&hierarchy);

    assert_eq!(state.len(), 1);
    assert!(state.get("eth2").is_some());
    assert_eq!(state.ignored_errors().len(), 2);
}

#[test]
fn test_kind_change_skips_only_its_stanza() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0: {}
    eth1: {}
"#,
    );
    hierarchy.admin(
        "20-b.yaml",
        r#"---
network:
  bridges:
    eth0: {}
  ethernets:
    eth2: {}
"#,
    );

    let e = NetplanParser::new()
        .load_hierarchy(hierarchy.root())
        .unwrap_err();
    assert!(e.msg().contains("changes device type"));

    let parser = hierarchy.parser_with(ignoring());
    assert_eq!(parser.kind_of("eth0"), Some(DefinitionKind::Ethernet));
    assert!(parser.contains("eth2"));
    assert_eq!(parser.ignored_errors().len(), 1);
    assert_eq!(
        parser.ignored_errors()[0].kind(),
        ErrorKind::ConfigValidation
    );

    let state = build_state(parser).unwrap();
    assert_eq!(state.len(), 3);
}

#[test]
fn test_duplicate_id_keeps_first_stanza() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0:
      mtu: 1400
  dummy-devices:
    eth0: {}
    dm0: {}
"#,
    );

    let state = build_ignoring(&hierarchy);

    assert_eq!(state.get("eth0").unwrap().kind(), DefinitionKind::Ethernet);
    assert_eq!(state.get("eth0").unwrap().common().mtu, Some(1400));
    assert!(state.get("dm0").is_some());
    assert!(state.ignored_errors()[0]
        .msg()
        .contains("Duplicate net definition ID 'eth0'"));
}
