// SPDX-License-Identifier: Apache-2.0

use super::TestHierarchy;
use crate::{Backend, DefinitionKind, ErrorKind, NetplanParser, Renderer};

#[test]
fn test_addresses_are_appended_without_duplicates() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0:
      addresses: [10.0.0.1/24]
"#,
    );
    hierarchy.admin(
        "20-b.yaml",
        r#"---
network:
  ethernets:
    eth0:
      addresses: [10.0.0.2/24, 10.0.0.1/24]
"#,
    );

    let state = hierarchy.build().unwrap();

    assert_eq!(
        state.get("eth0").unwrap().common().address_strings(),
        vec!["10.0.0.1/24", "10.0.0.2/24"]
    );
}

#[test]
fn test_same_route_spelled_differently_is_merged_once() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0:
      addresses: [10.0.0.1/24]
      routes:
        - to: default
          via: 10.0.0.254
"#,
    );
    hierarchy.admin(
        "20-b.yaml",
        r#"---
network:
  ethernets:
    eth0:
      routes:
        - to: 0.0.0.0/0
          via: 10.0.0.254
        - to: 192.168.0.0/16
          via: 10.0.0.253
"#,
    );

    let state = hierarchy.build().unwrap();
    let routes = state.get("eth0").unwrap().common().routes.clone().unwrap();

    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].to.as_deref(), Some("default"));
    assert_eq!(routes[1].to.as_deref(), Some("192.168.0.0/16"));
}

#[test]
fn test_ipv6_default_route_is_merged_once() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0:
      routes:
        - to: default
          via: 2001:db8::1
"#,
    );
    hierarchy.admin(
        "20-b.yaml",
        r#"---
network:
  ethernets:
    eth0:
      routes:
        - to: "::/0"
          via: 2001:db8::1
        - to: 0.0.0.0/0
          via: 10.0.0.1
"#,
    );

    let state = hierarchy.build().unwrap();
    let routes = state.get("eth0").unwrap().common().routes.clone().unwrap();

    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].to.as_deref(), Some("default"));
    assert_eq!(routes[1].via.as_deref(), Some("10.0.0.1"));
}

#[test]
fn test_routes_in_other_table_are_kept() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0:
      routes:
        - to: default
          via: 10.0.0.254
"#,
    );
    hierarchy.admin(
        "20-b.yaml",
        r#"---
network:
  ethernets:
    eth0:
      routes:
        - to: default
          via: 10.0.0.254
          table: 100
"#,
    );

    let state = hierarchy.build().unwrap();

    assert_eq!(
        state.get("eth0").unwrap().common().routes.as_ref().unwrap().len(),
        2
    );
}

#[test]
fn test_nested_mapping_is_merged() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0:
      nameservers:
        search: [example.org]
        addresses: [192.0.2.1]
"#,
    );
    hierarchy.admin(
        "20-b.yaml",
        r#"---
network:
  ethernets:
    eth0:
      nameservers:
        addresses: [192.0.2.2]
"#,
    );

    let state = hierarchy.build().unwrap();
    let nameservers =
        state.get("eth0").unwrap().common().nameservers.clone().unwrap();

    assert_eq!(nameservers.search, Some(vec!["example.org".to_string()]));
    assert_eq!(nameservers.addresses, Some(vec!["192.0.2.2".to_string()]));
}

#[test]
fn test_null_value_keeps_previous_setting() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0:
      mtu: 9000
"#,
    );
    hierarchy.admin(
        "20-b.yaml",
        r#"---
network:
  ethernets:
    eth0:
      mtu: null
      dhcp4: true
"#,
    );

    let state = hierarchy.build().unwrap();
    let common = state.get("eth0").unwrap().common();

    assert_eq!(common.mtu, Some(9000));
    assert_eq!(common.dhcp4, Some(true));
}

#[test]
fn test_empty_stanza_defines_device() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0: {}
    eth1:
"#,
    );

    let parser = hierarchy.parser();

    assert_eq!(parser.len(), 2);
    assert_eq!(parser.kind_of("eth1"), Some(DefinitionKind::Ethernet));
}

#[test]
fn test_kind_change_is_rejected() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0: {}
"#,
    );
    hierarchy.admin(
        "20-b.yaml",
        r#"---
network:
  bonds:
    eth0: {}
"#,
    );

    let e = NetplanParser::new()
        .load_hierarchy(hierarchy.root())
        .unwrap_err();

    assert_eq!(e.kind(), ErrorKind::ConfigValidation);
    assert!(e.msg().contains("20-b.yaml"));
    assert!(e.msg().contains("Updated definition 'eth0' changes device type"));
}

#[test]
fn test_duplicate_id_in_one_file() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0: {}
  dummy-devices:
    eth0: {}
"#,
    );

    let e = NetplanParser::new()
        .load_hierarchy(hierarchy.root())
        .unwrap_err();

    assert_eq!(e.kind(), ErrorKind::ConfigValidation);
    assert!(e.msg().contains("Duplicate net definition ID 'eth0'"));
}

#[test]
fn test_section_renderer_applies_to_its_definitions() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  renderer: networkd
  ethernets:
    renderer: NetworkManager
    eth0:
      dhcp4: true
  dummy-devices:
    dm0: {}
"#,
    );

    let state = hierarchy.build().unwrap();
    let eth0 = state.get("eth0").unwrap();

    assert_eq!(state.global_renderer(), Some(Renderer::Networkd));
    assert_eq!(eth0.backend(), Backend::NetworkManager);
    assert_eq!(eth0.common().renderer, Some(Renderer::NetworkManager));
    assert_eq!(state.get("dm0").unwrap().backend(), Backend::Networkd);
    assert_eq!(state.get("dm0").unwrap().common().renderer, None);
}

#[test]
fn test_definition_renderer_wins_over_section_renderer() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    renderer: NetworkManager
    eth0:
      renderer: networkd
"#,
    );

    let state = hierarchy.build().unwrap();

    assert_eq!(state.get("eth0").unwrap().backend(), Backend::Networkd);
}

#[test]
fn test_global_renderer_of_later_file_wins() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  renderer: NetworkManager
  ethernets:
    eth0: {}
"#,
    );
    hierarchy.admin(
        "20-b.yaml",
        r#"---
network:
  renderer: networkd
"#,
    );

    let state = hierarchy.build().unwrap();

    assert_eq!(state.global_renderer(), Some(Renderer::Networkd));
    assert_eq!(state.get("eth0").unwrap().backend(), Backend::Networkd);
}

#[test]
fn test_openvswitch_global_settings_are_merged() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  openvswitch:
    protocols: [OpenFlow13]
"#,
    );
    hierarchy.admin(
        "20-b.yaml",
        r#"---
network:
  openvswitch:
    other-config:
      disable-in-band: "true"
"#,
    );

    let state = hierarchy.build().unwrap();
    let ovs = state.ovs_settings().unwrap();

    assert_eq!(ovs.protocols, Some(vec!["OpenFlow13".to_string()]));
    assert_eq!(
        ovs.other_config
            .as_ref()
            .and_then(|c| c.get("disable-in-band"))
            .map(String::as_str),
        Some("true")
    );
}
