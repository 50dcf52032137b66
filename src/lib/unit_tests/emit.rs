// SPDX-License-Identifier: Apache-2.0

use serde_yaml::Value;

use super::{state_of, TestHierarchy};
use crate::{
    build_state, dump, dump_to_string, update_hierarchy, write_filtered,
    Backend, ConfigTier, DefinitionKind, LinkKind, NetplanParser,
    NetplanState,
};

const FULL_CONFIG: &str = r#"---
network:
  version: 2
  renderer: networkd
  ethernets:
    eth0:
      dhcp4: true
      addresses: [10.0.0.5/24]
      routes:
        - to: default
          via: 10.0.0.1
      nameservers:
        addresses: [10.0.0.1]
        search: [lan]
    eth1: {}
  bonds:
    bond0:
      interfaces: [eth1]
      parameters:
        mode: active-backup
        mii-monitor-interval: 100ms
  vlans:
    vlan20:
      id: 20
      link: eth0
  vrfs:
    vrf0:
      table: 500
      interfaces: [vlan20]
"#;

const OVS_CONFIG: &str = r#"---
network:
  openvswitch:
    protocols: [OpenFlow13]
    ports:
      - [patch0-1, patch1-0]
  bridges:
    ovs0:
      interfaces: [patch0-1]
    ovs1:
      interfaces: [patch1-0]
"#;

fn network_of(yaml: &str) -> Value {
    let doc: Value = serde_yaml::from_str(yaml).unwrap();
    doc["network"].clone()
}

fn assert_same_definitions(a: &NetplanState, b: &NetplanState) {
    assert_eq!(a.len(), b.len());
    for def in a {
        let other = b.get(def.id()).unwrap();
        assert_eq!(def.settings(), other.settings(), "{}", def.id());
        assert_eq!(def.backend(), other.backend(), "{}", def.id());
    }
}

#[test]
fn test_dump_and_reload() {
    let state = state_of(FULL_CONFIG).unwrap();
    let dumped = dump_to_string(&state).unwrap();

    let reloaded = state_of(&dumped).unwrap();

    assert_same_definitions(&state, &reloaded);
    assert_eq!(dump_to_string(&reloaded).unwrap(), dumped);
}

#[test]
fn test_dump_layout() {
    let state = state_of(FULL_CONFIG).unwrap();
    let network = network_of(&dump_to_string(&state).unwrap());

    assert_eq!(network["version"], Value::from(2));
    assert_eq!(network["renderer"], Value::from("networkd"));
    assert_eq!(
        network["ethernets"]["eth0"]["addresses"][0],
        Value::from("10.0.0.5/24")
    );
    assert_eq!(network["vrfs"]["vrf0"]["table"], Value::from(500));
    let sections: Vec<&str> = network
        .as_mapping()
        .unwrap()
        .keys()
        .filter_map(|k| k.as_str())
        .collect();
    assert_eq!(
        sections,
        vec!["version", "renderer", "ethernets", "bonds", "vlans", "vrfs"]
    );
}

#[test]
fn test_dump_to_writer() {
    let state = state_of(FULL_CONFIG).unwrap();
    let mut buffer: Vec<u8> = Vec::new();

    dump(&state, &mut buffer).unwrap();

    assert_eq!(
        String::from_utf8(buffer).unwrap(),
        dump_to_string(&state).unwrap()
    );
}

#[test]
fn test_dump_keeps_section_renderer() {
    let state = state_of(
        r#"---
network:
  ethernets:
    renderer: NetworkManager
    eth0:
      dhcp4: true
"#,
    )
    .unwrap();
    let dumped = dump_to_string(&state).unwrap();
    let network = network_of(&dumped);

    assert_eq!(
        network["ethernets"]["eth0"]["renderer"],
        Value::from("NetworkManager")
    );
    let reloaded = state_of(&dumped).unwrap();
    assert_eq!(
        reloaded.get("eth0").unwrap().backend(),
        Backend::NetworkManager
    );
}

#[test]
fn test_ovs_ports_dumped_once() {
    let state = state_of(OVS_CONFIG).unwrap();
    let patch = state.get("patch0-1").unwrap();

    assert_eq!(patch.kind(), DefinitionKind::Port);
    assert_eq!(
        state.link(patch, LinkKind::Peer).map(|d| d.id()),
        Some("patch1-0")
    );
    assert_eq!(state.get("ovs0").unwrap().backend(), Backend::Ovs);

    let dumped = dump_to_string(&state).unwrap();
    let network = network_of(&dumped);
    let ports = network["openvswitch"]["ports"].as_sequence().unwrap();
    assert_eq!(ports.len(), 1);
    assert_eq!(ports[0][0], Value::from("patch0-1"));
    assert_eq!(ports[0][1], Value::from("patch1-0"));
    assert_eq!(
        network["openvswitch"]["protocols"][0],
        Value::from("OpenFlow13")
    );

    let reloaded = state_of(&dumped).unwrap();
    assert_same_definitions(&state, &reloaded);
}

#[test]
fn test_write_filtered() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  renderer: NetworkManager
  ethernets:
    eth0:
      dhcp4: true
"#,
    );
    hierarchy.admin(
        "20-b.yaml",
        r#"---
network:
  ethernets:
    eth1:
      dhcp6: true
"#,
    );
    let state = hierarchy.build().unwrap();
    let output = TestHierarchy::new();

    write_filtered(&state, "20-b.yaml", output.root()).unwrap();

    let path = output.path(ConfigTier::Admin, "20-b.yaml");
    let network = network_of(&std::fs::read_to_string(&path).unwrap());
    assert!(network["ethernets"].get("eth1").is_some());
    assert!(network["ethernets"].get("eth0").is_none());
    assert!(network.get("renderer").is_none());
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn test_update_hierarchy() {
    let hierarchy = TestHierarchy::new();
    let a = hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  renderer: networkd
  ethernets:
    eth0:
      mtu: 1500
"#,
    );
    let b = hierarchy.write(
        ConfigTier::Runtime,
        "20-b.yaml",
        r#"---
network:
  ethernets:
    eth1:
      dhcp4: yes
    eth0:
      dhcp4: true
"#,
    );
    let state = hierarchy.build().unwrap();

    update_hierarchy(&state, "90-default.yaml", hierarchy.root()).unwrap();

    let network_a = network_of(&std::fs::read_to_string(&a).unwrap());
    let network_b = network_of(&std::fs::read_to_string(&b).unwrap());
    assert_eq!(network_a["renderer"], Value::from("networkd"));
    assert!(network_a.get("ethernets").is_none());
    assert_eq!(network_b["ethernets"]["eth0"]["mtu"], Value::from(1500));
    assert_eq!(network_b["ethernets"]["eth1"]["dhcp4"], Value::from(true));
    assert!(!hierarchy
        .path(ConfigTier::Admin, "90-default.yaml")
        .exists());

    let rebuilt = hierarchy.build().unwrap();
    assert_same_definitions(&state, &rebuilt);
}

#[test]
fn test_update_hierarchy_drops_deleted_settings() {
    let hierarchy = TestHierarchy::new();
    let a = hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0:
      mtu: 1000
"#,
    );
    let b = hierarchy.admin(
        "20-b.yaml",
        r#"---
network:
  ethernets:
    eth0:
      dhcp4: true
"#,
    );
    let mut parser = NetplanParser::new();
    parser
        .load_deletions(
            r#"---
network:
  ethernets:
    eth0:
      mtu: null
"#
            .as_bytes(),
        )
        .unwrap();
    parser.load_hierarchy(hierarchy.root()).unwrap();
    let state = build_state(parser).unwrap();
    assert_eq!(state.sources(), [a.clone(), b.clone()]);
    assert_eq!(state.origins(), vec![b.as_path()]);

    update_hierarchy(&state, "90-default.yaml", hierarchy.root()).unwrap();

    assert!(!a.exists());
    let rebuilt = hierarchy.build().unwrap();
    let eth0 = rebuilt.get("eth0").unwrap();
    assert_eq!(eth0.common().mtu, None);
    assert_eq!(eth0.common().dhcp4, Some(true));
    assert_same_definitions(&state, &rebuilt);
}

#[test]
fn test_update_hierarchy_moves_hinted_definition() {
    let hierarchy = TestHierarchy::new();
    let a = hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0:
      dhcp4: true
    eth1:
      mtu: 1000
"#,
    );
    let edit = hierarchy.admin(
        "90-edit.yaml",
        r#"---
network:
  ethernets:
    eth1:
      mtu: 1400
"#,
    );
    let mut parser = NetplanParser::new();
    parser
        .load_origin_hint(
            r#"---
network:
  ethernets:
    eth1:
      mtu: 1400
"#
            .as_bytes(),
            "90-edit.yaml",
        )
        .unwrap();
    parser.load_hierarchy(hierarchy.root()).unwrap();
    let state = build_state(parser).unwrap();
    assert_eq!(state.get("eth1").unwrap().origin(), Some(edit.as_path()));

    update_hierarchy(&state, "90-default.yaml", hierarchy.root()).unwrap();

    let network_a = network_of(&std::fs::read_to_string(&a).unwrap());
    assert!(network_a["ethernets"].get("eth0").is_some());
    assert!(network_a["ethernets"].get("eth1").is_none());
    let rebuilt = hierarchy.build().unwrap();
    assert_eq!(rebuilt.get("eth1").unwrap().common().mtu, Some(1400));
    assert_eq!(
        rebuilt.get("eth1").unwrap().origin(),
        Some(edit.as_path())
    );
    assert_same_definitions(&state, &rebuilt);
}
