// SPDX-License-Identifier: Apache-2.0

use super::{assert_build_error, state_of, TestHierarchy};
use crate::{
    build_state, Backend, DefinitionKind, LinkKind, NetplanOptions,
    NetplanParser, Renderer,
};

#[test]
fn test_empty_state() {
    let hierarchy = TestHierarchy::new();

    let state = hierarchy.build().unwrap();

    assert!(state.is_empty());
    assert!(state.origins().is_empty());
    assert_eq!(state.global_renderer(), None);
    assert_eq!(state.default_backend(), Backend::Networkd);
}

#[test]
fn test_networkd_output_filenames() {
    let state = state_of(
        r#"---
network:
  ethernets:
    eth0:
      match:
        name: "en*"
  bridges:
    br0:
      interfaces: [eth0]
"#,
    )
    .unwrap();

    assert_eq!(
        state.get("eth0").unwrap().output_filenames(),
        vec!["10-netplan-eth0.network", "10-netplan-eth0.link"]
    );
    assert_eq!(
        state.get("br0").unwrap().output_filenames(),
        vec!["10-netplan-br0.network", "10-netplan-br0.netdev"]
    );
    assert!(state.get("br0").unwrap().is_virtual());
    assert!(!state.get("eth0").unwrap().is_virtual());
}

#[test]
fn test_network_manager_output_filenames() {
    let state = state_of(
        r#"---
network:
  renderer: NetworkManager
  ethernets:
    eth0: {}
  wifis:
    wlan0:
      access-points:
        "my wifi":
          password: "correct horse"
        guest: {}
"#,
    )
    .unwrap();

    assert_eq!(
        state.get("eth0").unwrap().output_filenames(),
        vec!["netplan-eth0.nmconnection"]
    );
    assert_eq!(
        state.get("wlan0").unwrap().output_filenames(),
        vec![
            "netplan-wlan0-guest.nmconnection",
            "netplan-wlan0-my%20wifi.nmconnection"
        ]
    );
}

#[test]
fn test_members_of_bond() {
    let state = state_of(
        r#"---
network:
  ethernets:
    eth0: {}
    eth1: {}
    eth2: {}
  bonds:
    bond0:
      interfaces: [eth0, eth1]
"#,
    )
    .unwrap();
    let bond = state.get("bond0").unwrap();

    let members: Vec<&str> = state.members(bond).map(|d| d.id()).collect();

    assert_eq!(members, vec!["eth0", "eth1"]);
    assert_eq!(
        state
            .link(state.get("eth1").unwrap(), LinkKind::Bond)
            .map(|d| d.id()),
        Some("bond0")
    );
    assert!(state.link(state.get("eth2").unwrap(), LinkKind::Bond).is_none());
}

#[test]
fn test_default_backend_option() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0: {}
    eth1:
      renderer: networkd
"#,
    );

    let state = build_state(hierarchy.parser_with(
        NetplanOptions::new().set_default_backend(Backend::NetworkManager),
    ))
    .unwrap();

    assert_eq!(state.default_backend(), Backend::NetworkManager);
    assert_eq!(
        state.get("eth0").unwrap().backend(),
        Backend::NetworkManager
    );
    assert_eq!(state.get("eth1").unwrap().backend(), Backend::Networkd);
}

#[test]
fn test_openvswitch_backend() {
    let state = state_of(
        r#"---
network:
  ethernets:
    eth0: {}
    eth1: {}
  bonds:
    bond0:
      interfaces: [eth0, eth1]
  bridges:
    ovs0:
      interfaces: [bond0]
      openvswitch:
        fail-mode: secure
    br0: {}
"#,
    )
    .unwrap();

    assert_eq!(state.get("ovs0").unwrap().backend(), Backend::Ovs);
    assert_eq!(state.get("bond0").unwrap().backend(), Backend::Ovs);
    assert_eq!(state.get("eth0").unwrap().backend(), Backend::Networkd);
    assert_eq!(state.get("br0").unwrap().backend(), Backend::Networkd);
    assert_eq!(
        state.get("ovs0").unwrap().output_filenames(),
        vec!["netplan-ovs-ovs0.service"]
    );
}

#[test]
fn test_openvswitch_rejects_network_manager() {
    assert_build_error(
        r#"---
network:
  bridges:
    ovs0:
      renderer: NetworkManager
      openvswitch: {}
"#,
        &["renderer 'NetworkManager' cannot be used for an Open vSwitch"],
    );
}

#[test]
fn test_nm_device() {
    let state = state_of(
        r#"---
network:
  nm-devices:
    nm0:
      networkmanager:
        uuid: "3b5c3bd2-0a6d-4a1b-9a5f-2c1c3f1f5a11"
        passthrough:
          connection.type: vpn
"#,
    )
    .unwrap();
    let nm0 = state.get("nm0").unwrap();

    assert_eq!(nm0.kind(), DefinitionKind::NmDevice);
    assert_eq!(nm0.backend(), Backend::NetworkManager);
}

#[test]
fn test_nm_device_needs_network_manager() {
    assert_build_error(
        r#"---
network:
  nm-devices:
    renderer: networkd
    nm0:
      networkmanager:
        name: vpn
"#,
        &["nm-devices need the NetworkManager renderer, not 'networkd'"],
    );
    assert_build_error(
        r#"---
network:
  nm-devices:
    nm0: {}
"#,
        &["needs to provide a 'networkmanager' mapping"],
    );
}

#[test]
fn test_sriov_renderer() {
    let state = state_of(
        r#"---
network:
  ethernets:
    eno1:
      renderer: sriov
      virtual-function-count: 4
"#,
    )
    .unwrap();
    let eno1 = state.get("eno1").unwrap();

    assert_eq!(eno1.backend(), Backend::Sriov);
    assert!(eno1.output_filenames().is_empty());

    assert_build_error(
        r#"---
network:
  ethernets:
    eth0:
      renderer: sriov
"#,
        &["'renderer: sriov' is only supported on SR-IOV ethernets"],
    );
}

#[test]
fn test_virtual_function_follows_physical_function() {
    let state = state_of(
        r#"---
network:
  renderer: NetworkManager
  ethernets:
    enp3s0:
      renderer: networkd
      virtual-function-count: 2
    vf0:
      link: enp3s0
"#,
    )
    .unwrap();

    assert_eq!(state.get("enp3s0").unwrap().backend(), Backend::Networkd);
    assert_eq!(state.get("vf0").unwrap().backend(), Backend::Networkd);
}

#[test]
fn test_virtual_function_rejects_other_renderer() {
    assert_build_error(
        r#"---
network:
  ethernets:
    enp3s0: {}
    vf0:
      link: enp3s0
      renderer: NetworkManager
"#,
        &[
            "vf0: renderer 'NetworkManager' of an SR-IOV virtual function",
            "physical function 'enp3s0'",
        ],
    );
}

#[test]
fn test_sriov_renderer_on_vlan_of_virtual_function() {
    let state = state_of(
        r#"---
network:
  ethernets:
    enp3s0:
      virtual-function-count: 1
    vf0:
      link: enp3s0
  vlans:
    v1:
      id: 1
      link: vf0
      renderer: sriov
"#,
    )
    .unwrap();

    assert_eq!(state.get("v1").unwrap().backend(), Backend::Sriov);
    assert_eq!(state.get("vf0").unwrap().backend(), Backend::Networkd);

    assert_build_error(
        r#"---
network:
  ethernets:
    eth0: {}
  vlans:
    v1:
      id: 1
      link: eth0
      renderer: sriov
"#,
        &["v1: 'renderer: sriov' is only supported on SR-IOV"],
    );
}

#[test]
fn test_origins() {
    let hierarchy = TestHierarchy::new();
    let a = hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  renderer: networkd
"#,
    );
    let b = hierarchy.admin(
        "20-b.yaml",
        r#"---
network:
  ethernets:
    eth0: {}
    eth1: {}
"#,
    );

    let state = hierarchy.build().unwrap();

    assert_eq!(state.origins(), vec![a.as_path(), b.as_path()]);
    assert_eq!(state.global_renderer(), Some(Renderer::Networkd));
}

#[test]
fn test_state_iteration_keeps_merge_order() {
    let mut parser = NetplanParser::new();
    parser
        .load_reader(
            r#"---
network:
  dummy-devices:
    dm2: {}
    dm0: {}
  ethernets:
    eth0: {}
"#
            .as_bytes(),
            std::path::Path::new("/etc/netplan/a.yaml"),
        )
        .unwrap();

    let state = build_state(parser).unwrap();
    let ids: Vec<&str> = state.iter().map(|d| d.id()).collect();

    assert_eq!(ids, vec!["dm2", "dm0", "eth0"]);
    assert_eq!(state.len(), 3);
}
