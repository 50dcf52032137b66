// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use super::TestHierarchy;
use crate::{
    build_state, load_file, load_hierarchy, DefinitionKind, ErrorKind,
    NetplanParser,
};

#[test]
fn test_unknown_key_reports_location() {
    let hierarchy = TestHierarchy::new();
    let path = hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  version: 2
  no-such-key: 1
"#,
    );

    let e = NetplanParser::new().load_file(&path).unwrap_err();

    assert_eq!(e.kind(), ErrorKind::InvalidConfig);
    assert!(e.msg().contains("no-such-key"));
    assert!(e.msg().contains("Error in network definition"));
    let location = e.location().unwrap();
    assert_eq!(location.file, path);
    assert_eq!((location.line, location.column), (4, 3));
}

#[test]
fn test_unknown_definition_key() {
    let hierarchy = TestHierarchy::new();
    let path = hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0:
      dhcp4: true
      dhcp5: true
"#,
    );

    let e = NetplanParser::new().load_file(&path).unwrap_err();

    assert_eq!(e.kind(), ErrorKind::InvalidConfig);
    assert!(e.msg().starts_with(path.to_str().unwrap()));
    assert!(e.msg().contains("unknown field `dhcp5`"));
    let location = e.location().unwrap();
    assert_eq!((location.line, location.column), (6, 7));
}

#[test]
fn test_invalid_value_reports_its_key() {
    let hierarchy = TestHierarchy::new();
    let path = hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0:
      dhcp4: true
      mtu: abc
"#,
    );

    let e = NetplanParser::new().load_file(&path).unwrap_err();

    assert_eq!(e.kind(), ErrorKind::InvalidConfig);
    assert!(e.msg().contains("network.ethernets.eth0.mtu"));
    let location = e.location().unwrap();
    assert_eq!((location.line, location.column), (6, 12));
}

#[test]
fn test_invalid_nested_value_reports_its_key() {
    let hierarchy = TestHierarchy::new();
    let path = hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0:
      dhcp4: true
      nameservers:
        addresses: 53
"#,
    );

    let e = NetplanParser::new().load_file(&path).unwrap_err();

    assert_eq!(e.kind(), ErrorKind::InvalidConfig);
    assert!(e.msg().contains("network.ethernets.eth0.nameservers"));
    assert_eq!(e.location().unwrap().line, 7);
}

#[test]
fn test_invalid_yaml() {
    let hierarchy = TestHierarchy::new();
    let path = hierarchy.admin(
        "10-a.yaml",
        "network:\n  ethernets:\n    eth0: {dhcp4: true\n",
    );

    let e = NetplanParser::new().load_file(&path).unwrap_err();

    assert_eq!(e.kind(), ErrorKind::InvalidYaml);
    assert!(e.msg().contains("10-a.yaml"));
}

#[test]
fn test_unsupported_version() {
    let hierarchy = TestHierarchy::new();
    let path = hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  version: 3
"#,
    );

    let e = NetplanParser::new().load_file(&path).unwrap_err();

    assert!(e.msg().contains("Only version 2 is supported"));
}

#[test]
fn test_invalid_value_type() {
    let hierarchy = TestHierarchy::new();
    let path = hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0:
      dhcp4: maybe
"#,
    );

    let e = NetplanParser::new().load_file(&path).unwrap_err();

    assert_eq!(e.kind(), ErrorKind::InvalidConfig);
    assert!(e.msg().contains("Need to be boolean"));
}

#[test]
fn test_empty_id() {
    let hierarchy = TestHierarchy::new();
    let path = hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    "": {}
"#,
    );

    let e = NetplanParser::new().load_file(&path).unwrap_err();

    assert!(e.msg().contains("Empty ID in ethernet section"));
}

#[test]
fn test_load_file_records_kind_and_origin() {
    let hierarchy = TestHierarchy::new();
    let path = hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  bridges:
    br0: {}
  wifis:
    wlan0:
      access-points:
        "home network":
          password: "s3cr3t-passphrase"
"#,
    );
    let mut parser = NetplanParser::new();

    load_file(&mut parser, &path).unwrap();

    assert_eq!(parser.len(), 2);
    assert!(parser.contains("br0"));
    assert_eq!(parser.kind_of("wlan0"), Some(DefinitionKind::Wifi));
    assert_eq!(parser.kind_of("eth0"), None);

    let state = build_state(parser).unwrap();
    assert_eq!(state.get("br0").unwrap().origin(), Some(path.as_path()));
}

#[test]
fn test_load_reader_with_origin() {
    let mut parser = NetplanParser::new();
    let origin = Path::new("/run/netplan/90-cloud.yaml");

    parser
        .load_reader(
            r#"---
network:
  dummy-devices:
    dm0:
      addresses: [192.0.2.1/32]
"#
            .as_bytes(),
            origin,
        )
        .unwrap();
    let state = build_state(parser).unwrap();

    assert_eq!(state.get("dm0").unwrap().origin(), Some(origin));
}

#[test]
fn test_load_hierarchy_function() {
    let hierarchy = TestHierarchy::new();
    hierarchy.admin(
        "10-a.yaml",
        r#"---
network:
  ethernets:
    eth0: {}
"#,
    );

    let parser = load_hierarchy(hierarchy.root()).unwrap();

    assert!(parser.contains("eth0"));
    assert!(parser.ignored_errors().is_empty());
    assert!(!parser.options().ignore_errors);
}

#[test]
fn test_missing_file() {
    let e = NetplanParser::new()
        .load_file(Path::new("/nonexistent/netplan/10-a.yaml"))
        .unwrap_err();

    assert_eq!(e.kind(), ErrorKind::FileError);
}
