// SPDX-License-Identifier: Apache-2.0

use crate::{Backend, ErrorKind, NetplanOptions};

#[test]
fn test_options_default() {
    let options = NetplanOptions::from_vars(None, None).unwrap();

    assert_eq!(options, NetplanOptions::default());
    assert!(!options.ignore_errors);
    assert_eq!(options.default_backend, Backend::Networkd);
}

#[test]
fn test_options_from_vars() {
    let options =
        NetplanOptions::from_vars(Some("yes"), Some("NetworkManager"))
            .unwrap();

    assert!(options.ignore_errors);
    assert_eq!(options.default_backend, Backend::NetworkManager);

    let options = NetplanOptions::from_vars(Some("0"), None).unwrap();
    assert!(!options.ignore_errors);
}

#[test]
fn test_options_invalid_vars() {
    let e = NetplanOptions::from_vars(Some("maybe"), None).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::InvalidFormat);
    assert!(e.msg().contains("NETPLAN_IGNORE_ERRORS"));

    let e = NetplanOptions::from_vars(None, Some("ifupdown")).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::InvalidFormat);
    assert!(e.msg().contains("NETPLAN_DEFAULT_BACKEND"));
}

#[test]
fn test_options_from_yaml() {
    let options: NetplanOptions = serde_yaml::from_str(
        r#"---
        ignore-errors: true
        default-backend: NetworkManager
        "#,
    )
    .unwrap();

    assert_eq!(
        options,
        NetplanOptions::new()
            .set_ignore_errors(true)
            .set_default_backend(Backend::NetworkManager)
    );
}
