// SPDX-License-Identifier: Apache-2.0

use serde_yaml::{Mapping, Value};

use crate::{Route, RoutingPolicy};

/// Stanza keys whose lists accumulate across sources instead of being
/// replaced.
pub(crate) const ADDITIVE_KEYS: [&str; 3] =
    ["addresses", "routes", "routing-policy"];

/// Merge `overlay` into `base`, `overlay` taking precedence.
///
/// - Mappings are merged recursively.
/// - `null` in `overlay` means "not specified" and keeps `base`.
/// - Anything else, lists included, replaces `base`.
pub(crate) fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => (),
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => {
                        if !overlay_value.is_null() {
                            base_map.insert(key, overlay_value);
                        }
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Merge one definition stanza, top level lists listed in
/// [ADDITIVE_KEYS] are appended with duplicates removed.
pub(crate) fn merge_stanza(base: &mut Mapping, overlay: Mapping) {
    for (key, overlay_value) in overlay {
        let additive = key
            .as_str()
            .map(|k| ADDITIVE_KEYS.contains(&k))
            .unwrap_or_default();
        match (base.get_mut(&key), overlay_value) {
            (_, Value::Null) => (),
            (Some(Value::Sequence(base_seq)), Value::Sequence(overlay_seq))
                if additive =>
            {
                let key = key.as_str().unwrap_or_default();
                for item in overlay_seq {
                    if !base_seq.iter().any(|b| is_same_item(key, b, &item)) {
                        base_seq.push(item);
                    }
                }
            }
            (Some(base_value), overlay_value) => {
                deep_merge(base_value, overlay_value)
            }
            (None, overlay_value) => {
                base.insert(key, overlay_value);
            }
        }
    }
}

fn is_same_item(key: &str, a: &Value, b: &Value) -> bool {
    match key {
        "routes" => match (
            serde_yaml::from_value::<Route>(a.clone()),
            serde_yaml::from_value::<Route>(b.clone()),
        ) {
            (Ok(a), Ok(b)) => a.is_same_route(&b),
            _ => a == b,
        },
        "routing-policy" => match (
            serde_yaml::from_value::<RoutingPolicy>(a.clone()),
            serde_yaml::from_value::<RoutingPolicy>(b.clone()),
        ) {
            (Ok(a), Ok(b)) => a.is_same_rule(&b),
            _ => a == b,
        },
        _ => a == b,
    }
}
