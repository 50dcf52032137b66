// SPDX-License-Identifier: Apache-2.0

use serde_yaml::{Mapping, Value};

/// Separator of the segments of a settings path, e.g.
/// `network\tethernets\teth0\tdhcp4`. Tab never shows up in a YAML key
/// written by hand.
pub(crate) const PATH_SEPARATOR: char = '\t';

pub(crate) fn key_to_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Human readable form of a settings path.
pub(crate) fn display_path(path: &str) -> String {
    path.replace(PATH_SEPARATOR, ".")
}

/// Paths of every mapping entry holding `null`.
pub(crate) fn null_paths(value: &Value) -> Vec<String> {
    let mut ret = Vec::new();
    collect_null_paths(value, &mut Vec::new(), &mut ret);
    ret
}

fn collect_null_paths(
    value: &Value,
    prefix: &mut Vec<String>,
    ret: &mut Vec<String>,
) {
    let Some(map) = value.as_mapping() else {
        return;
    };
    for (key, child) in map {
        let Some(key) = key_to_string(key) else {
            continue;
        };
        prefix.push(key);
        if child.is_null() {
            ret.push(prefix.join(&PATH_SEPARATOR.to_string()));
        } else {
            collect_null_paths(child, prefix, ret);
        }
        prefix.pop();
    }
}

fn find_key(map: &Mapping, segment: &str) -> Option<Value> {
    map.keys()
        .find(|k| key_to_string(k).as_deref() == Some(segment))
        .cloned()
}

/// Value stored at `path`, `None` when absent.
pub(crate) fn get_path<'a>(
    value: &'a Value,
    path: &str,
) -> Option<&'a Value> {
    let mut cur = value;
    for segment in path.split(PATH_SEPARATOR) {
        let map = cur.as_mapping()?;
        let key = find_key(map, segment)?;
        cur = map.get(&key)?;
    }
    Some(cur)
}

/// Remove the entry at `path`, returns whether something was removed.
pub(crate) fn remove_path(value: &mut Value, path: &str) -> bool {
    let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };
    let mut cur = value;
    for segment in parents {
        let Some(map) = cur.as_mapping_mut() else {
            return false;
        };
        let Some(key) = find_key(map, segment) else {
            return false;
        };
        let Some(next) = map.get_mut(&key) else {
            return false;
        };
        cur = next;
    }
    let Some(map) = cur.as_mapping_mut() else {
        return false;
    };
    match find_key(map, last) {
        Some(key) => map.remove(&key).is_some(),
        None => false,
    }
}
