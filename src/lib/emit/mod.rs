// SPDX-License-Identifier: Apache-2.0

mod document;
mod writer;

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use self::{
    document::{has_settings, state_to_yaml},
    writer::{remove_stale, write_atomic},
};
use crate::{ConfigTier, ErrorKind, NetplanError, NetplanState};

fn emitter_error(e: impl std::fmt::Display) -> NetplanError {
    NetplanError::new(
        ErrorKind::EmitterFailure,
        format!("Failed to emit YAML: {e}"),
    )
}

fn render<F>(state: &NetplanState, filter: F) -> Result<String, NetplanError>
where
    F: Fn(Option<&Path>) -> bool,
{
    let document = state_to_yaml(state, filter)?;
    serde_yaml::to_string(&document).map_err(emitter_error)
}

/// YAML document holding the whole state, regardless of origin.
pub fn dump_to_string(state: &NetplanState) -> Result<String, NetplanError> {
    render(state, |_| true)
}

/// Write the YAML document of the whole state to `writer`.
pub fn dump<W: Write>(
    state: &NetplanState,
    mut writer: W,
) -> Result<(), NetplanError> {
    let content = dump_to_string(state)?;
    writer
        .write_all(content.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(NetplanError::from)
}

fn admin_path(rootdir: &Path, filename: &str) -> PathBuf {
    let name = Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| filename.to_string());
    rootdir.join(ConfigTier::Admin.dir()).join(name)
}

fn same_file_name(path: &Path, name: &Path) -> bool {
    path.file_name().is_some() && path.file_name() == name.file_name()
}

/// Write to `<rootdir>/etc/netplan/<filename>` the settings whose origin
/// has the file name of `filename`, plus the ones without origin.
pub fn write_filtered(
    state: &NetplanState,
    filename: &str,
    rootdir: &Path,
) -> Result<(), NetplanError> {
    let target = Path::new(filename);
    let content = render(state, |origin| match origin {
        Some(origin) => same_file_name(origin, target),
        None => true,
    })?;
    write_atomic(&admin_path(rootdir, filename), &content)
}

/// Rewrite every file merged into the state with the settings it still
/// owns, files left without any are removed. Settings without origin go to
/// `<rootdir>/etc/netplan/<default_filename>`.
pub fn update_hierarchy(
    state: &NetplanState,
    default_filename: &str,
    rootdir: &Path,
) -> Result<(), NetplanError> {
    let default_path = admin_path(rootdir, default_filename);
    let mut targets: Vec<PathBuf> = state.sources().to_vec();
    for origin in state.origins() {
        if !targets.iter().any(|t| t == origin) {
            targets.push(origin.to_path_buf());
        }
    }
    if state.iter().any(|d| d.origin().is_none())
        && !targets.contains(&default_path)
    {
        targets.push(default_path.clone());
    }
    for target in targets {
        let document = state_to_yaml(state, |origin| match origin {
            Some(origin) => origin == target,
            None => target == default_path,
        })?;
        if has_settings(&document) {
            let content =
                serde_yaml::to_string(&document).map_err(emitter_error)?;
            write_atomic(&target, &content)?;
        } else {
            remove_stale(&target)?;
        }
    }
    Ok(())
}
