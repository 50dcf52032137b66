// SPDX-License-Identifier: Apache-2.0

use super::{
    backend::assign_backends,
    candidate::{config_error, index_of, Candidate, DefFailure},
    net_state::GlobalSetting,
    resolve::{assign_links, check_cycles, check_references},
    validate::{check_definitions, check_sriov},
};
use crate::{
    netdef::DefinitionContext,
    parser::{ParsedParts, RawCollection},
    GlobalOvsSettings, NetplanError, NetplanOptions, NetplanParser,
    NetplanState, Renderer,
};

#[derive(Debug, Clone, Default)]
struct Globals {
    renderer: Option<GlobalSetting<Renderer>>,
    openvswitch: Option<GlobalSetting<GlobalOvsSettings>>,
}

/// Validate the definitions merged by `parser` and resolve the references
/// between them.
///
/// With `ignore_errors` set, definitions failing validation are dropped,
/// together with the definitions referring to them, instead of failing the
/// whole build.
pub fn build_state(
    parser: NetplanParser,
) -> Result<NetplanState, NetplanError> {
    let ParsedParts {
        options,
        collection,
        mut ignored_errors,
        sources,
    } = parser.into_parts();
    let globals =
        convert_globals(&collection, &options, &mut ignored_errors)?;

    let mut candidates = Vec::with_capacity(collection.defs.len());
    for raw in collection.defs {
        match Candidate::from_raw(raw) {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => ignore_or_fail(&options, &mut ignored_errors, e)?,
        }
    }

    let defs = loop {
        match check(candidates.clone(), &globals, &options) {
            Ok(defs) => break defs,
            Err(DefFailure {
                pos: Some(pos),
                error,
            }) if options.ignore_errors && pos < candidates.len() => {
                let dropped = candidates.remove(pos);
                log::warn!("Ignoring definition {}: {error}", dropped.id);
                ignored_errors.push(error);
            }
            Err(failure) => return Err(failure.error),
        }
    };

    let defs: Vec<_> =
        defs.into_iter().map(Candidate::into_definition).collect();
    let index = defs
        .iter()
        .enumerate()
        .map(|(pos, def)| (def.id.clone(), pos))
        .collect();
    log::info!("Built network state with {} definitions", defs.len());
    Ok(NetplanState {
        defs,
        index,
        renderer: globals.renderer,
        openvswitch: globals.openvswitch,
        options,
        ignored_errors,
        sources,
    })
}

// Every stage works on positions of `defs`, nothing is removed before the
// last stage succeeded.
fn check(
    mut defs: Vec<Candidate>,
    globals: &Globals,
    options: &NetplanOptions,
) -> Result<Vec<Candidate>, DefFailure> {
    for (pos, def) in defs.iter_mut().enumerate() {
        let id = def.id.clone();
        let origin = def.origin.clone();
        let ctx = DefinitionContext::new(&id, origin.as_deref());
        def.settings
            .sanitize_specific(&ctx)
            .map_err(|e| DefFailure::new(pos, e))?;
    }
    let index = index_of(&defs);
    check_references(&defs, &index)?;
    assign_links(&mut defs, &index)?;
    check_cycles(&defs)?;
    assign_backends(
        &mut defs,
        globals.renderer.as_ref().map(|r| r.value),
        options,
    )?;
    check_definitions(&defs)?;
    check_sriov(&defs)?;
    Ok(defs)
}

fn ignore_or_fail(
    options: &NetplanOptions,
    ignored_errors: &mut Vec<NetplanError>,
    error: NetplanError,
) -> Result<(), NetplanError> {
    if options.ignore_errors {
        log::warn!("Ignoring error: {error}");
        ignored_errors.push(error);
        Ok(())
    } else {
        Err(error)
    }
}

fn convert_globals(
    collection: &RawCollection,
    options: &NetplanOptions,
    ignored_errors: &mut Vec<NetplanError>,
) -> Result<Globals, NetplanError> {
    let mut ret = Globals::default();
    if let Some(raw) = collection.renderer.as_ref() {
        let origin = raw.origin.as_path();
        let renderer = serde_yaml::from_value::<Renderer>(raw.value.clone())
            .map_err(|e| config_error(Some(origin), "renderer", &e))
            .and_then(|r| {
                if r == Renderer::Sriov {
                    Err(NetplanError::validation(
                        Some(origin),
                        "'renderer: sriov' is not supported as global \
                         renderer"
                            .to_string(),
                    ))
                } else {
                    Ok(r)
                }
            });
        match renderer {
            Ok(value) => {
                ret.renderer = Some(GlobalSetting {
                    value,
                    origin: raw.origin.clone(),
                })
            }
            Err(e) => ignore_or_fail(options, ignored_errors, e)?,
        }
    }
    if let Some(raw) = collection.openvswitch.as_ref() {
        match serde_yaml::from_value::<GlobalOvsSettings>(
            serde_yaml::Value::Mapping(raw.value.clone()),
        ) {
            Ok(value) => {
                if !value.is_empty() {
                    ret.openvswitch = Some(GlobalSetting {
                        value,
                        origin: raw.origin.clone(),
                    });
                }
            }
            Err(e) => ignore_or_fail(
                options,
                ignored_errors,
                config_error(Some(raw.origin.as_path()), "openvswitch", &e),
            )?,
        }
    }
    Ok(ret)
}
