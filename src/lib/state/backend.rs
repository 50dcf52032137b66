// SPDX-License-Identifier: Apache-2.0

use super::candidate::{Candidate, DefFailure};
use crate::{
    Backend, DefinitionKind, DefinitionSettings, LinkKind, NetplanOptions,
    Renderer,
};

// Ports, and the bridges and bonds built from them or configured with
// `openvswitch` settings, belong to Open vSwitch.
fn ovs_forced(defs: &[Candidate]) -> Vec<bool> {
    let mut ret: Vec<bool> = defs
        .iter()
        .map(|def| match def.kind() {
            DefinitionKind::Port => true,
            DefinitionKind::Bridge | DefinitionKind::Bond => {
                def.settings.common().openvswitch.is_some()
            }
            _ => false,
        })
        .collect();
    for def in defs.iter().filter(|d| d.kind() == DefinitionKind::Port) {
        for link_kind in [LinkKind::Bridge, LinkKind::Bond] {
            if let Some(parent) = def.links.get(link_kind) {
                ret[parent] = true;
            }
        }
    }
    for (pos, def) in defs.iter().enumerate() {
        if def.kind() == DefinitionKind::Bond
            && def.links.get(LinkKind::Bridge).is_some_and(|b| ret[b])
        {
            ret[pos] = true;
        }
    }
    ret
}

// Physical functions, their virtual functions and the VLANs filtered in
// hardware on a virtual function.
fn sriov_devices(defs: &[Candidate]) -> Vec<bool> {
    let mut ret: Vec<bool> = defs
        .iter()
        .map(|def| match &def.settings {
            DefinitionSettings::Ethernet(eth) => eth.is_sriov_pf(),
            _ => false,
        })
        .collect();
    for (pos, def) in defs.iter().enumerate() {
        if let Some(pf) = def.links.get(LinkKind::SriovLink) {
            ret[pos] = true;
            ret[pf] = true;
        }
    }
    for (pos, def) in defs.iter().enumerate() {
        if def.kind() == DefinitionKind::Vlan
            && def
                .links
                .get(LinkKind::VlanLink)
                .and_then(|parent| defs.get(parent))
                .is_some_and(|p| p.links.get(LinkKind::SriovLink).is_some())
        {
            ret[pos] = true;
        }
    }
    ret
}

// Virtual functions are set up together with their physical function and
// share its backend.
fn force_vf_backends(defs: &mut [Candidate]) -> Result<(), DefFailure> {
    for pos in 0..defs.len() {
        let Some((pf_id, pf_backend)) = defs[pos]
            .links
            .get(LinkKind::SriovLink)
            .and_then(|pf| defs.get(pf))
            .map(|pf| (pf.id.clone(), pf.backend))
        else {
            continue;
        };
        let vf = &mut defs[pos];
        match vf.settings.common().renderer {
            Some(Renderer::Sriov) => (),
            Some(r) if Backend::from(r) != pf_backend => {
                return Err(DefFailure::new(
                    pos,
                    vf.error(format!(
                        "renderer '{r}' of an SR-IOV virtual function \
                         conflicts with backend {pf_backend} of its \
                         physical function '{pf_id}'"
                    )),
                ));
            }
            _ => vf.backend = pf_backend,
        }
        log::debug!("{}: backend {} forced by {pf_id}", vf.id, vf.backend);
    }
    Ok(())
}

/// Resolve the backend of every definition: the definition's own
/// `renderer`, else its section's, else the global one, else the default
/// backend. Open vSwitch devices, nm-devices and SR-IOV virtual functions
/// have theirs forced.
///
/// The section renderer is folded into the definition so that it
/// survives a dump of the state.
pub(crate) fn assign_backends(
    defs: &mut [Candidate],
    global: Option<Renderer>,
    options: &NetplanOptions,
) -> Result<(), DefFailure> {
    let ovs = ovs_forced(defs);
    let sriov = sriov_devices(defs);
    for (pos, def) in defs.iter_mut().enumerate() {
        let explicit = def.settings.common().renderer;
        let is_ovs = ovs.get(pos).copied().unwrap_or_default();
        def.backend = if is_ovs {
            match explicit {
                None | Some(Renderer::Networkd) => Backend::Ovs,
                Some(r) => {
                    return Err(DefFailure::new(
                        pos,
                        def.error(format!(
                            "renderer '{r}' cannot be used for an Open \
                             vSwitch device"
                        )),
                    ));
                }
            }
        } else if def.kind() == DefinitionKind::NmDevice {
            match explicit.or(def.section_renderer) {
                None | Some(Renderer::NetworkManager) => {
                    Backend::NetworkManager
                }
                Some(r) => {
                    return Err(DefFailure::new(
                        pos,
                        def.error(format!(
                            "nm-devices need the NetworkManager renderer, \
                             not '{r}'"
                        )),
                    ));
                }
            }
        } else {
            let renderer = explicit.or(def.section_renderer).or(global);
            let is_sriov = sriov.get(pos).copied().unwrap_or_default();
            if renderer == Some(Renderer::Sriov) && !is_sriov {
                return Err(DefFailure::new(
                    pos,
                    def.error(
                        "'renderer: sriov' is only supported on SR-IOV \
                         ethernets and their VLANs",
                    ),
                ));
            }
            renderer
                .map(Backend::from)
                .unwrap_or(options.default_backend)
        };
        if explicit.is_none() && !is_ovs {
            if let Some(section_renderer) = def.section_renderer {
                def.settings.common_mut().renderer = Some(section_renderer);
            }
        }
        log::debug!("{}: backend {}", def.id, def.backend);
    }
    force_vf_backends(defs)
}
