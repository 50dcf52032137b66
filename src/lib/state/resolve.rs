// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use super::{
    candidate::{Candidate, DefFailure},
    definition::DefinitionLinks,
};
use crate::{DefinitionKind, LinkKind};

/// Every ID a definition refers to must be defined.
pub(crate) fn check_references(
    defs: &[Candidate],
    index: &HashMap<String, usize>,
) -> Result<(), DefFailure> {
    for (pos, def) in defs.iter().enumerate() {
        let targets = def
            .settings
            .members()
            .iter()
            .map(String::as_str)
            .chain(def.settings.link())
            .chain(def.settings.peer());
        for target in targets {
            if !index.contains_key(target) {
                return Err(DefFailure::new(
                    pos,
                    def.error(format!("interface '{target}' is not defined")),
                ));
            }
        }
    }
    Ok(())
}

/// Turn the references into links, checking the role of each device:
/// one bridge or bond, one VRF, peers pointing back and SR-IOV links to
/// ethernets.
pub(crate) fn assign_links(
    defs: &mut [Candidate],
    index: &HashMap<String, usize>,
) -> Result<(), DefFailure> {
    let mut links = vec![DefinitionLinks::default(); defs.len()];
    for (pos, def) in defs.iter().enumerate() {
        let kind = def.kind();
        let controller_link = match kind {
            DefinitionKind::Bridge => Some(LinkKind::Bridge),
            DefinitionKind::Bond => Some(LinkKind::Bond),
            DefinitionKind::Vrf => Some(LinkKind::Vrf),
            _ => None,
        };
        if let Some(link_kind) = controller_link {
            for member in def.settings.members() {
                let Some(&member_pos) = index.get(member.as_str()) else {
                    continue;
                };
                let current = match link_kind {
                    LinkKind::Vrf => links[member_pos].get(LinkKind::Vrf),
                    _ => links[member_pos]
                        .get(LinkKind::Bridge)
                        .or(links[member_pos].get(LinkKind::Bond)),
                };
                if let Some(other) = current.and_then(|o| defs.get(o)) {
                    return Err(DefFailure::new(
                        pos,
                        def.error(format!(
                            "interface '{member}' is already assigned to \
                             {} {}",
                            other.kind(),
                            other.id
                        )),
                    ));
                }
                links[member_pos].set(link_kind, pos);
            }
        }

        if let Some(link) = def.settings.link() {
            if let Some(&target) = index.get(link) {
                let target_kind = defs.get(target).map(|d| d.kind());
                match kind {
                    DefinitionKind::Vlan => {
                        links[pos].set(LinkKind::VlanLink, target)
                    }
                    _ if target_kind == Some(DefinitionKind::Ethernet) => {
                        links[pos].set(LinkKind::SriovLink, target)
                    }
                    _ => {
                        return Err(DefFailure::new(
                            pos,
                            def.error(format!(
                                "SR-IOV link '{link}' is not an ethernet"
                            )),
                        ));
                    }
                }
            }
        }

        if let Some(peer) = def.settings.peer() {
            let Some((target, peer_def)) = index
                .get(peer)
                .and_then(|&t| defs.get(t).map(|d| (t, d)))
            else {
                continue;
            };
            if peer_def.kind() != kind {
                return Err(DefFailure::new(
                    pos,
                    def.error(format!("peer '{peer}' is not a {kind}")),
                ));
            }
            if peer_def.settings.peer() != Some(def.id.as_str()) {
                return Err(DefFailure::new(
                    pos,
                    def.error(format!(
                        "peer '{peer}' does not point back to '{}'",
                        def.id
                    )),
                ));
            }
            links[pos].set(LinkKind::Peer, target);
        }
    }
    for (def, def_links) in defs.iter_mut().zip(links) {
        def.links = def_links;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    New,
    Visiting,
    Done,
}

/// Reject dependency cycles through bridge, bond, VRF, VLAN and SR-IOV
/// links.
pub(crate) fn check_cycles(defs: &[Candidate]) -> Result<(), DefFailure> {
    let mut marks = vec![Mark::New; defs.len()];
    let mut path = Vec::new();
    for pos in 0..defs.len() {
        visit(defs, pos, &mut marks, &mut path)?;
    }
    Ok(())
}

fn visit(
    defs: &[Candidate],
    pos: usize,
    marks: &mut [Mark],
    path: &mut Vec<usize>,
) -> Result<(), DefFailure> {
    match marks.get(pos) {
        Some(Mark::New) => (),
        Some(Mark::Visiting) => {
            let start = path.iter().position(|p| *p == pos).unwrap_or(0);
            let names: Vec<&str> = path[start..]
                .iter()
                .chain(std::iter::once(&pos))
                .filter_map(|p| defs.get(*p).map(|d| d.id.as_str()))
                .collect();
            let error = match defs.get(pos) {
                Some(def) => def.error(format!(
                    "circular dependency detected: {}",
                    names.join(" -> ")
                )),
                None => return Ok(()),
            };
            return Err(DefFailure::new(pos, error));
        }
        Some(Mark::Done) | None => return Ok(()),
    }
    marks[pos] = Mark::Visiting;
    path.push(pos);
    if let Some(def) = defs.get(pos) {
        for parent in def.links.parents() {
            visit(defs, parent, marks, path)?;
        }
    }
    path.pop();
    marks[pos] = Mark::Done;
    Ok(())
}
