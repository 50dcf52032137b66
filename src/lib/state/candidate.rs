// SPDX-License-Identifier: Apache-2.0

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use serde_yaml::Value;

use super::definition::DefinitionLinks;
use crate::{
    netdef::DefinitionContext, parser::RawDefinition, Backend,
    DefinitionKind, DefinitionSettings, ErrorKind, InterfaceDefinition,
    NetplanError, Renderer,
};

/// Definition going through the build, links and backend are filled in
/// by the later stages.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub(crate) id: String,
    pub(crate) settings: DefinitionSettings,
    pub(crate) origin: Option<PathBuf>,
    pub(crate) section_renderer: Option<Renderer>,
    pub(crate) links: DefinitionLinks,
    pub(crate) backend: Backend,
}

impl Candidate {
    pub(crate) fn from_raw(raw: RawDefinition) -> Result<Self, NetplanError> {
        let RawDefinition {
            id,
            kind,
            settings,
            origin,
            section_renderer,
        } = raw;
        let settings =
            DefinitionSettings::from_yaml(kind, Value::Mapping(settings))
                .map_err(|e| config_error(origin.as_deref(), &id, &e))?;
        let section_renderer = section_renderer
            .map(serde_yaml::from_value::<Renderer>)
            .transpose()
            .map_err(|e| config_error(origin.as_deref(), &id, &e))?;
        Ok(Self {
            id,
            settings,
            origin,
            section_renderer,
            links: DefinitionLinks::default(),
            backend: Backend::default(),
        })
    }

    pub(crate) fn kind(&self) -> DefinitionKind {
        self.settings.kind()
    }

    pub(crate) fn context(&self) -> DefinitionContext<'_> {
        DefinitionContext::new(&self.id, self.origin.as_deref())
    }

    pub(crate) fn error(&self, detail: impl std::fmt::Display) -> NetplanError {
        self.context().error(detail)
    }

    pub(crate) fn into_definition(self) -> InterfaceDefinition {
        InterfaceDefinition {
            id: self.id,
            settings: self.settings,
            backend: self.backend,
            origin: self.origin,
            links: self.links,
        }
    }
}

/// Error failing the build. `pos` points at the definition to drop when
/// errors are ignored, global errors have none.
#[derive(Debug)]
pub(crate) struct DefFailure {
    pub(crate) pos: Option<usize>,
    pub(crate) error: NetplanError,
}

impl DefFailure {
    pub(crate) fn new(pos: usize, error: NetplanError) -> Self {
        Self {
            pos: Some(pos),
            error,
        }
    }
}

pub(crate) fn config_error(
    origin: Option<&Path>,
    id: &str,
    e: &dyn std::fmt::Display,
) -> NetplanError {
    let file = origin.map(|o| format!("{}: ", o.display()));
    NetplanError::new(
        ErrorKind::InvalidConfig,
        format!(
            "{}Error in network definition: {id}: {e}",
            file.unwrap_or_default()
        ),
    )
}

pub(crate) fn index_of(defs: &[Candidate]) -> HashMap<String, usize> {
    defs.iter()
        .enumerate()
        .map(|(pos, def)| (def.id.clone(), pos))
        .collect()
}
