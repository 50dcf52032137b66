// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CommonSettings, DefinitionKind, NetplanError, PhysicalSettings};

/// Identity of the definition being checked, used to word errors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DefinitionContext<'a> {
    pub(crate) id: &'a str,
    pub(crate) origin: Option<&'a Path>,
}

impl<'a> DefinitionContext<'a> {
    pub(crate) fn new(id: &'a str, origin: Option<&'a Path>) -> Self {
        Self { id, origin }
    }

    /// Validation error prefixed with the file and the definition ID.
    pub(crate) fn error(&self, detail: impl std::fmt::Display) -> NetplanError {
        NetplanError::validation(self.origin, format!("{}: {detail}", self.id))
    }
}

/// Trait implemented by the settings of every kind of definition.
pub trait NetplanDefinition:
    std::fmt::Debug
    + for<'a> Deserialize<'a>
    + Serialize
    + Default
    + Clone
    + PartialEq
{
    const KIND: DefinitionKind;

    fn common(&self) -> &CommonSettings;

    fn common_mut(&mut self) -> &mut CommonSettings;

    /// `match`, `set-name` and friends, only on physical kinds.
    fn physical(&self) -> Option<&PhysicalSettings> {
        None
    }

    /// IDs listed in `interfaces` of a controller.
    fn members(&self) -> &[String] {
        &[]
    }
}

/// Kind specific checks run by the build.
pub(crate) trait SanitizeDefinition: NetplanDefinition {
    /// Check and normalize kind specific settings. Invoked once per build
    /// before any cross definition check.
    fn sanitize_specific(
        &mut self,
        _ctx: &DefinitionContext,
    ) -> Result<(), NetplanError> {
        Ok(())
    }
}
