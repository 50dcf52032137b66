// SPDX-License-Identifier: Apache-2.0

mod document;
mod hierarchy;
pub(crate) mod nullable;

pub(crate) use self::document::SourceDocument;
pub use self::hierarchy::{enumerate_hierarchy, ConfigTier, FilePrecedence};
