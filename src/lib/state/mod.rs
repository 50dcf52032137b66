// SPDX-License-Identifier: Apache-2.0

mod backend;
mod build;
mod candidate;
mod definition;
mod net_state;
mod resolve;
mod validate;

pub use self::build::build_state;
pub use self::definition::{InterfaceDefinition, LinkKind};
pub use self::net_state::NetplanState;
