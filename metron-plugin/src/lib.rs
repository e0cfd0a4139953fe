//! Metron Plugin System
//!
//! Provides the traits for exposing conversion operations as tools:
//! - `ToolPlugin`: a pure call from JSON arguments to a `ToolOutput`
//! - `ToolRegistry`: name lookup, listing and help
//! - `ToolContext`: per-call precision and exchange rates

mod traits;
mod registry;
mod context;

pub use traits::{ToolPlugin, ToolMeta, ToolOutput, ArgMeta};
pub use registry::{ToolRegistry, UNKNOWN_TOOL};
pub use context::ToolContext;

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        ToolPlugin, ToolMeta, ToolOutput, ArgMeta, ToolRegistry, ToolContext,
    };
    pub use metron_core::prelude::*;
}
