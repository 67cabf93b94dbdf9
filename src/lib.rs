//! Tool-calling layer for the onto project assistant.
//!
//! The crate exposes two logical entry points to the surrounding agent
//! runtime: `tool_help` (schema-driven usage help for any op or namespace
//! prefix) and `tool_exec` (dispatch of a canonical op to its executor).
//! Between them sit a static tool catalog, a derived op registry with a
//! content-hash version, and an alias layer that keeps historical op
//! spellings working.

pub mod aliases;
pub mod backend;
pub mod catalog;
pub mod executors;
pub mod gateway;
pub mod help;
pub mod registry;
pub mod schema;
pub mod tool_metadata;

pub use aliases::{normalize_help_path, normalize_op};
pub use backend::{Backend, MemoryBackend};
pub use catalog::{ToolDefinition, CATALOG};
pub use gateway::{Gateway, GatewayError};
pub use help::{get_help, HelpFormat, HelpOptions, HelpResult};
pub use registry::{
    build_registry, derive_op, reset_shared_registry, shared_registry, OpAction, OpGroup, OpKind,
    RegistryError, RegistryOp, ToolRegistry,
};
pub use tool_metadata::{ContextScope, ToolCategory, ToolMetadata, TOOL_METADATA};
