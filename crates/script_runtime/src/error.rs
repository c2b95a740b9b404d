//! Runtime error types.

use std::path::PathBuf;

use script_core::{EntityId, Property, ValueKind};

/// Errors from loading scenes and config, and from attaching scripts.
///
/// The binding layer itself never fails; these cover the runtime's own
/// edges: names that resolve to nothing, and files that don't parse.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// No factory is registered under this script name.
    #[error("unknown script '{0}'")]
    UnknownScript(String),

    /// A factory with this name already exists.
    #[error("script '{0}' is already registered")]
    DuplicateRegistration(String),

    /// The JSON fields given for a script don't fit its type.
    #[error("invalid fields for script '{name}': {source}")]
    ScriptFields {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// An entity can carry one script.
    #[error("{entity} already runs script '{existing}'")]
    DuplicateScript { entity: EntityId, existing: String },

    /// A scene entity lists a component without a proxy.
    #[error("unknown component '{component}' on entity '{entity}'")]
    UnknownComponent { entity: String, component: String },

    /// A scene entity sets a property to a value of the wrong kind.
    #[error("property {property:?} on entity '{entity}' expects {expected:?}, got {got:?}")]
    PropertyKind {
        entity: String,
        property: Property,
        expected: ValueKind,
        got: ValueKind,
    },

    #[error("frame rate {0} does not give a usable frame duration")]
    InvalidFrameRate(f64),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = RuntimeError> = std::result::Result<T, E>;
