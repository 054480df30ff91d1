//! Shared error type used across all orchestrator crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Appfile '{0}' has no active infrastructure configured")]
    InfraNotConfigured(String),

    #[error("unknown infrastructure type '{0}'")]
    UnknownInfraType(String),

    #[error("unknown app tuple {0:?}")]
    UnknownAppTuple(crate::graph::Tuple),

    #[error("infrastructure '{infra_type}' failed to start: {message}")]
    InfraStartFailed { infra_type: String, message: String },

    #[error("app {tuple:?} failed to start: {message}")]
    AppStartFailed {
        tuple: crate::graph::Tuple,
        message: String,
    },

    #[error("compiled graph has no root vertex")]
    RootNotFound,

    #[error("failed to set up cache directory for '{id}': {message}")]
    CacheSetupFailed { id: String, message: String },

    #[error("failed to clean compile directory: {0}")]
    CompileCleanupFailed(String),

    #[error(
        "could not decrypt credentials (bad password or corrupt file); \
         enter an empty password to force re-acquisition"
    )]
    BadCredentialsPassword,

    #[error("failed to write encrypted credentials: {0}")]
    CredentialsWriteFailed(String),

    #[error("dev-dep build failed for '{name}': {message}")]
    DevDepBuildFailed { name: String, message: String },

    #[error("unknown task '{0}'")]
    UnknownTask(String),

    #[error("error loading Appfile for '{name}': {message}")]
    VertexContext { name: String, message: String },

    #[error("error loading App implementation for '{name}': {message}")]
    VertexResolve { name: String, message: String },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
