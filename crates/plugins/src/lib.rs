//! In-tree sample app and infrastructure implementations.
//!
//! These are not a production plugin catalog — they exist so `orch-core`
//! has something concrete to resolve in its integration tests and so the
//! plugin contracts in `orch-domain::plugin` have a worked example.

pub mod local_infra;
pub mod null_app;

pub use local_infra::LocalInfra;
pub use null_app::NullApp;
