//! The directory backend carried through `Shared` and into plugins.
//!
//! Core never inspects this — it is opaque data a concrete implementation
//! uses to, say, resolve a project's scratch directories relative to some
//! externally-managed workspace root. Plugins interpret it; Core only
//! threads it through.

/// Marker contract for a directory backend implementation.
pub trait DirectoryBackend: Send + Sync {
    /// Human-readable name, useful for logging which backend is active.
    fn name(&self) -> &str;
}
