//! The concrete `DirectoryBackend` (§6, expansion A5): a thin handle onto
//! the already-computed `Layout`, opaque to Core and interpreted only by
//! plugin implementations that want paths without recomputing them.

use orch_domain::dirbackend::DirectoryBackend;
use orch_core::Layout;

pub struct LocalDirectoryBackend {
    layout: Layout,
}

impl LocalDirectoryBackend {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}

impl DirectoryBackend for LocalDirectoryBackend {
    fn name(&self) -> &str {
        "local"
    }
}
