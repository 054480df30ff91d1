use serde::Serialize;

/// Structured trace events emitted by the orchestrator core.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    CompileDirCleared {
        path: String,
    },
    VertexCompiled {
        id: String,
        is_root: bool,
        fragment_path: Option<String>,
    },
    DevDepCacheHit {
        id: String,
    },
    DevDepBuilt {
        id: String,
        file_count: usize,
    },
    WalkFailed {
        id: String,
        message: String,
    },
    CredentialsCacheFound {
        path: String,
    },
    CredentialsReacquired {
        path: String,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "orch_event");
    }
}
