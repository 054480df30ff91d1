//! The UI contract Core and plugins use for interactive output and input.
//!
//! Secrecy (e.g. not echoing a password) is an implementation detail of the
//! concrete `Ui` — Core always goes through the same `input` call whether it
//! is asking for a free-form value or a password.

use crate::error::Result;

/// Parameters for a single interactive prompt.
#[derive(Debug, Clone)]
pub struct InputOpts {
    /// Stable identifier for the field being requested (e.g. `creds_password`).
    pub id: String,
    /// The question shown to the user.
    pub query: String,
    /// Additional context shown alongside the query.
    pub description: String,
}

impl InputOpts {
    pub fn new(id: impl Into<String>, query: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            query: query.into(),
            description: description.into(),
        }
    }
}

/// The interactive UI surface threaded through Core and into plugins.
pub trait Ui: Send + Sync {
    /// Announce a new section.
    fn header(&self, text: &str);
    /// Output-only notice.
    fn message(&self, text: &str);
    /// Prompt the user and return what they entered.
    fn input(&self, opts: &InputOpts) -> Result<String>;
}
