//! The unit of input to the layout engine.

use serde::{Deserialize, Serialize};

/// A single chat comment positioned on the replay timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Offset from the start of the session, in hundredths of a second
    pub emitted_at: u64,
    /// Opaque author identifier (only written as metadata)
    pub author_id: String,
    /// Message text; its character count drives the scroll speed
    pub text: String,
}

impl Comment {
    /// Create a new comment
    #[must_use]
    pub fn new(emitted_at: u64, author_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            emitted_at,
            author_id: author_id.into(),
            text: text.into(),
        }
    }
}
