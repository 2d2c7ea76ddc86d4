//! Events emitted by the speech queue.
//!
//! Events are serialized with a `type` tag so they can be forwarded to a UI or
//! log sink unchanged:
//!
//! ```json
//! { "type": "started", "id": 7, "text": "Hello there" }
//! ```

use serde::{Deserialize, Serialize};

use crate::request::RequestId;

/// Queue lifecycle events, in the order they happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpeechEvent {
    /// A request arrived while speaking and was appended to the backlog.
    Queued {
        id: RequestId,
        /// 1-based position in the backlog.
        position: usize,
    },

    /// Playback of a request began.
    Started { id: RequestId, text: String },

    /// Playback of a request completed naturally.
    Finished { id: RequestId },

    /// A request was dropped because resolution or rendering failed.
    Failed { id: RequestId, error: String },

    /// `shut_up` discarded the in-flight request (if any) and the backlog.
    Cleared {
        /// Number of backlog entries that were discarded.
        discarded: usize,
    },

    /// The backlog drained and the queue went idle.
    Idle,
}
