//! Transcript domain models.
//!
//! A transcript is a list of utterance fragments keyed by correlation id.
//! Fragments grow through delta appends until the remote service (or the
//! client) finalizes them; finalization is monotonic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speaker of a transcript item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One conversational utterance fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptItem {
    /// Correlation identifier assigned by the remote service or the client.
    pub id: String,

    /// Speaker of this item.
    pub role: Role,

    /// Accumulated text; grows via delta appends until finalized.
    pub text: String,

    /// False while deltas are still arriving.
    pub is_final: bool,

    /// Timestamp of first observation.
    pub created_at: DateTime<Utc>,
}

impl TranscriptItem {
    /// Creates a new non-final item seeded with an initial fragment.
    pub fn partial(id: String, role: Role, fragment: String) -> Self {
        Self {
            id,
            role,
            text: fragment,
            is_final: false,
            created_at: Utc::now(),
        }
    }

    /// Creates a new item that is final from its first observation.
    pub fn finalized(id: String, role: Role, text: String) -> Self {
        Self {
            id,
            role,
            text,
            is_final: true,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_item_starts_non_final() {
        let item = TranscriptItem::partial("item_1".to_string(), Role::User, "hel".to_string());
        assert!(!item.is_final);
        assert_eq!(item.text, "hel");
        assert_eq!(item.role, Role::User);
    }

    #[test]
    fn finalized_item_is_final() {
        let item =
            TranscriptItem::finalized("item_1".to_string(), Role::Assistant, "hello".to_string());
        assert!(item.is_final);
        assert_eq!(item.text, "hello");
    }
}
