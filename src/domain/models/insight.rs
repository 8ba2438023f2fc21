//! Insight domain models.
//!
//! Insights are categorized facts the extraction layer pulls out of the
//! conversation after each final user turn. They are append-only: never
//! mutated, only accumulated, and deduplicated by the caller before they
//! reach the engine.

use serde::{Deserialize, Serialize};

/// Category of an extracted fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Interest,
    Strength,
    Goal,
    Hope,
    Constraint,
    Frustration,
    Boundary,
    Highlight,
}

impl InsightKind {
    /// True for kinds that signal an aspiration (what the user wants,
    /// hopes for, or lights up about).
    pub fn is_aspiration(self) -> bool {
        matches!(self, Self::Goal | Self::Hope | Self::Highlight)
    }

    /// True for kinds that signal a limit the user has named.
    pub fn is_constraint(self) -> bool {
        matches!(self, Self::Constraint | Self::Boundary)
    }
}

/// Extraction confidence attached to an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// A categorized fact extracted from the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// Category of the fact.
    pub kind: InsightKind,

    /// Free-text value, e.g. "rugby" or "wants to work outdoors".
    pub value: String,

    /// Extraction confidence, when the extractor reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
}

impl Insight {
    /// Creates an insight without a confidence rating.
    pub fn new(kind: InsightKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            confidence: None,
        }
    }

    /// Attaches a confidence rating.
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = Some(confidence);
        self
    }
}
