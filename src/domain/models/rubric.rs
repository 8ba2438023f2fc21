//! Conversation rubric models.
//!
//! The rubric is the phase engine's working assessment of the dialogue:
//! engagement, depth, energy, readiness, and signal coverage. It is always
//! recomputed whole from the current transcript/insight/vote snapshot, never
//! incrementally patched, so it cannot drift from the conversation it
//! describes.

use serde::{Deserialize, Serialize};

use super::insight::{Insight, InsightKind};

/// How the user is engaging with the conversation right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngagementStyle {
    /// Volunteering detail, asking questions back.
    LeaningIn,
    /// Short answers, long pauses.
    Hesitant,
    /// Actively stuck or deflecting.
    Blocked,
    /// Asking for ideas rather than telling stories.
    SeekingOptions,
}

impl EngagementStyle {
    /// True when the conversation has stalled enough to consider a teaser.
    pub fn is_stalled(self) -> bool {
        matches!(self, Self::Blocked | Self::Hesitant)
    }
}

/// Conversational energy read from recent turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

/// Where the user sits on the exploring-to-deciding spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadinessBias {
    Exploring,
    SeekingOptions,
    Deciding,
}

/// What the assistant should concentrate on next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendedFocus {
    Rapport,
    Story,
    Pattern,
    Ideation,
    Decision,
}

/// Signal categories the rubric tracks coverage for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageKey {
    Interests,
    Aptitudes,
    Goals,
    Constraints,
}

/// Which signal categories the accumulated insights have covered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightCoverage {
    pub interests: bool,
    pub aptitudes: bool,
    pub goals: bool,
    pub constraints: bool,
}

impl InsightCoverage {
    /// Derives coverage from an insight snapshot.
    ///
    /// Mapping: `interests` from `interest`; `aptitudes` from `strength`;
    /// `goals` from any aspiration kind (`goal|hope|highlight`);
    /// `constraints` from `constraint|boundary`.
    pub fn from_insights(insights: &[Insight]) -> Self {
        let mut coverage = Self::default();
        for insight in insights {
            match insight.kind {
                InsightKind::Interest => coverage.interests = true,
                InsightKind::Strength => coverage.aptitudes = true,
                kind if kind.is_aspiration() => coverage.goals = true,
                kind if kind.is_constraint() => coverage.constraints = true,
                _ => {}
            }
        }
        coverage
    }

    /// Keys still unmet, in fixed `interests, aptitudes, goals, constraints`
    /// order.
    pub fn gaps(self) -> Vec<CoverageKey> {
        let mut gaps = Vec::new();
        if !self.interests {
            gaps.push(CoverageKey::Interests);
        }
        if !self.aptitudes {
            gaps.push(CoverageKey::Aptitudes);
        }
        if !self.goals {
            gaps.push(CoverageKey::Goals);
        }
        if !self.constraints {
            gaps.push(CoverageKey::Constraints);
        }
        gaps
    }

    /// True when every category is covered.
    pub fn is_full(self) -> bool {
        self.interests && self.aptitudes && self.goals && self.constraints
    }
}

/// Whether suggestion generation should be attempted right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadinessStatus {
    /// Too little signal to generate anything useful.
    Blocked,
    /// Some signal, but cards would be guesswork.
    ContextLight,
    /// Enough signal and intent to generate cards.
    Ready,
}

/// Gating signal for suggestion generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardReadiness {
    pub status: ReadinessStatus,

    /// Coverage keys still missing, in fixed order.
    pub missing_signals: Vec<CoverageKey>,

    /// Human-readable explanation of the status, when one adds context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// The phase engine's structured assessment at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRubric {
    pub engagement_style: EngagementStyle,

    /// How much concrete context has accumulated, 0-3.
    pub context_depth: u8,

    pub energy_level: EnergyLevel,

    pub readiness_bias: ReadinessBias,

    /// True when the user has explicitly asked for ideas.
    pub explicit_ideas_request: bool,

    pub insight_coverage: InsightCoverage,

    /// Coverage keys still unmet.
    pub insight_gaps: Vec<CoverageKey>,

    pub card_readiness: CardReadiness,

    pub recommended_focus: RecommendedFocus,
}
