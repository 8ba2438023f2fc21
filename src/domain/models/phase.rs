//! Conversation phase model.

use serde::{Deserialize, Serialize};

/// Stage of the five-step conversational progression.
///
/// A session holds exactly one current phase. It is advanced (or, in one
/// documented case, regressed) only through the phase engine's transition
/// function, and never skips more than one step forward per evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversationPhase {
    /// Opening rapport building; ends with the first user turn.
    Warmup,
    /// Drawing out concrete stories and experiences.
    StoryMining,
    /// Reflecting patterns back and filling signal gaps.
    PatternMapping,
    /// Presenting suggestion cards for reaction.
    OptionSeeding,
    /// Narrowing toward next steps the user will actually take.
    Commitment,
}

impl ConversationPhase {
    /// The phase one step forward, or `self` at the end of the progression.
    pub fn next(self) -> Self {
        match self {
            Self::Warmup => Self::StoryMining,
            Self::StoryMining => Self::PatternMapping,
            Self::PatternMapping => Self::OptionSeeding,
            Self::OptionSeeding | Self::Commitment => Self::Commitment,
        }
    }

    /// Zero-based position in the progression, used to assert the
    /// one-step-forward invariant.
    pub fn ordinal(self) -> usize {
        match self {
            Self::Warmup => 0,
            Self::StoryMining => 1,
            Self::PatternMapping => 2,
            Self::OptionSeeding => 3,
            Self::Commitment => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_walks_the_progression() {
        assert_eq!(ConversationPhase::Warmup.next(), ConversationPhase::StoryMining);
        assert_eq!(
            ConversationPhase::StoryMining.next(),
            ConversationPhase::PatternMapping
        );
        assert_eq!(
            ConversationPhase::PatternMapping.next(),
            ConversationPhase::OptionSeeding
        );
        assert_eq!(
            ConversationPhase::OptionSeeding.next(),
            ConversationPhase::Commitment
        );
        assert_eq!(
            ConversationPhase::Commitment.next(),
            ConversationPhase::Commitment
        );
    }

    #[test]
    fn serializes_kebab_case() {
        let json = serde_json::to_value(ConversationPhase::StoryMining).unwrap();
        assert_eq!(json, "story-mining");
    }
}
