//! Suggestion card models.
//!
//! Cards are created by the suggestion engine and never mutated afterwards;
//! the one piece of mutable state, the user's vote, lives outside the card
//! and is passed back in as a lookup keyed by suggestion id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How far a suggestion sits from the user's stated interests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceTier {
    /// Directly inside the user's stated territory.
    Core,
    /// One step sideways from it.
    Adjacent,
    /// Deliberately outside the user's dominant vocabulary.
    Unexpected,
}

impl DistanceTier {
    /// Tiers in the fixed generation and output order.
    pub const ORDERED: [Self; 3] = [Self::Core, Self::Adjacent, Self::Unexpected];

    /// Ranking weight for this tier. Monotonically decreasing with
    /// distance: core > adjacent > unexpected.
    pub fn base_score(self) -> f64 {
        match self {
            Self::Core => 0.9,
            Self::Adjacent => 0.6,
            Self::Unexpected => 0.3,
        }
    }
}

/// A user's reaction to a suggestion card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    /// Saved for later (1).
    Saved,
    /// Undecided (0).
    Maybe,
    /// Dismissed (-1).
    Skipped,
}

/// Raw card content as returned by the content-generation service, before
/// the engine has accepted it and assigned a tier and score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionCandidate {
    pub title: String,

    pub summary: String,

    #[serde(default)]
    pub why_it_fits: Vec<String>,

    #[serde(default)]
    pub career_angles: Vec<String>,

    #[serde(default)]
    pub next_steps: Vec<String>,

    #[serde(default)]
    pub micro_experiments: Vec<String>,

    #[serde(default)]
    pub neighbor_territories: Vec<String>,
}

impl SuggestionCandidate {
    /// All free text of the candidate that participates in duplicate
    /// detection, joined into one string.
    pub fn comparison_text(&self) -> String {
        let mut parts = vec![self.title.clone(), self.summary.clone()];
        parts.extend(self.why_it_fits.iter().cloned());
        parts.extend(self.career_angles.iter().cloned());
        parts.join(" ")
    }
}

/// An accepted suggestion card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Client-assigned identifier, used as the vote key.
    pub id: String,

    pub title: String,

    pub summary: String,

    pub why_it_fits: Vec<String>,

    pub career_angles: Vec<String>,

    pub next_steps: Vec<String>,

    pub micro_experiments: Vec<String>,

    pub neighbor_territories: Vec<String>,

    /// Distance tier this card was generated for.
    pub distance: DistanceTier,

    /// Ranking weight, tied to the distance tier.
    pub score: f64,
}

impl Suggestion {
    /// Promotes an accepted candidate into a card for the given tier.
    pub fn from_candidate(candidate: SuggestionCandidate, distance: DistanceTier) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: candidate.title,
            summary: candidate.summary,
            why_it_fits: candidate.why_it_fits,
            career_angles: candidate.career_angles,
            next_steps: candidate.next_steps,
            micro_experiments: candidate.micro_experiments,
            neighbor_territories: candidate.neighbor_territories,
            distance,
            score: distance.base_score(),
        }
    }

    /// The card's text for duplicate detection, matching
    /// [`SuggestionCandidate::comparison_text`].
    pub fn comparison_text(&self) -> String {
        let mut parts = vec![self.title.clone(), self.summary.clone()];
        parts.extend(self.why_it_fits.iter().cloned());
        parts.extend(self.career_angles.iter().cloned());
        parts.join(" ")
    }
}
