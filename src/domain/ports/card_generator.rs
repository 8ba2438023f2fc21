//! Content-generation service port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::GenerationError;
use crate::domain::models::{DistanceTier, Insight, SuggestionCandidate, Vote};

/// One vote the user has already cast, forwarded so the service can steer
/// away from skipped territory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRecord {
    pub suggestion_id: String,
    pub vote: Vote,
}

/// A request for one suggestion candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardRequest {
    /// Distance tier the candidate is being generated for.
    pub tier: DistanceTier,

    /// The user's accumulated profile.
    pub insights: Vec<Insight>,

    /// Vote history so far.
    pub votes: Vec<VoteRecord>,

    /// Titles of candidates already accepted this run (prior tiers).
    pub accepted_titles: Vec<String>,

    /// Titles the candidate must not duplicate.
    pub avoid_titles: Vec<String>,

    /// Keywords the candidate must stay away from. Populated only for the
    /// unexpected tier, where the user's dominant vocabulary is banned.
    pub banned_keywords: Vec<String>,
}

/// External content-generation service, treated as an opaque call that
/// either returns a parsed candidate or fails the attempt.
#[async_trait]
pub trait CardGenerator: Send + Sync {
    async fn generate_card(
        &self,
        request: &CardRequest,
    ) -> Result<SuggestionCandidate, GenerationError>;
}
