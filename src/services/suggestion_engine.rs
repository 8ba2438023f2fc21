//! Suggestion generation and dedup engine.
//!
//! Produces up to three non-duplicate suggestion cards spanning the three
//! distance tiers, in fixed `core, adjacent, unexpected` order. Candidates
//! come from the external content-generation service; each tier has a
//! bounded retry budget, and when it exhausts, a deterministic fallback
//! card keyed off the user's leading insight guarantees exactly one card
//! per tier whenever insights exist. Fallbacks pass the same acceptance
//! rules as generated candidates. Per-attempt failures are absorbed into
//! the budget and never surface to the caller.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::models::{
    DistanceTier, Insight, Suggestion, SuggestionCandidate, SuggestionConfig, Vote,
};
use crate::domain::ports::{CardGenerator, CardRequest, VoteRecord};
use crate::services::keywords::{dominant_keywords, jaccard, keyword_overlap, token_set, tokenize};

/// The suggestion engine.
pub struct SuggestionEngine {
    generator: Arc<dyn CardGenerator>,
    config: SuggestionConfig,
    /// Caller-supplied abort signal. When set, remaining attempts are
    /// skipped and the fallback path is taken immediately.
    abort: Option<Arc<AtomicBool>>,
}

impl SuggestionEngine {
    pub fn new(generator: Arc<dyn CardGenerator>, config: SuggestionConfig) -> Self {
        Self {
            generator,
            config,
            abort: None,
        }
    }

    /// Attaches an abort signal checked before each generation attempt.
    pub fn with_abort_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.abort = Some(flag);
        self
    }

    /// Generates up to `limit` cards (one per tier, tiers in fixed order).
    ///
    /// Returns an empty list when no insights have accumulated yet: with
    /// nothing to anchor on, even a fallback card would be noise.
    pub async fn generate(
        &self,
        insights: &[Insight],
        votes: &HashMap<String, Vote>,
        limit: usize,
    ) -> Vec<Suggestion> {
        self.generate_avoiding(insights, votes, limit, &[]).await
    }

    /// Like [`generate`](Self::generate), additionally avoiding titles the
    /// caller has already shown the user in previous runs.
    pub async fn generate_avoiding(
        &self,
        insights: &[Insight],
        votes: &HashMap<String, Vote>,
        limit: usize,
        avoid_titles: &[String],
    ) -> Vec<Suggestion> {
        if insights.is_empty() {
            debug!("No insights accumulated; skipping suggestion generation");
            return Vec::new();
        }

        let dominant = dominant_keywords(insights, self.config.keyword_count);
        let vote_records: Vec<VoteRecord> = votes
            .iter()
            .map(|(suggestion_id, vote)| VoteRecord {
                suggestion_id: suggestion_id.clone(),
                vote: *vote,
            })
            .collect();

        let mut avoided: HashSet<String> = avoid_titles
            .iter()
            .map(|title| title.to_lowercase())
            .collect();
        let mut accepted: Vec<Suggestion> = Vec::new();

        for tier in DistanceTier::ORDERED.into_iter().take(limit.min(3)) {
            let candidate = self
                .generate_for_tier(tier, insights, &vote_records, &dominant, &avoided, &accepted)
                .await;

            let candidate = candidate.unwrap_or_else(|| {
                info!(?tier, "Retry budget exhausted; using fallback card");
                self.fallback_candidate(tier, &insights[0].value, &dominant, &avoided, &accepted)
            });

            avoided.insert(candidate.title.to_lowercase());
            accepted.push(Suggestion::from_candidate(candidate, tier));
        }

        accepted
    }

    /// Runs the retry loop for one tier. `None` means the budget exhausted
    /// (or an abort was requested) without an acceptable candidate.
    async fn generate_for_tier(
        &self,
        tier: DistanceTier,
        insights: &[Insight],
        votes: &[VoteRecord],
        dominant: &[String],
        avoided: &HashSet<String>,
        accepted: &[Suggestion],
    ) -> Option<SuggestionCandidate> {
        let budget = match tier {
            DistanceTier::Core | DistanceTier::Adjacent => self.config.standard_attempts,
            DistanceTier::Unexpected => self.config.unexpected_attempts,
        };

        // The unexpected tier bans the user's dominant vocabulary outright;
        // rejected candidates escalate the ban with their own keywords.
        let mut banned: Vec<String> = if tier == DistanceTier::Unexpected {
            dominant.to_vec()
        } else {
            Vec::new()
        };

        for attempt in 1..=budget {
            if self.aborted() {
                debug!(?tier, "Abort requested; skipping remaining attempts");
                return None;
            }

            let request = CardRequest {
                tier,
                insights: insights.to_vec(),
                votes: votes.to_vec(),
                accepted_titles: accepted.iter().map(|s| s.title.clone()).collect(),
                avoid_titles: avoided.iter().cloned().collect(),
                banned_keywords: banned.clone(),
            };

            let candidate = match self.generator.generate_card(&request).await {
                Ok(candidate) => candidate,
                Err(err) => {
                    warn!(?tier, attempt, error = %err, "Generation attempt failed");
                    continue;
                }
            };

            match self.vet_candidate(tier, &candidate, dominant, avoided, accepted) {
                Ok(()) => return Some(candidate),
                Err(rejection) => {
                    debug!(?tier, attempt, rejection, title = %candidate.title, "Rejected candidate");
                    if rejection == "keyword-overlap" {
                        for token in tokenize(&candidate.comparison_text()) {
                            if !banned.contains(&token) {
                                banned.push(token);
                            }
                        }
                    }
                }
            }
        }

        None
    }

    /// Applies the acceptance rules to one candidate. The error value is a
    /// short rejection tag used for logging and ban escalation.
    fn vet_candidate(
        &self,
        tier: DistanceTier,
        candidate: &SuggestionCandidate,
        dominant: &[String],
        avoided: &HashSet<String>,
        accepted: &[Suggestion],
    ) -> Result<(), &'static str> {
        if candidate.title.trim().is_empty() || candidate.summary.trim().is_empty() {
            return Err("empty-content");
        }

        if avoided.contains(&candidate.title.to_lowercase()) {
            return Err("avoided-title");
        }

        let candidate_tokens = token_set(&candidate.comparison_text());
        for prior in accepted {
            let prior_tokens = token_set(&prior.comparison_text());
            if jaccard(&candidate_tokens, &prior_tokens) >= self.config.duplicate_threshold {
                return Err("near-duplicate");
            }
        }

        if tier == DistanceTier::Unexpected
            && keyword_overlap(&candidate.comparison_text(), dominant)
                >= self.config.keyword_overlap_limit
        {
            return Err("keyword-overlap");
        }

        Ok(())
    }

    /// Selects the fallback card for a tier, held to the same acceptance
    /// rules as a generated candidate. The unexpected tier walks the
    /// lateral library from its deterministic starting point and takes the
    /// first entry that passes vetting, so a fallback can never collide
    /// with the user's dominant vocabulary or near-duplicate an accepted
    /// card.
    fn fallback_candidate(
        &self,
        tier: DistanceTier,
        leading_insight: &str,
        dominant: &[String],
        avoided: &HashSet<String>,
        accepted: &[Suggestion],
    ) -> SuggestionCandidate {
        if tier != DistanceTier::Unexpected {
            return fallback_card(tier, leading_insight);
        }

        let library = unexpected_library();
        let start = deterministic_index(leading_insight.trim(), library.len());
        for offset in 0..library.len() {
            let candidate = &library[(start + offset) % library.len()];
            match self.vet_candidate(tier, candidate, dominant, avoided, accepted) {
                Ok(()) => return candidate.clone(),
                Err(rejection) => {
                    debug!(?tier, rejection, title = %candidate.title, "Rejected fallback entry");
                }
            }
        }

        // Every library entry collided; keep the deterministic pick.
        fallback_card(tier, leading_insight)
    }

    fn aborted(&self) -> bool {
        self.abort
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Deterministic fallback cards, keyed off the user's leading insight text.
///
/// The core and adjacent entries anchor on the leading insight directly;
/// the unexpected entries deliberately avoid it, selecting from a fixed
/// library of lateral territories so the card stays outside the user's
/// dominant vocabulary.
fn fallback_card(tier: DistanceTier, leading_insight: &str) -> SuggestionCandidate {
    let lead = leading_insight.trim();
    match tier {
        DistanceTier::Core => SuggestionCandidate {
            title: format!("Go deeper into {lead}"),
            summary: format!(
                "Take {lead} from something you enjoy to something you shape: find the people \
                 who run it locally and learn what their week actually looks like."
            ),
            why_it_fits: vec![format!("{lead} is the strongest signal in your profile so far.")],
            career_angles: vec![
                "Instruction and coaching".to_string(),
                "Program coordination".to_string(),
            ],
            next_steps: vec![format!(
                "Find one person working in {lead} and ask for twenty minutes about their path."
            )],
            micro_experiments: vec![format!("Shadow a {lead} session and write down what surprised you.")],
            neighbor_territories: vec!["Youth development".to_string()],
        },
        DistanceTier::Adjacent => SuggestionCandidate {
            title: format!("The world around {lead}"),
            summary: format!(
                "Every field has an ecosystem of roles that keep it running. Step one circle out \
                 from {lead} and look at who organizes, equips, records, and promotes it."
            ),
            why_it_fits: vec![
                "Adjacent roles reuse what you already know while opening new doors.".to_string(),
            ],
            career_angles: vec![
                "Events and operations".to_string(),
                "Media and storytelling".to_string(),
            ],
            next_steps: vec![
                "List five jobs that exist because your main interest exists.".to_string(),
            ],
            micro_experiments: vec![
                "Volunteer behind the scenes at one local event this month.".to_string(),
            ],
            neighbor_territories: vec!["Community organizing".to_string()],
        },
        DistanceTier::Unexpected => {
            let library = unexpected_library();
            let index = deterministic_index(lead, library.len());
            library.into_iter().nth(index).unwrap_or_default()
        }
    }
}

/// Fixed lateral-territory cards for the unexpected tier.
fn unexpected_library() -> Vec<SuggestionCandidate> {
    vec![
        SuggestionCandidate {
            title: "Field ecology surveys".to_string(),
            summary: "Spend seasons outdoors counting, mapping, and protecting living systems \
                      alongside small research crews."
                .to_string(),
            why_it_fits: vec!["A structured, physical discipline that rewards patient observation.".to_string()],
            career_angles: vec!["Conservation fieldwork".to_string(), "Environmental consulting".to_string()],
            next_steps: vec!["Join one citizen-science count near you.".to_string()],
            micro_experiments: vec!["Log every species you can identify on a single walk.".to_string()],
            neighbor_territories: vec!["Park management".to_string()],
        },
        SuggestionCandidate {
            title: "Audio documentary making".to_string(),
            summary: "Collect voices and build narrative from raw tape: interviewing, editing, \
                      and shaping stories people carry with them."
                .to_string(),
            why_it_fits: vec!["Listening closely is an underrated craft, and it transfers everywhere.".to_string()],
            career_angles: vec!["Podcast production".to_string(), "Oral history projects".to_string()],
            next_steps: vec!["Record a ten-minute interview with someone who remembers something vividly.".to_string()],
            micro_experiments: vec!["Edit that tape down to ninety seconds that still carry the story.".to_string()],
            neighbor_territories: vec!["Radio journalism".to_string()],
        },
        SuggestionCandidate {
            title: "Disaster-relief logistics".to_string(),
            summary: "Move supplies, crews, and information through chaos: the quiet discipline \
                      that decides whether help arrives."
                .to_string(),
            why_it_fits: vec!["Calm under pressure shows up differently here than anywhere else.".to_string()],
            career_angles: vec!["Humanitarian operations".to_string(), "Emergency management".to_string()],
            next_steps: vec!["Take a free incident-command basics course online.".to_string()],
            micro_experiments: vec!["Plan the full supply run for a hypothetical 72-hour shelter.".to_string()],
            neighbor_territories: vec!["Supply-chain planning".to_string()],
        },
    ]
}

/// Stable index derived from the leading insight text. Byte-sum keeps it
/// deterministic across runs, which hashing with `DefaultHasher` is not.
fn deterministic_index(key: &str, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let sum: usize = key.bytes().map(usize::from).sum();
    sum % len
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::domain::errors::GenerationError;

    /// Generator scripted with a fixed sequence of responses; repeats the
    /// last entry once exhausted.
    struct ScriptedGenerator {
        script: Mutex<Vec<Result<SuggestionCandidate, GenerationError>>>,
        requests: Mutex<Vec<CardRequest>>,
    }

    impl ScriptedGenerator {
        fn new(script: Vec<Result<SuggestionCandidate, GenerationError>>) -> Self {
            Self {
                script: Mutex::new(script),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<CardRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CardGenerator for ScriptedGenerator {
        async fn generate_card(
            &self,
            request: &CardRequest,
        ) -> Result<SuggestionCandidate, GenerationError> {
            self.requests.lock().unwrap().push(request.clone());
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.remove(0)
            } else {
                match script.first() {
                    Some(Ok(candidate)) => Ok(candidate.clone()),
                    Some(Err(_)) => Err(GenerationError::MalformedResponse("scripted".to_string())),
                    None => Err(GenerationError::MalformedResponse("empty script".to_string())),
                }
            }
        }
    }

    fn card(title: &str, summary: &str) -> SuggestionCandidate {
        SuggestionCandidate {
            title: title.to_string(),
            summary: summary.to_string(),
            ..Default::default()
        }
    }

    fn rugby_insights() -> Vec<Insight> {
        use crate::domain::models::InsightKind;
        vec![Insight::new(InsightKind::Interest, "rugby")]
    }

    #[tokio::test]
    async fn returns_one_card_per_tier_in_order() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Ok(card("Rugby coaching", "Coach local rugby teams through a season.")),
            Ok(card("Sports physiotherapy", "Help athletes recover and stay on the pitch.")),
            Ok(card("Marine navigation", "Plot courses and read weather far from any pitch.")),
        ]));
        let engine = SuggestionEngine::new(generator, SuggestionConfig::default());

        let cards = engine.generate(&rugby_insights(), &HashMap::new(), 3).await;
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].distance, DistanceTier::Core);
        assert_eq!(cards[1].distance, DistanceTier::Adjacent);
        assert_eq!(cards[2].distance, DistanceTier::Unexpected);
        assert!(cards[0].score > cards[1].score);
        assert!(cards[1].score > cards[2].score);
    }

    #[tokio::test]
    async fn no_insights_means_no_cards() {
        let generator = Arc::new(ScriptedGenerator::new(vec![]));
        let engine = SuggestionEngine::new(generator.clone(), SuggestionConfig::default());
        let cards = engine.generate(&[], &HashMap::new(), 3).await;
        assert!(cards.is_empty());
        assert!(generator.requests().is_empty());
    }

    #[tokio::test]
    async fn falls_back_after_budget_exhaustion() {
        // Service always returns the same card, so every tier after the
        // first rejects it as a duplicate and lands on the fallback.
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok(card(
            "Rugby coaching",
            "Coach local rugby teams through a season.",
        ))]));
        let engine = SuggestionEngine::new(generator.clone(), SuggestionConfig::default());

        let cards = engine.generate(&rugby_insights(), &HashMap::new(), 3).await;
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].title, "Rugby coaching");
        // Fallbacks for adjacent and unexpected tiers.
        assert_eq!(cards[1].title, "The world around rugby");

        // Attempts: 1 (core accepts) + 3 (adjacent budget) + 5 (unexpected).
        assert_eq!(generator.requests().len(), 9);
    }

    #[tokio::test]
    async fn service_errors_count_toward_budget() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Err(GenerationError::RateLimited),
            Err(GenerationError::MalformedResponse("bad json".to_string())),
            Ok(card("Rugby coaching", "Coach local rugby teams through a season.")),
        ]));
        let engine = SuggestionEngine::new(generator, SuggestionConfig::default());

        let cards = engine.generate(&rugby_insights(), &HashMap::new(), 1).await;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Rugby coaching");
    }

    #[tokio::test]
    async fn empty_titles_are_rejected() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Ok(card("", "No title on this one.")),
            Ok(card("Rugby coaching", "Coach local rugby teams through a season.")),
        ]));
        let engine = SuggestionEngine::new(generator, SuggestionConfig::default());

        let cards = engine.generate(&rugby_insights(), &HashMap::new(), 1).await;
        assert_eq!(cards[0].title, "Rugby coaching");
    }

    #[tokio::test]
    async fn avoided_titles_are_rejected_case_insensitively() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Ok(card("RUGBY COACHING", "Coach local rugby teams through a season.")),
            Ok(card("Sports journalism", "Write about the games people care about.")),
        ]));
        let engine = SuggestionEngine::new(generator, SuggestionConfig::default());

        let cards = engine
            .generate_avoiding(
                &rugby_insights(),
                &HashMap::new(),
                1,
                &["Rugby Coaching".to_string()],
            )
            .await;
        assert_eq!(cards[0].title, "Sports journalism");
    }

    #[tokio::test]
    async fn unexpected_tier_bans_dominant_keywords() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Ok(card("Core pick", "Something rugby flavored for the core tier.")),
            Ok(card("Adjacent pick", "A different direction entirely, about logistics.")),
            // Overlaps the dominant keywords ("rugby", "coaching") twice.
            Ok(card("Rugby coaching retreats", "Bring rugby coaching to the countryside.")),
            Ok(card("Glassblowing", "Shape molten glass in a shared studio.")),
        ]));
        let engine = SuggestionEngine::new(generator.clone(), SuggestionConfig::default());

        use crate::domain::models::InsightKind;
        let insights = vec![
            Insight::new(InsightKind::Interest, "rugby coaching"),
            Insight::new(InsightKind::Strength, "rugby coaching"),
        ];
        let cards = engine.generate(&insights, &HashMap::new(), 3).await;
        assert_eq!(cards[2].title, "Glassblowing");

        // The rejected candidate's own keywords were folded into the ban
        // list for the retry.
        let requests = generator.requests();
        let last = requests.last().unwrap();
        assert!(last.banned_keywords.contains(&"retreats".to_string()));
    }

    #[tokio::test]
    async fn abort_flag_skips_straight_to_fallback() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok(card(
            "Never used",
            "The abort flag should prevent this from being requested.",
        ))]));
        let flag = Arc::new(AtomicBool::new(true));
        let engine = SuggestionEngine::new(generator.clone(), SuggestionConfig::default())
            .with_abort_flag(flag);

        let cards = engine.generate(&rugby_insights(), &HashMap::new(), 3).await;
        assert_eq!(cards.len(), 3);
        assert!(generator.requests().is_empty());
        assert_eq!(cards[0].title, "Go deeper into rugby");
    }

    #[tokio::test]
    async fn no_two_cards_are_near_duplicates() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok(card(
            "Rugby coaching",
            "Coach local rugby teams through a season.",
        ))]));
        let engine = SuggestionEngine::new(generator, SuggestionConfig::default());

        let cards = engine.generate(&rugby_insights(), &HashMap::new(), 3).await;
        for (i, a) in cards.iter().enumerate() {
            for b in &cards[i + 1..] {
                let sim = jaccard(&token_set(&a.comparison_text()), &token_set(&b.comparison_text()));
                assert!(sim < 0.6, "cards '{}' and '{}' too similar ({sim})", a.title, b.title);
            }
        }
    }

    #[tokio::test]
    async fn fallback_skips_library_entries_that_collide_with_the_profile() {
        // "audio, making" indexes onto the audio-documentary library card,
        // which shares both dominant keywords with the profile; the walk
        // must move on to the next entry.
        let generator = Arc::new(ScriptedGenerator::new(vec![]));
        let engine = SuggestionEngine::new(generator, SuggestionConfig::default());

        use crate::domain::models::InsightKind;
        let insights = vec![Insight::new(InsightKind::Interest, "audio, making")];
        let cards = engine.generate(&insights, &HashMap::new(), 3).await;

        assert_eq!(cards.len(), 3);
        assert_eq!(cards[2].title, "Disaster-relief logistics");

        let dominant = dominant_keywords(&insights, 15);
        assert!(keyword_overlap(&cards[2].comparison_text(), &dominant) < 2);
    }

    #[test]
    fn fallback_is_deterministic() {
        let a = fallback_card(DistanceTier::Unexpected, "rugby");
        let b = fallback_card(DistanceTier::Unexpected, "rugby");
        assert_eq!(a, b);

        let core = fallback_card(DistanceTier::Core, "rugby");
        assert!(core.title.contains("rugby"));
    }
}
