//! Conversation phase and readiness engine.
//!
//! A deterministic, side-effect-free state machine over the five-phase
//! conversational progression. It is re-evaluated after every final
//! transcript turn, so the whole assessment is always derived fresh from
//! the current transcript/insight/vote snapshot rather than patched in
//! place. Every evaluation produces at least one human-readable rationale
//! string: decisions here must be auditable, not just logged.

use std::collections::HashSet;

use crate::domain::models::{
    CardReadiness, ConversationPhase, ConversationRubric, EnergyLevel, EngagementStyle, Insight,
    InsightCoverage, ReadinessBias, ReadinessStatus, RecommendedFocus, Role, TranscriptItem,
};

/// Turns of stalled engagement before story-mining seeds a teaser card.
const STORY_MINING_STALL_TURNS: usize = 6;
/// Turns of stalled engagement with zero cards before pattern-mapping does.
const PATTERN_MAPPING_STALL_TURNS: usize = 8;
/// Turns of stalled engagement with zero cards before option-seeding does.
const OPTION_SEEDING_STALL_TURNS: usize = 10;

/// Outcome of one phase evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseDecision {
    /// The phase the session should be in after this evaluation. Never
    /// more than one step forward from the current phase; backward only
    /// for the single documented commitment regression.
    pub next_phase: ConversationPhase,

    /// Human-readable explanations of the decision. Never empty.
    pub rationale: Vec<String>,

    /// True when a stalled conversation should be re-engaged with one
    /// unsolicited teaser suggestion, without changing phase.
    pub seed_teaser: bool,
}

/// Externally-classified signals about the dialogue, supplied alongside the
/// snapshot when recomputing the rubric. Classification itself (an
/// inference call) is out of scope here.
#[derive(Debug, Clone, Copy)]
pub struct RubricSignals {
    pub engagement_style: EngagementStyle,
    /// How much concrete context has accumulated, 0-3.
    pub context_depth: u8,
    pub energy_level: EnergyLevel,
    pub readiness_bias: ReadinessBias,
    pub explicit_ideas_request: bool,
}

/// Evaluates the phase transition function.
///
/// Deterministic and total over its input domain: identical inputs always
/// yield identical output, and every reachable input produces a decision.
pub fn evaluate(
    current: ConversationPhase,
    transcript: &[TranscriptItem],
    insights: &[Insight],
    suggestion_count: usize,
    vote_count: usize,
    rubric: &ConversationRubric,
) -> PhaseDecision {
    let user_turns = count_user_turns(transcript);
    let coverage = InsightCoverage::from_insights(insights);
    let stalled = rubric.engagement_style.is_stalled();

    match current {
        ConversationPhase::Warmup => evaluate_warmup(user_turns),
        ConversationPhase::StoryMining => {
            evaluate_story_mining(insights, &coverage, rubric, user_turns, stalled)
        }
        ConversationPhase::PatternMapping => evaluate_pattern_mapping(
            insights,
            &coverage,
            rubric,
            suggestion_count,
            vote_count,
            user_turns,
            stalled,
        ),
        ConversationPhase::OptionSeeding => {
            evaluate_option_seeding(rubric, suggestion_count, vote_count, user_turns, stalled)
        }
        ConversationPhase::Commitment => evaluate_commitment(vote_count, stalled),
    }
}

fn evaluate_warmup(user_turns: usize) -> PhaseDecision {
    if user_turns > 0 {
        PhaseDecision {
            next_phase: ConversationPhase::StoryMining,
            rationale: vec![format!(
                "First user turn observed ({user_turns} total); moving into story mining."
            )],
            seed_teaser: false,
        }
    } else {
        PhaseDecision {
            next_phase: ConversationPhase::Warmup,
            rationale: vec!["Awaiting first response from the user.".to_string()],
            seed_teaser: false,
        }
    }
}

fn evaluate_story_mining(
    insights: &[Insight],
    coverage: &InsightCoverage,
    rubric: &ConversationRubric,
    user_turns: usize,
    stalled: bool,
) -> PhaseDecision {
    let has_aspiration = insights.iter().any(|i| i.kind.is_aspiration());
    let has_constraint = insights.iter().any(|i| i.kind.is_constraint());
    let depth_ok = rubric.context_depth >= 2;

    if coverage.interests && coverage.aptitudes && has_aspiration && (has_constraint || depth_ok) {
        return PhaseDecision {
            next_phase: ConversationPhase::PatternMapping,
            rationale: vec![
                "Interests, strengths, and an aspiration signal are all covered.".to_string(),
                if has_constraint {
                    "A constraint signal is present.".to_string()
                } else {
                    format!("Context depth {} compensates for the missing constraint.", rubric.context_depth)
                },
            ],
            seed_teaser: false,
        };
    }

    if stalled && user_turns >= STORY_MINING_STALL_TURNS {
        return PhaseDecision {
            next_phase: ConversationPhase::StoryMining,
            rationale: vec![format!(
                "Engagement has been {} for {user_turns} turns without enough story signal; \
                 seeding one teaser card to re-engage.",
                engagement_label(rubric.engagement_style)
            )],
            seed_teaser: true,
        };
    }

    PhaseDecision {
        next_phase: ConversationPhase::StoryMining,
        rationale: vec![format!(
            "Still mining stories: missing {}.",
            describe_story_gaps(coverage, has_aspiration, has_constraint, depth_ok)
        )],
        seed_teaser: false,
    }
}

#[allow(clippy::too_many_arguments)]
fn evaluate_pattern_mapping(
    insights: &[Insight],
    coverage: &InsightCoverage,
    rubric: &ConversationRubric,
    suggestion_count: usize,
    vote_count: usize,
    user_turns: usize,
    stalled: bool,
) -> PhaseDecision {
    if rubric.explicit_ideas_request {
        return PhaseDecision {
            next_phase: ConversationPhase::OptionSeeding,
            rationale: vec!["The user explicitly asked for ideas.".to_string()],
            seed_teaser: false,
        };
    }
    if rubric.readiness_bias == ReadinessBias::SeekingOptions {
        return PhaseDecision {
            next_phase: ConversationPhase::OptionSeeding,
            rationale: vec!["Readiness bias has shifted to seeking options.".to_string()],
            seed_teaser: false,
        };
    }

    let distinct_kinds = insights
        .iter()
        .map(|i| i.kind)
        .collect::<HashSet<_>>()
        .len();
    let signal_ok = coverage.is_full() && (rubric.context_depth >= 2 || distinct_kinds >= 5);
    let momentum_ok =
        rubric.engagement_style == EngagementStyle::LeaningIn || vote_count >= 1;

    if signal_ok && momentum_ok {
        return PhaseDecision {
            next_phase: ConversationPhase::OptionSeeding,
            rationale: vec![
                format!(
                    "Full signal coverage at context depth {} ({distinct_kinds} distinct insight kinds).",
                    rubric.context_depth
                ),
                if vote_count >= 1 {
                    format!("{vote_count} vote(s) already cast.")
                } else {
                    "The user is leaning in.".to_string()
                },
            ],
            seed_teaser: false,
        };
    }

    if stalled && suggestion_count == 0 && user_turns >= PATTERN_MAPPING_STALL_TURNS {
        return PhaseDecision {
            next_phase: ConversationPhase::PatternMapping,
            rationale: vec![format!(
                "Engagement has been {} for {user_turns} turns with no cards shown; \
                 seeding one teaser card to re-engage.",
                engagement_label(rubric.engagement_style)
            )],
            seed_teaser: true,
        };
    }

    PhaseDecision {
        next_phase: ConversationPhase::PatternMapping,
        rationale: vec![if signal_ok {
            "Signal coverage is there, but momentum is not: the user is neither leaning in nor voting yet.".to_string()
        } else {
            format!(
                "Mapping patterns: coverage gaps {:?} at context depth {}.",
                coverage.gaps(),
                rubric.context_depth
            )
        }],
        seed_teaser: false,
    }
}

fn evaluate_option_seeding(
    rubric: &ConversationRubric,
    suggestion_count: usize,
    vote_count: usize,
    user_turns: usize,
    stalled: bool,
) -> PhaseDecision {
    if vote_count >= 1 && rubric.readiness_bias == ReadinessBias::Deciding {
        return PhaseDecision {
            next_phase: ConversationPhase::Commitment,
            rationale: vec![format!(
                "{vote_count} vote(s) cast and the user is ready to decide."
            )],
            seed_teaser: false,
        };
    }

    if stalled && suggestion_count == 0 && user_turns >= OPTION_SEEDING_STALL_TURNS {
        return PhaseDecision {
            next_phase: ConversationPhase::OptionSeeding,
            rationale: vec![format!(
                "Engagement has been {} for {user_turns} turns with no cards shown; \
                 seeding one teaser card to re-engage.",
                engagement_label(rubric.engagement_style)
            )],
            seed_teaser: true,
        };
    }

    PhaseDecision {
        next_phase: ConversationPhase::OptionSeeding,
        rationale: vec![if vote_count == 0 {
            "Seeding options: waiting for the user to react to a card.".to_string()
        } else {
            "Votes are in but the user is still exploring, not deciding.".to_string()
        }],
        seed_teaser: false,
    }
}

fn evaluate_commitment(vote_count: usize, stalled: bool) -> PhaseDecision {
    // The single allowed regression: commitment with no votes and a stalled
    // user means the session got here too early.
    if stalled && vote_count == 0 {
        return PhaseDecision {
            next_phase: ConversationPhase::PatternMapping,
            rationale: vec![
                "Commitment stalled with no votes cast; stepping back to pattern mapping to gather more context."
                    .to_string(),
            ],
            seed_teaser: false,
        };
    }

    PhaseDecision {
        next_phase: ConversationPhase::Commitment,
        rationale: vec!["Holding in commitment: narrowing toward next steps.".to_string()],
        seed_teaser: false,
    }
}

/// Computes card readiness, independently of phase but consistently with it.
///
/// `Ready` requires context depth >= 2, interests coverage, at least one of
/// aptitudes/goals, and present intent (an explicit request, or the phase
/// decision itself resolving to option seeding). The invariant holds for
/// arbitrary inputs, including contradictory ones: readiness is derived
/// only from the depth and coverage passed in.
pub fn assess_card_readiness(
    context_depth: u8,
    coverage: InsightCoverage,
    explicit_ideas_request: bool,
    resolves_to_option_seeding: bool,
) -> CardReadiness {
    let missing_signals = coverage.gaps();
    let signal_ok = context_depth >= 2 && coverage.interests && (coverage.aptitudes || coverage.goals);
    let intent_ok = explicit_ideas_request || resolves_to_option_seeding;

    if signal_ok && intent_ok {
        CardReadiness {
            status: ReadinessStatus::Ready,
            missing_signals,
            reason: None,
        }
    } else if context_depth >= 1 {
        CardReadiness {
            status: ReadinessStatus::ContextLight,
            missing_signals,
            reason: Some(if signal_ok {
                "Signals are sufficient but the user has not asked for options yet.".to_string()
            } else {
                "More context is needed before cards would land well.".to_string()
            }),
        }
    } else {
        CardReadiness {
            status: ReadinessStatus::Blocked,
            missing_signals,
            reason: Some("Too little context to generate suggestions.".to_string()),
        }
    }
}

/// Recomputes the full rubric from a snapshot.
///
/// Always built fresh, never patched: the rubric cannot drift from the
/// conversation it describes.
pub fn recompute_rubric(
    signals: RubricSignals,
    current_phase: ConversationPhase,
    transcript: &[TranscriptItem],
    insights: &[Insight],
    suggestion_count: usize,
    vote_count: usize,
) -> (ConversationRubric, PhaseDecision) {
    let coverage = InsightCoverage::from_insights(insights);

    // Provisional rubric so the transition function can run; it reads only
    // the classified signals, never card readiness.
    let provisional = ConversationRubric {
        engagement_style: signals.engagement_style,
        context_depth: signals.context_depth,
        energy_level: signals.energy_level,
        readiness_bias: signals.readiness_bias,
        explicit_ideas_request: signals.explicit_ideas_request,
        insight_coverage: coverage,
        insight_gaps: coverage.gaps(),
        card_readiness: CardReadiness {
            status: ReadinessStatus::Blocked,
            missing_signals: Vec::new(),
            reason: None,
        },
        recommended_focus: RecommendedFocus::Rapport,
    };

    let decision = evaluate(
        current_phase,
        transcript,
        insights,
        suggestion_count,
        vote_count,
        &provisional,
    );

    let card_readiness = assess_card_readiness(
        signals.context_depth,
        coverage,
        signals.explicit_ideas_request,
        decision.next_phase == ConversationPhase::OptionSeeding,
    );

    let rubric = ConversationRubric {
        card_readiness,
        recommended_focus: focus_for_phase(decision.next_phase),
        ..provisional
    };

    (rubric, decision)
}

fn focus_for_phase(phase: ConversationPhase) -> RecommendedFocus {
    match phase {
        ConversationPhase::Warmup => RecommendedFocus::Rapport,
        ConversationPhase::StoryMining => RecommendedFocus::Story,
        ConversationPhase::PatternMapping => RecommendedFocus::Pattern,
        ConversationPhase::OptionSeeding => RecommendedFocus::Ideation,
        ConversationPhase::Commitment => RecommendedFocus::Decision,
    }
}

fn count_user_turns(transcript: &[TranscriptItem]) -> usize {
    transcript
        .iter()
        .filter(|item| item.role == Role::User && item.is_final)
        .count()
}

fn engagement_label(style: EngagementStyle) -> &'static str {
    match style {
        EngagementStyle::LeaningIn => "leaning-in",
        EngagementStyle::Hesitant => "hesitant",
        EngagementStyle::Blocked => "blocked",
        EngagementStyle::SeekingOptions => "seeking-options",
    }
}

fn describe_story_gaps(
    coverage: &InsightCoverage,
    has_aspiration: bool,
    has_constraint: bool,
    depth_ok: bool,
) -> String {
    let mut gaps = Vec::new();
    if !coverage.interests {
        gaps.push("an interest");
    }
    if !coverage.aptitudes {
        gaps.push("a strength");
    }
    if !has_aspiration {
        gaps.push("an aspiration signal");
    }
    if !has_constraint && !depth_ok {
        gaps.push("a constraint or deeper context");
    }
    if gaps.is_empty() {
        "nothing, re-evaluating next turn".to_string()
    } else {
        gaps.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::InsightKind;

    fn rubric_with(
        engagement: EngagementStyle,
        depth: u8,
        bias: ReadinessBias,
        explicit: bool,
    ) -> ConversationRubric {
        ConversationRubric {
            engagement_style: engagement,
            context_depth: depth,
            energy_level: EnergyLevel::Medium,
            readiness_bias: bias,
            explicit_ideas_request: explicit,
            insight_coverage: InsightCoverage::default(),
            insight_gaps: Vec::new(),
            card_readiness: CardReadiness {
                status: ReadinessStatus::Blocked,
                missing_signals: Vec::new(),
                reason: None,
            },
            recommended_focus: RecommendedFocus::Rapport,
        }
    }

    fn user_turn(id: &str) -> TranscriptItem {
        TranscriptItem::finalized(id.to_string(), Role::User, format!("turn {id}"))
    }

    #[test]
    fn warmup_waits_for_first_user_turn() {
        let rubric = rubric_with(EngagementStyle::Hesitant, 0, ReadinessBias::Exploring, false);
        let decision = evaluate(ConversationPhase::Warmup, &[], &[], 0, 0, &rubric);
        assert_eq!(decision.next_phase, ConversationPhase::Warmup);
        assert!(decision.rationale[0].contains("Awaiting first response"));
        assert!(!decision.seed_teaser);
    }

    #[test]
    fn warmup_advances_on_any_user_turn() {
        let rubric = rubric_with(EngagementStyle::Hesitant, 0, ReadinessBias::Exploring, false);
        let transcript = vec![user_turn("u1")];
        let decision = evaluate(ConversationPhase::Warmup, &transcript, &[], 0, 0, &rubric);
        assert_eq!(decision.next_phase, ConversationPhase::StoryMining);
    }

    #[test]
    fn story_mining_needs_interest_strength_aspiration() {
        let rubric = rubric_with(EngagementStyle::LeaningIn, 2, ReadinessBias::Exploring, false);
        let transcript = vec![user_turn("u1")];

        let partial = vec![Insight::new(InsightKind::Interest, "rugby")];
        let decision =
            evaluate(ConversationPhase::StoryMining, &transcript, &partial, 0, 0, &rubric);
        assert_eq!(decision.next_phase, ConversationPhase::StoryMining);

        let full = vec![
            Insight::new(InsightKind::Interest, "rugby"),
            Insight::new(InsightKind::Strength, "team captain"),
            Insight::new(InsightKind::Hope, "stay close to sport"),
        ];
        let decision = evaluate(ConversationPhase::StoryMining, &transcript, &full, 0, 0, &rubric);
        assert_eq!(decision.next_phase, ConversationPhase::PatternMapping);
        assert!(!decision.rationale.is_empty());
    }

    #[test]
    fn story_mining_constraint_substitutes_for_depth() {
        let rubric = rubric_with(EngagementStyle::LeaningIn, 1, ReadinessBias::Exploring, false);
        let transcript = vec![user_turn("u1")];
        let insights = vec![
            Insight::new(InsightKind::Interest, "rugby"),
            Insight::new(InsightKind::Strength, "team captain"),
            Insight::new(InsightKind::Goal, "coach someday"),
            Insight::new(InsightKind::Constraint, "must stay local"),
        ];
        let decision =
            evaluate(ConversationPhase::StoryMining, &transcript, &insights, 0, 0, &rubric);
        assert_eq!(decision.next_phase, ConversationPhase::PatternMapping);
    }

    #[test]
    fn story_mining_stall_seeds_teaser_without_phase_change() {
        let rubric = rubric_with(EngagementStyle::Blocked, 1, ReadinessBias::Exploring, false);
        let transcript: Vec<_> = (0..6).map(|i| user_turn(&format!("u{i}"))).collect();
        let decision = evaluate(ConversationPhase::StoryMining, &transcript, &[], 0, 0, &rubric);
        assert_eq!(decision.next_phase, ConversationPhase::StoryMining);
        assert!(decision.seed_teaser);
    }

    #[test]
    fn pattern_mapping_advances_on_explicit_request() {
        let rubric = rubric_with(EngagementStyle::Hesitant, 3, ReadinessBias::Exploring, true);
        let decision = evaluate(ConversationPhase::PatternMapping, &[], &[], 0, 0, &rubric);
        assert_eq!(decision.next_phase, ConversationPhase::OptionSeeding);
    }

    #[test]
    fn pattern_mapping_advances_on_seeking_options_bias() {
        let rubric =
            rubric_with(EngagementStyle::Hesitant, 0, ReadinessBias::SeekingOptions, false);
        let decision = evaluate(ConversationPhase::PatternMapping, &[], &[], 0, 0, &rubric);
        assert_eq!(decision.next_phase, ConversationPhase::OptionSeeding);
    }

    #[test]
    fn pattern_mapping_full_coverage_needs_momentum() {
        let transcript = vec![user_turn("u1")];
        let insights = vec![
            Insight::new(InsightKind::Interest, "rugby"),
            Insight::new(InsightKind::Strength, "team captain"),
            Insight::new(InsightKind::Goal, "coach someday"),
            Insight::new(InsightKind::Constraint, "must stay local"),
        ];

        let hesitant = rubric_with(EngagementStyle::Hesitant, 2, ReadinessBias::Exploring, false);
        let decision =
            evaluate(ConversationPhase::PatternMapping, &transcript, &insights, 0, 0, &hesitant);
        assert_eq!(decision.next_phase, ConversationPhase::PatternMapping);

        let leaning = rubric_with(EngagementStyle::LeaningIn, 2, ReadinessBias::Exploring, false);
        let decision =
            evaluate(ConversationPhase::PatternMapping, &transcript, &insights, 0, 0, &leaning);
        assert_eq!(decision.next_phase, ConversationPhase::OptionSeeding);

        // A cast vote substitutes for leaning-in engagement.
        let decision =
            evaluate(ConversationPhase::PatternMapping, &transcript, &insights, 1, 1, &hesitant);
        assert_eq!(decision.next_phase, ConversationPhase::OptionSeeding);
    }

    #[test]
    fn pattern_mapping_stall_seeds_teaser_only_with_zero_cards() {
        let rubric = rubric_with(EngagementStyle::Blocked, 1, ReadinessBias::Exploring, false);
        let transcript: Vec<_> = (0..8).map(|i| user_turn(&format!("u{i}"))).collect();

        let decision = evaluate(ConversationPhase::PatternMapping, &transcript, &[], 0, 0, &rubric);
        assert!(decision.seed_teaser);

        let decision = evaluate(ConversationPhase::PatternMapping, &transcript, &[], 2, 0, &rubric);
        assert!(!decision.seed_teaser);
    }

    #[test]
    fn option_seeding_needs_vote_and_deciding_bias() {
        let exploring = rubric_with(EngagementStyle::LeaningIn, 3, ReadinessBias::Exploring, false);
        let decision = evaluate(ConversationPhase::OptionSeeding, &[], &[], 3, 1, &exploring);
        assert_eq!(decision.next_phase, ConversationPhase::OptionSeeding);

        let deciding = rubric_with(EngagementStyle::LeaningIn, 3, ReadinessBias::Deciding, false);
        let decision = evaluate(ConversationPhase::OptionSeeding, &[], &[], 3, 0, &deciding);
        assert_eq!(decision.next_phase, ConversationPhase::OptionSeeding);

        let decision = evaluate(ConversationPhase::OptionSeeding, &[], &[], 3, 1, &deciding);
        assert_eq!(decision.next_phase, ConversationPhase::Commitment);
    }

    #[test]
    fn commitment_regresses_only_when_stalled_and_voteless() {
        let stalled = rubric_with(EngagementStyle::Blocked, 3, ReadinessBias::Deciding, false);
        let decision = evaluate(ConversationPhase::Commitment, &[], &[], 3, 0, &stalled);
        assert_eq!(decision.next_phase, ConversationPhase::PatternMapping);

        let decision = evaluate(ConversationPhase::Commitment, &[], &[], 3, 1, &stalled);
        assert_eq!(decision.next_phase, ConversationPhase::Commitment);

        let engaged = rubric_with(EngagementStyle::LeaningIn, 3, ReadinessBias::Deciding, false);
        let decision = evaluate(ConversationPhase::Commitment, &[], &[], 3, 0, &engaged);
        assert_eq!(decision.next_phase, ConversationPhase::Commitment);
    }

    #[test]
    fn every_decision_has_a_rationale() {
        let rubric = rubric_with(EngagementStyle::Hesitant, 0, ReadinessBias::Exploring, false);
        for phase in [
            ConversationPhase::Warmup,
            ConversationPhase::StoryMining,
            ConversationPhase::PatternMapping,
            ConversationPhase::OptionSeeding,
            ConversationPhase::Commitment,
        ] {
            let decision = evaluate(phase, &[], &[], 0, 0, &rubric);
            assert!(!decision.rationale.is_empty(), "{phase:?} produced no rationale");
        }
    }

    #[test]
    fn readiness_requires_depth_interests_and_one_of_aptitudes_goals() {
        let full = InsightCoverage {
            interests: true,
            aptitudes: true,
            goals: true,
            constraints: true,
        };

        let ready = assess_card_readiness(2, full, true, false);
        assert_eq!(ready.status, ReadinessStatus::Ready);

        // Shallow context can never be ready, whatever the other flags say.
        let shallow = assess_card_readiness(1, full, true, true);
        assert_eq!(shallow.status, ReadinessStatus::ContextLight);

        let no_interests = InsightCoverage {
            interests: false,
            ..full
        };
        let blocked_interest = assess_card_readiness(3, no_interests, true, true);
        assert_ne!(blocked_interest.status, ReadinessStatus::Ready);
    }

    #[test]
    fn readiness_requires_intent() {
        let full = InsightCoverage {
            interests: true,
            aptitudes: true,
            goals: true,
            constraints: true,
        };
        let no_intent = assess_card_readiness(3, full, false, false);
        assert_eq!(no_intent.status, ReadinessStatus::ContextLight);

        let via_phase = assess_card_readiness(3, full, false, true);
        assert_eq!(via_phase.status, ReadinessStatus::Ready);
    }

    #[test]
    fn readiness_blocked_at_zero_depth() {
        let readiness = assess_card_readiness(0, InsightCoverage::default(), false, false);
        assert_eq!(readiness.status, ReadinessStatus::Blocked);
        assert_eq!(readiness.missing_signals.len(), 4);
    }

    #[test]
    fn recompute_rubric_assembles_consistent_state() {
        let transcript = vec![user_turn("u1")];
        let insights = vec![
            Insight::new(InsightKind::Interest, "rugby"),
            Insight::new(InsightKind::Strength, "team captain"),
            Insight::new(InsightKind::Goal, "coach someday"),
            Insight::new(InsightKind::Constraint, "must stay local"),
        ];
        let signals = RubricSignals {
            engagement_style: EngagementStyle::LeaningIn,
            context_depth: 3,
            energy_level: EnergyLevel::High,
            readiness_bias: ReadinessBias::Exploring,
            explicit_ideas_request: true,
        };

        let (rubric, decision) = recompute_rubric(
            signals,
            ConversationPhase::PatternMapping,
            &transcript,
            &insights,
            0,
            0,
        );
        assert_eq!(decision.next_phase, ConversationPhase::OptionSeeding);
        assert_eq!(rubric.card_readiness.status, ReadinessStatus::Ready);
        assert_eq!(rubric.recommended_focus, RecommendedFocus::Ideation);
        assert!(rubric.insight_gaps.is_empty());
    }

    #[test]
    fn evaluation_is_deterministic() {
        let rubric = rubric_with(EngagementStyle::Blocked, 1, ReadinessBias::Exploring, false);
        let transcript: Vec<_> = (0..7).map(|i| user_turn(&format!("u{i}"))).collect();
        let a = evaluate(ConversationPhase::StoryMining, &transcript, &[], 0, 0, &rubric);
        let b = evaluate(ConversationPhase::StoryMining, &transcript, &[], 0, 0, &rubric);
        assert_eq!(a, b);
    }
}
