//! Candidate event generation.
//!
//! Every rule is a record: an event type, a list of conditions that must all
//! hold, and a hand-assigned `(confidence, impact_score)` pair. Rules never see
//! each other's results, so any number of them may fire for one text.

use std::sync::LazyLock;

use cryptonews_core::EventType;

use crate::assets::is_crypto_related;
use crate::cues::CueSet;

/// One hypothesis about the primary event of a text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateEvent {
    pub event_type: EventType,
    pub confidence: f64,
    pub impact_score: f64,
}

impl CandidateEvent {
    /// Build a candidate, clamping both scores into `[0, 1]`.
    pub fn new(event_type: EventType, confidence: f64, impact_score: f64) -> Self {
        Self {
            event_type,
            confidence: clamp_unit(confidence),
            impact_score: clamp_unit(impact_score),
        }
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

// ── Fallbacks ──

pub const MISC_CONFIDENCE: f64 = 0.45;
pub const MISC_IMPACT: f64 = 0.25;
pub const UNKNOWN_CONFIDENCE: f64 = 0.40;
pub const UNKNOWN_IMPACT: f64 = 0.20;

/// The candidate used when no rule fires.
pub fn fallback_candidate(text: &str) -> CandidateEvent {
    if is_crypto_related(text) {
        CandidateEvent::new(EventType::MiscOther, MISC_CONFIDENCE, MISC_IMPACT)
    } else {
        CandidateEvent::new(EventType::Unknown, UNKNOWN_CONFIDENCE, UNKNOWN_IMPACT)
    }
}

// ── Rule table ──

enum Cue {
    Terms(&'static [&'static str]),
    CryptoRelated,
    /// Either crypto-related or naming one of the terms.
    CryptoOr(&'static [&'static str]),
}

struct Rule {
    event_type: EventType,
    requires: &'static [Cue],
    confidence: f64,
    impact_score: f64,
}

const REGULATORS: &[&str] = &[
    "sec", "cftc", "doj", "finra", "fca", "esma", "ofac", "regulator*", "watchdog*",
];

const STABLECOIN: &[&str] = &["stablecoin*"];
const ETF: &[&str] = &["etf", "etfs"];
const IPO: &[&str] = &["ipo", "ipos"];
const TOKENIZED: &[&str] = &["tokeniz*", "tokenis*"];

const RULES: &[Rule] = &[
    Rule {
        event_type: EventType::SecurityIncident,
        requires: &[Cue::Terms(&[
            "hack", "hacks", "hacked", "hacker*", "hacking", "exploit*", "breach*", "drained",
            "stolen",
        ])],
        confidence: 0.70,
        impact_score: 0.90,
    },
    Rule {
        event_type: EventType::CryptoRegulationRestriction,
        requires: &[
            Cue::Terms(&[
                "lawsuit*",
                "sue",
                "sues",
                "sued",
                "suing",
                "charges",
                "charged",
                "indict*",
                "ban",
                "bans",
                "banned",
                "banning",
                "prohibit*",
                "restriction*",
                "restricted",
                "crackdown*",
                "fined",
                "penalty",
                "penalties",
                "settlement*",
                "settled",
                "investigation*",
                "investigating",
                "probe*",
                "subpoena*",
                "cease-and-desist",
                "cease and desist",
            ]),
            Cue::Terms(REGULATORS),
        ],
        confidence: 0.72,
        impact_score: 0.85,
    },
    Rule {
        event_type: EventType::RegulatoryGuidance,
        requires: &[
            Cue::Terms(&[
                "guidance",
                "guideline*",
                "clarified",
                "clarifies",
                "clarify",
                "rule",
                "rules",
                "framework*",
                "consultation*",
                "bill",
                "draft bill",
                "legislation",
                "policy",
                "policies",
            ]),
            Cue::CryptoOr(REGULATORS),
        ],
        confidence: 0.66,
        impact_score: 0.65,
    },
    Rule {
        event_type: EventType::CryptoPolicyMeeting,
        requires: &[
            Cue::Terms(&["meeting*", "summit*", "hearing*", "roundtable*"]),
            Cue::Terms(REGULATORS),
        ],
        confidence: 0.62,
        impact_score: 0.55,
    },
    Rule {
        event_type: EventType::StablecoinDepeg,
        requires: &[Cue::Terms(&[
            "depeg*",
            "de-peg*",
            "lost its peg",
            "lose its peg",
            "loses its peg",
            "broke its peg",
            "breaks its peg",
            "unpegged",
        ])],
        confidence: 0.70,
        impact_score: 0.80,
    },
    Rule {
        event_type: EventType::StablecoinLaunch,
        requires: &[
            Cue::Terms(STABLECOIN),
            Cue::Terms(&["launch", "launched", "launches", "launching", "introduc*", "unveil*"]),
        ],
        confidence: 0.70,
        impact_score: 0.70,
    },
    Rule {
        event_type: EventType::StablecoinReserveUpdate,
        requires: &[
            Cue::Terms(STABLECOIN),
            Cue::Terms(&["reserve", "reserves", "attestation*", "audit*"]),
        ],
        confidence: 0.68,
        impact_score: 0.65,
    },
    Rule {
        event_type: EventType::StablecoinImpactWarning,
        requires: &[
            Cue::Terms(STABLECOIN),
            Cue::Terms(&["warn*", "risk", "risks", "threat*", "impact*"]),
        ],
        confidence: 0.60,
        impact_score: 0.55,
    },
    Rule {
        event_type: EventType::EtfActivity,
        requires: &[
            Cue::Terms(ETF),
            Cue::Terms(&[
                "approv*",
                "reject*",
                "denied",
                "denies",
                "disapprov*",
                "filing*",
                "filed",
                "files",
                "19b-4",
                "s-1",
                "inflow*",
                "outflow*",
            ]),
        ],
        confidence: 0.68,
        impact_score: 0.70,
    },
    Rule {
        event_type: EventType::FundRaise,
        requires: &[Cue::Terms(&[
            "series a",
            "series b",
            "series c",
            "series d",
            "funding round",
            "seed round",
            "raised",
            "raises",
            "fundrais*",
            "venture",
        ])],
        confidence: 0.65,
        impact_score: 0.60,
    },
    Rule {
        event_type: EventType::StrategicInvestment,
        requires: &[Cue::Terms(&[
            "strategic investment*",
            "invest",
            "invests",
            "invested",
            "investment",
            "investments",
            "took a stake",
            "takes a stake",
            "minority stake",
            "equity stake",
        ])],
        confidence: 0.60,
        impact_score: 0.55,
    },
    Rule {
        event_type: EventType::CorporateBitcoinPurchase,
        requires: &[
            Cue::Terms(&["bitcoin*", "btc"]),
            Cue::Terms(&["purchase*", "buy", "buys", "bought", "acquire*", "added", "adds"]),
            Cue::Terms(&[
                "company",
                "companies",
                "firm",
                "firms",
                "treasury",
                "treasuries",
                "strategy",
            ]),
        ],
        confidence: 0.66,
        impact_score: 0.60,
    },
    Rule {
        event_type: EventType::IpoFiling,
        requires: &[
            Cue::Terms(IPO),
            Cue::Terms(&["filed", "files", "filing*", "f-1", "s-1"]),
        ],
        confidence: 0.70,
        impact_score: 0.60,
    },
    Rule {
        event_type: EventType::IpoPlanning,
        requires: &[
            Cue::Terms(IPO),
            Cue::Terms(&[
                "plan",
                "plans",
                "planning",
                "considering",
                "exploring",
                "mull*",
                "weigh*",
                "eyes",
            ]),
        ],
        confidence: 0.62,
        impact_score: 0.50,
    },
    Rule {
        event_type: EventType::IpoMarketDebut,
        requires: &[
            Cue::Terms(IPO),
            Cue::Terms(&["debut*", "began trading", "begins trading", "priced", "listed"]),
        ],
        confidence: 0.68,
        impact_score: 0.55,
    },
    Rule {
        event_type: EventType::TokenizedAssetVolumeSurge,
        requires: &[
            Cue::Terms(TOKENIZED),
            Cue::Terms(&["volume*", "surge", "surged", "surges", "surging", "soar*"]),
        ],
        confidence: 0.65,
        impact_score: 0.55,
    },
    Rule {
        event_type: EventType::TokenizedEquitiesStrategy,
        requires: &[
            Cue::Terms(TOKENIZED),
            Cue::Terms(&["stock", "stocks", "equity", "equities", "shares"]),
        ],
        confidence: 0.65,
        impact_score: 0.55,
    },
    Rule {
        event_type: EventType::CryptoExchangeProductExpansion,
        requires: &[
            Cue::Terms(&["exchange*"]),
            Cue::Terms(&[
                "launch",
                "launched",
                "launches",
                "roll out",
                "rolled out",
                "rolls out",
                "product*",
                "derivative*",
                "options",
                "perpetual*",
                "futures",
            ]),
        ],
        confidence: 0.60,
        impact_score: 0.50,
    },
    Rule {
        event_type: EventType::CryptoPaymentsCompanyUpdate,
        requires: &[Cue::Terms(&["payment*", "settlement*"]), Cue::CryptoRelated],
        confidence: 0.58,
        impact_score: 0.45,
    },
    Rule {
        event_type: EventType::NetworkValidatorDecline,
        requires: &[
            Cue::Terms(&["validator*"]),
            Cue::Terms(&["decline*", "declining", "drop*", "fell", "fallen", "down"]),
        ],
        confidence: 0.65,
        impact_score: 0.55,
    },
    Rule {
        event_type: EventType::ProtocolUpgrade,
        requires: &[Cue::Terms(&["hard fork*", "soft fork*"])],
        confidence: 0.62,
        impact_score: 0.50,
    },
    Rule {
        event_type: EventType::ProtocolUpgrade,
        requires: &[
            Cue::Terms(&["upgrade*"]),
            Cue::Terms(&[
                "mainnet",
                "testnet",
                "network*",
                "protocol*",
                "blockchain*",
                "chain",
                "ethereum",
                "bitcoin",
                "solana",
                "layer 2",
                "layer-2",
            ]),
        ],
        confidence: 0.62,
        impact_score: 0.50,
    },
    Rule {
        event_type: EventType::MiningDisruption,
        requires: &[
            Cue::Terms(&["miner", "miners", "mining"]),
            Cue::Terms(&[
                "shutdown*",
                "shut down",
                "shuts down",
                "shutting down",
                "halt*",
                "suspend*",
                "offline",
                "curtail*",
            ]),
        ],
        confidence: 0.62,
        impact_score: 0.55,
    },
    Rule {
        event_type: EventType::CryptoMarketVolatility,
        requires: &[
            Cue::CryptoRelated,
            Cue::Terms(&[
                "volatil*",
                "sell-off*",
                "selloff*",
                "plunge*",
                "plunging",
                "dump*",
                "rally",
                "rallies",
                "rallied",
                "surge",
                "surged",
                "surges",
                "surging",
                "crash*",
                "tumbl*",
                "slump*",
            ]),
        ],
        confidence: 0.58,
        impact_score: 0.55,
    },
    Rule {
        event_type: EventType::MacroMarketShock,
        requires: &[Cue::Terms(&[
            "fed",
            "federal reserve",
            "interest rate*",
            "rate cut*",
            "rate hike*",
            "inflation",
            "recession*",
            "jobs report",
            "tariff*",
        ])],
        confidence: 0.55,
        impact_score: 0.50,
    },
];

// ── Compiled rules ──

enum Condition {
    Terms(CueSet),
    CryptoRelated,
    CryptoOr(CueSet),
}

impl Condition {
    fn holds(&self, text: &str, crypto: bool) -> bool {
        match self {
            Condition::Terms(cues) => cues.is_match(text),
            Condition::CryptoRelated => crypto,
            Condition::CryptoOr(cues) => crypto || cues.is_match(text),
        }
    }
}

struct CompiledRule {
    event_type: EventType,
    conditions: Vec<Condition>,
    confidence: f64,
    impact_score: f64,
}

static COMPILED: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|rule| CompiledRule {
            event_type: rule.event_type,
            conditions: rule
                .requires
                .iter()
                .map(|cue| match cue {
                    Cue::Terms(terms) => Condition::Terms(CueSet::new(terms)),
                    Cue::CryptoRelated => Condition::CryptoRelated,
                    Cue::CryptoOr(terms) => Condition::CryptoOr(CueSet::new(terms)),
                })
                .collect(),
            confidence: rule.confidence,
            impact_score: rule.impact_score,
        })
        .collect()
});

/// Run every rule against the text and collect what fires.
///
/// Matching is case-insensitive. An empty result means no rule applies; the
/// caller falls back via [`fallback_candidate`].
pub fn generate_candidates(text: &str) -> Vec<CandidateEvent> {
    let crypto = is_crypto_related(text);
    COMPILED
        .iter()
        .filter(|rule| rule.conditions.iter().all(|c| c.holds(text, crypto)))
        .map(|rule| CandidateEvent::new(rule.event_type, rule.confidence, rule.impact_score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(text: &str) -> Vec<EventType> {
        generate_candidates(text).into_iter().map(|c| c.event_type).collect()
    }

    #[test]
    fn scores_are_clamped() {
        let c = CandidateEvent::new(EventType::FundRaise, 1.4, -0.2);
        assert_eq!(c.confidence, 1.0);
        assert_eq!(c.impact_score, 0.0);
        assert_eq!(CandidateEvent::new(EventType::FundRaise, f64::NAN, 0.5).confidence, 0.0);
    }

    #[test]
    fn rule_table_scores_in_range() {
        for rule in RULES {
            assert!((0.0..=1.0).contains(&rule.confidence), "{}", rule.event_type);
            assert!((0.0..=1.0).contains(&rule.impact_score), "{}", rule.event_type);
            assert!(!rule.event_type.is_fallback());
        }
    }

    #[test]
    fn enforcement_needs_regulator() {
        let enforcement = EventType::CryptoRegulationRestriction;
        assert!(types("The SEC sued the exchange").contains(&enforcement));
        assert!(types("the sec sued the exchange").contains(&enforcement));
        assert!(!types("Neighbour sued the builder").contains(&enforcement));
    }

    #[test]
    fn multiple_rules_may_fire() {
        let fired = types("The U.S. SEC clarified rules for tokenized stocks.");
        assert!(fired.contains(&EventType::RegulatoryGuidance));
        assert!(fired.contains(&EventType::TokenizedEquitiesStrategy));
    }

    #[test]
    fn security_rule_fires_alone() {
        let cands = generate_candidates("Hackers drained funds from a payments app wallet");
        let security = cands
            .iter()
            .find(|c| c.event_type == EventType::SecurityIncident)
            .expect("security candidate");
        assert!(security.impact_score >= 0.9);
        assert!(cands.iter().any(|c| c.event_type == EventType::CryptoPaymentsCompanyUpdate));
    }

    #[test]
    fn etf_activity_requires_activity_word() {
        assert!(types("Bitcoin ETF saw inflows").contains(&EventType::EtfActivity));
        assert!(!types("An ETF primer").contains(&EventType::EtfActivity));
    }

    #[test]
    fn word_boundaries_prevent_false_fires() {
        // "bank" is not "ban", "profit" is not "fed".
        assert!(types("Bank profit rose for the SEC filer").is_empty());
    }

    #[test]
    fn no_candidates_for_unrelated_text() {
        assert!(generate_candidates("I ate breakfast and went for a walk.").is_empty());
    }

    #[test]
    fn fallback_depends_on_crypto_relevance() {
        let misc = fallback_candidate("Crypto Twitter argues over memes");
        assert_eq!(misc.event_type, EventType::MiscOther);
        assert_eq!((misc.confidence, misc.impact_score), (MISC_CONFIDENCE, MISC_IMPACT));

        let unknown = fallback_candidate("I ate breakfast and went for a walk.");
        assert_eq!(unknown.event_type, EventType::Unknown);
        assert_eq!(
            (unknown.confidence, unknown.impact_score),
            (UNKNOWN_CONFIDENCE, UNKNOWN_IMPACT)
        );
    }

    #[test]
    fn generation_is_deterministic() {
        let text = "Coinbase launches perpetual futures as bitcoin rallies";
        assert_eq!(generate_candidates(text), generate_candidates(text));
    }
}
