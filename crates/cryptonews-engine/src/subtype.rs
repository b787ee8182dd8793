//! Dotted subtype labels, keyed by event type.
//!
//! Each branch is an ordered cascade of `(cues, label)` steps; the first step
//! whose cues match wins, otherwise the branch default applies.

use std::sync::LazyLock;

use cryptonews_core::EventType;

use crate::cues::CueSet;

struct Branch {
    event_type: EventType,
    cascade: &'static [(&'static [&'static str], &'static str)],
    default: Option<&'static str>,
}

const fn fixed(event_type: EventType, label: &'static str) -> Branch {
    Branch {
        event_type,
        cascade: &[],
        default: Some(label),
    }
}

const BRANCHES: &[Branch] = &[
    Branch {
        event_type: EventType::SecurityIncident,
        cascade: &[
            (&["breach*"], "security.exchange_hack.breach"),
            (&["exploit*"], "security.exchange_hack.exploit"),
            (
                &["hack", "hacks", "hacked", "hacker*", "hacking", "drained", "stolen"],
                "security.exchange_hack.hack",
            ),
        ],
        default: None,
    },
    Branch {
        event_type: EventType::CryptoRegulationRestriction,
        cascade: &[
            (
                &["lawsuit*", "sue", "sues", "sued", "suing"],
                "regulation.enforcement.lawsuit",
            ),
            (
                &["fine", "fines", "fined", "penalty", "penalties"],
                "regulation.enforcement.fine",
            ),
            (
                &["settlement*", "settled", "settles", "settle"],
                "regulation.enforcement.settlement",
            ),
            (
                &[
                    "ban", "bans", "banned", "banning", "prohibit*", "restriction*", "restricted",
                    "crackdown*",
                ],
                "regulation.restriction",
            ),
            (
                &["investigat*", "probe*", "subpoena*"],
                "regulation.enforcement.investigation",
            ),
            (
                &["cease-and-desist", "cease and desist"],
                "regulation.enforcement.cease_and_desist",
            ),
            (
                &["charges", "charged", "indict*"],
                "regulation.enforcement.charges",
            ),
        ],
        default: None,
    },
    Branch {
        event_type: EventType::RegulatoryGuidance,
        cascade: &[
            (
                &[
                    "bill",
                    "draft bill",
                    "legislation",
                    "policy",
                    "policies",
                    "framework*",
                    "consultation*",
                ],
                "regulation.policy",
            ),
            (
                &["guidance", "guideline*", "clarif*", "rule", "rules"],
                "regulation.guidance",
            ),
        ],
        default: None,
    },
    fixed(EventType::CryptoPolicyMeeting, "regulation.policy.meeting"),
    Branch {
        event_type: EventType::StablecoinLaunch,
        cascade: &[(&["registered", "registration"], "stablecoin.launch.registered")],
        default: Some("stablecoin.launch"),
    },
    fixed(EventType::StablecoinReserveUpdate, "stablecoin.reserves.update"),
    fixed(EventType::StablecoinImpactWarning, "stablecoin.risk.warning"),
    fixed(EventType::StablecoinDepeg, "stablecoin.depeg"),
    Branch {
        event_type: EventType::EtfActivity,
        cascade: &[
            (&["outflow*"], "etf.flows.outflow"),
            (&["inflow*"], "etf.flows.inflow"),
            (
                &["reject*", "denied", "denies", "disapprov*"],
                "etf.rejection",
            ),
            (&["approv*"], "etf.approval"),
            (
                &["filing*", "filed", "files", "19b-4", "s-1"],
                "etf.filing",
            ),
        ],
        default: None,
    },
    fixed(EventType::FundRaise, "institutions.funding"),
    fixed(EventType::StrategicInvestment, "institutions.investment"),
    fixed(
        EventType::CorporateBitcoinPurchase,
        "institutions.treasury.btc_purchase",
    ),
    fixed(EventType::IpoFiling, "capital_markets.ipo.filing"),
    fixed(EventType::IpoPlanning, "capital_markets.ipo.planning"),
    fixed(EventType::IpoMarketDebut, "capital_markets.ipo.market_debut"),
    fixed(
        EventType::TokenizedAssetVolumeSurge,
        "tokenization.asset.volume_surge",
    ),
    fixed(
        EventType::TokenizedEquitiesStrategy,
        "tokenization.equities.strategy",
    ),
    fixed(
        EventType::CryptoExchangeProductExpansion,
        "market_structure.exchange.product_expansion",
    ),
    fixed(
        EventType::CryptoPaymentsCompanyUpdate,
        "payments.company.update",
    ),
    fixed(
        EventType::NetworkValidatorDecline,
        "network.validators.decline",
    ),
    Branch {
        event_type: EventType::ProtocolUpgrade,
        cascade: &[
            (&["hard fork*"], "protocol.upgrade.hard_fork"),
            (&["soft fork*"], "protocol.upgrade.soft_fork"),
            (&["mainnet"], "protocol.upgrade.mainnet"),
            (&["upgrade*"], "protocol.upgrade.upgrade"),
        ],
        default: None,
    },
    Branch {
        event_type: EventType::MiningDisruption,
        cascade: &[
            (&["halt*"], "protocol.mining.halt"),
            (
                &["shutdown*", "shut down", "shuts down", "shutting down", "offline"],
                "protocol.mining.shutdown",
            ),
            (&["suspend*", "curtail*"], "protocol.mining.curtailment"),
        ],
        default: None,
    },
    fixed(EventType::CryptoMarketVolatility, "markets.volatility"),
    fixed(EventType::MacroMarketShock, "macro.shock"),
    fixed(EventType::MiscOther, "misc"),
];

struct CompiledBranch {
    event_type: EventType,
    cascade: Vec<(CueSet, &'static str)>,
    default: Option<&'static str>,
}

static COMPILED: LazyLock<Vec<CompiledBranch>> = LazyLock::new(|| {
    BRANCHES
        .iter()
        .map(|b| CompiledBranch {
            event_type: b.event_type,
            cascade: b
                .cascade
                .iter()
                .map(|(terms, label)| (CueSet::new(terms), *label))
                .collect(),
            default: b.default,
        })
        .collect()
});

/// Subtype for an already-selected event type. UNKNOWN never has one.
pub fn infer_event_subtype(text: &str, event_type: EventType) -> Option<String> {
    let branch = COMPILED.iter().find(|b| b.event_type == event_type)?;
    branch
        .cascade
        .iter()
        .find(|(cues, _)| cues.is_match(text))
        .map(|(_, label)| *label)
        .or(branch.default)
        .map(str::to_string)
}
