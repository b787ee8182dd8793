//! One-way, lossy mapping into the v1 legacy taxonomy.
//!
//! Only mappings that can be justified from the text are made; everything
//! else collapses to `UNKNOWN`.

use std::sync::LazyLock;

use cryptonews_core::{EventType, Jurisdiction, LegacyEventType, LegacyJurisdiction};

use crate::cues::CueSet;

static DEPEG: LazyLock<CueSet> = LazyLock::new(|| {
    CueSet::new(&[
        "depeg*",
        "de-peg*",
        "lost its peg",
        "loses its peg",
        "broke its peg",
        "unpegged",
    ])
});

static ISSUANCE: LazyLock<CueSet> = LazyLock::new(|| CueSet::new(&["issu*", "mint*"]));

static EXCHANGE: LazyLock<CueSet> =
    LazyLock::new(|| CueSet::new(&["exchange*", "cex", "hot wallet*"]));

/// Map a current-taxonomy classification to the legacy pair.
pub fn map_to_legacy(
    event_type: EventType,
    subtype: Option<&str>,
    jurisdiction: Jurisdiction,
    text: &str,
) -> (LegacyEventType, LegacyJurisdiction) {
    (
        legacy_event_type(event_type, subtype, text),
        legacy_jurisdiction(jurisdiction),
    )
}

pub fn legacy_event_type(
    event_type: EventType,
    subtype: Option<&str>,
    text: &str,
) -> LegacyEventType {
    match event_type {
        EventType::StablecoinDepeg => LegacyEventType::StablecoinDepeg,
        EventType::StablecoinLaunch
        | EventType::StablecoinReserveUpdate
        | EventType::StablecoinImpactWarning => {
            if DEPEG.is_match(text) {
                LegacyEventType::StablecoinDepeg
            } else if event_type == EventType::StablecoinLaunch && ISSUANCE.is_match(text) {
                LegacyEventType::StablecoinIssuance
            } else {
                LegacyEventType::Unknown
            }
        }
        EventType::SecurityIncident if EXCHANGE.is_match(text) => LegacyEventType::ExchangeHack,
        EventType::EtfActivity => match subtype {
            Some("etf.approval") => LegacyEventType::EtfApproval,
            Some("etf.rejection") => LegacyEventType::EtfRejection,
            Some("etf.filing") => LegacyEventType::EtfFiling,
            Some("etf.flows.inflow") => LegacyEventType::EtfInflow,
            Some("etf.flows.outflow") => LegacyEventType::EtfOutflow,
            _ => LegacyEventType::Unknown,
        },
        EventType::CryptoRegulationRestriction
            if subtype.is_some_and(|s| s.starts_with("regulation.enforcement.")) =>
        {
            LegacyEventType::EnforcementAction
        }
        EventType::ProtocolUpgrade => LegacyEventType::ProtocolUpgrade,
        EventType::MiningDisruption
            if matches!(subtype, Some("protocol.mining.shutdown" | "protocol.mining.halt")) =>
        {
            LegacyEventType::MinerShutdown
        }
        _ => LegacyEventType::Unknown,
    }
}

pub fn legacy_jurisdiction(jurisdiction: Jurisdiction) -> LegacyJurisdiction {
    match jurisdiction {
        Jurisdiction::Us => LegacyJurisdiction::Us,
        Jurisdiction::Europe => LegacyJurisdiction::Europe,
        Jurisdiction::Asia => LegacyJurisdiction::Asia,
        Jurisdiction::AmericasNonUs
        | Jurisdiction::Africa
        | Jurisdiction::Oceania
        | Jurisdiction::Global => LegacyJurisdiction::Global,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stablecoin_launch_needs_issuance_language() {
        assert_eq!(
            legacy_event_type(
                EventType::StablecoinLaunch,
                Some("stablecoin.launch.registered"),
                "The UAE launched a USD-backed stablecoin, its first digital dollar issuance"
            ),
            LegacyEventType::StablecoinIssuance
        );
        assert_eq!(
            legacy_event_type(
                EventType::StablecoinLaunch,
                Some("stablecoin.launch"),
                "Tether will mint the new token on Tron"
            ),
            LegacyEventType::StablecoinIssuance
        );
    }

    #[test]
    fn launch_wording_alone_is_not_issuance() {
        assert_eq!(
            legacy_event_type(
                EventType::StablecoinLaunch,
                Some("stablecoin.launch"),
                "Circle launched a stablecoin on Base"
            ),
            LegacyEventType::Unknown
        );
        assert_eq!(
            legacy_event_type(
                EventType::StablecoinLaunch,
                Some("stablecoin.launch.registered"),
                "A registered, dollar-backed stablecoin went live"
            ),
            LegacyEventType::Unknown
        );
    }

    #[test]
    fn depeg_language_wins_for_stablecoin_types() {
        assert_eq!(
            legacy_event_type(
                EventType::StablecoinImpactWarning,
                Some("stablecoin.risk.warning"),
                "Stablecoin lost its peg, analysts warn"
            ),
            LegacyEventType::StablecoinDepeg
        );
        assert_eq!(
            legacy_event_type(
                EventType::StablecoinImpactWarning,
                None,
                "dollar-backed stablecoin risks"
            ),
            LegacyEventType::Unknown
        );
    }

    #[test]
    fn security_needs_exchange_context() {
        assert_eq!(
            legacy_event_type(EventType::SecurityIncident, None, "Exchange hot wallet hacked"),
            LegacyEventType::ExchangeHack
        );
        assert_eq!(
            legacy_event_type(EventType::SecurityIncident, None, "DeFi protocol exploited"),
            LegacyEventType::Unknown
        );
    }

    #[test]
    fn etf_maps_by_subtype() {
        assert_eq!(
            legacy_event_type(EventType::EtfActivity, Some("etf.flows.inflow"), ""),
            LegacyEventType::EtfInflow
        );
        assert_eq!(
            legacy_event_type(EventType::EtfActivity, None, ""),
            LegacyEventType::Unknown
        );
    }

    #[test]
    fn only_enforcement_subtypes_map_to_enforcement() {
        assert_eq!(
            legacy_event_type(
                EventType::CryptoRegulationRestriction,
                Some("regulation.enforcement.lawsuit"),
                ""
            ),
            LegacyEventType::EnforcementAction
        );
        assert_eq!(
            legacy_event_type(
                EventType::CryptoRegulationRestriction,
                Some("regulation.restriction"),
                ""
            ),
            LegacyEventType::Unknown
        );
    }

    #[test]
    fn unmapped_types_are_unknown() {
        assert_eq!(
            legacy_event_type(EventType::RegulatoryGuidance, Some("regulation.guidance"), ""),
            LegacyEventType::Unknown
        );
        assert_eq!(
            legacy_event_type(
                EventType::MiningDisruption,
                Some("protocol.mining.curtailment"),
                ""
            ),
            LegacyEventType::Unknown
        );
    }

    #[test]
    fn jurisdiction_collapses_to_v1_buckets() {
        assert_eq!(legacy_jurisdiction(Jurisdiction::Us), LegacyJurisdiction::Us);
        assert_eq!(legacy_jurisdiction(Jurisdiction::Asia), LegacyJurisdiction::Asia);
        assert_eq!(legacy_jurisdiction(Jurisdiction::Oceania), LegacyJurisdiction::Global);
        assert_eq!(
            legacy_jurisdiction(Jurisdiction::AmericasNonUs),
            LegacyJurisdiction::Global
        );
    }
}
