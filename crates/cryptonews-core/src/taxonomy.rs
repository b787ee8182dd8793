//! Versioned event taxonomy.
//!
//! Two generations of event labels live side by side:
//!
//! - [`EventType`] is the current taxonomy. Every variant belongs to one
//!   [`EventFamily`], which is the coarse level of the hierarchy.
//! - [`LegacyEventType`] is the older flat v1 set kept for consumers that
//!   still read it. The only way between the two is the lossy projection in
//!   the engine's legacy mapper; there is no conversion back.
//!
//! String forms are persisted by consumers, so variants are only ever added.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Current event taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    SecurityIncident,
    CryptoRegulationRestriction,
    RegulatoryGuidance,
    CryptoPolicyMeeting,
    StablecoinLaunch,
    StablecoinReserveUpdate,
    StablecoinImpactWarning,
    StablecoinDepeg,
    EtfActivity,
    FundRaise,
    StrategicInvestment,
    CorporateBitcoinPurchase,
    IpoFiling,
    IpoPlanning,
    IpoMarketDebut,
    TokenizedAssetVolumeSurge,
    TokenizedEquitiesStrategy,
    CryptoExchangeProductExpansion,
    CryptoPaymentsCompanyUpdate,
    NetworkValidatorDecline,
    ProtocolUpgrade,
    MiningDisruption,
    CryptoMarketVolatility,
    MacroMarketShock,
    MiscOther,
    Unknown,
}

impl EventType {
    /// Every variant, in declaration order.
    pub const ALL: [EventType; 26] = [
        Self::SecurityIncident,
        Self::CryptoRegulationRestriction,
        Self::RegulatoryGuidance,
        Self::CryptoPolicyMeeting,
        Self::StablecoinLaunch,
        Self::StablecoinReserveUpdate,
        Self::StablecoinImpactWarning,
        Self::StablecoinDepeg,
        Self::EtfActivity,
        Self::FundRaise,
        Self::StrategicInvestment,
        Self::CorporateBitcoinPurchase,
        Self::IpoFiling,
        Self::IpoPlanning,
        Self::IpoMarketDebut,
        Self::TokenizedAssetVolumeSurge,
        Self::TokenizedEquitiesStrategy,
        Self::CryptoExchangeProductExpansion,
        Self::CryptoPaymentsCompanyUpdate,
        Self::NetworkValidatorDecline,
        Self::ProtocolUpgrade,
        Self::MiningDisruption,
        Self::CryptoMarketVolatility,
        Self::MacroMarketShock,
        Self::MiscOther,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecurityIncident => "SECURITY_INCIDENT",
            Self::CryptoRegulationRestriction => "CRYPTO_REGULATION_RESTRICTION",
            Self::RegulatoryGuidance => "REGULATORY_GUIDANCE",
            Self::CryptoPolicyMeeting => "CRYPTO_POLICY_MEETING",
            Self::StablecoinLaunch => "STABLECOIN_LAUNCH",
            Self::StablecoinReserveUpdate => "STABLECOIN_RESERVE_UPDATE",
            Self::StablecoinImpactWarning => "STABLECOIN_IMPACT_WARNING",
            Self::StablecoinDepeg => "STABLECOIN_DEPEG",
            Self::EtfActivity => "ETF_ACTIVITY",
            Self::FundRaise => "FUND_RAISE",
            Self::StrategicInvestment => "STRATEGIC_INVESTMENT",
            Self::CorporateBitcoinPurchase => "CORPORATE_BITCOIN_PURCHASE",
            Self::IpoFiling => "IPO_FILING",
            Self::IpoPlanning => "IPO_PLANNING",
            Self::IpoMarketDebut => "IPO_MARKET_DEBUT",
            Self::TokenizedAssetVolumeSurge => "TOKENIZED_ASSET_VOLUME_SURGE",
            Self::TokenizedEquitiesStrategy => "TOKENIZED_EQUITIES_STRATEGY",
            Self::CryptoExchangeProductExpansion => "CRYPTO_EXCHANGE_PRODUCT_EXPANSION",
            Self::CryptoPaymentsCompanyUpdate => "CRYPTO_PAYMENTS_COMPANY_UPDATE",
            Self::NetworkValidatorDecline => "NETWORK_VALIDATOR_DECLINE",
            Self::ProtocolUpgrade => "PROTOCOL_UPGRADE",
            Self::MiningDisruption => "MINING_DISRUPTION",
            Self::CryptoMarketVolatility => "CRYPTO_MARKET_VOLATILITY",
            Self::MacroMarketShock => "MACRO_MARKET_SHOCK",
            Self::MiscOther => "MISC_OTHER",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Coarse family this event type belongs to.
    pub fn family(&self) -> EventFamily {
        match self {
            Self::SecurityIncident => EventFamily::Security,
            Self::CryptoRegulationRestriction
            | Self::RegulatoryGuidance
            | Self::CryptoPolicyMeeting => EventFamily::Regulation,
            Self::StablecoinLaunch
            | Self::StablecoinReserveUpdate
            | Self::StablecoinImpactWarning
            | Self::StablecoinDepeg => EventFamily::Stablecoins,
            Self::EtfActivity => EventFamily::Etf,
            Self::FundRaise | Self::StrategicInvestment | Self::CorporateBitcoinPurchase => {
                EventFamily::Institutions
            }
            Self::IpoFiling | Self::IpoPlanning | Self::IpoMarketDebut => {
                EventFamily::CapitalMarkets
            }
            Self::TokenizedAssetVolumeSurge | Self::TokenizedEquitiesStrategy => {
                EventFamily::Tokenization
            }
            Self::CryptoExchangeProductExpansion => EventFamily::MarketStructure,
            Self::CryptoPaymentsCompanyUpdate => EventFamily::Payments,
            Self::NetworkValidatorDecline | Self::ProtocolUpgrade | Self::MiningDisruption => {
                EventFamily::Network
            }
            Self::CryptoMarketVolatility => EventFamily::Markets,
            Self::MacroMarketShock => EventFamily::Macro,
            Self::MiscOther | Self::Unknown => EventFamily::Other,
        }
    }

    /// Static topic tags derived from the event type.
    pub fn topics(&self) -> &'static [Topic] {
        use Topic::*;
        match self {
            Self::SecurityIncident => &[Security, Risk],
            Self::CryptoRegulationRestriction => &[Regulation, Risk],
            Self::RegulatoryGuidance | Self::CryptoPolicyMeeting => &[Regulation],
            Self::StablecoinLaunch | Self::StablecoinReserveUpdate => &[Stablecoins],
            Self::StablecoinImpactWarning | Self::StablecoinDepeg => &[Stablecoins, Risk],
            Self::EtfActivity => &[Etf],
            Self::FundRaise | Self::StrategicInvestment | Self::CorporateBitcoinPurchase => {
                &[Institutions]
            }
            Self::IpoFiling | Self::IpoPlanning | Self::IpoMarketDebut => &[CapitalMarkets],
            Self::TokenizedAssetVolumeSurge | Self::TokenizedEquitiesStrategy => &[Tokenization],
            Self::CryptoExchangeProductExpansion => &[MarketStructure],
            Self::CryptoPaymentsCompanyUpdate => &[Payments],
            Self::NetworkValidatorDecline => &[Network],
            Self::ProtocolUpgrade => &[Network, Protocol],
            Self::MiningDisruption => &[Network, Mining],
            Self::CryptoMarketVolatility => &[Markets],
            Self::MacroMarketShock => &[Macro, Markets],
            Self::MiscOther | Self::Unknown => &[],
        }
    }

    /// Catch-all results produced when no specific rule fired.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::MiscOther | Self::Unknown)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Precedence ──

/// Tie-break rank per event type. Lower rank wins.
///
/// Only consulted after impact and confidence compare equal.
const PRECEDENCE: [(EventType, u8); 26] = [
    (EventType::SecurityIncident, 0),
    (EventType::CryptoRegulationRestriction, 1),
    (EventType::RegulatoryGuidance, 2),
    (EventType::StablecoinDepeg, 3),
    (EventType::StablecoinLaunch, 3),
    (EventType::StablecoinReserveUpdate, 3),
    (EventType::StablecoinImpactWarning, 4),
    (EventType::EtfActivity, 5),
    (EventType::FundRaise, 5),
    (EventType::StrategicInvestment, 5),
    (EventType::CorporateBitcoinPurchase, 5),
    (EventType::IpoFiling, 6),
    (EventType::IpoMarketDebut, 6),
    (EventType::IpoPlanning, 6),
    (EventType::TokenizedAssetVolumeSurge, 7),
    (EventType::TokenizedEquitiesStrategy, 7),
    (EventType::CryptoExchangeProductExpansion, 8),
    (EventType::CryptoPaymentsCompanyUpdate, 8),
    (EventType::NetworkValidatorDecline, 9),
    (EventType::ProtocolUpgrade, 9),
    (EventType::MiningDisruption, 9),
    (EventType::CryptoMarketVolatility, 10),
    (EventType::MacroMarketShock, 10),
    (EventType::CryptoPolicyMeeting, 11),
    (EventType::MiscOther, 98),
    (EventType::Unknown, 99),
];

/// Rank used for unlisted types; sorts after everything in the table.
const UNRANKED: u8 = u8::MAX;

/// Look up the tie-break rank for an event type.
pub fn precedence(event_type: EventType) -> u8 {
    PRECEDENCE
        .iter()
        .find(|(et, _)| *et == event_type)
        .map(|(_, rank)| *rank)
        .unwrap_or(UNRANKED)
}

/// Coarse grouping of current event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventFamily {
    Security,
    Regulation,
    Stablecoins,
    Etf,
    Institutions,
    CapitalMarkets,
    Tokenization,
    MarketStructure,
    Payments,
    Network,
    Markets,
    Macro,
    Other,
}

/// Topic tags attached to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Topic {
    Security,
    Risk,
    Regulation,
    Stablecoins,
    Etf,
    Institutions,
    CapitalMarkets,
    Tokenization,
    MarketStructure,
    Payments,
    Network,
    Protocol,
    Mining,
    Markets,
    Macro,
}

// ── Legacy (v1) taxonomy ──

/// Flat v1 event set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegacyEventType {
    Unknown,
    EtfApproval,
    EtfRejection,
    EtfFiling,
    EtfInflow,
    EtfOutflow,
    EnforcementAction,
    ExchangeHack,
    StablecoinIssuance,
    StablecoinDepeg,
    CexInflow,
    CexOutflow,
    ProtocolUpgrade,
    MinerShutdown,
}

impl LegacyEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::EtfApproval => "ETF_APPROVAL",
            Self::EtfRejection => "ETF_REJECTION",
            Self::EtfFiling => "ETF_FILING",
            Self::EtfInflow => "ETF_INFLOW",
            Self::EtfOutflow => "ETF_OUTFLOW",
            Self::EnforcementAction => "ENFORCEMENT_ACTION",
            Self::ExchangeHack => "EXCHANGE_HACK",
            Self::StablecoinIssuance => "STABLECOIN_ISSUANCE",
            Self::StablecoinDepeg => "STABLECOIN_DEPEG",
            Self::CexInflow => "CEX_INFLOW",
            Self::CexOutflow => "CEX_OUTFLOW",
            Self::ProtocolUpgrade => "PROTOCOL_UPGRADE",
            Self::MinerShutdown => "MINER_SHUTDOWN",
        }
    }
}

impl fmt::Display for LegacyEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// v1 jurisdiction buckets. Regions v1 never had collapse to `Global`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegacyJurisdiction {
    Us,
    Europe,
    Asia,
    Global,
}

// ── Jurisdiction ──

/// Coarse geographic/regulatory bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Jurisdiction {
    Us,
    AmericasNonUs,
    Europe,
    Asia,
    Africa,
    Oceania,
    Global,
}

impl Jurisdiction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::AmericasNonUs => "AMERICAS_NON_US",
            Self::Europe => "EUROPE",
            Self::Asia => "ASIA",
            Self::Africa => "AFRICA",
            Self::Oceania => "OCEANIA",
            Self::Global => "GLOBAL",
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a jurisdiction was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JurisdictionBasis {
    /// A country, region, or national regulator was named outright.
    Explicit,
    /// Inferred from a financial centre, venue, or currency symbol.
    Implied,
    /// No cue found; the bucket is the `Global` default.
    None,
}

// ── Sentiment and outlook labels ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketDirection {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeHorizon {
    ShortTerm,
    MediumTerm,
    LongTerm,
}
