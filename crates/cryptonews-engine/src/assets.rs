//! Asset extraction and crypto-relevance detection.

use std::sync::LazyLock;

use regex::Regex;

use crate::cues::CueSet;

/// Tickers accepted from uppercase tokens. Anything else is ignored.
pub const ASSET_ALLOWLIST: &[&str] = &[
    "BTC", "ETH", "SOL", "XRP", "BNB", "ADA", "DOGE", "LTC", "AVAX", "DOT", "LINK", "UNI", "AAVE",
    "USDT", "USDC",
];

static TICKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?\b([A-Z]{2,6})\b").expect("valid ticker pattern"));

/// Common names mapped to tickers, possessive forms included.
static NAME_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        ("bitcoin", "BTC"),
        ("ethereum", "ETH"),
        ("ether", "ETH"),
        ("solana", "SOL"),
        ("tether", "USDT"),
        ("usdc", "USDC"),
    ]
    .into_iter()
    .map(|(name, ticker)| {
        let re = Regex::new(&format!(r"(?i)\b{name}(?:'s|’s)?\b")).expect("valid name pattern");
        (re, ticker)
    })
    .collect()
});

static CRYPTO_CUES: LazyLock<CueSet> = LazyLock::new(|| {
    CueSet::new(&[
        "crypto*",
        "blockchain*",
        "bitcoin*",
        "ethereum",
        "stablecoin*",
        "token*",
        "defi",
        "exchange*",
        "wallet*",
        "web3",
        "onchain",
        "on-chain",
    ])
});

/// Extract allowlisted tickers and name mentions.
///
/// Ordered by first occurrence in the text, duplicates removed.
pub fn extract_assets(text: &str) -> Vec<String> {
    let mut hits: Vec<(usize, &'static str)> = Vec::new();

    for (re, ticker) in NAME_PATTERNS.iter() {
        for m in re.find_iter(text) {
            hits.push((m.start(), ticker));
        }
    }

    for caps in TICKER_RE.captures_iter(text) {
        let Some(token) = caps.get(1) else { continue };
        if let Some(ticker) = ASSET_ALLOWLIST.iter().find(|t| **t == token.as_str()) {
            hits.push((token.start(), ticker));
        }
    }

    // Stable sort keeps name hits ahead of ticker hits at the same offset.
    hits.sort_by_key(|(pos, _)| *pos);

    let mut assets: Vec<String> = Vec::new();
    for (_, ticker) in hits {
        if !assets.iter().any(|a| a == ticker) {
            assets.push(ticker.to_string());
        }
    }
    assets
}

/// True when the text is about crypto at all.
pub fn is_crypto_related(text: &str) -> bool {
    CRYPTO_CUES.is_match(text) || !extract_assets(text).is_empty()
}
