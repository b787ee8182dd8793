//! Jurisdiction resolution.
//!
//! Buckets are tested in a fixed order and the first bucket with any cue wins,
//! so a text naming both Washington regulators and Brussels resolves to US.
//! Within a bucket, explicit cues (country and region names, their
//! abbreviations, national regulators) take precedence over implied ones
//! (financial centres, exchanges, currency symbols) when reporting the basis.

use std::sync::LazyLock;

use cryptonews_core::{Jurisdiction, JurisdictionBasis};
use regex::{Regex, RegexBuilder};

pub const EXPLICIT_CONFIDENCE: f64 = 0.9;
pub const IMPLIED_CONFIDENCE: f64 = 0.7;
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Resolved jurisdiction with the evidence class that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JurisdictionResolution {
    pub jurisdiction: Jurisdiction,
    pub basis: JurisdictionBasis,
    pub confidence: f64,
}

impl JurisdictionResolution {
    fn global() -> Self {
        Self {
            jurisdiction: Jurisdiction::Global,
            basis: JurisdictionBasis::None,
            confidence: DEFAULT_CONFIDENCE,
        }
    }
}

struct Bucket {
    jurisdiction: Jurisdiction,
    explicit: Vec<Regex>,
    implied: Vec<Regex>,
}

impl Bucket {
    fn resolve(&self, text: &str) -> Option<JurisdictionResolution> {
        let (basis, confidence) = if self.explicit.iter().any(|re| re.is_match(text)) {
            (JurisdictionBasis::Explicit, EXPLICIT_CONFIDENCE)
        } else if self.implied.iter().any(|re| re.is_match(text)) {
            (JurisdictionBasis::Implied, IMPLIED_CONFIDENCE)
        } else {
            return None;
        };
        Some(JurisdictionResolution {
            jurisdiction: self.jurisdiction,
            basis,
            confidence,
        })
    }
}

/// Case-insensitive whole-word names. Regulator acronyms use this too, so
/// they agree with the enforcement rules ("the sec sued" is still the SEC).
fn names(terms: &[&str]) -> Regex {
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
        .case_insensitive(true)
        .build()
        .expect("escaped names always form a valid pattern")
}

/// Case-sensitive whole-word acronyms, so "us" in prose never matches US.
fn acronyms(terms: &[&str]) -> Regex {
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b"))
        .expect("escaped acronyms always form a valid pattern")
}

fn symbols(chars: &str) -> Regex {
    Regex::new(&format!("[{}]", regex::escape(chars)))
        .expect("escaped symbols always form a valid pattern")
}

static BUCKETS: LazyLock<Vec<Bucket>> = LazyLock::new(|| {
    vec![
        Bucket {
            jurisdiction: Jurisdiction::Us,
            explicit: vec![
                names(&["united states"]),
                Regex::new(r"\bU\.S\.(?:A\.)?|\bUSA?\b").expect("valid US pattern"),
                names(&["sec", "cftc", "doj", "finra", "ofac", "occ", "fdic"]),
            ],
            implied: vec![
                names(&["federal reserve", "white house", "congress", "wall street", "nasdaq"]),
                acronyms(&["NYSE"]),
            ],
        },
        Bucket {
            jurisdiction: Jurisdiction::Europe,
            explicit: vec![
                names(&[
                    "european union",
                    "europe",
                    "european",
                    "united kingdom",
                    "britain",
                    "british",
                    "england",
                    "germany",
                    "german",
                    "france",
                    "french",
                    "switzerland",
                    "swiss",
                    "netherlands",
                    "spain",
                    "italy",
                    "russia",
                    "russian",
                ]),
                acronyms(&["EU", "UK"]),
                names(&["esma", "fca", "bafin", "finma"]),
            ],
            implied: vec![
                names(&["mica", "london", "frankfurt", "paris", "zurich", "moscow"]),
                acronyms(&["ECB"]),
                symbols("€£"),
            ],
        },
        Bucket {
            jurisdiction: Jurisdiction::AmericasNonUs,
            explicit: vec![
                names(&[
                    "canada",
                    "canadian",
                    "mexico",
                    "brazil",
                    "argentina",
                    "chile",
                    "colombia",
                    "el salvador",
                    "venezuela",
                    "latin america",
                    "south america",
                ]),
                acronyms(&["OSC", "CSA", "CVM"]),
            ],
            implied: vec![names(&["toronto", "sao paulo", "são paulo", "buenos aires"])],
        },
        Bucket {
            jurisdiction: Jurisdiction::Asia,
            explicit: vec![
                names(&[
                    "japan",
                    "japanese",
                    "china",
                    "chinese",
                    "hong kong",
                    "singapore",
                    "south korea",
                    "korea",
                    "korean",
                    "india",
                    "indian",
                    "taiwan",
                    "thailand",
                    "vietnam",
                    "indonesia",
                    "philippines",
                    "pakistan",
                    "united arab emirates",
                    "saudi arabia",
                    "qatar",
                    "bahrain",
                ]),
                acronyms(&["UAE", "PBOC", "PBoC", "MAS", "SFC", "FSA"]),
            ],
            implied: vec![
                names(&["tokyo", "shanghai", "beijing", "seoul", "dubai", "abu dhabi", "mumbai"]),
                symbols("¥"),
            ],
        },
        Bucket {
            jurisdiction: Jurisdiction::Oceania,
            explicit: vec![
                names(&["australia", "australian", "new zealand"]),
                acronyms(&["ASIC", "AUSTRAC"]),
            ],
            implied: vec![names(&["sydney", "melbourne", "auckland"])],
        },
        Bucket {
            jurisdiction: Jurisdiction::Africa,
            explicit: vec![names(&[
                "africa",
                "african",
                "nigeria",
                "nigerian",
                "kenya",
                "kenyan",
                "ghana",
                "egypt",
                "morocco",
            ])],
            implied: vec![names(&["lagos", "nairobi", "johannesburg"])],
        },
    ]
});

/// Resolve the jurisdiction bucket for a text.
pub fn resolve_jurisdiction(text: &str) -> Jurisdiction {
    resolve_jurisdiction_detail(text).jurisdiction
}

/// Resolve the jurisdiction with basis and confidence. No cue yields GLOBAL.
pub fn resolve_jurisdiction_detail(text: &str) -> JurisdictionResolution {
    BUCKETS
        .iter()
        .find_map(|bucket| bucket.resolve(text))
        .unwrap_or_else(JurisdictionResolution::global)
}
