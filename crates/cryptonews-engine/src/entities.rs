//! Capitalised-phrase entity extraction.
//!
//! A phrase starts at a title-case token, or at an all-caps token directly
//! followed by a title-case one ("HSBC Holdings"). It extends only across
//! title-case tokens, optionally bridged by a short connector ("Bank of
//! England"), so tickers never join a phrase. Place and regulator acronyms
//! never start one. Single-word phrases are kept only when allowlisted.

use std::sync::LazyLock;

use regex::Regex;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9'’\-\.]*").expect("valid token pattern"));

const CONNECTORS: &[&str] = &["of", "the", "and", "for"];

const SINGLE_WORD_ALLOW: &[&str] = &[
    "Binance",
    "BlackRock",
    "Bybit",
    "Circle",
    "Coinbase",
    "CoinDesk",
    "Cointelegraph",
    "Fidelity",
    "Grayscale",
    "Kraken",
    "Ledger",
    "MicroStrategy",
    "Reuters",
    "Ripple",
    "Robinhood",
];

const SINGLE_WORD_DENY: &[&str] = &[
    "A",
    "An",
    "The",
    "This",
    "That",
    "These",
    "Those",
    "Crypto",
    "Trading",
    "Tokenized",
    "Digital",
    "New",
    "York",
    "White",
    "House",
];

const ARTICLES: &[&str] = &["A", "An", "The", "This", "That", "These", "Those"];

/// Acronyms that name places, regulators or instruments rather than parties.
const ALL_CAPS_DENY: &[&str] = &[
    "USD", "US", "UAE", "EU", "UK", "SEC", "CFTC", "DOJ", "ETF", "IBAN",
];

const TRIM_CHARS: &[char] = &[
    '"', '\'', '“', '”', '‘', '’', '.', ',', ';', ':', '(', ')', '[', ']', '{', '}',
];

fn clean_token(raw: &str) -> &str {
    let trimmed = raw.trim_matches(TRIM_CHARS);
    trimmed
        .strip_suffix("'s")
        .or_else(|| trimmed.strip_suffix("’s"))
        .unwrap_or(trimmed)
}

fn is_title_case(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => chars.any(|c| c.is_ascii_lowercase()),
        _ => false,
    }
}

fn is_all_caps(token: &str) -> bool {
    token.chars().count() >= 2
        && token.chars().any(|c| c.is_ascii_alphabetic())
        && !token.chars().any(|c| c.is_ascii_lowercase())
}

fn is_denied_acronym(token: &str) -> bool {
    let bare: String = token.chars().filter(|c| *c != '.').collect();
    ALL_CAPS_DENY.contains(&bare.as_str())
}

fn starts_phrase(token: &str, next: Option<&str>) -> bool {
    is_title_case(token)
        || (is_all_caps(token) && !is_denied_acronym(token) && next.is_some_and(is_title_case))
}

/// Extract named parties, ordered by first occurrence, duplicates removed.
pub fn extract_entities(text: &str) -> Vec<String> {
    let tokens: Vec<&str> = TOKEN_RE
        .find_iter(text)
        .map(|m| clean_token(m.as_str()))
        .filter(|t| !t.is_empty())
        .collect();

    let mut entities: Vec<String> = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if !starts_phrase(tokens[i], tokens.get(i + 1).copied()) {
            i += 1;
            continue;
        }

        let mut phrase = vec![tokens[i]];
        let mut j = i + 1;
        while j < tokens.len() {
            let token = tokens[j];
            if CONNECTORS.contains(&token.to_lowercase().as_str()) {
                // A connector only joins when a title-case word follows it.
                match tokens.get(j + 1) {
                    Some(next) if is_title_case(next) => {
                        phrase.push(token);
                        phrase.push(*next);
                        j += 2;
                        continue;
                    }
                    _ => break,
                }
            }
            if is_title_case(token) {
                phrase.push(token);
                j += 1;
                continue;
            }
            break;
        }

        while phrase.len() > 1 && ARTICLES.contains(&phrase[0]) {
            phrase.remove(0);
        }

        if phrase.len() == 1 {
            let word = phrase[0];
            if SINGLE_WORD_DENY.contains(&word) || !SINGLE_WORD_ALLOW.contains(&word) {
                i = j;
                continue;
            }
        }

        let candidate = phrase.join(" ");
        if !entities.contains(&candidate) {
            entities.push(candidate);
        }
        i = j;
    }
    entities
}
