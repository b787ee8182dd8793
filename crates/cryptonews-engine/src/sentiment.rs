use std::sync::LazyLock;

use cryptonews_core::Sentiment;

use crate::cues::CueSet;

static NEGATIVE: LazyLock<CueSet> = LazyLock::new(|| {
    CueSet::new(&[
        "hack", "hacks", "hacked", "hacker*", "hacking", "exploit*", "lawsuit*", "charges",
        "indict*", "ban", "bans", "banned", "banning", "depeg*", "de-peg*",
    ])
});

static POSITIVE: LazyLock<CueSet> = LazyLock::new(|| {
    CueSet::new(&[
        "approval*", "approved", "inflows", "record*", "surge", "surged", "surges", "surging",
        "partnership*",
    ])
});

/// Keyword sentiment. Negative cues are checked first and win outright.
pub fn infer_sentiment(text: &str) -> Sentiment {
    if NEGATIVE.is_match(text) {
        Sentiment::Negative
    } else if POSITIVE.is_match(text) {
        Sentiment::Positive
    } else {
        Sentiment::Neutral
    }
}
