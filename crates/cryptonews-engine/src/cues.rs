//! Word-bounded cue matching.
//!
//! A cue list is a set of lowercase terms. A term ending in `*` is a stem and
//! matches any word continuation (`hack*` matches "hacked" and "hackers").
//! All other terms must match whole words, so `ban` does not fire on "bank".

use regex::{Regex, RegexBuilder};

/// A compiled, case-insensitive cue list.
#[derive(Debug, Clone)]
pub struct CueSet {
    re: Regex,
}

impl CueSet {
    pub fn new(terms: &[&str]) -> Self {
        let alternation = terms
            .iter()
            .map(|term| match term.strip_suffix('*') {
                Some(stem) => format!(r"{}\w*", regex::escape(stem)),
                None => regex::escape(term),
            })
            .collect::<Vec<_>>()
            .join("|");
        let re = RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
            .case_insensitive(true)
            .build()
            .expect("escaped cue terms always form a valid pattern");
        Self { re }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.re.is_match(text)
    }

    /// Byte offset of the first cue occurrence.
    pub fn first_position(&self, text: &str) -> Option<usize> {
        self.re.find(text).map(|m| m.start())
    }
}
