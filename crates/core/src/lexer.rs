//! Greedy longest-match tokenizer over the registry vocabulary.
//!
//! The vocabulary is every spelling of every option plus [`FILLER_WORDS`],
//! sorted by descending length with ties broken by descending lexicographic
//! order. Scanning in that order makes the first prefix match the longest
//! one, so "hot choc" wins over "hot" and "large" over "l".
//!
//! Unrecognized words are dropped silently; tokenizing never fails.

use std::collections::BTreeSet;

use crate::registry::Registry;

/// Words that are recognized and consumed but never bound to an attribute.
pub const FILLER_WORDS: [&str; 16] = [
    "a",
    "can i have",
    "can i please",
    "for",
    "i would like",
    "like",
    "may i have",
    "me",
    "mine",
    "order",
    "please",
    "thanks",
    "the",
    "want",
    "with",
    "would like",
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    spelling: String,
    filler: bool,
}

/// The sorted, matchable vocabulary.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    entries: Vec<Entry>,
}

impl Vocabulary {
    pub fn from_registry(registry: &Registry) -> Self {
        let fillers: BTreeSet<&str> = FILLER_WORDS.into_iter().collect();
        let mut spellings: BTreeSet<&str> = fillers.clone();
        for spec in registry.specs() {
            spellings.extend(spec.spellings());
        }

        let mut entries: Vec<Entry> = spellings
            .into_iter()
            .map(|s| Entry {
                spelling: s.to_owned(),
                filler: fillers.contains(s),
            })
            .collect();
        entries.sort_by(|a, b| {
            let ka = (a.spelling.chars().count(), &a.spelling);
            let kb = (b.spelling.chars().count(), &b.spelling);
            kb.cmp(&ka)
        });

        Vocabulary { entries }
    }

    /// Spellings in match order.
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.spelling.as_str())
    }

    fn first_match(&self, input: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| input.starts_with(&e.spelling))
    }

    /// Segment `text` into recognized, non-filler spellings (lower-cased),
    /// in input order.
    pub fn tokenize(&self, text: &str) -> Vec<&str> {
        let lowered = text.to_lowercase();
        let mut rest = lowered.trim();
        let mut tokens = Vec::new();

        while !rest.is_empty() {
            match self.first_match(rest) {
                Some(entry) => {
                    if entry.filler {
                        tracing::trace!(filler = %entry.spelling, "skipping filler");
                    } else {
                        tracing::trace!(token = %entry.spelling, "recognized token");
                        tokens.push(entry.spelling.as_str());
                    }
                    rest = &rest[entry.spelling.len()..];
                }
                None => match rest.find(char::is_whitespace) {
                    Some(end) => {
                        tracing::debug!(fragment = &rest[..end], "dropping unrecognized word");
                        rest = &rest[end..];
                    }
                    None => {
                        tracing::debug!(fragment = rest, "dropping unrecognized word");
                        break;
                    }
                },
            }
            rest = rest.trim_start();
        }

        tokens
    }
}
