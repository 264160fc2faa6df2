//! Word selection and single-occurrence replacement.

use std::collections::BTreeSet;
use std::ops::Range;

use grapevine_core::error::DomainError;
use grapevine_core::rng::DeterministicRng;

/// Subordinating conjunctions and transition words. Selection prefers these
/// because swapping a connective keeps the sentence readable.
///
/// Matching is exact, so only the capitalised forms listed here count.
pub const CONJUNCTIONS: &[&str] = &[
    "Accordingly", "Actually", "After", "Afterward", "Also", "Although", "And", "Another", "As",
    "Because", "Before", "Besides", "Briefly", "But", "Consequently", "Conversely", "Equally",
    "Even", "Finally", "First", "Fourth", "Further", "Furthermore", "Gradually", "Hence",
    "However", "If", "Inasmuch", "Last", "Lastly", "Later", "Least", "Lest", "Meanwhile",
    "Moreover", "Nevertheless", "Next", "Nonetheless", "Nor", "Now", "Once", "Or", "Presently",
    "Provided", "Second", "Similarly", "Since", "So", "Soon", "Still", "Subsequently",
    "Supposing", "Than", "That", "Then", "Thereafter", "Therefore", "Third", "Though", "Thus",
    "Till", "Too", "Ultimately", "Unless", "Until", "What", "Whatever", "When", "Whenever",
    "Where", "Whereas", "Wherever", "Whether", "Which", "While", "Who", "Whoever", "Whomever",
    "Why", "Yet",
];

/// Which occurrence of the selected word gets replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    /// The first case-insensitive match.
    First,
    /// The last case-insensitive match.
    Last,
}

impl Occurrence {
    /// Picks an occurrence with a fair coin.
    pub fn flip(rng: &mut dyn DeterministicRng) -> Self {
        if rng.coin_flip() { Self::First } else { Self::Last }
    }
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{00A1}' // inverted exclamation mark
                | '\u{00AB}'
                | '\u{00BB}'
                | '\u{00BF}' // inverted question mark
                | '\u{2010}'..='\u{2027}' // dashes, typographic quotes, ellipsis
        )
}

/// Splits a sentence into words with surrounding punctuation removed.
///
/// The punctuation stripped from each token is the set of punctuation
/// characters found anywhere in the sentence. Tokens that are nothing but
/// punctuation are dropped.
#[must_use]
pub fn candidate_words(sentence: &str) -> Vec<&str> {
    let punctuation: BTreeSet<char> = sentence.chars().filter(|c| is_punctuation(*c)).collect();

    sentence
        .split_whitespace()
        .map(|token| token.trim_matches(|c| punctuation.contains(&c)))
        .filter(|word| !word.is_empty())
        .collect()
}

/// Picks the word to replace: uniformly among the conjunctions present, or
/// among all words when the sentence has none.
///
/// # Errors
///
/// Returns `DomainError::NoCandidateWords` if the sentence has no words.
pub fn select_word<'a>(
    sentence: &'a str,
    rng: &mut dyn DeterministicRng,
) -> Result<&'a str, DomainError> {
    let candidates = candidate_words(sentence);
    let conjunctions: Vec<&str> = candidates
        .iter()
        .copied()
        .filter(|word| CONJUNCTIONS.contains(word))
        .collect();

    let pool = if conjunctions.is_empty() {
        candidates
    } else {
        conjunctions
    };

    let Some(last_index) = pool.len().checked_sub(1) else {
        return Err(DomainError::NoCandidateWords);
    };

    let max = u32::try_from(last_index).unwrap_or(u32::MAX);
    let drawn = usize::try_from(rng.next_u32_range(0, max)).unwrap_or(usize::MAX);
    Ok(pool[drawn.min(last_index)])
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Byte length of `needle` matched case-insensitively at the start of
/// `text`, if it matches.
fn match_len_ignore_case(text: &str, needle: &str) -> Option<usize> {
    let mut text_chars = text.char_indices();
    for expected in needle.chars() {
        let (_, actual) = text_chars.next()?;
        if !chars_eq_ignore_case(actual, expected) {
            return None;
        }
    }
    Some(text_chars.next().map_or(text.len(), |(end, _)| end))
}

/// Finds the byte range of the first or last case-insensitive occurrence of
/// `needle` in `haystack`. Matches may sit inside longer words.
#[must_use]
pub fn find_occurrence(haystack: &str, needle: &str, which: Occurrence) -> Option<Range<usize>> {
    let mut matches = haystack.char_indices().filter_map(|(start, _)| {
        match_len_ignore_case(&haystack[start..], needle).map(|len| start..start + len)
    });

    match which {
        Occurrence::First => matches.next(),
        Occurrence::Last => matches.last(),
    }
}

/// Replaces exactly one occurrence of `word` in `message`. Returns the
/// message unchanged if `word` does not occur.
#[must_use]
pub fn replace_word(message: &str, word: &str, replacement: &str, which: Occurrence) -> String {
    let Some(range) = find_occurrence(message, word, which) else {
        return message.to_owned();
    };

    let mut replaced = String::with_capacity(message.len() - range.len() + replacement.len());
    replaced.push_str(&message[..range.start]);
    replaced.push_str(replacement);
    replaced.push_str(&message[range.end..]);
    replaced
}
