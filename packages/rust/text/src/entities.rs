//! Heuristic named-entity extraction.
//!
//! Candidates are runs of capitalized words ("Uppercase-initial, lowercase-rest")
//! inside a sentence. Single words that are common function words are dropped,
//! the rest are ranked by how often they occur. This favors precision: it
//! misses lowercase or camel-case names and keeps capitalized sentence openers
//! that are not stopwords.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::sentences::sentences;

/// Number of entities returned by [`extract_entities`].
pub const MAX_ENTITIES: usize = 2;

/// Articles, prepositions, conjunctions, common pronouns and demonstratives.
/// A single-word match is discarded when its lowercase form is listed here.
pub const STOPWORDS: &[&str] = &[
    // articles
    "the", "a", "an",
    // prepositions
    "in", "on", "at", "for", "with", "by", "from", "to", "of", "about", "after",
    "before", "over", "under", "into", "during", "through", "between", "against",
    "without", "within", "among", "across", "since", "until", "upon",
    // conjunctions
    "and", "but", "or", "nor", "so", "yet", "if", "while", "because", "although",
    "though", "when", "as", "then", "also", "however",
    // pronouns
    "i", "he", "she", "it", "we", "you", "they", "me", "him", "her", "us", "them",
    "his", "its", "our", "your", "their", "my", "who", "what", "which",
    // demonstratives
    "this", "that", "these", "those", "there", "here",
];

/// Swappable entity detection used by the question generator.
pub trait EntityExtractor: Send + Sync {
    /// Return ranked entity phrases found in `text`, best first.
    fn extract(&self, text: &str) -> Vec<String>;
}

/// The default capitalized-phrase heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapitalizedPhrases;

impl EntityExtractor for CapitalizedPhrases {
    fn extract(&self, text: &str) -> Vec<String> {
        extract_entities(text)
    }
}

/// Extract the top [`MAX_ENTITIES`] entity phrases from `text`.
///
/// A phrase is kept when it occurs more than once or spans several words.
/// Ranking is by occurrence count, ties broken by first appearance.
pub fn extract_entities(text: &str) -> Vec<String> {
    static PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\b\p{Lu}\p{Ll}+(?:[ \t]+\p{Lu}\p{Ll}+)*\b").expect("valid regex")
    });

    // (phrase, occurrences, word count) in first-seen order
    let mut candidates: Vec<(String, usize, usize)> = Vec::new();
    let mut position: HashMap<String, usize> = HashMap::new();

    for sentence in sentences(text) {
        for m in PHRASE_RE.find_iter(sentence) {
            let words: Vec<&str> = m.as_str().split_whitespace().collect();
            if words.len() == 1 && is_stopword(words[0]) {
                continue;
            }

            let phrase = words.join(" ");
            match position.get(&phrase) {
                Some(&idx) => candidates[idx].1 += 1,
                None => {
                    position.insert(phrase.clone(), candidates.len());
                    candidates.push((phrase, 1, words.len()));
                }
            }
        }
    }

    candidates.retain(|(_, count, words)| *count > 1 || *words > 1);
    // Stable sort keeps first-seen order among equal counts.
    candidates.sort_by(|a, b| b.1.cmp(&a.1));

    candidates
        .into_iter()
        .take(MAX_ENTITIES)
        .map(|(phrase, _, _)| phrase)
        .collect()
}

fn is_stopword(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOPWORDS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_single_word_is_kept() {
        let text = "Apple released a phone. Critics said Apple moved fast.";
        assert_eq!(extract_entities(text), vec!["Apple"]);
    }

    #[test]
    fn single_occurrence_single_word_is_dropped() {
        // "Critics" and "Yesterday" appear once each and are single words.
        let text = "Yesterday the market fell. Critics were unmoved.";
        assert!(extract_entities(text).is_empty());
    }

    #[test]
    fn multi_word_phrase_kept_at_frequency_one() {
        let text = "Shares of Tesla Motors rose sharply on the news.";
        assert_eq!(extract_entities(text), vec!["Tesla Motors"]);
    }

    #[test]
    fn stopwords_filtered_even_when_repeated() {
        let text = "The chip is fast. The board agreed. This was expected. This too.";
        assert!(extract_entities(text).is_empty());
    }

    #[test]
    fn stopword_inside_multi_word_run_is_kept() {
        let text = "The Verge reported it. The Verge again.";
        assert_eq!(extract_entities(text), vec!["The Verge"]);
    }

    #[test]
    fn ranked_by_count_then_first_seen() {
        let text = "Google met Microsoft. Microsoft paid Google. \
                    Nvidia shipped. Nvidia won. Nvidia grew.";
        // Nvidia: 3, Google: 2 (seen first), Microsoft: 2.
        assert_eq!(extract_entities(text), vec!["Nvidia", "Google"]);
    }

    #[test]
    fn phrases_do_not_cross_sentences_or_lines() {
        let text = "Deal with Apple. Samsung responded.\nIntel Labs\nOpenAI";
        let entities = extract_entities(text);
        assert!(!entities.iter().any(|e| e.contains("Apple Samsung")));
        assert!(entities.contains(&"Intel Labs".to_string()));
    }

    #[test]
    fn capitalized_sentence_opener_survives_when_repeated() {
        // Documented over-selection: common nouns that open sentences count.
        let text = "Prices rose. Prices fell.";
        assert_eq!(extract_entities(text), vec!["Prices"]);
    }

    #[test]
    fn trait_delegates_to_heuristic() {
        let extractor = CapitalizedPhrases;
        let text = "Sam Altman spoke.";
        assert_eq!(extractor.extract(text), extract_entities(text));
    }
}
