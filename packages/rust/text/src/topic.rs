//! Topic inference for articles that arrive without a headline.

use crate::sentences::sentences;

/// Returned when the source has neither a headline-shaped line nor a sentence.
pub const NO_TOPIC: &str = "No specific topic found";

/// Pick a topic for `source`.
///
/// Prefers the first line that looks like a headline: longer than 10 and
/// shorter than 100 characters, starting with an uppercase letter, and not
/// ending in a period. Falls back to the first sentence, then to [`NO_TOPIC`].
pub fn infer_topic(source: &str) -> String {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find(|line| is_headline(line))
        .or_else(|| sentences(source).next())
        .unwrap_or(NO_TOPIC)
        .to_string()
}

fn is_headline(line: &str) -> bool {
    let len = line.chars().count();
    len > 10
        && len < 100
        && line.chars().next().is_some_and(char::is_uppercase)
        && !line.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_gives_sentinel() {
        assert_eq!(infer_topic(""), NO_TOPIC);
        assert_eq!(infer_topic("  \n\n ... "), NO_TOPIC);
    }

    #[test]
    fn picks_first_headline_shaped_line() {
        let source = "Short line.\nA Valid Headline Here\nMore text.";
        assert_eq!(infer_topic(source), "A Valid Headline Here");
    }

    #[test]
    fn lines_are_trimmed_before_checking() {
        let source = "\n   Chip Makers Rally on Earnings   \nbody";
        assert_eq!(infer_topic(source), "Chip Makers Rally on Earnings");
    }

    #[test]
    fn rejects_lowercase_short_and_long_lines() {
        let long = format!("A{}", "b".repeat(120));
        let source = format!("lowercase start line\nTen chars!\n{long}\nfinal sentence. another");
        // No headline qualifies, so the first sentence wins.
        assert_eq!(infer_topic(&source), "lowercase start line\nTen chars");
    }

    #[test]
    fn length_bounds_are_exclusive() {
        // Exactly 10 characters is too short; 11 is accepted.
        assert_eq!(infer_topic("Abcdefghij\nrest."), "Abcdefghij\nrest");
        assert_eq!(infer_topic("Abcdefghijk\nrest."), "Abcdefghijk");
    }

    #[test]
    fn falls_back_to_first_sentence() {
        let source = "the market moved today. Analysts were surprised.";
        assert_eq!(infer_topic(source), "the market moved today");
    }
}
