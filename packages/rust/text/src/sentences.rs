//! Sentence segmentation on terminal punctuation.
//!
//! Splits on `.`, `!` and `?` only. Abbreviations ("Dr.") and decimals
//! ("3.5") produce extra breaks.

/// Characters that end a sentence.
const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Lazy iterator over trimmed, non-empty sentences. Clones are independent
/// cursors.
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    inner: std::str::Split<'a, [char; 3]>,
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        for piece in self.inner.by_ref() {
            let trimmed = piece.trim();
            if !trimmed.is_empty() {
                return Some(trimmed);
            }
        }
        None
    }
}

/// Segment `text` into sentences.
pub fn sentences(text: &str) -> Sentences<'_> {
    Sentences {
        inner: text.split(TERMINATORS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_all_terminators() {
        let got: Vec<_> = sentences("One. Two! Three? Four").collect();
        assert_eq!(got, vec!["One", "Two", "Three", "Four"]);
    }

    #[test]
    fn drops_empty_pieces() {
        let got: Vec<_> = sentences("  ...Wait!!  What?  ").collect();
        assert_eq!(got, vec!["Wait", "What"]);
    }

    #[test]
    fn empty_text_has_no_sentences() {
        assert_eq!(sentences("").count(), 0);
        assert_eq!(sentences("   \n ").count(), 0);
    }

    #[test]
    fn decimals_and_abbreviations_split() {
        let got: Vec<_> = sentences("Dr. Smith paid 3.5 dollars.").collect();
        assert_eq!(got, vec!["Dr", "Smith paid 3", "5 dollars"]);
    }

    #[test]
    fn clone_is_restartable() {
        let iter = sentences("A. B. C.");
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn newlines_do_not_split() {
        let got: Vec<_> = sentences("Headline\nBody text. More").collect();
        assert_eq!(got, vec!["Headline\nBody text", "More"]);
    }
}
