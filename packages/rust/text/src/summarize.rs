//! Greedy extractive summarizer.

use tracing::trace;

use crate::sentences::sentences;

/// Build a summary of `text` no longer than `cap` characters.
///
/// Sentences are taken in order, each closed with `.` and joined with a
/// single space, while the running length stays strictly below `cap`. The
/// first sentence that does not fit ends the summary; it is never cut. When
/// even the first sentence does not fit, the first `cap` characters of the
/// raw text are returned as they are, whitespace included. Blank text gives
/// an empty summary.
pub fn summarize(text: &str, cap: usize) -> String {
    let mut summary = String::new();
    let mut len = 0usize;

    for sentence in sentences(text) {
        let sep = usize::from(!summary.is_empty());
        let next_len = len + sep + sentence.chars().count() + 1;
        if next_len >= cap {
            break;
        }
        if sep == 1 {
            summary.push(' ');
        }
        summary.push_str(sentence);
        summary.push('.');
        len = next_len;
    }

    if summary.is_empty() {
        if text.trim().is_empty() {
            return summary;
        }
        trace!(cap, "first sentence exceeds cap, truncating raw text");
        return truncate_chars(text, cap).to_string();
    }

    summary.trim().to_string()
}

/// Take at most `max_chars` characters from `text`, never splitting a code point.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
