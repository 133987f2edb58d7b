//! Heuristic comprehension questions.
//!
//! Three rules run in order and each may add one question:
//! 1. subject: always, when the text has at least one sentence
//! 2. entity: about one entity, or the relation between the top two
//! 3. action: a "key event" question when one of the first sentences uses an
//!    action keyword (substring, so "impact" also hits "impacted"), otherwise a question about implications

use regex::Regex;
use tracing::debug;

use newsdigest_shared::{DEFAULT_ACTION_KEYWORDS, DigestError, Result};

use crate::entities::{CapitalizedPhrases, EntityExtractor};
use crate::sentences::sentences;

/// Upper bound on generated questions.
pub const MAX_QUESTIONS: usize = 3;

/// Number of leading sentences scanned by the action rule.
const ACTION_SCAN_SENTENCES: usize = 5;

const SUBJECT_QUESTION: &str = "What is the main focus of this article?";
const KEY_EVENT_QUESTION: &str = "What is the key event described in this article?";
const IMPLICATIONS_QUESTION: &str =
    "What are the potential implications of the developments described in this article?";

/// Question generator with a configurable action vocabulary and entity extractor.
pub struct QuestionGenerator {
    action_re: Regex,
    extractor: Box<dyn EntityExtractor>,
}

impl std::fmt::Debug for QuestionGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionGenerator")
            .field("action_re", &self.action_re.as_str())
            .finish_non_exhaustive()
    }
}

impl QuestionGenerator {
    /// Build a generator matching `action_keywords` anywhere in a sentence, ignoring case.
    pub fn new<S: AsRef<str>>(action_keywords: &[S]) -> Result<Self> {
        Self::with_extractor(action_keywords, Box::new(CapitalizedPhrases))
    }

    /// Build a generator with a custom entity extractor.
    pub fn with_extractor<S: AsRef<str>>(
        action_keywords: &[S],
        extractor: Box<dyn EntityExtractor>,
    ) -> Result<Self> {
        let alternatives: Vec<String> = action_keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect();

        if alternatives.is_empty() {
            return Err(DigestError::config("action keyword list is empty"));
        }

        let pattern = format!("(?i)(?:{})", alternatives.join("|"));
        let action_re = Regex::new(&pattern)
            .map_err(|e| DigestError::config(format!("invalid action keywords: {e}")))?;

        Ok(Self {
            action_re,
            extractor,
        })
    }

    /// Generate up to [`MAX_QUESTIONS`] questions for `text`, in rule order.
    pub fn generate(&self, text: &str) -> Vec<String> {
        let mut sents = sentences(text).peekable();
        if sents.peek().is_none() {
            return Vec::new();
        }

        let mut questions = Vec::with_capacity(MAX_QUESTIONS);

        // Rule 1: subject
        questions.push(SUBJECT_QUESTION.to_string());

        // Rule 2: entities
        if questions.len() < MAX_QUESTIONS {
            let entities = self.extractor.extract(text);
            match entities.as_slice() {
                [] => {}
                [only] => questions.push(format!("What role does {only} play in this article?")),
                [first, second, ..] => questions.push(format!(
                    "What is the relationship between {first} and {second}?"
                )),
            }
        }

        // Rule 3: action
        if questions.len() < MAX_QUESTIONS {
            let hit = sents
                .take(ACTION_SCAN_SENTENCES)
                .any(|s| self.action_re.is_match(s));
            questions.push(if hit {
                KEY_EVENT_QUESTION.to_string()
            } else {
                IMPLICATIONS_QUESTION.to_string()
            });
        }

        questions.truncate(MAX_QUESTIONS);
        debug!(count = questions.len(), "generated questions");
        questions
    }
}

impl Default for QuestionGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ACTION_KEYWORDS).expect("valid default action keywords")
    }
}

/// Generate questions with the default action vocabulary.
pub fn generate_questions(text: &str) -> Vec<String> {
    QuestionGenerator::default().generate(text)
}
