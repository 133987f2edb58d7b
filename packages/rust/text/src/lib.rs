//! Text heuristics for turning article text into study material.
//!
//! Everything here is pure and deterministic:
//! - [`sentences`]: punctuation-based sentence segmentation
//! - [`summarize`]: bounded greedy extractive summary
//! - [`infer_topic`]: headline-shaped line or first sentence
//! - [`extract_entities`]: capitalized phrase ranking
//! - [`QuestionGenerator`]: up to three rule-based questions

pub mod entities;
pub mod questions;
pub mod sentences;
pub mod summarize;
pub mod topic;

pub use entities::{CapitalizedPhrases, EntityExtractor, MAX_ENTITIES, STOPWORDS, extract_entities};
pub use questions::{MAX_QUESTIONS, QuestionGenerator, generate_questions};
pub use sentences::{Sentences, sentences};
pub use summarize::summarize;
pub use topic::{NO_TOPIC, infer_topic};
