use super::{SummarizationClient, SummarizationError};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "more", "most", "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or",
    "other", "our", "ours", "out", "over", "own", "same", "she", "should", "so", "some",
    "such", "than", "that", "the", "their", "theirs", "them", "then", "there", "these", "they",
    "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "we",
    "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
    "would", "you", "your", "yours",
];

/// In-process extractive summarizer.
///
/// Sentences are scored by the normalised frequency of their content words and the highest
/// scoring ones are returned in their original order. The pipeline is deterministic and the
/// output is never longer than the input.
pub struct LocalPipeline {
    max_sentences: usize,
    stopwords: HashSet<&'static str>,
}

impl LocalPipeline {
    /// Build a pipeline that keeps at most `max_sentences` sentences (minimum one).
    pub fn new(max_sentences: usize) -> Self {
        Self {
            max_sentences: max_sentences.max(1),
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }

    /// Run the extractive pipeline synchronously.
    pub fn run(&self, text: &str) -> Result<String, SummarizationError> {
        let sentences = split_sentences(text);
        // Punctuation or symbols only: nothing to rank, so the input is its own summary.
        if sentences.is_empty() {
            return Ok(text.trim().to_string());
        }
        if sentences.len() <= self.max_sentences {
            return Ok(sentences.join(" "));
        }

        let frequencies = self.word_frequencies(&sentences);
        let peak = frequencies.values().copied().max().unwrap_or(1) as f64;

        let mut scored: Vec<(usize, f64)> = sentences
            .iter()
            .enumerate()
            .map(|(index, sentence)| {
                let score = tokenize(sentence)
                    .filter_map(|word| frequencies.get(word.as_str()))
                    .map(|count| *count as f64 / peak)
                    .sum::<f64>();
                (index, score)
            })
            .collect();

        scored.sort_by(|left, right| {
            right
                .1
                .partial_cmp(&left.1)
                .unwrap_or(Ordering::Equal)
                .then(left.0.cmp(&right.0))
        });
        let mut keep: Vec<usize> = scored
            .into_iter()
            .take(self.max_sentences)
            .map(|(index, _)| index)
            .collect();
        keep.sort_unstable();

        Ok(keep
            .into_iter()
            .map(|index| sentences[index])
            .collect::<Vec<_>>()
            .join(" "))
    }

    fn word_frequencies(&self, sentences: &[&str]) -> HashMap<String, usize> {
        let mut frequencies = HashMap::new();
        for word in sentences.iter().flat_map(|sentence| tokenize(sentence)) {
            if self.stopwords.contains(word.as_str()) {
                continue;
            }
            *frequencies.entry(word).or_insert(0) += 1;
        }
        frequencies
    }
}

#[async_trait]
impl SummarizationClient for LocalPipeline {
    async fn summarize(&self, text: &str) -> Result<String, SummarizationError> {
        self.run(text)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// Split on `.`, `!`, `?` followed by whitespace, and on blank lines. Returned slices are trimmed.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        let boundary = match ch {
            '.' | '!' | '?' => chars.peek().is_none_or(|(_, next)| next.is_whitespace()),
            '\n' => chars.peek().is_some_and(|(_, next)| *next == '\n'),
            _ => false,
        };
        if boundary {
            let end = index + ch.len_utf8();
            push_sentence(&mut sentences, &text[start..end]);
            start = end;
        }
    }
    push_sentence(&mut sentences, &text[start..]);
    sentences
}

fn push_sentence<'a>(sentences: &mut Vec<&'a str>, candidate: &'a str) {
    let trimmed = candidate.trim();
    if trimmed.chars().any(char::is_alphanumeric) {
        sentences.push(trimmed);
    }
}

fn tokenize(sentence: &str) -> impl Iterator<Item = String> + '_ {
    sentence
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|word| word.trim_matches('\'').to_lowercase())
        .filter(|word| !word.is_empty())
}
