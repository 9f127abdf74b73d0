// Text preprocessing applied before embedding.
//
// Pipeline: lowercase -> keep only a-z and whitespace -> collapse whitespace
// -> drop stop words and short tokens -> lemmatize -> drop again. The
// embedding model sees only the cleaned string, so two submissions that
// differ in punctuation, digits or inflection land on the same vector.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

use super::lemmatize::lemmatize;

/// Tokens this short or shorter are dropped.
const MIN_TOKEN_LEN: usize = 2;

static NON_ALPHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z\s]").expect("valid regex"));

/// NLTK's English list: function words only, so content words like "new"
/// or "research" survive.
static STOP_WORDS: LazyLock<HashSet<String>> = LazyLock::new(|| {
    let words: Vec<String> = get(LANGUAGE::English);
    words.into_iter().collect()
});

/// Clean a submission into space-joined lemmatized tokens.
///
/// Never fails. Text with nothing substantive left (only digits, stop
/// words, punctuation) comes back as an empty string.
pub fn preprocess(text: &str) -> String {
    let lowered = text.to_lowercase();
    let letters_only = NON_ALPHA.replace_all(&lowered, " ");

    letters_only
        .split_whitespace()
        .filter(|token| keep_token(token))
        .map(lemmatize)
        // A lemma can itself be a stop word ("others" -> "other"), so filter again
        .filter(|lemma| keep_token(lemma))
        .collect::<Vec<_>>()
        .join(" ")
}

fn keep_token(token: &str) -> bool {
    token.len() > MIN_TOKEN_LEN && !is_stop_word(token)
}

/// Whitespace-delimited word count, as used for the submission length limits.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}
