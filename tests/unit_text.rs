// Unit tests for text preprocessing.
//
// Tests the output invariants of preprocess (alphabet, token length, stop
// words, stability on its own output) and lemmatizer edge cases.

use neuroscan::text::lemmatize::lemmatize;
use neuroscan::text::normalize::is_stop_word;
use neuroscan::text::{preprocess, word_count};

const SAMPLES: &[&str] = &[
    "The James Webb telescopes captured 42 galaxies at the edge of the observable universe!",
    "Researchers' new vaccine candidates showed 95% efficacy in early-stage trials.",
    "Zebras, giraffes & elephants migrate across the Serengeti plains every year...",
    "   \t\n  ",
    "café naïve résumé — unicode dashes and ACCENTS",
    "1234 5678 90",
    "a an the of to in on at by",
    "datas medias zebra",
    "Businessmen discussed viruses, buzzes and movies with firemen.",
    "New research information shows important results for the world",
];

// ============================================================
// preprocess: output invariants
// ============================================================

#[test]
fn output_is_lowercase_ascii_letters_and_single_spaces() {
    for sample in SAMPLES {
        let cleaned = preprocess(sample);
        assert!(
            cleaned
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == ' '),
            "unexpected character in {cleaned:?}"
        );
        assert!(!cleaned.contains("  "), "double space in {cleaned:?}");
        assert_eq!(cleaned, cleaned.trim());
    }
}

#[test]
fn output_tokens_longer_than_two_chars() {
    for sample in SAMPLES {
        for token in preprocess(sample).split_whitespace() {
            assert!(token.len() > 2, "short token {token:?} from {sample:?}");
        }
    }
}

#[test]
fn output_has_no_stop_words() {
    for sample in SAMPLES {
        for token in preprocess(sample).split_whitespace() {
            assert!(!is_stop_word(token), "stop word {token:?} survived");
        }
    }
}

#[test]
fn preprocess_is_idempotent() {
    for sample in SAMPLES {
        let once = preprocess(sample);
        let twice = preprocess(&once);
        assert_eq!(once, twice, "not stable for {sample:?}");
    }
}

#[test]
fn plural_of_irregular_plural_is_stable() {
    let once = preprocess("datas medias zebra");
    assert_eq!(once, "datum medium zebra");
    assert_eq!(preprocess(&once), once);
}

#[test]
fn content_words_survive_cleaning() {
    let cleaned = preprocess("New research shows novel computer systems solve problems");
    assert_eq!(cleaned, "new research show novel computer system solve problem");
}

#[test]
fn only_numbers_and_stop_words_clean_to_empty() {
    assert_eq!(preprocess("1234 5678 90"), "");
    assert_eq!(preprocess("a an the of to in on at by"), "");
}

#[test]
fn punctuation_splits_tokens() {
    let cleaned = preprocess("zebra,giraffe;telescope");
    assert_eq!(cleaned, "zebra giraffe telescope");
}

#[test]
fn plurals_are_lemmatized() {
    let cleaned = preprocess("telescopes galaxies zebras");
    assert_eq!(cleaned, "telescope galaxy zebra");
}

// ============================================================
// word_count
// ============================================================

#[test]
fn word_count_ignores_repeated_whitespace() {
    assert_eq!(word_count("  one\ttwo\n\nthree   four "), 4);
}

#[test]
fn word_count_counts_punctuation_groups() {
    // Raw counting is whitespace-only, before any cleaning
    assert_eq!(word_count("hello , world !"), 4);
}

// ============================================================
// lemmatize: edge cases
// ============================================================

#[test]
fn lemmatize_leaves_double_s_alone() {
    assert_eq!(lemmatize("process"), "process");
    assert_eq!(lemmatize("success"), "success");
}

#[test]
fn lemmatize_handles_sses() {
    assert_eq!(lemmatize("processes"), "process");
}

#[test]
fn lemmatize_ous_adjectives_untouched() {
    assert_eq!(lemmatize("famous"), "famous");
    assert_eq!(lemmatize("previous"), "previous");
}

#[test]
fn lemmatize_compound_men() {
    assert_eq!(lemmatize("businessmen"), "businessman");
    assert_eq!(lemmatize("firemen"), "fireman");
}

#[test]
fn lemmatize_es_after_s_singular() {
    assert_eq!(lemmatize("viruses"), "virus");
    assert_eq!(lemmatize("buses"), "bus");
    assert_eq!(lemmatize("bias"), "bias");
    assert_eq!(lemmatize("atlas"), "atlas");
}

#[test]
fn lemmatize_ie_singular() {
    assert_eq!(lemmatize("movies"), "movie");
}

#[test]
fn lemmatize_zes() {
    assert_eq!(lemmatize("buzzes"), "buzz");
}

#[test]
fn lemmatize_short_s_words_untouched() {
    assert_eq!(lemmatize("gas"), "gas");
    assert_eq!(lemmatize("bus"), "bus");
}
