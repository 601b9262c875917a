use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("word pattern is valid"));

/// Strips diacritics and case-folds: "Café" -> "cafe".
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Splits a query into normalized words, the same way titles are split.
///
/// `+`, whitespace and inner punctuation all separate words, so
/// "Spider-Man" yields "spider" and "man". Order and duplicates are kept;
/// every occurrence counts toward the title match count.
pub fn tokenize_query(query: &str) -> Vec<String> {
    words(query)
}

/// Whole words of a normalized title.
pub fn title_words(title: &str) -> HashSet<String> {
    words(title).into_iter().collect()
}

fn words(text: &str) -> Vec<String> {
    WORD.find_iter(&normalize(text))
        .map(|m| m.as_str().to_string())
        .collect()
}
