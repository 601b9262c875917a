use super::tokenizer::{title_words, tokenize_query};
use super::types::{AgeRangeTable, DocumentCollection, InterestMatrix, ScoredResult};
use crate::error::RankingError;
use serde_json::Value;

const TITLE_MATCH_WEIGHT: f64 = 10.0;

/// Reads an optional string field; absent means empty, any other type is malformed.
fn text_field<'a>(document: &'a Value, field: &'static str) -> Result<&'a str, RankingError> {
    let object = document.as_object().ok_or(RankingError::NotAnObject)?;
    match object.get(field) {
        None | Some(Value::Null) => Ok(""),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(RankingError::NonStringField(field)),
    }
}

/// Scores a single document.
///
/// `query_terms` must already be normalized (see [`tokenize_query`]). The
/// category weight only applies when an age group has been resolved.
pub fn score(
    document: &Value,
    query_terms: &[String],
    age_group: Option<&str>,
    interests: &InterestMatrix,
) -> Result<ScoredResult, RankingError> {
    let title = text_field(document, "titulo")?;
    let category = text_field(document, "categoria")?;

    let words = title_words(title);
    let title_match_count = query_terms
        .iter()
        .filter(|term| words.contains(term.as_str()))
        .count();

    let category_score = age_group
        .map(|group| interests.weight(category, group))
        .unwrap_or(0.0);

    Ok(ScoredResult {
        document: document.clone(),
        score: title_match_count as f64 * TITLE_MATCH_WEIGHT + category_score,
        title_match_count,
        category_score,
    })
}

/// Scores every document in load order. Output is not sorted.
pub fn score_all(
    documents: &DocumentCollection,
    query: &str,
    age_group: Option<&str>,
    interests: &InterestMatrix,
) -> Vec<ScoredResult> {
    let query_terms = tokenize_query(query);

    documents
        .iter()
        .enumerate()
        .map(|(position, document)| {
            score(document, &query_terms, age_group, interests).unwrap_or_else(|e| {
                tracing::warn!("Document #{} scored 0: {}", position, e);
                ScoredResult::zero(document.clone())
            })
        })
        .collect()
}

/// Resolves an optional age against the table.
pub fn resolve_age_group(age: Option<i64>, ranges: &AgeRangeTable) -> Option<&str> {
    age.and_then(|age| ranges.resolve(age))
}

/// Stable sort, highest score first. Equal scores keep their input order.
pub fn sort_by_score(results: &mut [ScoredResult]) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
}
