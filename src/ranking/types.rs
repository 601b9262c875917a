use crate::ranking::tokenizer::normalize;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// One configured age interval, inclusive on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeRange {
    pub label: String,
    pub start: i64,
    pub end: i64,
}

impl AgeRange {
    pub fn contains(&self, age: i64) -> bool {
        self.start <= age && age <= self.end
    }
}

/// Age groups in configuration order.
///
/// Ranges may overlap; the first one that contains an age wins, so the order
/// in which they were configured is part of the table's meaning. An inverted
/// range could never match and is dropped on construction.
#[derive(Debug, Clone, Default)]
pub struct AgeRangeTable {
    ranges: Vec<AgeRange>,
}

impl AgeRangeTable {
    pub fn new(ranges: Vec<AgeRange>) -> Self {
        let ranges = ranges
            .into_iter()
            .filter(|range| {
                if range.start > range.end {
                    tracing::warn!(
                        "Age range '{}' is inverted ({} > {}), ignoring it",
                        range.label,
                        range.start,
                        range.end
                    );
                    return false;
                }
                true
            })
            .collect();
        Self { ranges }
    }

    /// Returns the label of the first range containing `age`.
    pub fn resolve(&self, age: i64) -> Option<&str> {
        self.ranges
            .iter()
            .find(|range| range.contains(age))
            .map(|range| range.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Interest weight per (category, age group).
///
/// Category keys are normalized on construction so lookups are
/// accent- and case-insensitive. Categories that normalize to the same key
/// are merged in input order; a later weight for the same group wins.
#[derive(Debug, Clone, Default)]
pub struct InterestMatrix {
    weights: HashMap<String, HashMap<String, f64>>,
}

impl InterestMatrix {
    pub fn new(raw: impl IntoIterator<Item = (String, HashMap<String, f64>)>) -> Self {
        let mut weights: HashMap<String, HashMap<String, f64>> = HashMap::new();

        for (category, groups) in raw {
            let key = normalize(&category);
            match weights.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(groups);
                }
                Entry::Occupied(mut slot) => {
                    tracing::warn!(
                        "Category '{}' collides with another after normalization as '{}', merging",
                        category,
                        slot.key()
                    );
                    for (group, weight) in groups {
                        if let Some(previous) = slot.get_mut().insert(group.clone(), weight) {
                            if previous != weight {
                                tracing::warn!(
                                    "Interest for '{}' / '{}' overridden: {} -> {}",
                                    slot.key(),
                                    group,
                                    previous,
                                    weight
                                );
                            }
                        }
                    }
                }
            }
        }

        Self { weights }
    }

    /// Weight for a category and age group, 0 when either is unknown.
    pub fn weight(&self, category: &str, group: &str) -> f64 {
        self.weights
            .get(&normalize(category))
            .and_then(|groups| groups.get(group))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// A worker's documents, in load order.
#[derive(Debug, Clone, Default)]
pub struct DocumentCollection {
    documents: Vec<Value>,
}

impl DocumentCollection {
    pub fn new(documents: Vec<Value>) -> Self {
        Self { documents }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Score of one document for one query. Field names are the wire format
/// workers return to the coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    #[serde(rename = "documento")]
    pub document: Value,
    pub score: f64,
    #[serde(rename = "coincidencias_titulo")]
    pub title_match_count: usize,
    #[serde(rename = "puntaje_categoria")]
    pub category_score: f64,
}

impl ScoredResult {
    pub fn zero(document: Value) -> Self {
        Self {
            document,
            score: 0.0,
            title_match_count: 0,
            category_score: 0.0,
        }
    }
}
