use crate::model::ApplicationEntity;
use crate::recency::RecencyList;

pub const SEARCH_RESULT_LIMIT: usize = 5;
pub const MIN_QUALIFYING_SCORE: i64 = 400;

const RUNNING_BONUS: i64 = 200;
const SUBSTRING_BONUS: i64 = 400;
const ABBREVIATION_BONUS: i64 = 800;
const PREFIX_BONUS: i64 = 1000;

/// Filters and ranks `entities` for raw search-field text.
///
/// Empty text, a lone space, or text that is empty after dropping one leading
/// space returns the input untouched, in its existing default order.
pub fn search(
    entities: &[ApplicationEntity],
    query: &str,
    recency: &RecencyList,
    limit: usize,
) -> Vec<ApplicationEntity> {
    let cleaned = query.strip_prefix(' ').unwrap_or(query);
    rank(entities, cleaned, recency, limit)
}

/// Ranks `entities` for text that already had its mode marker removed.
pub fn rank(
    entities: &[ApplicationEntity],
    text: &str,
    recency: &RecencyList,
    limit: usize,
) -> Vec<ApplicationEntity> {
    if text.is_empty() {
        return entities.to_vec();
    }
    if limit == 0 {
        return Vec::new();
    }

    let query = text.to_lowercase();
    let mut scored: Vec<(i64, &ApplicationEntity)> = entities
        .iter()
        .map(|entity| (score_entity(entity, &query, recency), entity))
        .filter(|(score, _)| *score >= MIN_QUALIFYING_SCORE)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(limit)
        .map(|(_, entity)| entity.clone())
        .collect()
}

/// Summed relevance of one entity; `query` must already be lower-cased.
pub fn score_entity(entity: &ApplicationEntity, query: &str, recency: &RecencyList) -> i64 {
    let name = entity.name.to_lowercase();
    let mut score = 0;

    if let Some(index) = recency.position(&entity.name) {
        score += recency_bonus(index);
    }

    if entity.is_running {
        score += RUNNING_BONUS;
    }

    if let Some(byte_index) = name.find(query) {
        let char_index = name[..byte_index].chars().count() as i64;
        score += SUBSTRING_BONUS + (50 - char_index).max(0);
    }

    if abbreviation(&name).contains(query) {
        score += ABBREVIATION_BONUS;
    }

    if name.starts_with(query) {
        score += PREFIX_BONUS;
    }

    score
}

fn recency_bonus(index: usize) -> i64 {
    let index = i64::try_from(index).unwrap_or(i64::MAX / 5);
    (100 - 5 * index).max(0)
}

/// First letter of every word, splitting on whitespace, `-` and `_` runs.
pub fn abbreviation(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_lowercase)
        .collect()
}
