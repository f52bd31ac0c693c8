use catalog::{Catalog, OccupationRecord};
use embed::EmbedConfig;
use lexical::KeywordIndex;

use crate::config::RescueConfig;
use crate::confidence::is_low_confidence;
use crate::error::RescueError;
use crate::language::detect_language;
use crate::synonyms::SynonymBank;
use crate::types::{HierarchyFilter, SearchHit, SearchOutcome, Stage};

/// Confidence sentinel assigned to Stage D keyword-overlap hits — deliberately below
/// the low-confidence gate, since a lexical match is never as trustworthy as a
/// confident vector match.
const KEYWORD_FALLBACK_CONFIDENCE: f32 = 0.25;
/// Confidence sentinel assigned to Stage D fuzzy-title hits.
const FUZZY_FALLBACK_CONFIDENCE: f32 = 0.20;

/// Runs one vector search against `catalog`/`vector_index` for `text`. Fetches
/// `fetch_count` raw candidates, drops any failing `filter`, truncates to `keep`, and
/// only then computes softmax — so the confidence distribution reflects exactly the
/// filtered, truncated set the caller sees.
async fn vector_search(
    catalog: &Catalog,
    vector_index: &vecindex::VectorIndex,
    embed_cfg: &EmbedConfig,
    text: &str,
    fetch_count: usize,
    keep: usize,
    filter: &HierarchyFilter,
) -> Result<Vec<SearchHit>, RescueError> {
    let embedding = embed::embed_query(text, embed_cfg).await?;
    let oversampled = vector_index.search(&embedding.values, fetch_count)?;

    let mut retained: Vec<(vecindex::Hit, &OccupationRecord)> = Vec::new();
    for hit in oversampled {
        let Some(record) = catalog.by_ordinal(hit.ordinal) else {
            continue;
        };
        if filter.is_empty() || filter.matches(record) {
            retained.push((hit, record));
        }
        if retained.len() >= keep {
            break;
        }
    }

    let scores: Vec<f32> = retained.iter().map(|(hit, _)| hit.score).collect();
    let confidences = vecindex::softmax(&scores);

    Ok(retained
        .into_iter()
        .zip(confidences)
        .map(|((hit, record), confidence)| SearchHit {
            code: record.code.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            score: hit.score,
            confidence,
            matched_synonyms: Vec::new(),
        })
        .collect())
}

/// Computes `matched_synonyms` for each hit: the title if the lowercased query is a
/// substring of it, plus any record synonym matching the query by bidirectional
/// substring (synonym in query, or query in synonym), up to 3 total.
fn annotate_matched_synonyms(hits: &mut [SearchHit], catalog: &Catalog, query: &str) {
    let query_lc = query.to_lowercase();
    for hit in hits.iter_mut() {
        let Some(record) = catalog.by_code(&hit.code) else {
            continue;
        };
        hit.matched_synonyms = matched_synonyms_for(record, &query_lc);
    }
}

fn matched_synonyms_for(record: &OccupationRecord, query_lc: &str) -> Vec<String> {
    let mut matches = Vec::new();
    let title_lc = record.title.to_lowercase();
    if title_lc.contains(query_lc) {
        matches.push(record.title.clone());
    }
    for synonym in &record.synonyms {
        if matches.len() >= 3 {
            break;
        }
        let synonym_lc = synonym.to_lowercase();
        if synonym_lc.contains(query_lc) || query_lc.contains(synonym_lc.as_str()) {
            matches.push(synonym.clone());
        }
    }
    matches.truncate(3);
    matches
}

/// Stage D: keyword-overlap and fuzzy-title lexical fallback, ranked keyword hits
/// first, then fuzzy hits not already present.
fn lexical_fallback(
    catalog: &Catalog,
    keyword_index: &KeywordIndex,
    query: &str,
    cfg: &RescueConfig,
    limit: usize,
) -> Vec<SearchHit> {
    let query_words = lexical::tokenize(query);
    let keyword_hits = keyword_index.search(&query_words, limit);

    let mut seen = std::collections::HashSet::new();
    let mut hits = Vec::new();

    for (ordinal, count) in keyword_hits {
        if let Some(record) = catalog.by_ordinal(ordinal) {
            if seen.insert(record.code.clone()) {
                hits.push(SearchHit {
                    code: record.code.clone(),
                    title: record.title.clone(),
                    description: record.description.clone(),
                    score: count as f32,
                    confidence: KEYWORD_FALLBACK_CONFIDENCE,
                    matched_synonyms: Vec::new(),
                });
            }
        }
    }

    let titles = catalog
        .iter()
        .enumerate()
        .map(|(ordinal, record)| (ordinal, record.title.to_lowercase()));
    // Collect owned lowercased titles first since `close_matches` borrows `&str`.
    let titles: Vec<(usize, String)> = titles.collect();
    let fuzzy = lexical::close_matches(
        query,
        titles.iter().map(|(ordinal, title)| (*ordinal, title.as_str())),
        cfg.fuzzy_title_cutoff,
        limit,
    );
    for m in fuzzy {
        if let Some(record) = catalog.by_ordinal(m.ordinal) {
            if seen.insert(record.code.clone()) {
                hits.push(SearchHit {
                    code: record.code.clone(),
                    title: record.title.clone(),
                    description: record.description.clone(),
                    score: 0.0,
                    confidence: FUZZY_FALLBACK_CONFIDENCE,
                    matched_synonyms: Vec::new(),
                });
            }
        }
    }

    hits
}

/// Derives the `suggestions` field: up to 3 catalog titles sharing a keyword-index
/// token with `query`, excluding titles already present in `hits`.
fn derive_suggestions(catalog: &Catalog, keyword_index: &KeywordIndex, query: &str, hits: &[SearchHit]) -> Vec<String> {
    let query_words = lexical::tokenize(query);
    let existing: std::collections::HashSet<&str> = hits.iter().map(|h| h.title.as_str()).collect();

    let mut seen = std::collections::HashSet::new();
    let mut suggestions = Vec::new();
    for (ordinal, _count) in keyword_index.search(&query_words, 10) {
        let Some(record) = catalog.by_ordinal(ordinal) else {
            continue;
        };
        if existing.contains(record.title.as_str()) {
            continue;
        }
        if seen.insert(record.title.clone()) {
            suggestions.push(record.title.clone());
        }
        if suggestions.len() >= 3 {
            break;
        }
    }
    suggestions
}

/// Runs the full Stage A-D query-rescue cascade for `query`.
///
/// `translated_query` is an optional caller-supplied pre-translated string used for
/// Stage C; this crate never performs translation itself.
#[allow(clippy::too_many_arguments)]
pub async fn search(
    catalog: &Catalog,
    vector_index: &vecindex::VectorIndex,
    keyword_index: &KeywordIndex,
    synonym_bank: &SynonymBank,
    embed_cfg: &EmbedConfig,
    cfg: &RescueConfig,
    query: &str,
    translated_query: Option<&str>,
    k: usize,
    filter: &HierarchyFilter,
) -> Result<SearchOutcome, RescueError> {
    if query.trim().is_empty() {
        return Err(RescueError::EmptyQuery);
    }

    let language = detect_language(query);
    let fetch_count = k.saturating_mul(cfg.oversample_factor).max(k);

    // Stage A: primary vector search.
    let mut hits = vector_search(catalog, vector_index, embed_cfg, query, fetch_count, k, filter).await?;
    let mut stage = Stage::Primary;
    let mut translated = false;

    let primary_top_confidence = hits.first().map(|h| h.confidence).unwrap_or(0.0);

    // Stage B: synonym expansion, only if Stage A wasn't already confident.
    if primary_top_confidence < cfg.synonym_confidence_trigger {
        for variant in synonym_bank.expand(query) {
            let variant_hits =
                vector_search(catalog, vector_index, embed_cfg, &variant, fetch_count, k, filter).await?;
            let top = variant_hits.first().map(|h| h.confidence).unwrap_or(0.0);
            if top >= cfg.synonym_confidence_trigger {
                hits = variant_hits;
                stage = Stage::SynonymExpansion;
                break;
            }
        }
    }

    // Stage C: translation rescue, only if still low-confidence and the caller gave us
    // a pre-translated query to retry with.
    if is_low_confidence(&hits, cfg) {
        if let Some(translated_text) = translated_query {
            let translated_hits =
                vector_search(catalog, vector_index, embed_cfg, translated_text, fetch_count, k, filter).await?;
            if !translated_hits.is_empty() {
                hits = translated_hits;
                stage = Stage::TranslationRescue;
                translated = true;
            }
        }
    }

    // Stage D: lexical fallback, triggered by an empty result or very low top similarity.
    let top_score = hits.first().map(|h| h.score).unwrap_or(0.0);
    if hits.is_empty() || top_score < cfg.lexical_trigger_topsim {
        let fallback_hits = lexical_fallback(catalog, keyword_index, query, cfg, k.max(5));
        if !fallback_hits.is_empty() {
            let existing: std::collections::HashSet<String> =
                hits.iter().map(|h| h.code.clone()).collect();
            for hit in fallback_hits {
                if !existing.contains(&hit.code) {
                    hits.push(hit);
                }
            }
            stage = Stage::LexicalFallback;
        }
    }

    annotate_matched_synonyms(&mut hits, catalog, query);

    hits.truncate(k);
    let low_confidence = is_low_confidence(&hits, cfg);
    let suggestions = if low_confidence {
        derive_suggestions(catalog, keyword_index, query, &hits)
    } else {
        Vec::new()
    };
    let alternatives = if low_confidence {
        let mut terms = synonym_bank.alternative_terms(query);
        terms.truncate(3);
        terms
    } else {
        Vec::new()
    };

    Ok(SearchOutcome {
        hits,
        low_confidence,
        language,
        stage,
        translated,
        suggestions,
        alternatives,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::Hierarchy;
    use std::collections::BTreeSet;
    use vecindex::VectorIndex;

    fn record(code: &str, title: &str, division_code: &str) -> OccupationRecord {
        OccupationRecord {
            code: code.to_string(),
            title: title.to_string(),
            description: String::new(),
            synonyms: BTreeSet::new(),
            examples: Vec::new(),
            hierarchy: Some(Hierarchy {
                division_code: division_code.to_string(),
                division_name: String::new(),
                sub_division_code: String::new(),
                minor_group_code: format!("{division_code}00"),
                unit_group_code: format!("{division_code}000"),
            }),
            search_keywords: None,
            searchable_text: None,
        }
    }

    fn stub_passage_vector(text: &str, cfg: &EmbedConfig) -> Vec<f32> {
        embed::stub::make_stub_embedding(&format!("passage: {text}"), cfg).values
    }

    #[tokio::test]
    async fn vector_search_drops_candidates_failing_the_hierarchy_filter_before_softmax() {
        let (catalog, _report) = Catalog::from_records(vec![
            record("7212.0100", "Welder, Gas", "7"),
            record("2330.0100", "Welder, Gas", "2"),
        ]);
        let cfg = EmbedConfig {
            mode: "stub".into(),
            dim: 32,
            ..EmbedConfig::default()
        };
        let vectors: Vec<Vec<f32>> = catalog
            .iter()
            .map(|r| stub_passage_vector(&r.passage_text(), &cfg))
            .collect();
        let index = VectorIndex::build_from(vectors).unwrap();

        let filter = HierarchyFilter {
            division_code: Some("7".to_string()),
            minor_group_code: None,
        };

        let hits = vector_search(&catalog, &index, &cfg, "Welder, Gas", 6, 5, &filter)
            .await
            .unwrap();

        assert!(hits.iter().all(|h| h.code == "7212.0100"));
        let total_confidence: f32 = hits.iter().map(|h| h.confidence).sum();
        assert!((total_confidence - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn vector_search_softmaxes_over_the_retained_k_not_the_oversampled_fetch() {
        let records: Vec<OccupationRecord> = (0..9)
            .map(|i| record(&format!("{:04}.0001", 1000 + i), &format!("Occupation {i}"), "7"))
            .collect();
        let (catalog, _report) = Catalog::from_records(records);
        let cfg = EmbedConfig {
            mode: "stub".into(),
            dim: 32,
            ..EmbedConfig::default()
        };
        let vectors: Vec<Vec<f32>> = catalog
            .iter()
            .map(|r| stub_passage_vector(&r.passage_text(), &cfg))
            .collect();
        let index = VectorIndex::build_from(vectors).unwrap();

        // Fetch 9 (the whole catalog) but keep only the top 3 — confidences must sum to
        // 1 over those 3, not be diluted across all 9 fetched candidates.
        let hits = vector_search(&catalog, &index, &cfg, "Occupation 0", 9, 3, &HierarchyFilter::default())
            .await
            .unwrap();

        assert_eq!(hits.len(), 3);
        let total_confidence: f32 = hits.iter().map(|h| h.confidence).sum();
        assert!((total_confidence - 1.0).abs() < 1e-5);
    }

    #[test]
    fn matched_synonyms_includes_title_on_substring_match_and_synonyms_bidirectionally() {
        let mut record = record("7212.0100", "Welder, Gas", "7");
        record.synonyms.insert("arc welder".to_string());
        record.synonyms.insert("soldering".to_string());

        let matches = matched_synonyms_for(&record, "welder");
        assert!(matches.contains(&"Welder, Gas".to_string()));
        assert!(matches.contains(&"arc welder".to_string()));
        assert!(!matches.contains(&"soldering".to_string()));
    }

    #[test]
    fn matched_synonyms_caps_at_three() {
        let mut record = record("7212.0100", "Welder, Gas", "7");
        record.synonyms.insert("welder one".to_string());
        record.synonyms.insert("welder two".to_string());
        record.synonyms.insert("welder three".to_string());
        record.synonyms.insert("welder four".to_string());

        let matches = matched_synonyms_for(&record, "welder");
        assert!(matches.len() <= 3);
    }
}
