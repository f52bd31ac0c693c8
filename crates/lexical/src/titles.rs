use crate::fuzzy::ratio_ci;

/// A single fuzzy title match: the catalog ordinal and its similarity ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitleMatch {
    pub ordinal: usize,
    pub ratio: f32,
}

/// Finds titles with a fuzzy ratio to `query` at or above `cutoff`, returning at most
/// `limit` matches sorted by ratio descending then ordinal ascending.
///
/// `titles` is `(ordinal, lowercased title)` pairs, typically `Catalog::titles_lc()`
/// paired with `Catalog::ordinal_of`.
pub fn close_matches<'a>(
    query: &str,
    titles: impl Iterator<Item = (usize, &'a str)>,
    cutoff: f32,
    limit: usize,
) -> Vec<TitleMatch> {
    let query_lc = query.to_lowercase();
    let mut matches: Vec<TitleMatch> = titles
        .filter_map(|(ordinal, title)| {
            let r = ratio_ci(&query_lc, title);
            (r >= cutoff).then_some(TitleMatch { ordinal, ratio: r })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.ratio
            .partial_cmp(&a.ratio)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.ordinal.cmp(&b.ordinal))
    });
    matches.truncate(limit);
    matches
}
