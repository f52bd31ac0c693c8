use std::collections::HashMap;

/// Gestalt pattern-matching similarity ratio between two strings: `2*M / T`, where `M`
/// is the total length of all non-overlapping matching blocks found by recursively
/// locating the longest common substring, and `T` is the combined length of both
/// strings. This is the same family of algorithm behind Python's
/// `difflib.SequenceMatcher.ratio()` / `get_close_matches`.
///
/// Returns a value in `[0.0, 1.0]`; `1.0` means the strings are identical.
pub fn ratio(a: &str, b: &str) -> f32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }

    let b2j = build_b2j(&b);
    let matched = matching_block_length(&a, &b, 0, a.len(), 0, b.len(), &b2j);
    (2.0 * matched as f32) / total as f32
}

fn build_b2j(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut map: HashMap<char, Vec<usize>> = HashMap::new();
    for (idx, &c) in b.iter().enumerate() {
        map.entry(c).or_default().push(idx);
    }
    map
}

/// Longest matching substring between `a[alo..ahi]` and `b[blo..bhi]`, returned as
/// `(a_start, b_start, len)`.
fn find_longest_match(
    a: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
    b2j: &HashMap<char, Vec<usize>>,
) -> (usize, usize, usize) {
    let mut best_i = alo;
    let mut best_j = blo;
    let mut best_size = 0usize;
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for i in alo..ahi {
        let mut new_j2len: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(&a[i]) {
            for &j in positions {
                if j < blo || j >= bhi {
                    continue;
                }
                let k = if j > 0 {
                    j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                new_j2len.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        j2len = new_j2len;
    }

    (best_i, best_j, best_size)
}

/// Recursively sums the sizes of all non-overlapping matching blocks in the given
/// ranges, matching `difflib.SequenceMatcher.get_matching_blocks`'s recursive split.
fn matching_block_length(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
    b2j: &HashMap<char, Vec<usize>>,
) -> usize {
    let (i, j, size) = find_longest_match(a, alo, ahi, blo, bhi, b2j);
    if size == 0 {
        return 0;
    }
    let left = if alo < i && blo < j {
        matching_block_length(a, b, alo, i, blo, j, b2j)
    } else {
        0
    };
    let right = if i + size < ahi && j + size < bhi {
        matching_block_length(a, b, i + size, ahi, j + size, bhi, b2j)
    } else {
        0
    };
    left + size + right
}

/// Case-folds both inputs before comparing, since titles are matched case-insensitively
/// throughout the search pipeline.
pub fn ratio_ci(a: &str, b: &str) -> f32 {
    ratio(&a.to_lowercase(), &b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(ratio("welder", "welder"), 1.0);
    }

    #[test]
    fn empty_strings_score_one() {
        assert_eq!(ratio("", ""), 1.0);
    }

    #[test]
    fn completely_disjoint_strings_score_zero() {
        assert_eq!(ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn near_matches_score_high() {
        let r = ratio_ci("Teecher", "Teacher");
        assert!(r > 0.7, "expected high ratio, got {r}");
    }

    #[test]
    fn partial_overlap_is_between_zero_and_one() {
        let r = ratio("welder gas", "gas welder helper");
        assert!(r > 0.0 && r < 1.0);
    }
}
