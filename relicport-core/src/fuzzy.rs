//! Best-match string similarity over character bigrams (Sørensen–Dice).

use std::collections::HashMap;

/// Winning candidate of a similarity search.
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch<'a> {
    pub index: usize,
    pub target: &'a str,
    pub rating: f64,
}

/// Similarity in `[0, 1]` between two strings, ignoring whitespace.
///
/// Identical strings rate 1.0. Otherwise a string with fewer than two
/// characters has no bigrams and rates 0.0. Repeated bigrams are counted with
/// multiplicity.
pub fn compare_two_strings(first: &str, second: &str) -> f64 {
    let first: Vec<char> = first.chars().filter(|c| !c.is_whitespace()).collect();
    let second: Vec<char> = second.chars().filter(|c| !c.is_whitespace()).collect();

    if first == second {
        return 1.0;
    }
    if first.len() < 2 || second.len() < 2 {
        return 0.0;
    }

    let mut first_bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in first.windows(2) {
        *first_bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut intersection = 0usize;
    for pair in second.windows(2) {
        if let Some(count) = first_bigrams.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                intersection += 1;
            }
        }
    }

    (2.0 * intersection as f64) / ((first.len() + second.len() - 2) as f64)
}

/// Rate `query` against every candidate and return the best one.
///
/// Ties keep the earliest candidate, so results are stable for a stable
/// candidate ordering. Returns `None` only for an empty candidate set.
pub fn find_best_match<'a, S: AsRef<str>>(query: &str, candidates: &'a [S]) -> Option<BestMatch<'a>> {
    let mut best: Option<BestMatch<'a>> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let target = candidate.as_ref();
        let rating = compare_two_strings(query, target);
        let better = match &best {
            Some(current) => rating > current.rating,
            None => true,
        };
        if better {
            best = Some(BestMatch {
                index,
                target,
                rating,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings() {
        assert_eq!(compare_two_strings("Hands", "Hands"), 1.0);
        assert_eq!(compare_two_strings("a", "a"), 1.0);
    }

    #[test]
    fn test_short_strings_rate_zero() {
        assert_eq!(compare_two_strings("a", "ab"), 0.0);
        assert_eq!(compare_two_strings("", "Head"), 0.0);
    }

    #[test]
    fn test_whitespace_ignored() {
        assert_eq!(compare_two_strings("Planar Sphere", "PlanarSphere"), 1.0);
    }

    #[test]
    fn test_dice_coefficient() {
        // ha an nd vs ha an nd ds
        let rating = compare_two_strings("hand", "hands");
        assert!((rating - 6.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_bigram_multiplicity() {
        // "aaaa" has three "aa" bigrams, "aa" has one
        let rating = compare_two_strings("aaaa", "aa");
        assert!((rating - 2.0 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_find_best_match() {
        let candidates = ["Head", "Hands", "Body", "Feet"];
        let best = find_best_match("Hand", &candidates).unwrap();
        assert_eq!(best.index, 1);
        assert_eq!(best.target, "Hands");
    }

    #[test]
    fn test_tie_returns_lowest_index() {
        let candidates = ["abcx", "abcy", "abcz"];
        let best = find_best_match("abc", &candidates).unwrap();
        assert_eq!(best.index, 0);
        assert_eq!(best.target, "abcx");

        let duplicates = vec!["Feet".to_string(), "Body".to_string(), "Body".to_string()];
        let best = find_best_match("Body", &duplicates).unwrap();
        assert_eq!(best.index, 1);
    }

    #[test]
    fn test_repeated_calls_are_deterministic() {
        let candidates = ["Passerby of Wandering Cloud", "Musketeer of Wild Wheat", "Knight of Purity Palace"];
        let first = find_best_match("musketeer wild wheat", &candidates).unwrap();
        for _ in 0..10 {
            assert_eq!(find_best_match("musketeer wild wheat", &candidates).unwrap(), first);
        }
    }

    #[test]
    fn test_empty_candidates() {
        let candidates: [&str; 0] = [];
        assert!(find_best_match("Head", &candidates).is_none());
    }
}
