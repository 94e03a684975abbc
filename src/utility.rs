use std::collections::HashMap;

/// Sums values per key and returns the totals sorted descending.
/// Keys with equal totals keep the order they were first seen in.
pub fn tally<'a>(items: impl IntoIterator<Item = (&'a str, u32)>) -> Vec<(&'a str, u32)> {
    let mut totals: Vec<(&'a str, u32)> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for (key, value) in items {
        match index.get(key) {
            Some(&i) => totals[i].1 += value,
            None => {
                index.insert(key, totals.len());
                totals.push((key, value));
            }
        }
    }

    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
}

/// `part` as a percentage of `total`; a zero total is treated as one.
pub fn pct(part: u32, total: u32) -> f64 {
    (part as f64 / total.max(1) as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_sums_and_sorts() {
        let totals = tally([("a", 1), ("b", 2), ("a", 2), ("c", 1)]);
        assert_eq!(totals, vec![("a", 3), ("b", 2), ("c", 1)]);
    }

    #[test]
    fn test_tally_ties_keep_first_seen() {
        let totals = tally([("x", 1), ("y", 1), ("z", 1)]);
        assert_eq!(totals, vec![("x", 1), ("y", 1), ("z", 1)]);
    }

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(pct(0, 0), 0.0);
    }

    #[test]
    fn test_pct_normal_values() {
        assert_eq!(pct(50, 100), 50.0);
        assert_eq!(pct(1, 4), 25.0);
    }
}
