//! Bounded combination generation for multi-site mutation composition.

use itertools::Itertools;

/// Combinations of exactly `r` items, taken in the input's own order.
///
/// Capped at `max_combos` results when `Some`; the final list is
/// stable-sorted by length (degenerate while every combination has size
/// `r`, but the contract supports multi-size use).
pub fn combos<T: Clone>(items: &[T], r: usize, max_combos: Option<usize>) -> Vec<Vec<T>> {
    let generated = items.iter().cloned().combinations(r);
    let mut all: Vec<Vec<T>> = match max_combos {
        Some(max) => generated.take(max).collect(),
        None => generated.collect(),
    };
    all.sort_by_key(Vec::len);
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_pairs_in_input_order() {
        let result = combos(&['a', 'b', 'c'], 2, None);
        assert_eq!(
            result,
            vec![vec!['a', 'b'], vec!['a', 'c'], vec!['b', 'c']]
        );
    }

    #[test]
    fn cap_keeps_first_generated() {
        let result = combos(&['a', 'b', 'c', 'd'], 2, Some(2));
        assert_eq!(result, vec![vec!['a', 'b'], vec!['a', 'c']]);
    }

    #[test]
    fn input_order_wins_over_value_order() {
        let result = combos(&[3, 1, 2], 2, None);
        assert_eq!(result, vec![vec![3, 1], vec![3, 2], vec![1, 2]]);
    }

    #[test]
    fn oversized_r_yields_nothing() {
        let result: Vec<Vec<u8>> = combos(&[1, 2], 3, None);
        assert!(result.is_empty());
    }

    #[test]
    fn zero_cap_yields_nothing() {
        let result = combos(&[1, 2, 3], 2, Some(0));
        assert!(result.is_empty());
    }
}
