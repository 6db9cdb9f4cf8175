//! Weighted interval scheduling.

use std::ops::Range;

use itertools::Itertools;

use crate::{prelude::*, quantity::cost::Cost};

/// Something that occupies a range of timeline slots and has a weight.
pub trait Weighted {
    fn span(&self) -> Range<usize>;

    fn weight(&self) -> Cost;
}

/// Selected non-overlapping items in chronological order.
#[must_use]
#[derive(Debug)]
pub struct Schedule<T> {
    pub items: Vec<T>,
    pub total_weight: Cost,
}

impl<T> Default for Schedule<T> {
    fn default() -> Self {
        Self { items: Vec::new(), total_weight: Cost::ZERO }
    }
}

/// Select the maximum-weight subset of pairwise non-overlapping items.
///
/// Items are compatible when one ends at or before the other starts.
/// The backtracking stops once `max_items` are selected, so under a binding cap the result
/// is the latest-ending part of the unconstrained optimum and not necessarily the best capped subset.
#[instrument(skip_all, fields(n_items = items.len(), max_items = max_items))]
pub fn schedule<T: Weighted>(items: Vec<T>, max_items: usize) -> Schedule<T> {
    // Indices into `items`, sorted by the span end:
    let order = (0..items.len()).sorted_by_key(|index| items[*index].span().end).collect_vec();
    let ends = order.iter().map(|index| items[*index].span().end).collect_vec();

    // For each sorted position, the latest compatible sorted position before it:
    let predecessors = order
        .iter()
        .enumerate()
        .map(|(position, index)| {
            let start = items[*index].span().start;
            ends[..position].partition_point(|end| *end <= start).checked_sub(1)
        })
        .collect_vec();

    // `best[i]` is the maximal total weight using the first `i` sorted items:
    let mut best = vec![Cost::ZERO; order.len() + 1];
    let mut is_taken = vec![false; order.len()];
    for (position, index) in order.iter().enumerate() {
        let skip = best[position];
        let take = items[*index].weight()
            + predecessors[position].map_or(Cost::ZERO, |predecessor| best[predecessor + 1]);
        if take > skip {
            best[position + 1] = take;
            is_taken[position] = true;
        } else {
            best[position + 1] = skip;
        }
    }

    let mut is_selected = vec![false; items.len()];
    let mut n_selected = 0;
    let mut cursor = order.len().checked_sub(1);
    while let Some(position) = cursor
        && n_selected < max_items
    {
        if is_taken[position] {
            is_selected[order[position]] = true;
            n_selected += 1;
            cursor = predecessors[position];
        } else {
            cursor = position.checked_sub(1);
        }
    }

    let items = items
        .into_iter()
        .zip(is_selected)
        .filter_map(|(item, is_selected)| is_selected.then_some(item))
        .sorted_by_key(|item| item.span().start)
        .collect_vec();
    let total_weight = items.iter().map(Weighted::weight).sum();
    info!(n_selected = items.len(), %total_weight, optimum = %best[order.len()], "scheduled");
    Schedule { items, total_weight }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Item(Range<usize>, f64);

    impl Weighted for Item {
        fn span(&self) -> Range<usize> {
            self.0.clone()
        }

        fn weight(&self) -> Cost {
            Cost::from(self.1)
        }
    }

    fn overlaps(lhs: &Range<usize>, rhs: &Range<usize>) -> bool {
        lhs.start < rhs.end && rhs.start < lhs.end
    }

    /// Best total weight by checking every subset.
    fn brute_force(items: &[Item]) -> f64 {
        (0..(1_u32 << items.len()))
            .filter_map(|mask| {
                let subset = items
                    .iter()
                    .enumerate()
                    .filter(|(index, _)| mask & (1 << index) != 0)
                    .map(|(_, item)| item)
                    .collect_vec();
                let is_feasible = subset
                    .iter()
                    .tuple_combinations()
                    .all(|(lhs, rhs)| !overlaps(&lhs.0, &rhs.0));
                is_feasible.then(|| subset.iter().map(|item| item.1).sum())
            })
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_empty() {
        let schedule = schedule(Vec::<Item>::new(), 6);
        assert!(schedule.items.is_empty());
        assert_eq!(schedule.total_weight, Cost::ZERO);
    }

    #[test]
    fn test_separated_items_are_both_taken() {
        let schedule = schedule(vec![Item(10..16, 2.0), Item(0..6, 3.0)], 6);
        assert_eq!(schedule.items, [Item(0..6, 3.0), Item(10..16, 2.0)]);
        assert_abs_diff_eq!(schedule.total_weight.0, 5.0);
    }

    #[test]
    fn test_touching_items_are_compatible() {
        let schedule = schedule(vec![Item(0..6, 1.0), Item(6..12, 1.0)], 6);
        assert_eq!(schedule.items.len(), 2);
    }

    #[test]
    fn test_overlapping_items_keep_the_heavier() {
        let schedule = schedule(vec![Item(0..9, 4.0), Item(6..15, 7.0)], 6);
        assert_eq!(schedule.items, [Item(6..15, 7.0)]);
    }

    #[test]
    fn test_two_light_beat_one_heavy() {
        let items = vec![Item(0..6, 3.0), Item(3..12, 5.0), Item(6..12, 3.0)];
        let schedule = schedule(items, 6);
        assert_eq!(schedule.items, [Item(0..6, 3.0), Item(6..12, 3.0)]);
        assert_abs_diff_eq!(schedule.total_weight.0, 6.0);
    }

    #[test]
    fn test_matches_brute_force() {
        // Deterministic pseudo-random spans and weights:
        let mut seed = 17_u64;
        let mut next = move |modulo: u64| {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            usize::try_from((seed >> 33) % modulo).unwrap()
        };
        for _ in 0..50 {
            let items = (0..10)
                .map(|_| {
                    let start = next(30);
                    let len = 3 * (1 + next(4));
                    #[expect(clippy::cast_precision_loss)]
                    let weight = (1 + next(20)) as f64 / 4.0;
                    Item(start..(start + len), weight)
                })
                .collect_vec();
            let expected = brute_force(&items);
            let schedule = schedule(items, 10);
            assert_abs_diff_eq!(schedule.total_weight.0, expected, epsilon = 1e-9);
            for (lhs, rhs) in schedule.items.iter().tuple_combinations() {
                assert!(!overlaps(&lhs.0, &rhs.0), "{lhs:?} overlaps {rhs:?}");
            }
            assert!(schedule.items.iter().is_sorted_by_key(|item| item.0.start));
        }
    }

    #[test]
    fn test_cap_keeps_latest_part_of_the_optimum() {
        let items = vec![Item(0..3, 1.0), Item(3..6, 1.0), Item(6..9, 1.0), Item(9..12, 1.0)];
        let schedule = schedule(items, 2);
        assert_eq!(schedule.items, [Item(6..9, 1.0), Item(9..12, 1.0)]);
        assert_abs_diff_eq!(schedule.total_weight.0, 2.0);
    }

    #[test]
    fn test_zero_cap() {
        let schedule = schedule(vec![Item(0..3, 1.0)], 0);
        assert!(schedule.items.is_empty());
    }
}
