/*!
 * Partition tests
 * Worker ranges tile the value space exactly once
 */

use list_lock_bench::bench::{checked_range_for, range_for, Range};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_default_run_ranges() {
    let ranges: Vec<Range> = (0..4).map(|i| range_for(i, 250_000)).collect();
    assert_eq!(
        ranges,
        vec![
            Range::new(0, 249_999),
            Range::new(250_000, 499_999),
            Range::new(500_000, 749_999),
            Range::new(750_000, 999_999),
        ]
    );
}

#[test]
fn test_single_node_per_worker() {
    for i in 0..10 {
        let r = range_for(i, 1);
        assert_eq!(r, Range::new(i as i64, i as i64));
        assert_eq!(r.len(), 1);
    }
}

proptest! {
    #[test]
    fn ranges_tile_value_space(workers in 1usize..64, nodes in 1u64..2_000) {
        let mut ranges: Vec<Range> = (0..workers).map(|i| range_for(i, nodes)).collect();

        // Sorted by lo, each range must start right after the previous one ends
        ranges.sort_by_key(|r| r.lo);
        prop_assert_eq!(ranges[0].lo, 0);
        for pair in ranges.windows(2) {
            prop_assert_eq!(pair[0].hi + 1, pair[1].lo);
        }
        prop_assert_eq!(ranges[workers - 1].hi, (workers as u64 * nodes) as i64 - 1);

        let total: u64 = ranges.iter().map(Range::len).sum();
        prop_assert_eq!(total, workers as u64 * nodes);
    }

    #[test]
    fn ranges_are_pairwise_disjoint(a in 0usize..1_000, b in 0usize..1_000, nodes in 1u64..100_000) {
        prop_assume!(a != b);
        prop_assert!(!range_for(a, nodes).overlaps(&range_for(b, nodes)));
    }

    #[test]
    fn range_for_is_deterministic(i in 0usize..10_000, nodes in 1u64..1_000_000) {
        prop_assert_eq!(range_for(i, nodes), range_for(i, nodes));
        prop_assert_eq!(checked_range_for(i, nodes), Some(range_for(i, nodes)));
        prop_assert_eq!(range_for(i, nodes).len(), nodes);
    }
}
