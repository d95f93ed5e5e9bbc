/*!
 * Shared list tests
 * Round trips, teardown and mutual exclusion under both lock strategies
 */

use list_lock_bench::bench::Range;
use list_lock_bench::{DeleteMode, LockStrategy, SharedList};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Barrier};
use std::thread;

const MODES: [DeleteMode; 2] = [DeleteMode::InPlace, DeleteMode::MoveThenFree];

#[test]
fn test_insert_search_round_trip() {
    for strategy in LockStrategy::ALL {
        let list = SharedList::new(strategy);
        let r = Range::new(1_000, 5_999);

        assert_eq!(list.insert_range(r), r.len());
        assert_eq!(list.count_in_range(r), r.len(), "strategy {}", strategy);
    }
}

#[test]
fn test_insert_delete_round_trip() {
    for strategy in LockStrategy::ALL {
        for mode in MODES {
            let list = SharedList::new(strategy);
            list.insert_range(Range::new(0, 99));
            let before = list.len();

            let r = Range::new(100, 2_099);
            list.insert_range(r);
            assert_eq!(list.delete_range(r, mode), r.len());

            assert_eq!(list.len(), before);
            assert_eq!(list.count_in_range(r), 0);
            assert_eq!(list.values(), (0..100).collect::<Vec<_>>());
        }
    }
}

#[test]
fn test_drain_twice() {
    for strategy in LockStrategy::ALL {
        let list = SharedList::new(strategy);
        list.insert_range(Range::new(0, 999));
        list.insert_range(Range::new(5_000, 5_499));

        assert_eq!(list.drain(), 1_500);
        assert_eq!(list.drain(), 0);
        assert!(list.values().is_empty());
    }
}

#[test]
fn test_concurrent_disjoint_inserts_each_value_once() {
    const THREADS: usize = 8;
    const K: i64 = 5_000;

    for strategy in LockStrategy::ALL {
        let list = Arc::new(SharedList::new(strategy));
        let start = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS as i64)
            .map(|t| {
                let list = list.clone();
                let start = start.clone();
                thread::spawn(move || {
                    start.wait();
                    list.insert_range(Range::new(t * K, (t + 1) * K - 1))
                })
            })
            .collect();

        let inserted: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(inserted, THREADS as u64 * K as u64);

        let mut values = list.values();
        assert_eq!(values.len(), THREADS * K as usize);
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), THREADS * K as usize, "duplicate under {}", strategy);

        // Each batch was merged as one contiguous ascending run
        let values = list.values();
        for run in values.chunks(K as usize) {
            assert!(run.windows(2).all(|w| w[1] == w[0] + 1));
        }
    }
}

#[test]
fn test_concurrent_insert_search_delete_cycles() {
    for strategy in LockStrategy::ALL {
        for mode in MODES {
            let list = Arc::new(SharedList::new(strategy));

            let handles: Vec<_> = (0..6i64)
                .map(|t| {
                    let list = list.clone();
                    thread::spawn(move || {
                        let r = Range::new(t * 1_000, t * 1_000 + 999);
                        for _ in 0..5 {
                            assert_eq!(list.insert_range(r), 1_000);
                            // Nobody else touches this range
                            assert_eq!(list.count_in_range(r), 1_000);
                            assert_eq!(list.delete_range(r, mode), 1_000);
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
            assert!(list.is_empty());
        }
    }
}

#[test]
fn test_delete_matches_model() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for mode in MODES {
        let list = SharedList::new(LockStrategy::Spin);
        let mut model: Vec<i64> = Vec::new();

        for _ in 0..200 {
            let lo = rng.gen_range(0..500);
            let hi = lo + rng.gen_range(0..40);
            let r = Range::new(lo, hi);

            if rng.gen_bool(0.6) {
                list.insert_range(r);
                model.extend(r.values());
            } else {
                let expected = model.iter().filter(|v| r.contains(**v)).count() as u64;
                model.retain(|v| !r.contains(*v));
                assert_eq!(list.delete_range(r, mode), expected);
            }
        }

        assert_eq!(list.values(), model);
        assert_eq!(list.len(), model.len());
    }
}
