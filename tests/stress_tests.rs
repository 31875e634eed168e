//! Stress tests that push the heap through large operation sequences
//!
//! These tests perform large numbers of operations in various patterns to
//! catch edge cases, and use the heap's restructuring counters to check the
//! amortized bounds on cuts.

use fibheap::{FibonacciHeap, Heap, HeapError};

/// Small deterministic generator so runs are reproducible without extra deps.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

#[test]
fn test_massive_operations() {
    let mut heap = FibonacciHeap::new();

    for i in (0..1000).rev() {
        heap.push(i, i);
    }
    assert_eq!(heap.len(), 1000);

    for i in 0..1000 {
        assert_eq!(heap.pop(), Some((i, i)));
    }
    assert!(heap.is_empty());
}

#[test]
fn test_many_decrease_keys() {
    let mut heap = FibonacciHeap::new();
    let handles: Vec<_> = (0..500).map(|i| heap.insert(10000 + i, i)).collect();

    // Force a consolidation so the decreases hit non-roots.
    heap.insert(-1, -1);
    assert_eq!(heap.pop(), Some((-1, -1)));

    for (i, handle) in handles.iter().enumerate() {
        assert!(heap.decrease_key(handle, i as i32).is_ok());
    }
    heap.check_invariants().unwrap();

    for i in 0..500 {
        assert_eq!(heap.pop(), Some((i, i)));
    }
}

#[test]
fn test_alternating_ops() {
    let mut heap = FibonacciHeap::new();

    for i in 0..200 {
        heap.push(i * 2, i);
        heap.push(i * 2 + 1, i + 1000);
        assert!(heap.pop().is_some());
    }
    assert_eq!(heap.len(), 200);
    heap.check_invariants().unwrap();

    let mut last = i32::MIN;
    while let Some((priority, _)) = heap.pop() {
        assert!(priority >= last);
        last = priority;
    }
}

#[test]
fn test_large_merge() {
    let mut heap1 = FibonacciHeap::new();
    let mut heap2 = FibonacciHeap::new();

    for i in 0..500 {
        heap1.push(i * 2, i);
        heap2.push(i * 2 + 1, i + 1000);
    }
    heap1.pop();
    heap2.pop();

    heap1.merge(heap2);
    assert_eq!(heap1.len(), 998);
    heap1.check_invariants().unwrap();

    let mut last = i32::MIN;
    while let Some((priority, _)) = heap1.pop() {
        assert!(priority >= last);
        last = priority;
    }
}

#[test]
fn test_decrease_on_popped_handles() {
    let mut heap = FibonacciHeap::new();
    let handles: Vec<_> = (0..300).map(|i| heap.insert(i * 10, i)).collect();

    for _ in 0..100 {
        heap.pop();
    }

    for handle in &handles[..100] {
        assert_eq!(heap.decrease_key(handle, -1), Err(HeapError::StaleHandle));
    }
    for handle in &handles[100..] {
        let current = *heap.minimum().unwrap().0;
        assert!(heap.decrease_key(handle, current - 1).is_ok());
    }

    assert_eq!(heap.len(), 200);
    heap.check_invariants().unwrap();
}

#[test]
fn test_large_priorities() {
    let mut heap = FibonacciHeap::new();

    heap.push(1_000_000_000i64, 1);
    heap.push(-1_000_000_000, 2);
    heap.push(i64::MAX, 3);
    heap.push(i64::MIN, 4);

    assert_eq!(heap.pop(), Some((i64::MIN, 4)));
    assert_eq!(heap.pop(), Some((-1_000_000_000, 2)));
    assert_eq!(heap.pop(), Some((1_000_000_000, 1)));
    assert_eq!(heap.pop(), Some((i64::MAX, 3)));
}

#[test]
fn test_delete_everything_in_random_order() {
    let mut rng = Lcg(7);
    let mut heap = FibonacciHeap::new();
    let mut handles: Vec<_> = (0..400)
        .map(|i| heap.insert((rng.next() % 1000) as u32, i))
        .collect();
    heap.pop();

    while !handles.is_empty() {
        let at = (rng.next() as usize) % handles.len();
        let handle = handles.swap_remove(at);
        match heap.delete(&handle) {
            Ok(_) => {}
            Err(err) => assert_eq!(err, HeapError::StaleHandle),
        }
        if handles.len() % 50 == 0 {
            heap.check_invariants().unwrap();
        }
    }

    assert!(heap.is_empty());
    assert_eq!(heap.size(), 0);
}

#[test]
fn test_mixed_random_workload() {
    let mut rng = Lcg(42);
    let mut heap = FibonacciHeap::new();
    let mut live = Vec::new();

    for step in 0..5000 {
        match rng.next() % 10 {
            0..=3 => live.push(heap.insert((rng.next() % 100_000) as i64, step)),
            4..=5 => {
                heap.pop();
            }
            6..=8 if !live.is_empty() => {
                let handle = live[(rng.next() as usize) % live.len()];
                if let Ok(current) = heap.get(&handle).map(|(p, _)| *p) {
                    let by = (rng.next() % 1000) as i64;
                    heap.decrease_key(&handle, current - by).unwrap();
                }
            }
            _ if !live.is_empty() => {
                let handle = live.swap_remove((rng.next() as usize) % live.len());
                let expected = heap.get(&handle).map(|(p, item)| (*p, *item));
                assert_eq!(heap.delete(&handle), expected);
                if let Err(err) = expected {
                    assert_eq!(err, HeapError::StaleHandle);
                }
            }
            _ => {}
        }

        if step % 500 == 0 {
            heap.check_invariants().unwrap();
        }
    }

    heap.check_invariants().unwrap();
    let mut last = i64::MIN;
    while let Some((priority, _)) = heap.pop() {
        assert!(priority >= last);
        last = priority;
    }
}

/// n inserts, then n decrease-keys that each pull a node below everything
/// else. Every decrease on a non-root cuts, and each cascading cut consumes a
/// mark left by an earlier decrease, so the total is at most 2n.
#[test]
fn test_cascading_cut_amortized_bound() {
    let n: i32 = 1 << 10;
    let mut heap = FibonacciHeap::new();
    let handles: Vec<_> = (0..=n).map(|k| heap.insert(k, k)).collect();

    // One consolidation builds a single binomial tree over 1..=n.
    assert_eq!(heap.pop(), Some((0, 0)));
    heap.check_invariants().unwrap();
    heap.reset_stats();

    for (i, handle) in handles[1..].iter().rev().enumerate() {
        heap.decrease_key(handle, -(i as i32) - 1).unwrap();
    }
    heap.check_invariants().unwrap();

    let stats = heap.stats();
    let calls = n as u64;
    assert!(stats.cascading_cuts > 0);
    assert!(stats.cascading_cuts <= calls);
    assert!(stats.cuts <= 2 * calls, "{} cuts for {} calls", stats.cuts, calls);

    // A single call can only cut along one root path of the tree.
    let depth_bound = (n as f64).log2() as u64 + 1;
    assert!(
        stats.max_cuts_per_op <= depth_bound,
        "one call made {} cuts",
        stats.max_cuts_per_op
    );

    assert_eq!(heap.pop(), Some((-n, 1)));
}

#[test]
fn test_link_count_for_sorted_build() {
    let mut heap = FibonacciHeap::new();
    for i in 0..=1024 {
        heap.push(i, ());
    }
    heap.pop();

    // 1024 roots collapse into one binomial tree: 1023 links.
    assert_eq!(heap.stats().links, 1023);
    assert_eq!(heap.stats().consolidations, 1);
}
