//! Stress tests that push every structure through large mixed workloads
//!
//! Inputs come from a seeded LCG so failures reproduce exactly.

use graph_heaps::binary::BinaryHeap;
use graph_heaps::disjoint_set::ForestDisjointSet;
use graph_heaps::fibonacci::{FibonacciHandle, FibonacciHeap};
use graph_heaps::soft::SoftHeap;
use graph_heaps::{DisjointSet, Heap};

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Lcg { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn next_range(&mut self, min: u32, max: u32) -> u32 {
        let range = (max - min) as u64;
        if range == 0 {
            return min;
        }
        min + ((self.next() >> 16) % range) as u32
    }
}

/// Insert and pop a large ascending run
fn test_massive_operations<H: Heap<i32, i32> + Default>() {
    let mut heap = H::default();
    for i in 0..5000 {
        heap.push(i, i);
    }
    assert_eq!(heap.len(), 5000);
    for i in 0..5000 {
        assert_eq!(heap.pop(), Ok((i, i)));
    }
    assert!(heap.is_empty());
}

/// Descending inserts followed by alternating push/pop
fn test_alternating_ops<H: Heap<i32, i32> + Default>() {
    let mut heap = H::default();
    for i in (0..1000).rev() {
        heap.push(i, i);
    }
    for i in 0..1000 {
        heap.push(i * 2 + 1000, i);
        let (p, _) = heap.pop().unwrap();
        assert!(p <= i * 2 + 1000);
    }
    let mut last = i32::MIN;
    while let Ok((p, _)) = heap.pop() {
        assert!(p >= last);
        last = p;
    }
}

/// Random workload checked against a sorted model
fn test_random_workload<H: Heap<u32, u32> + Default>(seed: u64) {
    let mut heap = H::default();
    let mut rng = Lcg::new(seed);
    let mut model: Vec<u32> = Vec::new();

    for step in 0..20_000u32 {
        if rng.next_range(0, 3) < 2 || model.is_empty() {
            let p = rng.next_range(0, 100_000);
            heap.push(p, step);
            model.push(p);
        } else {
            let (p, _) = heap.pop().unwrap();
            let pos = model
                .iter()
                .enumerate()
                .min_by_key(|&(_, v)| *v)
                .map(|(i, _)| i)
                .unwrap();
            assert_eq!(p, model.swap_remove(pos));
        }
    }
    assert_eq!(heap.len(), model.len());
}

#[test]
fn binary_massive_operations() {
    test_massive_operations::<BinaryHeap<i32, i32>>();
}

#[test]
fn fibonacci_massive_operations() {
    test_massive_operations::<FibonacciHeap<i32, i32>>();
}

#[test]
fn binary_alternating_ops() {
    test_alternating_ops::<BinaryHeap<i32, i32>>();
}

#[test]
fn fibonacci_alternating_ops() {
    test_alternating_ops::<FibonacciHeap<i32, i32>>();
}

#[test]
fn binary_random_workload() {
    test_random_workload::<BinaryHeap<u32, u32>>(0x5eed);
}

#[test]
fn fibonacci_random_workload() {
    test_random_workload::<FibonacciHeap<u32, u32>>(0x5eed);
}

#[test]
fn fibonacci_many_decrease_keys() {
    let mut heap = FibonacciHeap::new();
    let handles: Vec<FibonacciHandle> = (0..2000).map(|i| heap.enqueue(100_000 + i, i)).collect();
    heap.dequeue().unwrap();

    for (i, &handle) in handles.iter().enumerate().skip(1) {
        heap.change_key(handle, i as i32).unwrap();
    }
    assert!(heap.is_consistent());
    for i in 1..2000 {
        assert_eq!(heap.dequeue(), Ok((i, i)));
    }
}

#[test]
fn fibonacci_random_change_key_and_delete() {
    let mut rng = Lcg::new(99);
    let mut heap = FibonacciHeap::new();
    let mut live: Vec<(FibonacciHandle, u32)> = Vec::new();

    for round in 0..10_000u32 {
        match rng.next_range(0, 10) {
            0..=4 => {
                let p = rng.next_range(0, 1_000_000);
                live.push((heap.enqueue(p, round), p));
            }
            5..=6 if !live.is_empty() => {
                let idx = rng.next_range(0, live.len() as u32) as usize;
                let p = rng.next_range(0, 1_000_000);
                heap.change_key(live[idx].0, p).unwrap();
                live[idx].1 = p;
            }
            7 if !live.is_empty() => {
                let idx = rng.next_range(0, live.len() as u32) as usize;
                let (handle, p) = live.swap_remove(idx);
                assert_eq!(heap.delete(handle).map(|(q, _)| q), Ok(p));
            }
            _ if !live.is_empty() => {
                let (p, _) = heap.dequeue().unwrap();
                let min = live.iter().map(|&(_, q)| q).min().unwrap();
                assert_eq!(p, min);
                let pos = live.iter().position(|&(h, _)| !heap.contains(h)).unwrap();
                live.swap_remove(pos);
            }
            _ => {}
        }
        if round % 1000 == 0 {
            assert!(heap.is_consistent());
        }
    }
    assert_eq!(heap.len(), live.len());
    assert!(heap.is_consistent());
}

#[test]
fn fibonacci_merge_many() {
    let mut rng = Lcg::new(7);
    let mut total = FibonacciHeap::new();
    let mut count = 0;
    for _ in 0..50 {
        let mut part = FibonacciHeap::new();
        for _ in 0..rng.next_range(0, 200) {
            part.enqueue(rng.next_range(0, 10_000), ());
            count += 1;
        }
        if part.len() > 3 {
            part.dequeue().unwrap();
            count -= 1;
        }
        total.merge(part).unwrap();
    }
    assert_eq!(total.len(), count);
    assert!(total.is_consistent());
    let out: Vec<u32> = total.into_iter().map(|(p, _)| p).collect();
    assert!(out.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn soft_heap_large_workload() {
    let mut rng = Lcg::new(1234);
    let n = 50_000;
    let eps = 0.25;
    let mut heap = SoftHeap::new(eps, u64::MAX).unwrap();
    let mut sum = 0u128;
    for i in 0..n {
        let key = rng.next() >> 1;
        sum += key as u128;
        heap.add(key, i).unwrap();
    }
    assert!(heap.corrupted_count() <= (eps * n as f64) as usize);

    let mut drained = 0u128;
    let mut count = 0;
    for (key, _) in heap.drain() {
        drained += key as u128;
        count += 1;
    }
    assert_eq!(count, n);
    assert_eq!(drained, sum);
}

#[test]
fn disjoint_set_chain_unions() {
    let n = 10_000u32;
    let mut sets = ForestDisjointSet::with_capacity(n as usize);
    for v in 0..n {
        sets.make_set(v).unwrap();
    }
    for v in 1..n {
        assert_eq!(sets.union(&(v - 1), &v), Ok(true));
    }
    assert_eq!(sets.set_count(), 1);
    let root = *sets.find_set(&(n - 1)).unwrap();
    for v in 0..n {
        assert_eq!(sets.find_set(&v), Ok(&root));
    }
}

#[test]
fn disjoint_set_random_unions_match_model() {
    let mut rng = Lcg::new(42);
    let n = 500u32;
    let mut sets = ForestDisjointSet::new();
    let mut label: Vec<u32> = (0..n).collect();
    for v in 0..n {
        sets.make_set(v).unwrap();
    }

    for _ in 0..800 {
        let (a, b) = (rng.next_range(0, n), rng.next_range(0, n));
        let (la, lb) = (label[a as usize], label[b as usize]);
        assert_eq!(sets.union(&a, &b), Ok(la != lb));
        if la != lb {
            for l in label.iter_mut() {
                if *l == lb {
                    *l = la;
                }
            }
        }
    }

    let distinct: std::collections::HashSet<u32> = label.iter().copied().collect();
    assert_eq!(sets.set_count(), distinct.len());
    for _ in 0..2000 {
        let (a, b) = (rng.next_range(0, n), rng.next_range(0, n));
        assert_eq!(
            sets.are_in_same_set(&a, &b),
            Ok(label[a as usize] == label[b as usize])
        );
    }
}
