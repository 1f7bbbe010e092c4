//! Vantage-point tree over the Hamming metric.
//!
//! Each node holds one item as its vantage point and the median distance from
//! that point to the rest of its subtree; radius queries prune subtrees with
//! the triangle inequality. Construction is single-threaded; a built tree is
//! immutable and can be queried from any number of threads.

mod mapper;
mod queue;

pub use mapper::FileMapper;
pub use queue::{Candidate, CandidateQueue};

use crate::hash::Fingerprint;
use rand::Rng;

/// One indexed unit: an id issued by the [`FileMapper`] and a fingerprint.
/// The path stays in the mapper so items are cheap to move around the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: u32,
    pub hashes: Fingerprint,
}

fn distance(a: &Item, b: &Item) -> u32 {
    a.hashes.hamming(&b.hashes)
}

struct Node {
    item: Item,
    threshold: u32,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

pub struct VpTree {
    root: Option<Box<Node>>,
}

impl VpTree {
    /// Build a tree from the given items. An empty input builds an empty
    /// tree; every query on it comes back empty.
    pub fn new(mut items: Vec<Item>) -> Self {
        let mut rng = rand::rng();
        let root = build(&mut items, &mut rng);
        Self { root }
    }

    /// All items whose distance to `target` is strictly less than `radius`,
    /// paired with those distances. The target itself (same id) is excluded.
    /// Results come back in no particular order.
    pub fn within(&self, target: &Item, radius: u32) -> Vec<(Item, u32)> {
        let mut queue = CandidateQueue::with_capacity(100);
        search(&self.root, radius, target, &mut queue);

        let mut results = Vec::with_capacity(queue.len());
        while let Some(Candidate { item, dist }) = queue.pop() {
            if item.id != target.id {
                results.push((item, dist));
            }
        }
        results
    }

    /// Preorder traversal (vantage point, then left, then right). Lazy, so
    /// callers can stop early by dropping the iterator.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: self.root.as_deref().into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

/// Recursive construction over a mutable working slice.
///
/// The vantage point is chosen uniformly at random (a deliberate trade of
/// balance quality for simplicity), swapped to the tail and held out. The
/// remainder is partitioned around the distance of its middle element with
/// the pivot element kept at the tail and restored to the split boundary.
fn build<R: Rng>(items: &mut [Item], rng: &mut R) -> Option<Box<Node>> {
    if items.is_empty() {
        return None;
    }

    let last = items.len() - 1;
    let idx = rng.random_range(0..items.len());
    items.swap(idx, last);
    let vp = items[last].clone();
    let rest = &mut items[..last];

    if rest.is_empty() {
        return Some(Box::new(Node {
            item: vp,
            threshold: 0,
            left: None,
            right: None,
        }));
    }

    let mid = rest.len() / 2;
    let pivot = distance(&rest[mid], &vp);
    let rest_last = rest.len() - 1;
    rest.swap(mid, rest_last);

    let mut store = 0;
    for i in 0..rest_last {
        if distance(&rest[i], &vp) <= pivot {
            rest.swap(i, store);
            store += 1;
        }
    }
    rest.swap(rest_last, store);

    let (near, far) = rest.split_at_mut(store);
    Some(Box::new(Node {
        item: vp,
        threshold: pivot,
        left: build(near, rng),
        right: build(far, rng),
    }))
}

fn search(node: &Option<Box<Node>>, tau: u32, target: &Item, queue: &mut CandidateQueue) {
    let Some(node) = node else {
        return;
    };

    let dist = distance(&node.item, target);
    if dist < tau {
        queue.push(node.item.clone(), dist);
    }

    if node.left.is_none() && node.right.is_none() {
        return;
    }

    // Descend into the side the target falls on first; the other side can
    // only hold matches when the radius ball crosses the threshold shell.
    if dist < node.threshold {
        if dist.saturating_sub(tau) <= node.threshold {
            search(&node.left, tau, target, queue);
        }
        if dist.saturating_add(tau) >= node.threshold {
            search(&node.right, tau, target, queue);
        }
    } else {
        if dist.saturating_add(tau) >= node.threshold {
            search(&node.right, tau, target, queue);
        }
        if dist.saturating_sub(tau) <= node.threshold {
            search(&node.left, tau, target, queue);
        }
    }
}

/// Preorder item iterator with an explicit stack.
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(right) = node.right.as_deref() {
            self.stack.push(right);
        }
        if let Some(left) = node.left.as_deref() {
            self.stack.push(left);
        }
        Some(&node.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn population() -> Vec<Item> {
        // single-word hashes equal to the labels 0..=255, so the maximum
        // pairwise distance is 8 and expectations are easy to brute-force
        (0..=0xffu32)
            .map(|i| Item {
                id: i + 1,
                hashes: Fingerprint::new(vec![i as u64]),
            })
            .collect()
    }

    #[test]
    fn within_matches_brute_force() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let samples = population();
            let tau = rng.random_range(3..=6u32);
            let target = samples[rng.random_range(0..samples.len())].clone();

            let expected: HashSet<u32> = samples
                .iter()
                .filter(|it| it.id != target.id)
                .filter(|it| it.hashes.hamming(&target.hashes) < tau)
                .map(|it| it.id)
                .collect();

            let tree = VpTree::new(samples);
            let found = tree.within(&target, tau);

            let got: HashSet<u32> = found.iter().map(|(it, _)| it.id).collect();
            assert_eq!(got, expected, "radius {} around id {}", tau, target.id);
            assert_eq!(found.len(), got.len(), "an item was returned twice");

            for (item, dist) in &found {
                assert_eq!(*dist, item.hashes.hamming(&target.hashes));
            }
        }
    }

    #[test]
    fn within_is_strict_on_the_radius() {
        let items: Vec<Item> = [0u64, 1, 3]
            .iter()
            .enumerate()
            .map(|(i, &w)| Item {
                id: i as u32 + 1,
                hashes: Fingerprint::new(vec![w]),
            })
            .collect();
        let target = items[0].clone();
        let tree = VpTree::new(items);

        // distances from 0b00: {1: 0 (self), 2: 1, 3: 2}
        let found = tree.within(&target, 2);
        let ids: HashSet<u32> = found.iter().map(|(it, _)| it.id).collect();
        assert_eq!(ids, HashSet::from([2]), "distance == radius must not match");
    }

    #[test]
    fn preorder_yields_each_item_exactly_once() {
        let tree = VpTree::new(population());
        let mut seen = HashSet::new();
        let mut count = 0;
        for item in tree.iter() {
            assert!(seen.insert(item.id), "id {} yielded twice", item.id);
            count += 1;
        }
        assert_eq!(count, 256);
    }

    #[test]
    fn iteration_can_stop_early() {
        let tree = VpTree::new(population());
        let first_three: Vec<u32> = tree.iter().take(3).map(|it| it.id).collect();
        assert_eq!(first_three.len(), 3);
    }

    #[test]
    fn empty_input_builds_an_empty_tree() {
        let tree = VpTree::new(Vec::new());
        assert!(tree.is_empty());
        assert_eq!(tree.iter().count(), 0);
        let probe = Item {
            id: 1,
            hashes: Fingerprint::new(vec![0]),
        };
        assert!(tree.within(&probe, 10).is_empty());
    }

    #[test]
    fn single_item_tree_never_matches_itself() {
        let item = Item {
            id: 1,
            hashes: Fingerprint::new(vec![42]),
        };
        let tree = VpTree::new(vec![item.clone()]);
        assert!(tree.within(&item, u32::MAX).is_empty());
    }

    #[test]
    fn two_word_fingerprints_index_cleanly() {
        let items: Vec<Item> = (0..32u32)
            .map(|i| Item {
                id: i + 1,
                hashes: Fingerprint::new(vec![i as u64, (i * 7) as u64]),
            })
            .collect();
        let target = items[4].clone();
        let tree = VpTree::new(items.clone());

        let expected: HashSet<u32> = items
            .iter()
            .filter(|it| it.id != target.id)
            .filter(|it| it.hashes.hamming(&target.hashes) < 5)
            .map(|it| it.id)
            .collect();
        let got: HashSet<u32> = tree
            .within(&target, 5)
            .iter()
            .map(|(it, _)| it.id)
            .collect();
        assert_eq!(got, expected);
    }
}
