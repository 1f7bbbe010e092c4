//! Folding radius-query neighborhoods into duplicate groups.

use crate::vptree::{FileMapper, VpTree};
use std::collections::HashSet;
use std::path::PathBuf;

/// Sweep the tree and collect duplicate groups at the given radius.
///
/// Each unvisited item seeds a group from its own neighborhood; the seed and
/// all neighbors are then marked visited, which keeps groups pairwise
/// disjoint. Neighborhoods are NOT re-queried from their members — expanding
/// through neighbors would stretch the effective radius to twice the
/// threshold.
pub fn group_duplicates(tree: &VpTree, mapper: &FileMapper, threshold: u32) -> Vec<Vec<PathBuf>> {
    let mut seen: HashSet<u32> = HashSet::new();
    let mut groups = Vec::new();

    for item in tree.iter() {
        if seen.contains(&item.id) {
            continue;
        }
        let found = tree.within(item, threshold);
        if found.is_empty() {
            continue;
        }

        let mut group = Vec::with_capacity(found.len() + 1);
        seen.insert(item.id);
        group.push(mapper.path(item.id));
        for (neighbor, _dist) in found {
            seen.insert(neighbor.id);
            group.push(mapper.path(neighbor.id));
        }
        groups.push(group);
    }
    groups
}
