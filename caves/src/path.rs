//! Route reconstruction by walking the parent links of search entries.
//!
//! Parents always sit at a lower index in the arena than their children, so every walk
//! reaches the root.

use std::fmt::Display;

use crate::cost::distance;
use crate::find::{Entry, MapTrait};

/// The nodes from the root of the search to the given entry, root first
pub fn build_path<R: Copy>(entries: &[Entry<R>], index: usize) -> Vec<R> {
    let mut path = vec![entries[index].node];

    let mut parent = entries[index].parent;
    while let Some(index) = parent {
        path.push(entries[index].node);
        parent = entries[index].parent;
    }

    path.reverse();
    path
}

/// The true distance travelled from the root to the given entry
pub fn path_distance<M: MapTrait>(map: &M, entries: &[Entry<M::Reference>], index: usize) -> f64 {
    let mut total = 0.0;

    let mut entry = &entries[index];
    while let Some(parent) = entry.parent {
        let parent = &entries[parent];
        total += distance(map.position_of(entry.node), map.position_of(parent.node));
        entry = parent;
    }

    total
}

/// Render a route the way it is printed and traced, e.g. `1->2->3`
pub fn route_string<R: Display>(path: &[R]) -> String {
    path.iter()
        .map(|node| node.to_string())
        .collect::<Vec<_>>()
        .join("->")
}
