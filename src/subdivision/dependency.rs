//! Building-sharing graph between zones.
//!
//! A building that falls inside the influence of several zones links their
//! fates: if one of them is split, the others were computed against a
//! building distribution that is about to change. The graph is rebuilt from
//! scratch every iteration.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Undirected adjacency over zone IDs.
#[derive(Debug, Clone, Default)]
pub struct ZoneDependencies {
    edges: FxHashMap<String, FxHashSet<String>>,
}

impl ZoneDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect two zones in both directions. Self-loops are ignored.
    pub fn add_edge(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        self.edges
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.edges
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
    }

    /// Pairwise-connect every zone in a group.
    pub fn add_group<S: AsRef<str>>(&mut self, ids: &[S]) {
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                self.add_edge(a.as_ref(), b.as_ref());
            }
        }
    }

    pub fn neighbors(&self, id: &str) -> impl Iterator<Item = &str> {
        self.edges
            .get(id)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.edges.get(a).is_some_and(|set| set.contains(b))
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(FxHashSet::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Every zone reachable from any seed, seeds included, in breadth-first
    /// discovery order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zonestat::ZoneDependencies;
    ///
    /// let mut deps = ZoneDependencies::new();
    /// deps.add_edge("a", "b");
    /// deps.add_group(&["b", "c", "d"]);
    /// deps.add_edge("x", "y");
    ///
    /// let mut component = deps.connected_component(&["a"]);
    /// component.sort();
    /// assert_eq!(component, vec!["a", "b", "c", "d"]);
    /// ```
    pub fn connected_component<S: AsRef<str>>(&self, seeds: &[S]) -> Vec<String> {
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        let mut queue: VecDeque<&str> = VecDeque::new();
        let mut component = Vec::new();

        for seed in seeds {
            let seed = seed.as_ref();
            if visited.insert(seed) {
                queue.push_back(seed);
            }
        }

        while let Some(id) = queue.pop_front() {
            component.push(id.to_string());
            for neighbor in self.neighbors(id) {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        component
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut ids: Vec<String>) -> Vec<String> {
        ids.sort();
        ids
    }

    #[test]
    fn test_edges_are_bidirectional() {
        let mut deps = ZoneDependencies::new();
        deps.add_edge("x", "y");
        assert!(deps.has_edge("x", "y"));
        assert!(deps.has_edge("y", "x"));
        assert_eq!(deps.edge_count(), 1);

        assert_eq!(deps.connected_component(&["x"]), vec!["x", "y"]);
        assert_eq!(deps.connected_component(&["y"]), vec!["y", "x"]);
    }

    #[test]
    fn test_self_loops_and_duplicates_are_ignored() {
        let mut deps = ZoneDependencies::new();
        deps.add_edge("a", "a");
        assert!(deps.is_empty());

        deps.add_edge("a", "b");
        deps.add_edge("b", "a");
        assert_eq!(deps.edge_count(), 1);
    }

    #[test]
    fn test_group_is_fully_connected() {
        let mut deps = ZoneDependencies::new();
        deps.add_group(&["a", "b", "c", "d"]);
        assert_eq!(deps.edge_count(), 6);
        assert!(deps.has_edge("a", "d"));
        assert!(deps.has_edge("c", "b"));
    }

    #[test]
    fn test_component_is_transitive() {
        let mut deps = ZoneDependencies::new();
        deps.add_edge("a", "b");
        deps.add_edge("b", "c");
        deps.add_edge("c", "d");
        deps.add_edge("e", "f");

        assert_eq!(
            sorted(deps.connected_component(&["a"])),
            vec!["a", "b", "c", "d"]
        );
        assert_eq!(sorted(deps.connected_component(&["f"])), vec!["e", "f"]);
    }

    #[test]
    fn test_component_with_multiple_and_isolated_seeds() {
        let mut deps = ZoneDependencies::new();
        deps.add_edge("a", "b");
        deps.add_edge("c", "d");

        let component = deps.connected_component(&["a", "c", "lonely", "a"]);
        assert_eq!(component.len(), 5);
        assert_eq!(
            sorted(component),
            vec!["a", "b", "c", "d", "lonely"]
        );

        let empty: [&str; 0] = [];
        assert!(deps.connected_component(&empty).is_empty());
    }
}
