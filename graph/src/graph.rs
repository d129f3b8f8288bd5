use core::fmt;
use std::collections::HashMap;

use crate::distance::{DistanceTable, Distances};

pub type Weight = u32;

/// One direction of an undirected road.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub to: usize,
    pub weight: Weight,
}

/// Undirected weighted graph over named cities.
///
/// Cities are numbered in the order they are first seen, every road is stored
/// once per direction.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    // INVARIANTS:
    //  * `names`, `adjacency` have the same length
    //  * `index[names[i]] == i`
    names: Vec<String>,
    index: HashMap<String, usize>,
    adjacency: Vec<Vec<Edge>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cities.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of undirected roads, parallel roads counted separately.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn cities(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    pub fn city_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Name of city `index`.
    ///
    /// # Panics
    ///
    /// If `index >= self.len()`.
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    /// Roads leaving city `index`.
    pub fn neighbors(&self, index: usize) -> &[Edge] {
        &self.adjacency[index]
    }

    fn intern(&mut self, name: &str) -> usize {
        if let Some(&index) = self.index.get(name) {
            return index;
        }

        let index = self.names.len();
        self.names.push(name.to_owned());
        self.index.insert(name.to_owned(), index);
        self.adjacency.push(Vec::new());
        index
    }

    /// Adds a road between `source` and `target`, creating the cities if needed.
    pub fn add_edge(&mut self, source: &str, target: &str, weight: Weight) {
        let from = self.intern(source);
        let to = self.intern(target);
        self.adjacency[from].push(Edge { to, weight });
        self.adjacency[to].push(Edge { to: from, weight });
    }

    /// Every road exactly once, as `(a, b, weight)` with `a < b` by name.
    pub fn undirected_edges(&self) -> impl Iterator<Item = (&str, &str, Weight)> + '_ {
        self.adjacency.iter().enumerate().flat_map(move |(from, edges)| {
            let source = self.name(from);
            edges.iter().filter_map(move |edge| {
                let target = self.name(edge.to);
                (source < target).then_some((source, target, edge.weight))
            })
        })
    }

    /// Runs Floyd-Warshall over the whole graph.
    pub fn shortest_distances(&self) -> Distances<'_> {
        let mut table = DistanceTable::direct(self);
        table.floyd_warshall();
        Distances::new(self, table)
    }
}

// One line per city: `A -> (B, 5) (C, 3)`
impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (from, edges) in self.adjacency.iter().enumerate() {
            write!(f, "{} ->", self.name(from))?;
            for edge in edges {
                write!(f, " ({}, {})", self.name(edge.to), edge.weight)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_is_undirected() {
        let mut graph = Graph::new();
        assert!(graph.is_empty());

        graph.add_edge("A", "B", 5);
        graph.add_edge("B", "C", 7);

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.cities().collect::<Vec<_>>(), ["A", "B", "C"]);

        let a = graph.city_index("A").unwrap();
        let b = graph.city_index("B").unwrap();
        let c = graph.city_index("C").unwrap();
        assert_eq!(graph.neighbors(a), &[Edge { to: b, weight: 5 }]);
        assert_eq!(
            graph.neighbors(b),
            &[Edge { to: a, weight: 5 }, Edge { to: c, weight: 7 }]
        );
        assert_eq!(graph.city_index("D"), None);
    }

    #[test]
    fn undirected_edges_once() {
        let mut graph = Graph::new();
        graph.add_edge("B", "A", 5);
        graph.add_edge("B", "C", 7);
        graph.add_edge("A", "A", 1);

        let mut edges: Vec<_> = graph.undirected_edges().collect();
        edges.sort();
        assert_eq!(edges, [("A", "B", 5), ("B", "C", 7)]);
    }

    #[test]
    fn display_lists_adjacency() {
        let mut graph = Graph::new();
        graph.add_edge("A", "B", 5);
        graph.add_edge("A", "C", 3);

        assert_eq!(
            graph.to_string(),
            "A -> (B, 5) (C, 3)\nB -> (A, 5)\nC -> (A, 3)\n"
        );
    }
}
