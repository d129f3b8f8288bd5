//! Undirected weighted city graph with all-pairs shortest distances.
//!
//! Edges are loaded from a comma separated edge list, distances are computed
//! with Floyd-Warshall and the "best city" queries are read-only scans over
//! the finished table.

#![deny(rust_2018_idioms)]

mod distance;
mod edge_list;
mod error;
mod graph;

pub use distance::{CityQuery, Distance, DistanceTable, Distances, PairQuery, INFINITY};
pub use edge_list::LoadReport;
pub use error::{GraphError, Result};
pub use graph::{Edge, Graph, Weight};
