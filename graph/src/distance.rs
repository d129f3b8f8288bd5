use std::cmp::Ordering;

use log::debug;

use crate::graph::Graph;

pub type Distance = u64;

/// Marks a pair of cities with no known path. Never summed.
pub const INFINITY: Distance = Distance::MAX;

/// Square table of distances between every pair of cities, indexed like the
/// cities of the [`Graph`] it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceTable {
    n: usize,
    // row major, `cells[from * n + to]`
    cells: Vec<Distance>,
}

impl DistanceTable {
    /// Distances using single roads only: 0 on the diagonal, the lightest road
    /// between two cities where there is one, [`INFINITY`] elsewhere.
    pub fn direct(graph: &Graph) -> Self {
        let n = graph.len();
        let mut table = Self {
            n,
            cells: vec![INFINITY; n * n],
        };

        for from in 0..n {
            for edge in graph.neighbors(from) {
                let weight = Distance::from(edge.weight);
                if weight < table.get(from, edge.to) {
                    table.set(from, edge.to, weight);
                }
            }
        }
        for city in 0..n {
            table.set(city, city, 0);
        }

        table
    }

    /// Relaxes every pair through every intermediate city.
    pub fn floyd_warshall(&mut self) {
        debug!("computing all-pairs distances for {} cities", self.n);
        let n = self.n;
        for k in 0..n {
            for i in 0..n {
                let through_k = self.get(i, k);
                if through_k == INFINITY {
                    continue;
                }
                for j in 0..n {
                    let rest = self.get(k, j);
                    if rest == INFINITY {
                        continue;
                    }
                    // finite sums of u32 weights over at most n roads fit in u64
                    let candidate = through_k + rest;
                    if candidate < self.get(i, j) {
                        self.set(i, j, candidate);
                    }
                }
            }
        }
    }

    /// Number of cities.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, from: usize, to: usize) -> Distance {
        self.cells[from * self.n + to]
    }

    #[inline]
    fn set(&mut self, from: usize, to: usize, distance: Distance) {
        self.cells[from * self.n + to] = distance;
    }

    pub fn row(&self, from: usize) -> &[Distance] {
        &self.cells[from * self.n..(from + 1) * self.n]
    }
}

/// Pairs of cities sharing the best distance, each pair as `(a, b)` with `a < b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairQuery<'g> {
    pub distance: Distance,
    pub pairs: Vec<(&'g str, &'g str)>,
}

/// Cities sharing the best distance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery<'g> {
    pub distance: Distance,
    pub cities: Vec<&'g str>,
}

/// Keeps every candidate tied for the best distance, where `want` says which
/// way is better.
fn select<T>(candidates: impl IntoIterator<Item = (Distance, T)>, want: Ordering) -> Option<(Distance, Vec<T>)> {
    let mut best: Option<(Distance, Vec<T>)> = None;
    for (distance, item) in candidates {
        if let Some((best_distance, items)) = best.as_mut() {
            match distance.cmp(best_distance) {
                Ordering::Equal => items.push(item),
                order if order == want => {
                    *best_distance = distance;
                    items.clear();
                    items.push(item);
                }
                _ => {}
            }
        } else {
            best = Some((distance, vec![item]));
        }
    }

    best
}

/// Finished all-pairs table together with the graph it describes.
#[derive(Debug, Clone)]
pub struct Distances<'g> {
    graph: &'g Graph,
    table: DistanceTable,
}

impl<'g> Distances<'g> {
    pub(crate) fn new(graph: &'g Graph, table: DistanceTable) -> Self {
        debug_assert_eq!(graph.len(), table.len());
        Self { graph, table }
    }

    pub fn table(&self) -> &DistanceTable {
        &self.table
    }

    /// Shortest distance between two cities, `None` if either is unknown or
    /// there is no path.
    pub fn between(&self, a: &str, b: &str) -> Option<Distance> {
        let a = self.graph.city_index(a)?;
        let b = self.graph.city_index(b)?;
        Some(self.table.get(a, b)).filter(|&d| d != INFINITY)
    }

    fn finite_pairs(&self) -> impl Iterator<Item = (Distance, (&'g str, &'g str))> + '_ {
        let n = self.table.len();
        (0..n)
            .flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
            .filter_map(move |(i, j)| {
                let distance = self.table.get(i, j);
                if distance == INFINITY {
                    return None;
                }
                let (a, b) = (self.graph.name(i), self.graph.name(j));
                Some((distance, if a < b { (a, b) } else { (b, a) }))
            })
    }

    fn pairs(&self, want: Ordering) -> Option<PairQuery<'g>> {
        let (distance, mut pairs) = select(self.finite_pairs(), want)?;
        pairs.sort_unstable();
        Some(PairQuery { distance, pairs })
    }

    fn cities(distance: Distance, mut cities: Vec<&'g str>) -> CityQuery<'g> {
        cities.sort_unstable();
        CityQuery { distance, cities }
    }

    /// Connected pairs of distinct cities with the smallest distance.
    pub fn closest_pairs(&self) -> Option<PairQuery<'g>> {
        self.pairs(Ordering::Less)
    }

    /// Connected pairs of distinct cities with the largest finite distance.
    pub fn farthest_pairs(&self) -> Option<PairQuery<'g>> {
        self.pairs(Ordering::Greater)
    }

    /// Cities that reach every other city with the smallest total distance,
    /// the best place to station shared equipment.
    pub fn broadcast_hubs(&self) -> Option<CityQuery<'g>> {
        let candidates = (0..self.table.len()).filter_map(|i| {
            let row = self.table.row(i);
            if row.contains(&INFINITY) {
                return None;
            }
            Some((row.iter().sum::<Distance>(), self.graph.name(i)))
        });

        let (distance, cities) = select(candidates, Ordering::Less)?;
        Some(Self::cities(distance, cities))
    }

    /// Other cities closest to `destination`, the best ones to send support from.
    ///
    /// `None` if `destination` is unknown or no other city reaches it.
    pub fn support_sources(&self, destination: &str) -> Option<CityQuery<'g>> {
        let Some(to) = self.graph.city_index(destination) else {
            debug!("unknown destination {destination:?}");
            return None;
        };

        let candidates = (0..self.table.len()).filter_map(|i| {
            let distance = self.table.get(i, to);
            (i != to && distance != INFINITY).then(|| (distance, self.graph.name(i)))
        });

        let (distance, cities) = select(candidates, Ordering::Less)?;
        Some(Self::cities(distance, cities))
    }

    /// Mean distance from each city to the other cities it reaches, ascending.
    ///
    /// Cities that reach no other city are left out.
    pub fn average_travel_times(&self) -> Vec<(&'g str, f64)> {
        let n = self.table.len();
        let mut averages: Vec<_> = (0..n)
            .filter_map(|i| {
                let reachable: Vec<_> = (0..n)
                    .filter(|&j| j != i)
                    .map(|j| self.table.get(i, j))
                    .filter(|&d| d != INFINITY)
                    .collect();
                if reachable.is_empty() {
                    return None;
                }
                let sum: Distance = reachable.iter().sum();
                Some((self.graph.name(i), sum as f64 / reachable.len() as f64))
            })
            .collect();

        averages.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        averages
    }
}
