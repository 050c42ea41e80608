use crate::core::{Edge, Instance, Matcher, Matching};

/// Brute-force maximum matching by branching over the edge list. Exponential
/// in the number of edges, so it refuses large instances; its purpose is
/// cross-checking the polynomial matchers on small graphs.
#[derive(Clone, Debug, Default)]
pub struct Exhaustive;

const VERTEX_LIMIT: usize = 16;

impl Matcher for Exhaustive {
    fn matching<'a>(&mut self, instance: &'a Instance) -> Matching<'a> {
        debug_assert!(
            instance.vertices <= VERTEX_LIMIT,
            "Instance too large for exhaustive search"
        );

        let mut edges: Vec<Edge> = instance.edge_set().into_iter().collect();
        edges.sort_unstable_by_key(|edge| (edge.0, edge.1));

        let mut current = vec![None; instance.vertices];
        let mut best = vec![None; instance.vertices];
        let mut best_pairs = 0;
        search(&edges, 0, 0, &mut current, &mut best_pairs, &mut best);

        Matching::new(instance, best)
    }

    fn maximum_vertices(&self) -> usize {
        VERTEX_LIMIT
    }

    fn name(&self) -> &'static str {
        "Exhaustive"
    }
}

#[allow(unsafe_code)]
#[linkme::distributed_slice(super::MATCHERS)]
static INSTANCE: fn() -> Box<dyn Matcher> = || Box::new(Exhaustive);

fn search(
    edges: &[Edge],
    index: usize,
    pairs: usize,
    current: &mut Vec<Option<usize>>,
    best_pairs: &mut usize,
    best: &mut [Option<usize>],
) {
    if index == edges.len() {
        if pairs > *best_pairs {
            *best_pairs = pairs;
            best.copy_from_slice(current);
        }
        return;
    }

    // even taking every remaining edge cannot beat the best found so far
    if pairs + (edges.len() - index) < *best_pairs {
        return;
    }

    let Edge(u, v) = edges[index];
    if current[u].is_none() && current[v].is_none() {
        current[u] = Some(v);
        current[v] = Some(u);
        search(edges, index + 1, pairs + 1, current, best_pairs, best);
        current[u] = None;
        current[v] = None;
    }

    search(edges, index + 1, pairs, current, best_pairs, best);
}
