use crate::core::{Graph, Instance, Matcher, Matching};
use std::collections::VecDeque;

/// Greedily extends the matching by breadth-first traversal of the active
/// vertices reachable from `free`: whenever the traversal crosses an edge
/// with both endpoints unmatched, they are matched. Existing mates are never
/// touched, so the result is a maximal (not maximum) matching of the
/// traversed component. Returns the number of newly matched vertices.
pub(super) fn bootstrap(graph: &mut Graph, free: usize) -> usize {
    for index in 0..graph.len() {
        graph[index].visited = false;
    }

    let mut matched = 0;
    let mut queue = VecDeque::new();

    graph[free].visited = true;
    queue.push_back(free);

    while let Some(u) = queue.pop_front() {
        for position in 0..graph[u].adj.len() {
            let v = graph[u].adj[position];
            if !graph[v].active {
                continue;
            }

            if graph[u].is_free() && graph[v].is_free() {
                graph.set_mate(u, v);
                matched += 2;
            }

            if !graph[v].visited {
                graph[v].visited = true;
                queue.push_back(v);
            }
        }
    }

    matched
}

/// Maximal matching heuristic: the breadth-first bootstrapper run from every
/// free vertex in ascending order. Fast seed, no optimality guarantee.
#[derive(Clone, Debug, Default)]
pub struct Greedy;

impl Matcher for Greedy {
    fn matching<'a>(&mut self, instance: &'a Instance) -> Matching<'a> {
        let mut graph = Graph::from(instance);

        for vertex in 0..graph.len() {
            if graph[vertex].active && graph[vertex].is_free() {
                bootstrap(&mut graph, vertex);
            }
        }

        Matching::new(instance, graph.mates(instance.vertices))
    }

    fn exact(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "Greedy"
    }
}

#[allow(unsafe_code)]
#[linkme::distributed_slice(super::MATCHERS)]
static INSTANCE: fn() -> Box<dyn Matcher> = || Box::new(Greedy);
