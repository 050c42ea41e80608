//! Maximum-cardinality matching in general graphs with Edmonds' blossom
//! algorithm: alternating trees are grown from the free vertices, a meeting
//! of two trees yields an augmenting path, and a same-tree meeting of two
//! outer vertices yields an odd cycle that is contracted into a
//! pseudo-vertex before the solver recurses on the smaller graph.

use super::greedy::bootstrap;
use crate::core::{Graph, Instance, Matcher, Matching};
use ahash::{HashMap, HashMapExt, HashSet, HashSetExt};
use std::collections::VecDeque;

/// Exact maximum-cardinality matcher for general graphs. Runs in polynomial
/// time; odd cycles are handled by contraction and recursive expansion.
#[derive(Clone, Debug, Default)]
pub struct Blossom;

impl Matcher for Blossom {
    fn matching<'a>(&mut self, instance: &'a Instance) -> Matching<'a> {
        let mut graph = Graph::from(instance);
        solve(&mut graph);
        Matching::new(instance, graph.mates(instance.vertices))
    }

    fn name(&self) -> &'static str {
        "Blossom"
    }
}

#[allow(unsafe_code)]
#[linkme::distributed_slice(super::MATCHERS)]
static INSTANCE: fn() -> Box<dyn Matcher> = || Box::new(Blossom);

/// Outcome of one tree-growing pass.
enum Grown {
    /// An augmenting path was found and flipped.
    Augmented,
    /// A blossom was contracted, solved recursively and expanded; the
    /// matching is maximum for this graph.
    Contracted,
    /// The queue drained with no event: no augmenting path remains.
    Exhausted,
}

/// Brings the matching on the active subgraph to maximum cardinality.
///
/// Every pass resets the tree state, seeds the matching greedily from the
/// lowest free vertex and grows alternating trees. An augmentation restarts
/// the pass on the remaining free vertices; a contraction already leaves a
/// maximum matching behind (the contracted graph is solved recursively and
/// expanded), so it ends the call, as does a pass without any event.
fn solve(graph: &mut Graph) {
    loop {
        graph.reset_tree_state();

        let Some(free) = graph.first_free() else {
            return;
        };
        bootstrap(graph, free);

        match grow_trees(graph) {
            Grown::Augmented => {}
            Grown::Contracted | Grown::Exhausted => return,
        }
    }
}

/// Grows alternating trees from all free active vertices in FIFO order and
/// classifies every scanned edge into one of the four blossom-algorithm
/// cases. Returns on the first augmentation or contraction.
fn grow_trees(graph: &mut Graph) -> Grown {
    let mut queue = VecDeque::new();

    for vertex in 0..graph.len() {
        if graph[vertex].active && graph[vertex].is_free() {
            graph[vertex].seen = true;
            queue.push_back(vertex);
        }
    }

    while let Some(u) = queue.pop_front() {
        // Trees extend through outer vertices only; inner vertices already
        // contributed their matched edge when they were attached.
        if !graph[u].is_outer {
            continue;
        }

        for position in 0..graph[u].adj.len() {
            let v = graph[u].adj[position];
            if !graph[v].active || graph[u].parent == Some(v) || graph[u].mate == Some(v) {
                continue;
            }

            if graph[v].seen && graph[v].is_outer && graph[v].root != graph[u].root {
                // case 1: two trees meet, an augmenting path exists
                augment_between(graph, u, v);
                return Grown::Augmented;
            } else if graph[v].seen && !graph[v].is_outer {
                // case 2: inner collision, nothing to learn
            } else if !graph[v].seen {
                // case 3: extend the tree through the matched pair (v, x)
                let x = graph[v].mate.unwrap_or_else(cannot_happen);
                graph[v].seen = true;
                graph[v].is_outer = false;
                graph[v].parent = Some(u);
                graph[v].root = graph[u].root;
                graph[u].children.push(v);
                graph[x].seen = true;
                graph[x].is_outer = true;
                graph[x].parent = Some(v);
                graph[x].root = graph[v].root;
                graph[v].children.push(x);
                queue.push_back(v);
                queue.push_back(x);
            } else {
                // case 4: same-tree outer meeting, an odd cycle closes
                let lca = lowest_common_ancestor(graph, u, v);
                let cycle = form_cycle(graph, lca, u, v);
                let shrunk = shrink_cycle(graph, cycle);
                solve(graph);
                recover_cycle(graph, &shrunk);
                return Grown::Contracted;
            }
        }
    }

    Grown::Exhausted
}

/// Splices and flips the augmenting path between `u` and `v`, which sit in
/// distinct trees: `v`'s tree is re-rooted onto `u`'s root, the parent chain
/// from `v` to its former root is reversed and the resulting root-to-root
/// path is augmented.
fn augment_between(graph: &mut Graph, u: usize, v: usize) {
    let u_root = graph[u].root;
    let v_old_root = graph[v].root;
    debug_assert_ne!(u_root, v_old_root, "augmentation requires distinct trees");

    set_tree_root(graph, v_old_root, u_root);

    // Reverse the parent chain from v up to its former root, flipping the
    // parent/child relation of every step so the chain afterwards runs from
    // that root down through v into u's tree.
    let mut prev = u;
    let mut current = v;
    while current != v_old_root {
        graph[prev].children.push(current);
        graph[current].children.retain(|&child| child != prev);
        let old_parent = graph[current].parent.unwrap_or_else(cannot_happen);
        graph[current].parent = Some(prev);
        prev = current;
        current = old_parent;
    }
    graph[prev].children.push(current);
    graph[current].children.retain(|&child| child != prev);
    graph[current].parent = Some(prev);

    let mut path = Vec::new();
    let mut current = v_old_root;
    while current != u_root {
        path.push(current);
        current = graph[current].parent.unwrap_or_else(cannot_happen);
    }
    path.push(u_root);
    path.reverse();

    augment_path(graph, &path);
}

/// Flips the matching along the path, matching every adjacent pair at even
/// offset. The offset skips the first vertex when it is matched to a vertex
/// outside the path, so the alternation lands on the matched edges.
fn augment_path(graph: &mut Graph, path: &[usize]) {
    debug_assert!(path.len() >= 2, "augmenting paths span at least one edge");

    let first = path[0];
    let in_path = graph[first].is_free() || graph[first].mate == Some(path[1]);

    let mut index = usize::from(!in_path);
    while index + 1 < path.len() {
        graph.set_mate(path[index], path[index + 1]);
        index += 2;
    }
}

/// Sets the root marker of every vertex in the tree below `node`.
fn set_tree_root(graph: &mut Graph, node: usize, root: usize) {
    graph[node].root = root;

    for position in 0..graph[node].children.len() {
        let child = graph[node].children[position];
        set_tree_root(graph, child, root);
    }
}

/// Returns the lowest common ancestor of `u` and `v`, which share a tree.
fn lowest_common_ancestor(graph: &Graph, u: usize, v: usize) -> usize {
    debug_assert_eq!(graph[u].root, graph[v].root, "LCA requires a shared tree");

    lca_search(graph, graph[u].root, u, v).unwrap_or_else(cannot_happen)
}

/// Depth-first search from `node`: a node is the LCA once both targets were
/// found below it (or it is one target and the other sits in its subtree).
fn lca_search(graph: &Graph, node: usize, u: usize, v: usize) -> Option<usize> {
    if node == u || node == v {
        return Some(node);
    }

    let mut first_found = None;

    for &child in &graph[node].children {
        let Some(found) = lca_search(graph, child, u, v) else {
            continue;
        };

        if found != u && found != v {
            // a node that is neither u nor v is already their LCA
            return Some(found);
        }

        if first_found.is_some() {
            return Some(node);
        }
        first_found = Some(found);
    }

    first_found
}

/// Forms the odd cycle `u -> ... -> LCA -> ... -> v`, closed by the edge
/// `(v, u)`, by walking the parent chains of both branches.
fn form_cycle(graph: &Graph, lca: usize, u: usize, v: usize) -> Vec<usize> {
    let mut cycle = Vec::new();

    let mut p = u;
    while p != lca {
        cycle.push(p);
        p = graph[p].parent.unwrap_or_else(cannot_happen);
    }
    cycle.push(lca);

    let mut tail = Vec::new();
    let mut p = v;
    while p != lca {
        tail.push(p);
        p = graph[p].parent.unwrap_or_else(cannot_happen);
    }
    cycle.extend(tail.into_iter().rev());

    debug_assert_eq!(cycle.len() % 2, 1, "blossoms have odd length");
    cycle
}

/// A contracted blossom: the cycle, the pseudo-vertex that replaced it, and
/// the removed cycle-to-outside edges indexed from both ends. The outside
/// index resolves which cycle vertex the pseudo-vertex's mate belongs to
/// after the recursive solve.
struct ShrunkCycle {
    cycle: Vec<usize>,
    pseudo: usize,
    by_cycle: HashMap<usize, Vec<(usize, usize)>>,
    by_outside: HashMap<usize, Vec<(usize, usize)>>,
}

/// Contracts the cycle: removes every edge between a cycle vertex and an
/// active outside vertex (recording it in both indexes), substitutes one
/// pseudo-vertex connected to each affected outside vertex exactly once, and
/// deactivates the cycle. A match the cycle's base held outside the cycle is
/// carried over to the pseudo-vertex.
fn shrink_cycle(graph: &mut Graph, cycle: Vec<usize>) -> ShrunkCycle {
    let members: HashSet<usize> = cycle.iter().copied().collect();
    let mut by_cycle: HashMap<usize, Vec<(usize, usize)>> = HashMap::new();
    let mut by_outside: HashMap<usize, Vec<(usize, usize)>> = HashMap::new();
    // first-seen order keeps the pseudo-vertex adjacency reproducible
    let mut outside = Vec::new();
    let mut outside_seen = HashSet::new();

    for &u in &cycle {
        let neighbors = graph[u].adj.clone();
        for v in neighbors {
            if members.contains(&v) || !graph[v].active {
                continue;
            }

            if outside_seen.insert(v) {
                outside.push(v);
            }
            by_cycle.entry(u).or_default().push((u, v));
            by_outside.entry(v).or_default().push((u, v));
            graph.remove_edge(u, v);
        }
    }

    let pseudo = graph.push_vertex();
    for &v in &outside {
        graph.add_edge(pseudo, v);
    }

    let external_mate = cycle
        .iter()
        .find_map(|&u| graph[u].mate.filter(|mate| !members.contains(mate)));
    if let Some(mate) = external_mate {
        graph.set_mate(pseudo, mate);
    }

    for &u in &cycle {
        graph[u].active = false;
    }

    ShrunkCycle {
        cycle,
        pseudo,
        by_cycle,
        by_outside,
    }
}

/// Expands a contracted blossom: reactivates the cycle, re-threads the
/// external match of the pseudo-vertex to the cycle vertex that originally
/// carried the edge (the entry point), and pairs the remaining cycle
/// vertices at stride 2 around the cycle, rebuilding inner/outer parity.
/// Exactly `(len - 1) / 2` internal pairs are formed. Removed edges are not
/// re-inserted; only the mate assignments matter from here on.
fn recover_cycle(graph: &mut Graph, shrunk: &ShrunkCycle) {
    for &u in &shrunk.cycle {
        graph[u].active = true;
    }

    let external = graph[shrunk.pseudo].mate;
    for &u in &shrunk.cycle {
        graph[u].mate = None;
    }

    let start = if let Some(mate) = external {
        let edges = shrunk.by_outside.get(&mate).unwrap_or_else(cannot_happen);
        let entry = edges[0].0;
        debug_assert!(
            shrunk
                .by_cycle
                .get(&entry)
                .is_some_and(|edges| edges.iter().any(|&(_, outside)| outside == mate)),
            "contraction indexes disagree"
        );

        graph.set_mate(entry, mate);
        let position = shrunk.cycle.iter().position(|&u| u == entry);
        position.unwrap_or_else(cannot_happen) + 1
    } else {
        0
    };

    let length = shrunk.cycle.len();
    let mut index = start;
    for _ in 0..(length - 1) / 2 {
        let inner = shrunk.cycle[index % length];
        let outer = shrunk.cycle[(index + 1) % length];
        graph[inner].is_outer = false;
        graph[outer].is_outer = true;
        graph.set_mate(inner, outer);
        index += 2;
    }

    graph[shrunk.pseudo].mate = None;
    graph[shrunk.pseudo].active = false;
}

fn cannot_happen<T>() -> T {
    unreachable!("matching invariant violated");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::Exhaustive;
    use crate::core::Edge;
    use rand::prelude::*;

    macro_rules! instance {
        ($n:expr) => {
            Instance::new($n, Vec::new())
        };
        ($n:expr; $(($u:expr, $v:expr)),+ $(,)?) => {
            Instance::new($n, vec![$(Edge($u, $v)),+])
        };
    }

    macro_rules! opt {
        (-) => {
            None
        };
        ($x:expr) => {
            Some($x)
        };
    }

    macro_rules! mate {
        () => {
            Vec::<Option<usize>>::new()
        };
        ($($x:tt),+ $(,)?) => {
            vec![$(opt!($x)),+]
        };
    }

    #[test]
    fn test_empty() {
        let instance = instance![0];
        let matching = Blossom.matching(&instance);

        assert_eq!(matching.mates(), mate![]);
        assert_eq!(matching.pairs(), 0);
    }

    #[test]
    fn test_isolated_vertex() {
        let instance = instance![1];
        let matching = Blossom.matching(&instance);

        assert_eq!(matching.mates(), mate![-]);
    }

    #[test]
    fn test_single_edge() {
        let instance = instance![2; (0, 1)];
        assert_eq!(Blossom.matching(&instance).mates(), mate![1, 0]);
    }

    #[test]
    fn test_path_of_four() {
        // the greedy seed must not stop at the middle edge
        let instance = instance![4; (0, 1), (1, 2), (2, 3)];
        let matching = Blossom.matching(&instance);

        assert!(matching.verify());
        assert_eq!(matching.mates(), mate![1, 0, 3, 2]);
    }

    #[test]
    fn test_augments_across_trees() {
        // greedy matches (0, 1) and leaves 2 and 3 free; only an augmenting
        // path between their two trees reaches size 2
        let instance = instance![4; (0, 1), (0, 2), (1, 3)];
        let matching = Blossom.matching(&instance);

        assert!(matching.verify());
        assert_eq!(matching.mates(), mate![2, 3, 0, 1]);
    }

    #[test]
    fn test_triangle() {
        // greedy seeds (0, 1), the cycle contracts around vertex 2 and the
        // recovery re-pairs (1, 2), leaving 0 free
        let instance = instance![3; (0, 1), (1, 2), (0, 2)];
        let matching = Blossom.matching(&instance);

        assert!(matching.verify());
        assert_eq!(matching.pairs(), 1);
        assert_eq!(matching.mates(), mate![-, 2, 1]);
    }

    #[test]
    fn test_five_cycle() {
        // two tree branches meet around the odd cycle, forcing a contraction
        let instance = instance![5; (0, 1), (1, 2), (2, 3), (3, 4), (4, 0)];
        let matching = Blossom.matching(&instance);

        assert!(matching.verify());
        assert_eq!(matching.pairs(), 2);
        assert_eq!(matching.mates(), mate![1, 0, 3, 2, -]);
    }

    #[test]
    fn test_disjoint_edges() {
        let instance = instance![4; (0, 1), (2, 3)];
        let matching = Blossom.matching(&instance);

        assert!(matching.verify());
        assert_eq!(matching.pairs(), 2);
    }

    #[test]
    fn test_complete_four() {
        let instance = instance![4; (0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
        assert_eq!(Blossom.matching(&instance).pairs(), 2);
    }

    #[test]
    fn test_two_triangles_bridge() {
        let instance = instance![6; (0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)];
        let matching = Blossom.matching(&instance);

        assert!(matching.verify());
        assert_eq!(matching.pairs(), 3);
    }

    #[test]
    fn test_petersen() {
        let instance = instance![10;
            (0, 1), (1, 2), (2, 3), (3, 4), (4, 0),
            (0, 5), (1, 6), (2, 7), (3, 8), (4, 9),
            (5, 7), (7, 9), (9, 6), (6, 8), (8, 5),
        ];
        let matching = Blossom.matching(&instance);

        assert!(matching.verify());
        assert_eq!(matching.pairs(), 5);
    }

    #[test]
    fn test_deterministic() {
        let instance = instance![5; (0, 1), (1, 2), (2, 3), (3, 4), (4, 0)];
        let first = Blossom.matching(&instance);
        let second = Blossom.matching(&instance);

        assert_eq!(first.mates(), second.mates());
    }

    #[test]
    fn test_matches_exhaustive_on_random_graphs() {
        let mut rng = StdRng::seed_from_u64(2501);

        for _ in 0..40 {
            let vertices = rng.gen_range(2..=9);
            let pool: Vec<Edge> = (0..vertices)
                .flat_map(|u| (u + 1..vertices).map(move |v| Edge(u, v)))
                .collect();
            let count = rng.gen_range(0..=pool.len());
            let instance = Instance::new(vertices, pool.into_iter().choose_multiple(&mut rng, count));

            let matching = Blossom.matching(&instance);
            assert!(matching.verify(), "invalid matching for {instance:?}");
            assert_eq!(
                matching.pairs(),
                Exhaustive.matching(&instance).pairs(),
                "not maximum for {instance:?}"
            );
        }
    }

    #[test]
    fn test_samples() {
        assert!(crate::data::samples(true, &mut Blossom).is_ok());
    }

    /// Triangle (0, 1, 2) with outside vertices 3 (adjacent to 0) and 4
    /// (adjacent to 2), where 0 is matched to 3 and the pair (1, 2) is
    /// matched inside the cycle.
    fn shrink_fixture() -> (Graph, Vec<usize>) {
        let mut graph = Graph::new(5);
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(0, 2);
        graph.add_edge(0, 3);
        graph.add_edge(2, 4);
        (graph, vec![0, 1, 2])
    }

    #[test]
    fn shrink_moves_outside_edges_to_the_pseudo_vertex() {
        let (mut graph, cycle) = shrink_fixture();
        graph.set_mate(0, 3);
        graph.set_mate(1, 2);

        let shrunk = shrink_cycle(&mut graph, cycle);

        assert_eq!(shrunk.pseudo, 5);
        assert_eq!(graph[5].adj, vec![3, 4]);
        assert!((0..3).all(|u| !graph[u].active));
        // the base's external match was carried over
        assert_eq!(graph[5].mate, Some(3));
        assert_eq!(graph[3].mate, Some(5));
        assert!(!graph[3].adj.contains(&0));
        assert!(!graph[4].adj.contains(&2));
        assert_eq!(shrunk.by_cycle[&0], vec![(0, 3)]);
        assert_eq!(shrunk.by_outside[&4], vec![(2, 4)]);
    }

    #[test]
    fn recover_round_trip_preserves_the_external_match() {
        let (mut graph, cycle) = shrink_fixture();
        graph.set_mate(0, 3);
        graph.set_mate(1, 2);

        let shrunk = shrink_cycle(&mut graph, cycle);
        recover_cycle(&mut graph, &shrunk);

        assert!((0..3).all(|u| graph[u].active));
        assert_eq!(graph[0].mate, Some(3));
        assert_eq!(graph[3].mate, Some(0));
        assert_eq!(graph[1].mate, Some(2));
        assert_eq!(graph[2].mate, Some(1));
        assert_eq!(graph[4].mate, None);
        assert!(!graph[5].active);
        assert_eq!(graph[5].mate, None);
    }

    #[test]
    fn recover_without_external_match_leaves_one_vertex_free() {
        let (mut graph, cycle) = shrink_fixture();

        let shrunk = shrink_cycle(&mut graph, cycle);
        recover_cycle(&mut graph, &shrunk);

        assert_eq!(graph[0].mate, Some(1));
        assert_eq!(graph[1].mate, Some(0));
        assert_eq!(graph[2].mate, None);
    }
}
