use ahash::{HashSet, HashSetExt};
use serde::{Deserialize, Serialize};

/// An undirected edge between two vertices described by their indices.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Serialize, PartialEq)]
pub struct Edge(pub usize, pub usize);

impl Edge {
    /// Creates a new edge between two vertices.
    #[must_use]
    pub const fn new(first: usize, second: usize) -> Self {
        Self(first, second)
    }

    /// Returns the edge with its endpoints in ascending order.
    #[must_use]
    pub const fn normalized(self) -> Self {
        if self.0 <= self.1 {
            self
        } else {
            Self(self.1, self.0)
        }
    }
}

/// An instance of the matching problem: a simple undirected graph given as a
/// vertex count and an edge list with 0-based endpoints.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Eq, Serialize, PartialEq)]
pub struct Instance {
    pub vertices: usize,
    pub edges: Vec<Edge>,
}

impl Instance {
    /// Creates a new instance of the matching problem.
    #[must_use]
    pub const fn new(vertices: usize, edges: Vec<Edge>) -> Self {
        Self { vertices, edges }
    }

    /// Returns the set of normalized edges, without duplicates or self-loops.
    #[must_use]
    pub fn edge_set(&self) -> HashSet<Edge> {
        let mut set = HashSet::with_capacity(self.edges.len());
        set.extend(
            self.edges
                .iter()
                .filter(|edge| edge.0 != edge.1)
                .map(|edge| edge.normalized()),
        );
        set
    }
}

impl std::fmt::Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} {}", self.vertices, self.edges.len())?;
        for edge in &self.edges {
            writeln!(f, "{} {}", edge.0 + 1, edge.1 + 1)?;
        }
        Ok(())
    }
}
