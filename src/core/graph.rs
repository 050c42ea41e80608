use super::Instance;
use std::ops::{Index, IndexMut};

/// A vertex of the mutable working graph.
///
/// `mate` and `active` describe the evolving solution and survive recursive
/// sub-solves. The remaining fields are alternating-tree state, reset at the
/// start of every solver pass; `root` and `parent` are meaningful only once
/// `seen` is set, and `children` always holds exactly the vertices whose
/// `parent` points back here.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub adj: Vec<usize>,
    pub mate: Option<usize>,
    pub active: bool,
    pub visited: bool,
    pub seen: bool,
    pub is_outer: bool,
    pub root: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl Vertex {
    fn new(index: usize) -> Self {
        Self {
            adj: Vec::new(),
            mate: None,
            active: true,
            visited: false,
            seen: false,
            is_outer: true,
            root: index,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Returns whether the vertex is currently unmatched.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.mate.is_none()
    }
}

/// The working graph of the matching solver: an arena of vertices indexed by
/// stable identity, with adjacency stored as index lists. An edge exists iff
/// each endpoint lists the other. Pseudo-vertices appended during blossom
/// contraction live at indices past the instance vertex count.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    vertices: Vec<Vertex>,
}

impl Graph {
    /// Creates a graph with the given number of isolated vertices.
    #[must_use]
    pub fn new(vertices: usize) -> Self {
        Self {
            vertices: (0..vertices).map(Vertex::new).collect(),
        }
    }

    /// Returns the number of vertices, pseudo-vertices included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns whether the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Appends a fresh isolated vertex and returns its index.
    pub fn push_vertex(&mut self) -> usize {
        let index = self.vertices.len();
        self.vertices.push(Vertex::new(index));
        index
    }

    /// Adds an undirected edge by appending each endpoint to the other's
    /// adjacency. Self-loops are ignored.
    pub fn add_edge(&mut self, u: usize, v: usize) {
        if u == v {
            return;
        }
        self.vertices[u].adj.push(v);
        self.vertices[v].adj.push(u);
    }

    /// Removes exactly one occurrence of the edge from each endpoint's
    /// adjacency list. Missing occurrences are ignored.
    pub fn remove_edge(&mut self, u: usize, v: usize) {
        if let Some(position) = self.vertices[u].adj.iter().position(|&w| w == v) {
            self.vertices[u].adj.remove(position);
        }
        if let Some(position) = self.vertices[v].adj.iter().position(|&w| w == u) {
            self.vertices[v].adj.remove(position);
        }
    }

    /// Marks two vertices as mutual mates.
    pub fn set_mate(&mut self, u: usize, v: usize) {
        self.vertices[u].mate = Some(v);
        self.vertices[v].mate = Some(u);
    }

    /// Returns the lowest-indexed active unmatched vertex, if any. The
    /// ascending tie-break keeps runs reproducible.
    #[must_use]
    pub fn first_free(&self) -> Option<usize> {
        self.vertices
            .iter()
            .position(|vertex| vertex.active && vertex.is_free())
    }

    /// Resets all alternating-tree and traversal state. Mates and activity
    /// are part of the evolving solution and are left untouched.
    pub fn reset_tree_state(&mut self) {
        for (index, vertex) in self.vertices.iter_mut().enumerate() {
            vertex.visited = false;
            vertex.seen = false;
            vertex.is_outer = true;
            vertex.root = index;
            vertex.parent = None;
            vertex.children.clear();
        }
    }

    /// Extracts the mate assignment for the first `vertices` vertices,
    /// dropping any pseudo-vertex state.
    #[must_use]
    pub fn mates(&self, vertices: usize) -> Vec<Option<usize>> {
        self.vertices[..vertices]
            .iter()
            .map(|vertex| vertex.mate)
            .collect()
    }
}

impl From<&Instance> for Graph {
    /// Builds the working graph from an instance, dropping duplicate edges
    /// and self-loops so the solver sees a simple graph.
    fn from(instance: &Instance) -> Self {
        let mut graph = Self::new(instance.vertices);
        let mut inserted = ahash::HashSet::default();

        for edge in &instance.edges {
            if edge.0 != edge.1 && inserted.insert(edge.normalized()) {
                graph.add_edge(edge.0, edge.1);
            }
        }

        graph
    }
}

impl Index<usize> for Graph {
    type Output = Vertex;

    fn index(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }
}

impl IndexMut<usize> for Graph {
    fn index_mut(&mut self, index: usize) -> &mut Vertex {
        &mut self.vertices[index]
    }
}
