use super::{Edge, Instance};

/// A matching of an instance: for every vertex, its mate or `None`.
#[derive(Clone, Debug)]
pub struct Matching<'a> {
    instance: &'a Instance,
    mates: Vec<Option<usize>>,
}

impl<'a> Matching<'a> {
    /// Creates a matching from a full mate table.
    ///
    /// # Panics
    /// - If the table length differs from the instance vertex count.
    #[must_use]
    pub fn new(instance: &'a Instance, mates: Vec<Option<usize>>) -> Self {
        assert_eq!(mates.len(), instance.vertices, "Mate table length mismatch");
        Self { instance, mates }
    }

    /// Returns the mate of the given vertex, if matched.
    #[must_use]
    pub fn mate(&self, vertex: usize) -> Option<usize> {
        self.mates.get(vertex).copied().flatten()
    }

    /// Returns the full mate table, indexed by vertex.
    #[must_use]
    pub fn mates(&self) -> &[Option<usize>] {
        &self.mates
    }

    /// Returns the number of matched pairs.
    #[must_use]
    pub fn pairs(&self) -> usize {
        self.mates.iter().flatten().count() / 2
    }

    /// Verifies that the mate relation is symmetric, free of self-matches,
    /// and uses only edges of the instance.
    #[must_use]
    pub fn verify(&self) -> bool {
        let edges = self.instance.edge_set();

        self.mates.iter().enumerate().all(|(u, mate)| match *mate {
            None => true,
            Some(v) => {
                u != v
                    && self.mates.get(v).copied().flatten() == Some(u)
                    && edges.contains(&Edge(u, v).normalized())
            }
        })
    }
}

impl std::fmt::Display for Matching<'_> {
    /// One line per vertex: its 1-based identity and that of its mate, with
    /// `-` marking an unmatched vertex.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (vertex, mate) in self.mates.iter().enumerate() {
            match mate {
                Some(mate) => writeln!(f, "{} {}", vertex + 1, mate + 1)?,
                None => writeln!(f, "{} -", vertex + 1)?,
            }
        }
        Ok(())
    }
}
