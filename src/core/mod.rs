mod graph;
mod problem;
mod solution;

pub use graph::*;
pub use problem::*;
pub use solution::*;

/// Computes a matching for an instance.
pub trait Matcher {
    /// Computes a matching of the given instance.
    fn matching<'a>(&mut self, instance: &'a Instance) -> Matching<'a>;

    /// Returns whether the matcher guarantees a maximum-cardinality matching.
    fn exact(&self) -> bool {
        true
    }

    /// Returns the maximum number of vertices the matcher can handle.
    fn maximum_vertices(&self) -> usize {
        usize::MAX
    }

    /// Returns the name of the matcher. The name outlives the matcher so it
    /// can identify registry entries after the instance is dropped.
    fn name(&self) -> &'static str;
}
