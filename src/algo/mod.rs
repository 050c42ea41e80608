mod blossom;
mod exhaustive;
mod greedy;

pub use blossom::Blossom;
pub use exhaustive::Exhaustive;
pub use greedy::Greedy;

/// Registry of all available matchers.
#[linkme::distributed_slice]
pub static MATCHERS: [fn() -> Box<dyn crate::core::Matcher>];
