//! Traversal of a [`Tree`](crate::filesystem::Tree) driven by a pluggable
//! visiting order.

mod executor;
mod scheduler;

pub use executor::{SearchError, SearchExecutor};
pub use scheduler::{BreadthFirst, DepthFirst, Scheduler, TraversalOrder};
