use std::io::Write;

use snafu::{ResultExt, Snafu};
use tracing::{debug, trace};

use crate::filesystem::{NodeId, Tree};
use crate::query::Expression;
use crate::search::Scheduler;

/// Walks a [`Tree`] from a start node in the order chosen by a [`Scheduler`]
/// and reports every node the expression accepts.
pub struct SearchExecutor<'a> {
    tree: &'a Tree,
    expression: &'a Expression,
}

impl<'a> SearchExecutor<'a> {
    pub fn new(tree: &'a Tree, expression: &'a Expression) -> Self {
        Self { tree, expression }
    }

    /// Lazily yields matching nodes. Directories are matched like any other
    /// node and their children are scheduled whether they matched or not.
    pub fn matches<S>(
        &self,
        start: NodeId,
        mut scheduler: S,
    ) -> impl Iterator<Item = NodeId> + use<'a, S>
    where
        S: Scheduler<NodeId>,
    {
        let tree = self.tree;
        let expression = self.expression;
        scheduler.schedule_many(&[start]);

        std::iter::from_fn(move || {
            while let Some(id) = scheduler.next_node() {
                let node = tree.node(id);
                trace!("Visiting {}", tree.path(id));

                let matched = expression.evaluate(node);
                scheduler.schedule_many(node.children());
                if matched {
                    return Some(id);
                }
            }
            None
        })
    }

    /// Writes the path of every match relative to `start`, one per line, and
    /// returns how many were written
    pub fn run<S, W>(
        &self,
        start: NodeId,
        scheduler: S,
        output: &mut W,
    ) -> Result<usize, SearchError>
    where
        S: Scheduler<NodeId>,
        W: Write + ?Sized,
    {
        let mut count = 0;
        for id in self.matches(start, scheduler) {
            writeln!(output, "{}", self.tree.relative_path(id, start)).context(WriteSnafu)?;
            count += 1;
        }
        debug!(
            "Search from {} matched {} nodes",
            self.tree.path(start),
            count
        );
        Ok(count)
    }
}

#[derive(Debug, Snafu)]
pub enum SearchError {
    #[snafu(display("Failed to write search results"))]
    WriteError { source: std::io::Error },
}
