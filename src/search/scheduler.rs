use std::collections::VecDeque;

/// Pending-work store deciding the order in which batches get visited
pub trait Scheduler<T> {
    fn schedule_many(&mut self, batch: &[T]);
    fn next_node(&mut self) -> Option<T>;
}

/// Stack-backed pre-order traversal. Batches are pushed reversed so their
/// members still come out in batch order.
#[derive(Debug)]
pub struct DepthFirst<T> {
    stack: Vec<T>,
}

impl<T> DepthFirst<T> {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }
}

impl<T> Default for DepthFirst<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Scheduler<T> for DepthFirst<T> {
    fn schedule_many(&mut self, batch: &[T]) {
        self.stack.extend(batch.iter().rev().cloned());
    }

    fn next_node(&mut self) -> Option<T> {
        self.stack.pop()
    }
}

/// Queue-backed level-order traversal
#[derive(Debug)]
pub struct BreadthFirst<T> {
    queue: VecDeque<T>,
}

impl<T> BreadthFirst<T> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }
}

impl<T> Default for BreadthFirst<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Scheduler<T> for BreadthFirst<T> {
    fn schedule_many(&mut self, batch: &[T]) {
        self.queue.extend(batch.iter().cloned());
    }

    fn next_node(&mut self) -> Option<T> {
        self.queue.pop_front()
    }
}

impl<T, S: Scheduler<T> + ?Sized> Scheduler<T> for Box<S> {
    fn schedule_many(&mut self, batch: &[T]) {
        (**self).schedule_many(batch)
    }

    fn next_node(&mut self) -> Option<T> {
        (**self).next_node()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalOrder {
    #[default]
    DepthFirst,
    BreadthFirst,
}

impl TraversalOrder {
    pub fn scheduler<T: Clone + 'static>(self) -> Box<dyn Scheduler<T>> {
        match self {
            TraversalOrder::DepthFirst => Box::new(DepthFirst::new()),
            TraversalOrder::BreadthFirst => Box::new(BreadthFirst::new()),
        }
    }
}
