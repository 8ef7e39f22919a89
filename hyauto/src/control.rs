//! Cooperative cancellation for the run and membership searches.
//!
//! Both searches poll a [`SearchControl`] once per expanded configuration and
//! once per quantifier branch. A control that answers `false` aborts the whole
//! check with [`crate::utils::Error::SearchInterrupted`].
use std::time::{Duration, Instant};

pub trait SearchControl {
    /// Called before each unit of work. `explored` is the number of
    /// configurations expanded so far across the current check.
    fn proceed(&mut self, explored: usize) -> bool;
}

impl<T: SearchControl + ?Sized> SearchControl for &mut T {
    fn proceed(&mut self, explored: usize) -> bool {
        (**self).proceed(explored)
    }
}

/// Never interrupts. Memoization alone guarantees termination.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl SearchControl for Unbounded {
    fn proceed(&mut self, _explored: usize) -> bool {
        true
    }
}

/// Stops once more than `limit` configurations have been expanded.
#[derive(Debug, Clone, Copy)]
pub struct NodeBudget(pub usize);

impl SearchControl for NodeBudget {
    fn proceed(&mut self, explored: usize) -> bool {
        explored < self.0
    }
}

/// Stops once a wall-clock instant has passed.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn at(at: Instant) -> Self {
        Self { at }
    }

    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
        }
    }
}

impl SearchControl for Deadline {
    fn proceed(&mut self, _explored: usize) -> bool {
        Instant::now() < self.at
    }
}
