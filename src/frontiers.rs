//! Pending work for a traversal. The frontier discipline alone decides whether a search runs
//! depth first, breadth first or best first.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;

use crate::search_state::StateId;

pub trait Frontier<T> {
    /// Add a state. `node` is the state's `current` value, for frontiers that order by it.
    fn push(&mut self, id: StateId, node: &T);

    /// Remove and return the next state to expand.
    fn pop(&mut self) -> Option<StateId>;

    /// The state `pop` would return, left in place.
    fn peek(&self) -> Option<StateId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Last in, first out.
#[derive(Debug, Clone, Default)]
pub struct StackFrontier {
    states: Vec<StateId>,
}

impl StackFrontier {
    pub fn new() -> StackFrontier {
        StackFrontier::default()
    }

    /// Everything still on the stack, oldest first.
    pub fn iter_bottom_up(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states.iter().cloned()
    }
}

impl<T> Frontier<T> for StackFrontier {
    fn push(&mut self, id: StateId, _: &T) {
        self.states.push(id);
    }

    fn pop(&mut self) -> Option<StateId> {
        self.states.pop()
    }

    fn peek(&self) -> Option<StateId> {
        self.states.last().cloned()
    }

    fn len(&self) -> usize {
        self.states.len()
    }
}

/// First in, first out.
#[derive(Debug, Clone, Default)]
pub struct QueueFrontier {
    states: VecDeque<StateId>,
}

impl QueueFrontier {
    pub fn new() -> QueueFrontier {
        QueueFrontier::default()
    }
}

impl<T> Frontier<T> for QueueFrontier {
    fn push(&mut self, id: StateId, _: &T) {
        self.states.push_back(id);
    }

    fn pop(&mut self) -> Option<StateId> {
        self.states.pop_front()
    }

    fn peek(&self) -> Option<StateId> {
        self.states.front().cloned()
    }

    fn len(&self) -> usize {
        self.states.len()
    }
}

/// Lowest heuristic value first. The heuristic is evaluated once, when a state is pushed, and
/// states with equal values come out in the order they went in.
pub struct HeuristicFrontier<H, P: Ord> {
    heap: BinaryHeap<Reverse<(P, u64, StateId)>>,
    heuristic: H,
    pushed: u64,
}

impl<H, P: Ord> HeuristicFrontier<H, P> {
    pub fn new(heuristic: H) -> HeuristicFrontier<H, P> {
        HeuristicFrontier {
            heap: BinaryHeap::new(),
            heuristic,
            pushed: 0,
        }
    }
}

impl<H, P: Ord + fmt::Debug> fmt::Debug for HeuristicFrontier<H, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "HeuristicFrontier :: len: {:?}, next: {:?}",
               self.heap.len(), self.heap.peek().map(|entry| &(entry.0).0))
    }
}

impl<T, H, P> Frontier<T> for HeuristicFrontier<H, P>
    where H: FnMut(&T) -> P,
          P: Ord
{
    fn push(&mut self, id: StateId, node: &T) {
        let priority = (self.heuristic)(node);
        self.heap.push(Reverse((priority, self.pushed, id)));
        self.pushed += 1;
    }

    fn pop(&mut self) -> Option<StateId> {
        self.heap.pop().map(|Reverse((_, _, id))| id)
    }

    fn peek(&self) -> Option<StateId> {
        self.heap.peek().map(|entry| (entry.0).2)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}
