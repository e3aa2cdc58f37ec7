//! Search states and the arena that owns them for the duration of one search run.
//!
//! A state never points at its parent directly. It stores the parent's `StateId`, an index into
//! the `SearchArena` that created it, so walking back to the root is a sequence of vector lookups.

use smallvec::SmallVec;
use std::fmt;
use std::ops::Index;

/// The successors of a node, most grids have at most 4.
pub type Successors<T> = SmallVec<[T; 4]>;

/// Handle to a `SearchState` stored in a `SearchArena`.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Ord, PartialOrd)]
pub struct StateId(usize);

impl StateId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct SearchState<T> {
    current: T,
    possible: Successors<T>,
    parent: Option<StateId>,
}

impl<T> SearchState<T> {
    pub fn new(current: T, possible: Successors<T>, parent: Option<StateId>) -> SearchState<T> {
        SearchState {
            current,
            possible,
            parent,
        }
    }

    #[inline]
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Successors of `current`, as they were when the state was built.
    #[inline]
    pub fn possible(&self) -> &[T] {
        &self.possible
    }

    #[inline]
    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }
}

impl<T: PartialEq> SearchState<T> {
    /// Is `node` one step away from this state?
    #[inline]
    pub fn leads_to(&self, node: &T) -> bool {
        self.possible.iter().any(|candidate| candidate == node)
    }
}

#[derive(Debug, Clone)]
pub struct SearchArena<T> {
    states: Vec<SearchState<T>>,
}

impl<T> Default for SearchArena<T> {
    fn default() -> Self {
        SearchArena::new()
    }
}

impl<T> SearchArena<T> {
    pub fn new() -> SearchArena<T> {
        SearchArena { states: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> SearchArena<T> {
        SearchArena { states: Vec::with_capacity(capacity) }
    }

    /// Store a new state and hand back its handle.
    pub fn insert(&mut self,
                  current: T,
                  possible: Successors<T>,
                  parent: Option<StateId>)
                  -> StateId {
        let id = StateId(self.states.len());
        self.states.push(SearchState::new(current, possible, parent));
        id
    }

    #[inline]
    pub fn get(&self, id: StateId) -> Option<&SearchState<T>> {
        self.states.get(id.0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Walk the parent links from `id` back to the state that has no parent, yielding each
    /// state's `current` node. The root comes last.
    ///
    /// The iterator is cheap to clone, cloning it (or calling this again) restarts the walk.
    pub fn path_to_root(&self, id: StateId) -> PathToRoot<T> {
        PathToRoot {
            arena: self,
            next: Some(id),
        }
    }
}

impl<T> Index<StateId> for SearchArena<T> {
    type Output = SearchState<T>;

    fn index(&self, id: StateId) -> &SearchState<T> {
        &self.states[id.0]
    }
}

pub struct PathToRoot<'a, T> {
    arena: &'a SearchArena<T>,
    next: Option<StateId>,
}

// Manual impl, cloning only copies the arena reference.
impl<'a, T> Clone for PathToRoot<'a, T> {
    fn clone(&self) -> Self {
        PathToRoot {
            arena: self.arena,
            next: self.next,
        }
    }
}

impl<'a, T> fmt::Debug for PathToRoot<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PathToRoot :: next: {:?}", self.next)
    }
}

impl<'a, T> Iterator for PathToRoot<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let state = self.arena.get(self.next?)?;
        self.next = state.parent();
        Some(state.current())
    }
}
