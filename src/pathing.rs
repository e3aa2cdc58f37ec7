//! Generic route finding between two nodes of any graph.
//!
//! The graph is never materialised. Callers describe it with a successor function that maps a
//! node to the nodes one step away, and every variant explores outwards from `begin` until it
//! expands a state that has `end` among its successors. `end` itself is never expanded.
//!
//! All four variants share one traversal loop (`traverse`). They differ in the `Frontier` that
//! holds pending states and in the `Expansion` policy:
//!
//! | variant             | frontier             | expansion         | path order    |
//! |---------------------|----------------------|-------------------|---------------|
//! | `depth_first_peek`  | stack                | first unexplored  | start to goal |
//! | `depth_first_chain` | stack                | all unexplored    | goal to start |
//! | `breadth_first`     | queue                | all unexplored    | goal to start |
//! | `a_star`            | heuristic priority   | all unexplored    | goal to start |
//!
//! `a_star` orders its frontier by the heuristic alone, evaluated when a state is pushed. There is
//! no accumulated path cost, so it is a greedy best first search and its paths are valid but not
//! necessarily the shortest.

use log::{debug, trace};
use std::error::Error;
use std::fmt;
use std::hash::Hash;
use std::slice;
use std::vec;

use crate::frontiers::{Frontier, HeuristicFrontier, QueueFrontier, StackFrontier};
use crate::search_state::{SearchArena, StateId, Successors};
use crate::utils;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum SearchError {
    /// The frontier ran dry without any expanded state leading to the goal.
    NoPathFound,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SearchError::NoPathFound => write!(f, "no path found between the start and the goal"),
        }
    }
}

impl Error for SearchError {}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum PathOrder {
    StartToGoal,
    GoalToStart,
}

/// The nodes of a discovered route, including both the start and the goal.
///
/// Which end comes first depends on the algorithm that produced it, see `order`.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct SearchPath<T> {
    nodes: Vec<T>,
    order: PathOrder,
}

impl<T> SearchPath<T> {
    fn new(nodes: Vec<T>, order: PathOrder) -> SearchPath<T> {
        SearchPath { nodes, order }
    }

    fn single(node: T) -> SearchPath<T> {
        SearchPath::new(vec![node], PathOrder::StartToGoal)
    }

    #[inline]
    pub fn nodes(&self) -> &[T] {
        &self.nodes
    }

    #[inline]
    pub fn order(&self) -> PathOrder {
        self.order
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of steps along the path.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<&T> {
        match self.order {
            PathOrder::StartToGoal => self.nodes.first(),
            PathOrder::GoalToStart => self.nodes.last(),
        }
    }

    pub fn goal(&self) -> Option<&T> {
        match self.order {
            PathOrder::StartToGoal => self.nodes.last(),
            PathOrder::GoalToStart => self.nodes.first(),
        }
    }

    pub fn iter(&self) -> slice::Iter<T> {
        self.nodes.iter()
    }

    /// The nodes from start to goal, reversing them if they were stored goal first.
    pub fn into_start_to_goal(self) -> Vec<T> {
        let mut nodes = self.nodes;
        if let PathOrder::GoalToStart = self.order {
            nodes.reverse();
        }
        nodes
    }
}

impl<T> IntoIterator for SearchPath<T> {
    type Item = T;
    type IntoIter = vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

/// How an expanded state adds to the frontier.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Expansion {
    /// Look at the next state without removing it and push only its first unexplored successor.
    /// A state leaves the frontier once it has no unexplored successors left.
    FirstUnexplored,
    /// Remove the next state and push every one of its unexplored successors, each with the
    /// removed state as parent.
    AllUnexplored,
}

/// How a traversal ended.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Traversal {
    /// This state has the goal among its successors.
    Found(StateId),
    Exhausted,
}

/// Explore from `begin` until a state leading to `end` is found or there is nothing left to
/// explore. Every state created is stored in `arena`, so the caller can rebuild the route.
///
/// `FirstUnexplored` states are stored without a parent, the route is whatever is left in the
/// frontier. `AllUnexplored` states link to their parent.
pub fn traverse<T, N, I, F>(begin: T,
                            end: &T,
                            get_next: &mut N,
                            arena: &mut SearchArena<T>,
                            frontier: &mut F,
                            expansion: Expansion)
                            -> Traversal
    where T: Eq + Hash + Clone,
          N: FnMut(&T) -> I,
          I: IntoIterator<Item = T>,
          F: Frontier<T>
{
    let mut explored = utils::fnv_hashset(64);
    let mut expansions = 0usize;
    let first_new_state = arena.len();

    // Cursor per arena state: index of the next `possible` entry worth looking at.
    let mut cursors: Vec<usize> = vec![0; arena.len()];

    let possible = successors(get_next, &begin);
    explored.insert(begin.clone());
    let root = arena.insert(begin, possible, None);
    cursors.push(0);
    frontier.push(root, arena[root].current());

    let outcome = match expansion {
        Expansion::FirstUnexplored => loop {
            let top = match frontier.peek() {
                Some(id) => id,
                None => break Traversal::Exhausted,
            };
            if arena[top].leads_to(end) {
                break Traversal::Found(top);
            }
            expansions += 1;
            trace!("expanding {:?}, frontier size {}", top, frontier.len());

            let unexplored = {
                let possible = arena[top].possible();
                let cursor = &mut cursors[top.index()];
                let mut found = None;
                while *cursor < possible.len() {
                    let candidate = &possible[*cursor];
                    *cursor += 1;
                    if !explored.contains(candidate) {
                        found = Some(candidate.clone());
                        break;
                    }
                }
                found
            };

            match unexplored {
                Some(node) => {
                    explored.insert(node.clone());
                    let possible = successors(get_next, &node);
                    let id = arena.insert(node, possible, None);
                    cursors.push(0);
                    frontier.push(id, arena[id].current());
                }
                None => {
                    let _ = frontier.pop();
                }
            }
        },

        Expansion::AllUnexplored => loop {
            let id = match frontier.pop() {
                Some(id) => id,
                None => break Traversal::Exhausted,
            };
            if arena[id].leads_to(end) {
                break Traversal::Found(id);
            }
            expansions += 1;
            trace!("expanding {:?}, frontier size {}", id, frontier.len());

            for index in 0..arena[id].possible().len() {
                let node = arena[id].possible()[index].clone();
                // Checked one at a time so duplicated successors are only pushed once.
                if explored.insert(node.clone()) {
                    let possible = successors(get_next, &node);
                    let child = arena.insert(node, possible, Some(id));
                    frontier.push(child, arena[child].current());
                }
            }
        },
    };

    debug!("{:?} traversal: {:?} after {} expansions, {} states created, {} explored",
           expansion,
           outcome,
           expansions,
           arena.len() - first_new_state,
           explored.len());
    outcome
}

fn successors<T, N, I>(get_next: &mut N, node: &T) -> Successors<T>
    where N: FnMut(&T) -> I,
          I: IntoIterator<Item = T>
{
    get_next(node).into_iter().collect()
}

/// Depth first search that keeps its whole route on the stack.
///
/// Only the first unexplored successor of the top state is pushed, in the order `get_next` lists
/// them, and a state is popped when it has nothing unexplored left. When the top state leads to
/// `end` the stack is the route. The path is in `PathOrder::StartToGoal`.
pub fn depth_first_peek<T, N, I>(begin: T, end: T, mut get_next: N) -> Result<SearchPath<T>, SearchError>
    where T: Eq + Hash + Clone,
          N: FnMut(&T) -> I,
          I: IntoIterator<Item = T>
{
    if begin == end {
        return Ok(SearchPath::single(begin));
    }

    let mut arena = SearchArena::with_capacity(64);
    let mut frontier = StackFrontier::new();
    match traverse(begin, &end, &mut get_next, &mut arena, &mut frontier, Expansion::FirstUnexplored) {
        Traversal::Found(_) => {
            let mut nodes = Vec::with_capacity(Frontier::<T>::len(&frontier) + 1);
            nodes.extend(frontier.iter_bottom_up().map(|id| arena[id].current().clone()));
            nodes.push(end);
            Ok(SearchPath::new(nodes, PathOrder::StartToGoal))
        }
        Traversal::Exhausted => Err(SearchError::NoPathFound),
    }
}

/// Depth first search that pushes every unexplored successor and rebuilds the route from parent
/// links. The path is in `PathOrder::GoalToStart`.
pub fn depth_first_chain<T, N, I>(begin: T, end: T, get_next: N) -> Result<SearchPath<T>, SearchError>
    where T: Eq + Hash + Clone,
          N: FnMut(&T) -> I,
          I: IntoIterator<Item = T>
{
    search_parent_chain(begin, end, get_next, StackFrontier::new())
}

/// Breadth first search, the path has the fewest possible steps. The path is in
/// `PathOrder::GoalToStart`.
pub fn breadth_first<T, N, I>(begin: T, end: T, get_next: N) -> Result<SearchPath<T>, SearchError>
    where T: Eq + Hash + Clone,
          N: FnMut(&T) -> I,
          I: IntoIterator<Item = T>
{
    search_parent_chain(begin, end, get_next, QueueFrontier::new())
}

/// Best first search guided by `heuristic` alone: the pending state with the lowest heuristic
/// value, taken when it was pushed, is expanded next. The path is in `PathOrder::GoalToStart`.
pub fn a_star<T, N, I, H, P>(begin: T,
                             end: T,
                             get_next: N,
                             heuristic: H)
                             -> Result<SearchPath<T>, SearchError>
    where T: Eq + Hash + Clone,
          N: FnMut(&T) -> I,
          I: IntoIterator<Item = T>,
          H: FnMut(&T) -> P,
          P: Ord
{
    search_parent_chain(begin, end, get_next, HeuristicFrontier::new(heuristic))
}

fn search_parent_chain<T, N, I, F>(begin: T,
                                   end: T,
                                   mut get_next: N,
                                   mut frontier: F)
                                   -> Result<SearchPath<T>, SearchError>
    where T: Eq + Hash + Clone,
          N: FnMut(&T) -> I,
          I: IntoIterator<Item = T>,
          F: Frontier<T>
{
    if begin == end {
        return Ok(SearchPath::single(begin));
    }

    let mut arena = SearchArena::with_capacity(64);
    match traverse(begin, &end, &mut get_next, &mut arena, &mut frontier, Expansion::AllUnexplored) {
        Traversal::Found(terminal) => {
            let mut nodes = vec![end];
            nodes.extend(arena.path_to_root(terminal).cloned());
            Ok(SearchPath::new(nodes, PathOrder::GoalToStart))
        }
        Traversal::Exhausted => Err(SearchError::NoPathFound),
    }
}

/// Selects one of the search variants at runtime.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum SearchAlgorithm {
    DepthFirstPeek,
    DepthFirstChain,
    BreadthFirst,
    AStar,
}

impl SearchAlgorithm {
    pub const ALL: [SearchAlgorithm; 4] = [SearchAlgorithm::DepthFirstPeek,
                                           SearchAlgorithm::DepthFirstChain,
                                           SearchAlgorithm::BreadthFirst,
                                           SearchAlgorithm::AStar];

    pub fn name(self) -> &'static str {
        match self {
            SearchAlgorithm::DepthFirstPeek => "depth-first",
            SearchAlgorithm::DepthFirstChain => "depth-first-chain",
            SearchAlgorithm::BreadthFirst => "breadth-first",
            SearchAlgorithm::AStar => "a-star",
        }
    }

    /// Run this variant. `heuristic` is only consulted by `AStar`.
    pub fn search<T, N, I, H, P>(self,
                                 begin: T,
                                 end: T,
                                 get_next: N,
                                 heuristic: H)
                                 -> Result<SearchPath<T>, SearchError>
        where T: Eq + Hash + Clone,
              N: FnMut(&T) -> I,
              I: IntoIterator<Item = T>,
              H: FnMut(&T) -> P,
              P: Ord
    {
        match self {
            SearchAlgorithm::DepthFirstPeek => depth_first_peek(begin, end, get_next),
            SearchAlgorithm::DepthFirstChain => depth_first_chain(begin, end, get_next),
            SearchAlgorithm::BreadthFirst => breadth_first(begin, end, get_next),
            SearchAlgorithm::AStar => a_star(begin, end, get_next, heuristic),
        }
    }
}

impl fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use petgraph::algo::dijkstra;
    use petgraph::graphmap::UnGraphMap;
    use quickcheck::{quickcheck, Arbitrary, Gen};
    use std::cell::Cell;

    use super::*;
    use crate::utils::FnvHashSet;

    type Node = (u32, u32);

    /// Rectangular grid of (column, row) nodes, moves listed right, down, left, up.
    #[derive(Clone, Debug)]
    struct TestGrid {
        width: u32,
        height: u32,
        blocked: Vec<bool>,
    }

    impl TestGrid {
        fn open(width: u32, height: u32) -> TestGrid {
            TestGrid {
                width,
                height,
                blocked: vec![false; (width * height) as usize],
            }
        }

        fn block(mut self, node: Node) -> TestGrid {
            let index = self.index(node);
            self.blocked[index] = true;
            self
        }

        fn index(&self, (column, row): Node) -> usize {
            (row * self.width + column) as usize
        }

        fn is_open(&self, node: Node) -> bool {
            node.0 < self.width && node.1 < self.height && !self.blocked[self.index(node)]
        }

        fn moves(&self, &(column, row): &Node) -> Vec<Node> {
            let mut next = vec![];
            let candidates = [(column.checked_add(1), Some(row)),
                              (Some(column), row.checked_add(1)),
                              (column.checked_sub(1), Some(row)),
                              (Some(column), row.checked_sub(1))];
            for candidate in candidates.iter() {
                if let (Some(c), Some(r)) = *candidate {
                    if self.is_open((c, r)) {
                        next.push((c, r));
                    }
                }
            }
            next
        }

        fn corner(&self) -> Node {
            (self.width - 1, self.height - 1)
        }

        /// Independent shortest step count from petgraph.
        fn shortest_distance(&self, begin: Node, end: Node) -> Option<usize> {
            let mut graph = UnGraphMap::<Node, ()>::new();
            for row in 0..self.height {
                for column in 0..self.width {
                    let node = (column, row);
                    if self.is_open(node) {
                        graph.add_node(node);
                        for next in self.moves(&node) {
                            graph.add_edge(node, next, ());
                        }
                    }
                }
            }
            if !graph.contains_node(begin) {
                return None;
            }
            dijkstra(&graph, begin, Some(end), |_| 1usize).get(&end).cloned()
        }
    }

    impl Arbitrary for TestGrid {
        fn arbitrary(g: &mut Gen) -> TestGrid {
            let width = u32::arbitrary(g) % 6 + 1;
            let height = u32::arbitrary(g) % 6 + 1;
            let blocked = (0..width * height).map(|_| u8::arbitrary(g) % 4 == 0).collect();
            TestGrid { width, height, blocked }
        }
    }

    fn manhattan(goal: Node) -> impl Fn(&Node) -> u32 {
        move |&(c, r): &Node| {
            let dc = if c > goal.0 { c - goal.0 } else { goal.0 - c };
            let dr = if r > goal.1 { r - goal.1 } else { goal.1 - r };
            dc + dr
        }
    }

    fn run(algorithm: SearchAlgorithm, grid: &TestGrid, begin: Node, end: Node) -> Result<SearchPath<Node>, SearchError> {
        algorithm.search(begin, end, |n: &Node| grid.moves(n), manhattan(end))
    }

    fn is_connected_path(grid: &TestGrid, path: &[Node], begin: Node, end: Node) -> bool {
        path.first() == Some(&begin) &&
        path.last() == Some(&end) &&
        path.iter().tuple_windows().all(|(a, b)| grid.moves(a).contains(b))
    }

    fn has_no_repeats(path: &[Node]) -> bool {
        path.iter().cloned().collect::<FnvHashSet<Node>>().len() == path.len()
    }

    #[test]
    fn identical_begin_and_end_short_circuits() {
        for algorithm in SearchAlgorithm::ALL.iter() {
            let calls = Cell::new(0);
            let counting_moves = |_: &Node| {
                calls.set(calls.get() + 1);
                Vec::<Node>::new()
            };
            let path = algorithm.search((1, 1), (1, 1), counting_moves, |_: &Node| 0u32).unwrap();
            assert_eq!(path.nodes(), &[(1, 1)]);
            assert_eq!(path.edge_count(), 0);
            assert_eq!(calls.get(), 0, "{} looked for successors", algorithm);
        }
    }

    #[test]
    fn breadth_first_on_open_3x3() {
        let g = TestGrid::open(3, 3);
        let path = breadth_first((0, 0), (2, 2), |n: &Node| g.moves(n)).unwrap();
        assert_eq!(path.order(), PathOrder::GoalToStart);
        assert_eq!(path.nodes(), &[(2, 2), (2, 1), (2, 0), (1, 0), (0, 0)]);
        assert_eq!(path.edge_count(), 4);
        assert_eq!(path.into_start_to_goal(),
                   vec![(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]);
    }

    #[test]
    fn depth_first_peek_on_open_3x3_returns_the_stack() {
        let g = TestGrid::open(3, 3);
        let path = depth_first_peek((0, 0), (2, 2), |n: &Node| g.moves(n)).unwrap();
        assert_eq!(path.order(), PathOrder::StartToGoal);
        assert_eq!(path.nodes(), &[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]);
    }

    #[test]
    fn depth_first_chain_on_open_3x3_follows_the_last_pushed_branch() {
        let g = TestGrid::open(3, 3);
        let path = depth_first_chain((0, 0), (2, 2), |n: &Node| g.moves(n)).unwrap();
        assert_eq!(path.order(), PathOrder::GoalToStart);
        assert_eq!(path.into_start_to_goal(),
                   vec![(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)]);
    }

    #[test]
    fn a_star_on_open_3x3() {
        let g = TestGrid::open(3, 3);
        let path = a_star((0, 0), (2, 2), |n: &Node| g.moves(n), manhattan((2, 2))).unwrap();
        assert_eq!(path.start(), Some(&(0, 0)));
        assert_eq!(path.goal(), Some(&(2, 2)));
        assert_eq!(path.into_start_to_goal(),
                   vec![(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]);
    }

    #[test]
    fn a_star_with_a_flat_heuristic_matches_breadth_first() {
        let g = TestGrid::open(5, 4).block((1, 1)).block((2, 1)).block((3, 2));
        let flat = a_star((0, 0), (4, 3), |n: &Node| g.moves(n), |_: &Node| 0u8).unwrap();
        let bfs = breadth_first((0, 0), (4, 3), |n: &Node| g.moves(n)).unwrap();
        assert_eq!(flat, bfs);
    }

    #[test]
    fn adjacent_goal_gives_two_node_path() {
        let g = TestGrid::open(2, 1);
        for algorithm in SearchAlgorithm::ALL.iter() {
            let path = run(*algorithm, &g, (0, 0), (1, 0)).unwrap();
            assert_eq!(path.len(), 2);
            assert!(is_connected_path(&g, &path.into_start_to_goal(), (0, 0), (1, 0)));
        }
    }

    #[test]
    fn walled_off_goal_is_no_path_found() {
        let g = TestGrid::open(3, 3).block((2, 1)).block((1, 2));
        for algorithm in SearchAlgorithm::ALL.iter() {
            assert_eq!(run(*algorithm, &g, (0, 0), (2, 2)), Err(SearchError::NoPathFound),
                       "{}", algorithm);
        }
    }

    #[test]
    fn start_without_moves_is_no_path_found() {
        let g = TestGrid::open(3, 3).block((1, 0)).block((0, 1));
        for algorithm in SearchAlgorithm::ALL.iter() {
            assert_eq!(run(*algorithm, &g, (0, 0), (2, 2)), Err(SearchError::NoPathFound));
        }
    }

    #[test]
    fn duplicated_and_explored_successors_are_tolerated() {
        let g = TestGrid::open(4, 4);
        let noisy_moves = |n: &Node| {
            let mut moves = g.moves(n);
            let again = moves.clone();
            moves.extend(again);
            moves.push(*n);
            moves.push((0, 0));
            moves
        };
        for algorithm in SearchAlgorithm::ALL.iter() {
            let path = algorithm.search((0, 0), (3, 3), noisy_moves, manhattan((3, 3)))
                                .unwrap()
                                .into_start_to_goal();
            assert!(is_connected_path(&g, &path, (0, 0), (3, 3)), "{}", algorithm);
            assert!(has_no_repeats(&path));
        }
    }

    #[test]
    fn searching_twice_gives_the_same_path() {
        let g = TestGrid::open(6, 5).block((1, 0)).block((1, 1)).block((3, 4)).block((3, 3));
        for algorithm in SearchAlgorithm::ALL.iter() {
            let first = run(*algorithm, &g, (0, 0), (5, 4));
            let second = run(*algorithm, &g, (0, 0), (5, 4));
            assert!(first.is_ok());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn works_over_non_grid_nodes() {
        // a - b - c - d, plus a dead end b - x
        let edges = |n: &&'static str| -> Vec<&'static str> {
            match *n {
                "a" => vec!["b"],
                "b" => vec!["x", "a", "c"],
                "c" => vec!["b", "d"],
                "d" => vec!["c"],
                _ => vec!["b"],
            }
        };
        let path = depth_first_peek("a", "d", edges).unwrap();
        assert_eq!(path.nodes(), &["a", "b", "c", "d"]);
        let path = breadth_first("d", "a", edges).unwrap();
        assert_eq!(path.nodes(), &["a", "b", "c", "d"]);
    }

    #[test]
    fn algorithm_names() {
        let names = SearchAlgorithm::ALL.iter().map(|a| a.to_string()).join(",");
        assert_eq!(names, "depth-first,depth-first-chain,breadth-first,a-star");
    }

    #[test]
    fn no_path_error_displays() {
        assert_eq!(SearchError::NoPathFound.to_string(),
                   "no path found between the start and the goal");
    }

    #[test]
    fn quickcheck_every_variant_agrees_on_reachability_and_paths_connect() {
        fn p(grid: TestGrid) -> bool {
            let begin = (0, 0);
            let end = grid.corner();
            let grid = grid.block_free(begin).block_free(end);
            let expected = grid.shortest_distance(begin, end);

            SearchAlgorithm::ALL.iter().all(|algorithm| {
                match (run(*algorithm, &grid, begin, end), expected) {
                    (Ok(path), Some(_)) => {
                        let nodes = path.into_start_to_goal();
                        is_connected_path(&grid, &nodes, begin, end) && has_no_repeats(&nodes)
                    }
                    (Err(SearchError::NoPathFound), None) => true,
                    _ => false,
                }
            })
        }
        quickcheck(p as fn(TestGrid) -> bool)
    }

    #[test]
    fn quickcheck_breadth_first_is_shortest() {
        fn p(grid: TestGrid) -> bool {
            let begin = (0, 0);
            let end = grid.corner();
            let grid = grid.block_free(begin).block_free(end);
            match (breadth_first(begin, end, |n: &Node| grid.moves(n)), grid.shortest_distance(begin, end)) {
                (Ok(path), Some(distance)) => path.edge_count() == distance,
                (Err(_), None) => true,
                _ => false,
            }
        }
        quickcheck(p as fn(TestGrid) -> bool)
    }

    impl TestGrid {
        fn block_free(mut self, node: Node) -> TestGrid {
            let index = self.index(node);
            self.blocked[index] = false;
            self
        }
    }
}
