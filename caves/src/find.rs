use std::fmt::{Debug, Display};

use log::{debug, trace};
use serde::Serialize;

use crate::cave::Position;
use crate::cost::{distance, heuristic};
use crate::error::{CaveError, Result};
use crate::path;
use crate::trace::{EntrySnapshot, RecordKind, TraceOutcome, TraceRecord, TraceSink};

/// Supertrait that collects all the requirements on the NodeReference values
/// Must be copy, comparable, printable and not references (hence 'static)
pub trait NodeReference: Copy + Eq + Debug + Display + Serialize + 'static {}

pub trait MapTrait {
    /// The type that can be used to reference nodes in the map
    type Reference: NodeReference;

    /// Check if the provided node reference is valid
    fn is_valid(&self, node: Self::Reference) -> bool;

    /// The position of a valid node, edge costs are derived from it
    fn position_of(&self, node: Self::Reference) -> Position;

    /// Return an iterator over the nodes reachable from the provided node by one edge
    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference>;
}

/// A node considered by the search. Entries live in an arena for the whole run and refer to
/// the entry that generated them by index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entry<R> {
    pub node: R,
    pub parent: Option<usize>,
    /// estimated total cost, only used for ranking
    pub score: f64,
}

#[derive(Debug, PartialEq, Clone)]
pub struct PathResult<R> {
    pub path: Vec<R>,
    pub start: R,
    pub goal: R,
    pub total_distance: f64,
    pub iterations: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathFinderState<R> {
    Computing,
    NoPathFound { iterations: usize },
    PathFound(PathResult<R>),
}

impl<R> PathFinderState<R> {
    pub fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }
}

/// Step-wise A* search between two nodes of a map.
///
/// The open and closed lists are plain insertion-ordered lists of arena indices. A node may
/// appear in them several times: a cheaper candidate is appended next to the entries it
/// supersedes and the stale ones are left in place.
#[derive(Debug)]
pub struct PathFinder<R: NodeReference, M: MapTrait<Reference = R>> {
    start: R,
    goal: R,
    entries: Vec<Entry<R>>,
    open: Vec<usize>,
    closed: Vec<usize>,
    iterations: usize,
    state: PathFinderState<R>,
    _map: std::marker::PhantomData<M>,
}

impl<R: NodeReference, M: MapTrait<Reference = R>> PathFinder<R, M> {
    pub fn new(map: &M, start: R, goal: R) -> Result<Self> {
        for node in [start, goal] {
            if !map.is_valid(node) {
                return Err(CaveError::InvalidEndpoint(node.to_string()));
            }
        }

        let score = heuristic(map.position_of(start), map.position_of(goal));

        Ok(Self {
            start,
            goal,
            entries: vec![Entry {
                node: start,
                parent: None,
                score,
            }],
            open: vec![0],
            closed: Vec::new(),
            iterations: 0,
            state: PathFinderState::Computing,
            _map: std::marker::PhantomData,
        })
    }

    /// Run the search to completion
    pub fn finish<T: TraceSink<R>>(mut self, map: &M, sink: &mut T) -> PathFinderState<R> {
        loop {
            match self.step(map, sink) {
                PathFinderState::Computing => {}
                s => return s,
            }
        }
    }

    /// Perform one pass of the search: expand the cheapest open entry
    pub fn step<T: TraceSink<R>>(&mut self, map: &M, sink: &mut T) -> PathFinderState<R> {
        if self.state.is_done() {
            return self.state.clone();
        }

        let Some(current) = self.pop_cheapest() else {
            debug!(
                "no path from {} to {} after {} iterations",
                self.start, self.goal, self.iterations
            );
            sink.finish(TraceOutcome::NoPathFound);
            self.state = PathFinderState::NoPathFound {
                iterations: self.iterations,
            };
            return self.state.clone();
        };
        self.iterations += 1;

        let Entry { node, score, .. } = self.entries[current];
        let goal_position = map.position_of(self.goal);
        let position = map.position_of(node);
        let travelled = path::path_distance(map, &self.entries, current);

        trace!(
            "iteration {}: expanding {} (score {}, travelled {})",
            self.iterations,
            node,
            score,
            travelled
        );

        for child in map.neighbors_of(node) {
            let child_position = map.position_of(child);
            let candidate = Entry {
                node: child,
                parent: Some(current),
                score: travelled
                    + distance(position, child_position)
                    + heuristic(child_position, goal_position),
            };

            // the route ends as soon as the goal is generated, it never enters the open list
            if child == self.goal {
                let index = self.push_entry(candidate);
                self.record(map, sink, index, RecordKind::Goal);
                sink.finish(TraceOutcome::PathFound);

                let result = PathResult {
                    path: path::build_path(&self.entries, index),
                    start: self.start,
                    goal: self.goal,
                    total_distance: path::path_distance(map, &self.entries, index),
                    iterations: self.iterations,
                };
                debug!(
                    "found goal {} after {} iterations: distance={}",
                    self.goal, self.iterations, result.total_distance
                );

                self.state = PathFinderState::PathFound(result);
                return self.state.clone();
            }

            if self.is_dominated(&candidate) {
                continue;
            }

            let index = self.push_entry(candidate);
            self.open.push(index);
        }

        self.record(map, sink, current, RecordKind::Expanded);
        self.closed.push(current);

        self.state.clone()
    }

    /// Remove and return the open entry with the lowest score. Ties go to the entry that was
    /// added first.
    fn pop_cheapest(&mut self) -> Option<usize> {
        let mut cheapest: Option<(usize, f64)> = None;

        for (position, &index) in self.open.iter().enumerate() {
            let score = self.entries[index].score;
            if cheapest.map_or(true, |(_, best)| score < best) {
                cheapest = Some((position, score));
            }
        }

        cheapest.map(|(position, _)| self.open.remove(position))
    }

    /// A candidate is dropped when the first entry for the same node in the open list, or
    /// failing that in the closed list, already has a strictly lower score.
    fn is_dominated(&self, candidate: &Entry<R>) -> bool {
        [&self.open, &self.closed].into_iter().any(|list| {
            list.iter()
                .map(|&index| &self.entries[index])
                .find(|entry| entry.node == candidate.node)
                .is_some_and(|entry| entry.score < candidate.score)
        })
    }

    fn push_entry(&mut self, entry: Entry<R>) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    fn record<T: TraceSink<R>>(&self, map: &M, sink: &mut T, index: usize, kind: RecordKind) {
        if !sink.enabled() {
            return;
        }

        let snapshot = |list: &[usize]| -> Vec<EntrySnapshot<R>> {
            list.iter()
                .map(|&i| EntrySnapshot::from(&self.entries[i]))
                .collect()
        };

        sink.record(&TraceRecord {
            iteration: self.iterations,
            kind,
            current: EntrySnapshot::from(&self.entries[index]),
            path: path::build_path(&self.entries, index),
            distance: path::path_distance(map, &self.entries, index),
            open: snapshot(&self.open[..]),
            closed: snapshot(&self.closed[..]),
        });
    }

    pub fn state(&self) -> &PathFinderState<R> {
        &self.state
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Entries not yet expanded, in insertion order
    pub fn open(&self) -> impl Iterator<Item = &Entry<R>> + '_ {
        self.open.iter().map(|&index| &self.entries[index])
    }

    /// Entries already expanded, in expansion order
    pub fn closed(&self) -> impl Iterator<Item = &Entry<R>> + '_ {
        self.closed.iter().map(|&index| &self.entries[index])
    }

    pub fn start(&self) -> R {
        self.start
    }

    pub fn goal(&self) -> R {
        self.goal
    }
}
