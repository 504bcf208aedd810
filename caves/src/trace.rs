//! Observability of a search run.
//!
//! A [`TraceSink`] receives one [`TraceRecord`] per pass of the search, taken after the
//! successors of the current entry were generated and before it joins the closed list.
//! When the goal is found one more record for the goal entry follows. The run ends with
//! [`TraceSink::finish`].

use std::io::{self, Write};

use log::{debug, log_enabled, Level};
use serde::Serialize;

use crate::cave::{Cave, CavernId, Position};
use crate::find::{Entry, NodeReference};
use crate::path::route_string;

/// An entry as it appears in a trace, serialized with the short keys the viewer expects
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EntrySnapshot<R> {
    #[serde(rename = "c")]
    pub score: f64,
    #[serde(rename = "i")]
    pub node: R,
}

impl<R: Copy> From<&Entry<R>> for EntrySnapshot<R> {
    fn from(entry: &Entry<R>) -> Self {
        Self {
            score: entry.score,
            node: entry.node,
        }
    }
}

impl<R: NodeReference> std::fmt::Display for EntrySnapshot<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cavern {}(heur. cost: {})", self.node, self.score)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    /// the entry was expanded during this pass
    Expanded,
    /// the entry reached the goal
    Goal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TraceRecord<R> {
    pub iteration: usize,
    pub kind: RecordKind,
    pub current: EntrySnapshot<R>,
    /// route from the start to `current`
    pub path: Vec<R>,
    /// true distance travelled to reach `current`
    pub distance: f64,
    pub open: Vec<EntrySnapshot<R>>,
    pub closed: Vec<EntrySnapshot<R>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceOutcome {
    PathFound,
    NoPathFound,
}

pub trait TraceSink<R: NodeReference> {
    /// Records are only assembled for sinks that want them
    fn enabled(&self) -> bool {
        true
    }

    fn record(&mut self, record: &TraceRecord<R>);

    fn finish(&mut self, _outcome: TraceOutcome) {}
}

/// Discards everything
impl<R: NodeReference> TraceSink<R> for () {
    fn enabled(&self) -> bool {
        false
    }

    fn record(&mut self, _record: &TraceRecord<R>) {}
}

impl<R: NodeReference, T: TraceSink<R>> TraceSink<R> for Option<T> {
    fn enabled(&self) -> bool {
        self.as_ref().is_some_and(|sink| sink.enabled())
    }

    fn record(&mut self, record: &TraceRecord<R>) {
        if let Some(sink) = self {
            sink.record(record);
        }
    }

    fn finish(&mut self, outcome: TraceOutcome) {
        if let Some(sink) = self {
            sink.finish(outcome);
        }
    }
}

impl<R: NodeReference, A: TraceSink<R>, B: TraceSink<R>> TraceSink<R> for (A, B) {
    fn enabled(&self) -> bool {
        self.0.enabled() || self.1.enabled()
    }

    fn record(&mut self, record: &TraceRecord<R>) {
        if self.0.enabled() {
            self.0.record(record);
        }
        if self.1.enabled() {
            self.1.record(record);
        }
    }

    fn finish(&mut self, outcome: TraceOutcome) {
        self.0.finish(outcome);
        self.1.finish(outcome);
    }
}

/// Append-only replay log of a search run
#[derive(Debug)]
pub struct Trace<R> {
    records: Vec<TraceRecord<R>>,
    outcome: Option<TraceOutcome>,
}

impl<R> Default for Trace<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            outcome: None,
        }
    }
}

impl<R> Trace<R> {
    pub fn records(&self) -> &[TraceRecord<R>] {
        &self.records
    }

    /// `None` while the search is still running
    pub fn outcome(&self) -> Option<TraceOutcome> {
        self.outcome
    }
}

impl<R: NodeReference> TraceSink<R> for Trace<R> {
    fn record(&mut self, record: &TraceRecord<R>) {
        self.records.push(record.clone());
    }

    fn finish(&mut self, outcome: TraceOutcome) {
        self.outcome = Some(outcome);
    }
}

/// Dumps every pass of the search at debug level
#[derive(Debug, Default)]
pub struct LogSink;

fn join<R: NodeReference>(list: &[EntrySnapshot<R>]) -> String {
    list.iter()
        .map(|entry| entry.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl<R: NodeReference> TraceSink<R> for LogSink {
    fn enabled(&self) -> bool {
        log_enabled!(Level::Debug)
    }

    fn record(&mut self, record: &TraceRecord<R>) {
        if record.kind == RecordKind::Expanded {
            debug!("Considering: {}", record.current);
            debug!("Current distance on the path: {}", record.distance);
        }
        debug!("Iteration: {}", record.iteration);
        debug!("Open list: [{}]", join(&record.open));
        debug!("Closed list: [{}]", join(&record.closed));
    }

    fn finish(&mut self, outcome: TraceOutcome) {
        debug!("search finished: {:?}", outcome);
    }
}

#[derive(Serialize)]
struct VisualCavern {
    i: CavernId,
    x: i32,
    y: i32,
}

#[derive(Serialize)]
struct VisualEdge {
    f: CavernId,
    t: CavernId,
}

#[derive(Serialize)]
struct VisualCave {
    nodes: Vec<VisualCavern>,
    edges: Vec<VisualEdge>,
}

/// Write the replay script for the cave viewer: one `setCave` call describing the cave,
/// one `addState` call per trace record and a closing `init()`.
pub fn write_instructions<W: Write>(
    mut writer: W,
    cave: &Cave,
    trace: &Trace<CavernId>,
) -> io::Result<()> {
    let visual = VisualCave {
        nodes: cave
            .caverns()
            .iter()
            .map(|c| {
                let Position { x, y } = c.position;
                VisualCavern { i: c.id, x, y }
            })
            .collect(),
        edges: cave
            .edges()
            .map(|(f, t)| VisualEdge { f, t })
            .collect(),
    };

    write!(writer, "setCave({})", serde_json::to_string(&visual)?)?;

    for record in trace.records() {
        write!(
            writer,
            "\naddState({}, \"{}\", {}, {})",
            serde_json::to_string(&record.current)?,
            route_string(&record.path),
            serde_json::to_string(&record.open)?,
            serde_json::to_string(&record.closed)?,
        )?;
    }

    write!(writer, "\ninit()")?;
    writer.flush()
}
