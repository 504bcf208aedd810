//! Route finding through caves: directed graphs of caverns placed on a 2D plane.
//!
//! A [`Cave`] is built once, from a `.cav` description ([`util::parse_cav`]), from explicit
//! edges, or by the random [`generate`] module. A [`PathFinder`] then runs a weighted A*
//! search between two of its caverns, either step by step or to completion. Every pass can
//! be observed through a [`TraceSink`].

pub mod cave;
pub mod cost;
pub mod error;
pub mod find;
pub mod generate;
pub mod path;
pub mod trace;
pub mod util;

pub use cave::{Cave, Cavern, CavernId, Position};
pub use error::{CaveError, Result};
pub use find::{Entry, MapTrait, NodeReference, PathFinder, PathFinderState, PathResult};
pub use trace::{LogSink, Trace, TraceOutcome, TraceRecord, TraceSink};
