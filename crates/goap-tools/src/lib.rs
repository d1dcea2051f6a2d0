//! Decision tracing for GOAP agents.
//!
//! Engine-agnostic and lightweight: events are plain data that tooling can record and render
//! after the fact.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{TraceEvent, TraceLog, TraceSink, Tracer};
