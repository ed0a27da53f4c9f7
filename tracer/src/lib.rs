//! Axon Tracer: run orchestration and artifacts around `axon-search`.
//!
//! The search crate owns the algorithms; this crate owns everything around
//! a run: spawning the worker thread and exposing its control surface
//! ([`runner`]), recording listener events into a serializable transcript
//! ([`transcript`]), persisting and reloading fill artifacts with a content
//! digest ([`fill_io`]), and building the synthetic volumes the tests and
//! benchmarks trace through ([`volumes`]).

#![forbid(unsafe_code)]

pub mod fill_io;
pub mod runner;
pub mod transcript;
pub mod volumes;
