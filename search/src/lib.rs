//! Axon Search: bidirectional best-first search over voxel lattices.
//!
//! This crate is the tracing core: a single concrete engine specialized two
//! ways. It depends only on `axon-volume` -- it does NOT depend on
//! `axon-tracer`.
//!
//! # Crate dependency graph
//!
//! ```text
//! axon-volume  ←  axon-search  ←  axon-tracer
//! (voxel carrier)  (engine, trace, fill)  (runner, transcripts, artifact IO)
//! ```
//!
//! # Key types
//!
//! - [`engine::SearchEngine`] -- the bidirectional best-first core
//! - [`trace::TraceSearch`] -- point-to-point tracing: A* with an admissible
//!   Euclidean heuristic and two frontiers that meet in the middle
//! - [`fill::FillSearch`] -- threshold fill: multi-source Dijkstra from seed
//!   paths, with a serializable [`fill::Fill`] result
//! - [`cost::CostModel`] -- raw sample → per-step traversal cost
//! - [`control::Control`] -- the pause/resume/stop protocol shared with the
//!   worker thread

#![forbid(unsafe_code)]

pub mod control;
pub mod cost;
pub mod engine;
pub mod error;
pub mod fill;
pub mod frontier;
pub mod grid;
pub mod node;
pub mod path;
pub mod trace;
