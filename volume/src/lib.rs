//! Axon Volume: the voxel data carrier for the Axon tracing engine.
//!
//! # API Surface
//!
//! - [`Volume`] -- a 3D image stack at one of three bit depths, with its
//!   whole-volume sample range and physical calibration
//! - [`SampleBuffer`] -- the raw 8/16/32-bit voxel samples
//! - [`Calibration`] -- per-axis physical spacing plus a spacing-unit label
//!
//! # Module Dependency Direction
//!
//! `calibration` ← `sample` ← `volume`
//!
//! One-way only. This crate depends on nothing internal or external; the
//! search engine reads from it, never through it.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod calibration;
pub mod error;
pub mod sample;
pub mod volume;

pub use calibration::Calibration;
pub use error::VolumeError;
pub use sample::SampleBuffer;
pub use volume::Volume;
