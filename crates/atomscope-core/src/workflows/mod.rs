//! # Workflows Module
//!
//! High-level entry points that drive a complete load-and-display cycle.
//!
//! ## Overview
//!
//! A [`session::Session`] owns the configuration, the render runtime and the
//! playback clock. Loading a file runs three reported phases (parsing, type
//! resolution and batch building). A failed load is recorded in the session's
//! parse summary while the previously displayed model stays intact.
//!
//! Type-map edits confirmed through the session are remembered and seed the
//! mapping of the next typed file that is loaded.

pub mod session;
