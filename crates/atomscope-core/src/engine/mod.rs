//! # Engine Module
//!
//! The stateful layer: owns the render-facing representation of a loaded
//! model and keeps it in sync with frame changes and visual edits.
//!
//! ## Overview
//!
//! A [`runtime::ModelRuntime`] takes the frames produced by the core parsers
//! and builds one instanced batch per color key for atoms and for bond
//! halves. Animation only rewrites instance transforms; anything that can
//! change the set of color keys (a type-map edit, a radius or bond-factor
//! change) destroys and rebuilds every batch. Positions are drift-locked to
//! the first frame's mean so a wandering trajectory stays centered.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Viewer settings and their builder
//! - **Instance Storage** ([`backend`]) - The buffer API a render host implements, plus an in-memory one
//! - **Draw Batches** ([`batch`]) - Atom and bond batches keyed by color key
//! - **Runtime** ([`runtime`]) - The empty/loaded state machine and its commands
//! - **Playback** ([`playback`]) - Tick-to-frame conversion
//! - **Progress Monitoring** ([`progress`]) - Phase callbacks for long operations
//! - **Error Handling** ([`error`]) - Runtime failures
//!
//! Everything runs on the caller's thread; there is no background work.

pub mod backend;
pub mod batch;
pub mod config;
pub mod error;
pub mod playback;
pub mod progress;
pub mod runtime;
