//! # atomscope
//!
//! Loading, bonding and instanced rendering state for atomistic structures and
//! molecular-dynamics trajectories.
//!
//! ## Layers
//!
//! - **[`core`]: Data and parsing.** Element tables, the frame/atom model,
//!   parsers for XYZ, PDB, LAMMPS dump and LAMMPS data files, the type-id to
//!   element mapping, and distance-based bond inference. Everything here is
//!   stateless.
//!
//! - **[`engine`]: Render state.** [`engine::runtime::ModelRuntime`] turns frames into
//!   per-color instanced batches on an [`engine::backend::InstanceBackend`], keeps
//!   the model centered while a trajectory plays, and rebuilds only when the
//!   type map or style changes. Configuration and the playback clock live here
//!   as well.
//!
//! - **[`workflows`]: The public entry point.** [`workflows::session::Session`]
//!   ties parsing, type resolution and the runtime together behind a small
//!   load / edit / play API.

pub mod core;
pub mod engine;
pub mod workflows;
