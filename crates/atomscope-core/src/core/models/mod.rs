//! # Core Models Module
//!
//! Plain data types shared by the parsers, the type-map resolver, the bond
//! inference engine and the runtime.
//!
//! ## Key Components
//!
//! - [`atom`] - A single typed point with optional stable identity and type id
//! - [`frame`] - One snapshot of atoms, and the [`frame::StructureModel`] a parser produces
//! - [`topology`] - Geometric bonds derived per frame
//! - [`type_map`] - Rows of the type id → element table
//! - [`color`] - Color keys and the editable color map
//! - [`ids`] - Arena keys for runtime-owned draw batches
//!
//! A [`frame::StructureModel`] is created once by a parser and then handed to
//! the runtime, which copies the frames it needs. Nothing in this module
//! performs I/O.

pub mod atom;
pub mod color;
pub mod frame;
pub mod ids;
pub mod topology;
pub mod type_map;
