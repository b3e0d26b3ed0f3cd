//! # Core Module
//!
//! Stateless data and algorithms: everything needed to turn structure-file
//! text into atoms, frames, a resolved type map and a bond set, without
//! owning any render resources.
//!
//! ## Architecture
//!
//! - **Element Data** ([`chemistry`]) - Static element → atomic number, color, covalent radius table
//! - **Data Model** ([`models`]) - Atoms, frames, structure models, bonds, type-map rows, color keys
//! - **File I/O** ([`io`]) - Format readers, format detection, point-list writer, type-map tables
//! - **Type Resolution** ([`typemap`]) - Merging detected type ids with file labels and user mappings
//! - **Bond Inference** ([`bonding`]) - Covalent-radius based bond detection
//! - **Geometry** ([`utils::geometry`]) - Centroids, enclosing spheres and instance transforms
//!
//! Parsers and the resolver share nothing mutable between calls; the engine
//! layer copies whatever it needs out of the values produced here.

pub mod bonding;
pub mod chemistry;
pub mod io;
pub mod models;
pub mod typemap;
pub mod utils;
