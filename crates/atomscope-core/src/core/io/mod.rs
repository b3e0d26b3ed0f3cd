//! # Structure File I/O
//!
//! Readers for the supported atomic-structure formats, a point-list writer
//! and type-map table persistence.
//!
//! ## Overview
//!
//! Every reader implements [`traits::StructureFile`] and turns the full text
//! of one file into a [`StructureModel`](crate::core::models::frame::StructureModel)
//! or a [`error::ParseError`] naming the construct that violated the format.
//! Readers are stateless; a failed parse never leaves partial results behind.
//!
//! ## Key Components
//!
//! - [`xyz`] - Point-list text, multi-block animations, and the writer
//! - [`pdb`] - Fixed-column ATOM/HETATM records
//! - [`dump`] - LAMMPS trajectory dumps (orthogonal boxes only)
//! - [`data`] - LAMMPS data snapshots with type labels
//! - [`format`] - Format names and detection
//! - [`type_map`] - CSV/TOML type id → element tables
//!
//! [`parse_structure`] detects the format and dispatches to the right reader.

pub mod data;
pub mod dump;
pub mod error;
pub mod format;
pub mod pdb;
pub mod traits;
pub mod type_map;
pub mod xyz;

mod util;

use crate::core::models::frame::StructureModel;
use error::ParseError;
use format::FileFormat;
use traits::{ParseOptions, StructureFile};

/// Parses `text` with the reader for its format.
///
/// The format comes from `options.format` when set, otherwise from the file
/// name and finally from the content.
pub fn parse_structure(text: &str, filename: &str, options: &ParseOptions) -> Result<StructureModel, ParseError> {
    match FileFormat::detect(filename, text, options.format)? {
        FileFormat::Xyz => xyz::XyzFile::parse(text, filename, options),
        FileFormat::Pdb => pdb::PdbFile::parse(text, filename, options),
        FileFormat::LammpsDump => dump::LammpsDumpFile::parse(text, filename, options),
        FileFormat::LammpsData => data::LammpsDataFile::parse(text, filename, options),
    }
}
