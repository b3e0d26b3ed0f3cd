use super::error::ParseError;
use super::format::FileFormat;
use super::traits::{ParseOptions, StructureFile};
use super::util::{parse_f64, slice_and_trim};
use crate::core::chemistry;
use crate::core::models::atom::Atom;
use crate::core::models::frame::{Frame, SourceInfo, StructureModel};
use crate::core::utils::geometry;
use nalgebra::Point3;
use tracing::{debug, instrument};

/// Shortest line that still holds the z coordinate (columns 47-54).
const MIN_RECORD_LENGTH: usize = 54;

/// Fixed-column (`.pdb`) reader.
///
/// Only ATOM/HETATM coordinates and elements are read. `MODEL`/`ENDMDL` (or
/// repeated `END`) blocks become animation frames. All positions are shifted
/// so the mean of every parsed atom sits at the origin.
pub struct PdbFile;

fn element_from_columns(line: &str) -> Option<String> {
    let raw = slice_and_trim(line, 76, 78);
    if raw.is_empty() || raw.len() > 2 || !raw.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(match chemistry::canonical_symbol(raw) {
        Some(symbol) => symbol.to_string(),
        None => {
            let mut chars = raw.chars();
            let first = chars.next().map(|c| c.to_ascii_uppercase());
            first.into_iter().chain(chars.map(|c| c.to_ascii_lowercase())).collect()
        }
    })
}

/// Guesses the element from the atom-name field (columns 13-16).
///
/// Two-letter elements are left-aligned at column 13 by convention, so a
/// two-letter match is only taken when the name starts there.
fn element_from_name(name_field: &str) -> String {
    let letters: String = name_field.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if letters.is_empty() {
        return chemistry::PLACEHOLDER_SYMBOL.to_string();
    }
    let starts_at_column_13 = name_field.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    if starts_at_column_13 && letters.len() >= 2 {
        if let Some(symbol) = chemistry::canonical_symbol(&letters[..2]) {
            return symbol.to_string();
        }
    }
    chemistry::canonical_symbol(&letters[..1])
        .map(str::to_string)
        .unwrap_or_else(|| letters[..1].to_ascii_uppercase())
}

fn parse_record(line: &str, line_num: usize) -> Result<Atom, ParseError> {
    let x = parse_f64(slice_and_trim(line, 30, 38), "x (columns 31-38)", line_num)?;
    let y = parse_f64(slice_and_trim(line, 38, 46), "y (columns 39-46)", line_num)?;
    let z = parse_f64(slice_and_trim(line, 46, 54), "z (columns 47-54)", line_num)?;

    let name_field = line.get(12..16).unwrap_or("");
    let element = element_from_columns(line).unwrap_or_else(|| element_from_name(name_field));

    let atom = Atom::new(&element, Point3::new(x, y, z));
    Ok(match slice_and_trim(line, 6, 11).parse::<u64>() {
        Ok(serial) => atom.with_id(serial),
        Err(_) => atom,
    })
}

impl StructureFile for PdbFile {
    const FORMAT: FileFormat = FileFormat::Pdb;

    #[instrument(skip_all, name = "pdb_parse", fields(filename = filename))]
    fn parse(text: &str, filename: &str, _options: &ParseOptions) -> Result<StructureModel, ParseError> {
        let mut frames: Vec<Vec<Atom>> = Vec::new();
        let mut current: Vec<Atom> = Vec::new();
        let mut comment: Option<String> = None;

        for (index, line) in text.lines().enumerate() {
            let line_num = index + 1;
            match slice_and_trim(line, 0, 6) {
                "ATOM" | "HETATM" => {
                    if line.len() < MIN_RECORD_LENGTH {
                        debug!(line = line_num, "Skipping coordinate record shorter than 54 columns.");
                        continue;
                    }
                    current.push(parse_record(line, line_num)?);
                }
                "MODEL" | "ENDMDL" | "END" => {
                    if !current.is_empty() {
                        frames.push(std::mem::take(&mut current));
                    }
                }
                "TITLE" | "HEADER" if comment.is_none() => {
                    let text = slice_and_trim(line, 10, line.len());
                    if !text.is_empty() {
                        comment = Some(text.to_string());
                    }
                }
                _ => {}
            }
        }
        if !current.is_empty() {
            frames.push(current);
        }

        let center = geometry::centroid(frames.iter().flatten().map(|a| &a.position))
            .ok_or(ParseError::Empty("ATOM/HETATM records"))?;
        let offset = center.coords;
        let frames: Vec<Frame> = frames
            .into_iter()
            .map(|atoms| {
                Frame::new(
                    atoms
                        .into_iter()
                        .map(|mut atom| {
                            atom.position -= offset;
                            atom
                        })
                        .collect(),
                )
            })
            .collect();

        debug!(frames = frames.len(), "Parsed fixed-column records.");
        let mut model = StructureModel::from_frames(frames).ok_or(ParseError::Empty("ATOM/HETATM records"))?;
        model.comment = comment;
        model.source = Some(SourceInfo {
            filename: filename.to_string(),
            format: Self::FORMAT,
        });
        Ok(model)
    }
}
