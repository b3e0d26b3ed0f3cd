use super::error::{ParseError, ParseErrorKind};
use super::format::FileFormat;
use super::traits::{ParseOptions, StructureFile};
use super::util::{guess_element, parse_f64, parse_type_id, parse_u64, parse_usize};
use crate::core::chemistry;
use crate::core::models::atom::Atom;
use crate::core::models::frame::{Frame, SourceInfo, StructureModel};
use nalgebra::Point3;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

/// Coordinate triples in order of preference. Absolute columns win over
/// box-scaled ones when a header carries both.
const COORDINATE_TRIPLES: [([&str; 3], bool); 4] = [
    (["x", "y", "z"], false),
    (["xu", "yu", "zu"], false),
    (["xs", "ys", "zs"], true),
    (["xsu", "ysu", "zsu"], true),
];

const TILT_FACTORS: [&str; 3] = ["xy", "xz", "yz"];

/// LAMMPS trajectory dump (`ITEM:`-sectioned) reader.
///
/// Every `ITEM: TIMESTEP` block is one frame. Only orthogonal boxes are
/// accepted; a tilted cell is reported as [`ParseError::UnsupportedCell`].
pub struct LammpsDumpFile;

/// Column positions resolved from an `ITEM: ATOMS` header.
#[derive(Debug, Clone, Copy)]
struct AtomColumns {
    id: Option<usize>,
    type_id: usize,
    element: Option<usize>,
    coords: [usize; 3],
    scaled: bool,
    width: usize,
}

impl AtomColumns {
    fn from_header(names: &[&str], line_num: usize) -> Result<Self, ParseError> {
        let position = |name: &str| names.iter().position(|n| *n == name);
        let type_id = position("type").ok_or(ParseError::at(line_num, ParseErrorKind::MissingColumn("type")))?;
        let (coords, scaled) = COORDINATE_TRIPLES
            .iter()
            .find_map(|(triple, scaled)| {
                Some(([position(triple[0])?, position(triple[1])?, position(triple[2])?], *scaled))
            })
            .ok_or(ParseError::at(line_num, ParseErrorKind::MissingCoordinates))?;
        Ok(Self {
            id: position("id"),
            type_id,
            element: position("element"),
            coords,
            scaled,
            width: names.len(),
        })
    }
}

/// Returns the text after `ITEM:` if `line` is a section header.
fn item_name(line: &str) -> Option<&str> {
    line.trim().strip_prefix("ITEM:").map(str::trim)
}

/// Finds the next `ITEM: <name>` header at or after `from`.
///
/// The search stops at the next `ITEM: TIMESTEP` so that a missing section is
/// never satisfied by the following frame.
fn find_item(lines: &[&str], from: usize, name: &str) -> Option<usize> {
    for (index, line) in lines.iter().enumerate().skip(from) {
        if let Some(item) = item_name(line) {
            if item.starts_with(name) {
                return Some(index);
            }
            if item.starts_with("TIMESTEP") {
                return None;
            }
        }
    }
    None
}

fn require_item(lines: &[&str], from: usize, name: &'static str) -> Result<usize, ParseError> {
    find_item(lines, from, name).ok_or_else(|| {
        ParseError::MissingSection(format!("ITEM: {} after line {}", name, from))
    })
}

fn value_line<'a>(lines: &[&'a str], header: usize) -> Result<&'a str, ParseError> {
    lines
        .get(header + 1)
        .copied()
        .filter(|l| item_name(l).is_none())
        .ok_or_else(|| ParseError::MissingSection(format!("value after line {}", header + 1)))
}

fn parse_box_bounds(lines: &[&str], header: usize) -> Result<[(f64, f64); 3], ParseError> {
    let header_line = lines[header];
    if header_line.split_whitespace().any(|t| TILT_FACTORS.contains(&t)) {
        return Err(ParseError::UnsupportedCell {
            line: header + 1,
            reason: "triclinic box (tilt factors xy xz yz) is not supported".to_string(),
        });
    }

    let mut bounds = [(0.0, 0.0); 3];
    for (axis, bound) in bounds.iter_mut().enumerate() {
        let index = header + 1 + axis;
        let line_num = index + 1;
        let line = lines
            .get(index)
            .filter(|l| item_name(l).is_none())
            .ok_or(ParseError::at(line_num, ParseErrorKind::InvalidBoxBounds))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.len() {
            2 => {
                *bound = (
                    parse_f64(tokens[0], "box lower bound", line_num)?,
                    parse_f64(tokens[1], "box upper bound", line_num)?,
                );
            }
            n if n > 2 => {
                return Err(ParseError::UnsupportedCell {
                    line: line_num,
                    reason: "box bounds carry a tilt factor; only orthogonal boxes are supported".to_string(),
                });
            }
            _ => return Err(ParseError::at(line_num, ParseErrorKind::InvalidBoxBounds)),
        }
    }
    Ok(bounds)
}

fn element_for(
    tokens: &[&str],
    columns: &AtomColumns,
    type_id: u32,
    options: &ParseOptions,
) -> String {
    if let Some(symbol) = options.override_for(type_id) {
        return symbol.to_string();
    }
    columns
        .element
        .and_then(|c| guess_element(tokens[c]))
        .unwrap_or(chemistry::PLACEHOLDER_SYMBOL)
        .to_string()
}

/// Parses the frame whose `ITEM: TIMESTEP` header is at `start`.
///
/// Returns the frame and the index of the first line after it.
fn parse_frame(
    lines: &[&str],
    start: usize,
    options: &ParseOptions,
    element_defaults: &mut BTreeMap<u32, String>,
) -> Result<(Frame, usize), ParseError> {
    let timestep = parse_u64(value_line(lines, start)?, "timestep", start + 2)?;

    let count_header = require_item(lines, start + 1, "NUMBER OF ATOMS")?;
    let count = parse_usize(value_line(lines, count_header)?, "number of atoms", count_header + 2)?;

    let box_header = require_item(lines, count_header + 1, "BOX BOUNDS")?;
    let bounds = parse_box_bounds(lines, box_header)?;

    let atoms_header = require_item(lines, box_header + 1, "ATOMS")?;
    let names: Vec<&str> = item_name(lines[atoms_header])
        .unwrap_or("")
        .split_whitespace()
        .skip(1)
        .collect();
    let columns = AtomColumns::from_header(&names, atoms_header + 1)?;

    let mut atoms = Vec::with_capacity(count);
    let mut index = atoms_header + 1;
    while atoms.len() < count {
        let Some(line) = lines.get(index) else {
            return Err(ParseError::at(
                lines.len(),
                ParseErrorKind::TruncatedAtoms {
                    expected: count,
                    found: atoms.len(),
                },
            ));
        };
        let line_num = index + 1;
        index += 1;
        if line.trim().is_empty() {
            continue;
        }
        if item_name(line).is_some() {
            return Err(ParseError::at(
                line_num,
                ParseErrorKind::UnexpectedItem {
                    expected: count,
                    found: atoms.len(),
                },
            ));
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < columns.width {
            return Err(ParseError::at(
                line_num,
                ParseErrorKind::TooFewFields {
                    expected: columns.width,
                    found: tokens.len(),
                },
            ));
        }

        let type_id = parse_type_id(tokens[columns.type_id], line_num)?;
        let mut xyz = [0.0; 3];
        for (axis, field) in ["x", "y", "z"].into_iter().enumerate() {
            let value = parse_f64(tokens[columns.coords[axis]], field, line_num)?;
            let (lo, hi) = bounds[axis];
            xyz[axis] = if columns.scaled { lo + value * (hi - lo) } else { value };
        }

        if let Some(symbol) = columns.element.and_then(|c| guess_element(tokens[c])) {
            element_defaults.entry(type_id).or_insert_with(|| symbol.to_string());
        }
        let element = element_for(&tokens, &columns, type_id, options);
        let mut atom = Atom::new(&element, Point3::new(xyz[0], xyz[1], xyz[2])).with_type_id(type_id);
        if let Some(c) = columns.id {
            atom = atom.with_id(parse_u64(tokens[c], "id", line_num)?);
        }
        atoms.push(atom);
    }

    if options.sort_by_id && columns.id.is_some() {
        atoms.sort_by_key(|a| a.id);
    }
    Ok((Frame::new(atoms).with_timestep(timestep), index))
}

impl StructureFile for LammpsDumpFile {
    const FORMAT: FileFormat = FileFormat::LammpsDump;

    #[instrument(skip_all, name = "dump_parse", fields(filename = filename))]
    fn parse(text: &str, filename: &str, options: &ParseOptions) -> Result<StructureModel, ParseError> {
        let lines: Vec<&str> = text.lines().collect();
        let mut frames = Vec::new();
        let mut element_defaults = BTreeMap::new();
        let mut cursor = 0;

        while let Some(start) = find_timestep(&lines, cursor) {
            match parse_frame(&lines, start, options, &mut element_defaults) {
                Ok((frame, next)) => {
                    debug!(timestep = ?frame.timestep, atoms = frame.len(), "Read dump frame.");
                    frames.push(frame);
                    cursor = next;
                }
                Err(e) if e.is_truncation() && !frames.is_empty() => {
                    warn!(
                        complete_frames = frames.len(),
                        error = %e,
                        "Dropping truncated final frame."
                    );
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        let mut model = StructureModel::from_frames(frames).ok_or(ParseError::Empty("ITEM: TIMESTEP frames"))?;
        model.element_defaults = element_defaults;
        model.source = Some(SourceInfo {
            filename: filename.to_string(),
            format: Self::FORMAT,
        });
        Ok(model)
    }
}

fn find_timestep(lines: &[&str], from: usize) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, l)| item_name(l).is_some_and(|item| item.starts_with("TIMESTEP")))
        .map(|(i, _)| i)
}
