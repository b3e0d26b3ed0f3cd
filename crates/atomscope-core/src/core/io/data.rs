use super::error::{ParseError, ParseErrorKind};
use super::format::FileFormat;
use super::traits::{ParseOptions, StructureFile};
use super::util::{guess_element, is_non_integer_float, parse_f64, parse_type_id, parse_u64, strip_comment};
use crate::core::chemistry;
use crate::core::models::atom::Atom;
use crate::core::models::frame::{Frame, SourceInfo, StructureModel};
use nalgebra::Point3;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

/// LAMMPS data file reader (single snapshot).
///
/// Reads the optional `Atom Type Labels` section and the mandatory `Atoms`
/// section; everything else (masses, coefficients, velocities, topology) is
/// skipped.
pub struct LammpsDataFile;

/// Column layout of one `Atoms` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AtomStyle {
    /// `id type x y z`
    Atomic,
    /// `id mol type x y z` (also `bond` and `angle`)
    Molecular,
    /// `id type q x y z`
    Charge,
    /// `id mol type q x y z`
    Full,
}

impl AtomStyle {
    fn from_hint(comment: &str) -> Option<Self> {
        match comment.split_whitespace().next()?.to_ascii_lowercase().as_str() {
            "atomic" => Some(Self::Atomic),
            "molecular" | "bond" | "angle" => Some(Self::Molecular),
            "charge" => Some(Self::Charge),
            "full" => Some(Self::Full),
            _ => None,
        }
    }

    fn type_index(self) -> usize {
        match self {
            Self::Atomic | Self::Charge => 1,
            Self::Molecular | Self::Full => 2,
        }
    }

    fn coordinate_start(self) -> usize {
        match self {
            Self::Atomic => 2,
            Self::Molecular | Self::Charge => 3,
            Self::Full => 4,
        }
    }
}

/// Resolves `(type index, first coordinate index)` for one tokenized line.
///
/// A style hint fixes the layout; without one the token count decides, and
/// the coordinates are always the last three tokens.
fn layout(tokens: &[&str], hint: Option<AtomStyle>, line_num: usize) -> Result<(usize, usize), ParseError> {
    if let Some(style) = hint {
        let needed = style.coordinate_start() + 3;
        if tokens.len() < needed {
            return Err(ParseError::at(
                line_num,
                ParseErrorKind::TooFewFields {
                    expected: needed,
                    found: tokens.len(),
                },
            ));
        }
        return Ok((style.type_index(), style.coordinate_start()));
    }

    let type_index = match tokens.len() {
        n if n < 5 => {
            return Err(ParseError::at(
                line_num,
                ParseErrorKind::TooFewFields { expected: 5, found: n },
            ));
        }
        5 => AtomStyle::Atomic.type_index(),
        6 if is_non_integer_float(tokens[2]) => AtomStyle::Charge.type_index(),
        6 => AtomStyle::Molecular.type_index(),
        _ => AtomStyle::Full.type_index(),
    };
    Ok((type_index, tokens.len() - 3))
}

fn is_section_header(content: &str) -> bool {
    content.trim().chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// Collects the body lines of the section whose header is at `header`.
///
/// Leading blank lines are skipped; the body ends at the next blank line or
/// section header. Returns the `(line number, content)` pairs and the index
/// where scanning should resume.
fn section_body<'a>(lines: &[&'a str], header: usize) -> (Vec<(usize, &'a str)>, usize) {
    let mut body = Vec::new();
    let mut index = header + 1;
    while index < lines.len() {
        let raw = lines[index];
        let (content, _) = strip_comment(raw);
        if raw.trim().is_empty() {
            if !body.is_empty() {
                break;
            }
        } else if is_section_header(content) {
            break;
        } else if !content.trim().is_empty() {
            body.push((index + 1, content.trim()));
        }
        index += 1;
    }
    (body, index)
}

fn parse_type_labels(body: &[(usize, &str)], labels: &mut BTreeMap<u32, String>) -> Result<(), ParseError> {
    for &(line_num, content) in body {
        let mut tokens = content.split_whitespace();
        let (Some(id), Some(label)) = (tokens.next(), tokens.next()) else {
            return Err(ParseError::at(
                line_num,
                ParseErrorKind::TooFewFields { expected: 2, found: 1 },
            ));
        };
        let type_id = parse_type_id(id, line_num)?;
        match guess_element(label) {
            Some(symbol) => {
                labels.entry(type_id).or_insert_with(|| symbol.to_string());
            }
            None => debug!(type_id, label, "Type label is not an element symbol; leaving it unresolved."),
        }
    }
    Ok(())
}

/// Checks a header line for a non-zero `xy xz yz` tilt triple.
fn check_tilt(content: &str, line_num: usize) -> Result<(), ParseError> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    if tokens.len() == 6 && tokens[3..] == ["xy", "xz", "yz"] {
        for token in &tokens[..3] {
            if parse_f64(token, "tilt factor", line_num)? != 0.0 {
                return Err(ParseError::UnsupportedCell {
                    line: line_num,
                    reason: "non-zero tilt factors (triclinic box) are not supported".to_string(),
                });
            }
        }
    }
    Ok(())
}

fn element_for(type_id: u32, labels: &BTreeMap<u32, String>, options: &ParseOptions) -> String {
    options
        .override_for(type_id)
        .or_else(|| labels.get(&type_id).map(String::as_str))
        .unwrap_or(chemistry::PLACEHOLDER_SYMBOL)
        .to_string()
}

impl StructureFile for LammpsDataFile {
    const FORMAT: FileFormat = FileFormat::LammpsData;

    #[instrument(skip_all, name = "data_parse", fields(filename = filename))]
    fn parse(text: &str, filename: &str, options: &ParseOptions) -> Result<StructureModel, ParseError> {
        let lines: Vec<&str> = text.lines().collect();
        let comment = lines.first().map(|l| l.trim().to_string()).filter(|l| !l.is_empty());

        let mut declared_atoms: Option<u64> = None;
        let mut labels = BTreeMap::new();
        let mut atoms_section: Option<(Vec<(usize, &str)>, Option<AtomStyle>)> = None;

        let mut index = 1;
        while index < lines.len() {
            let line_num = index + 1;
            let (content, hint) = strip_comment(lines[index]);
            let content = content.trim();
            match content {
                "Atom Type Labels" => {
                    let (body, next) = section_body(&lines, index);
                    parse_type_labels(&body, &mut labels)?;
                    index = next;
                    continue;
                }
                "Atoms" => {
                    let (body, next) = section_body(&lines, index);
                    let style = hint.and_then(AtomStyle::from_hint);
                    debug!(line = line_num, style = ?style, "Found Atoms section.");
                    atoms_section = Some((body, style));
                    index = next;
                    continue;
                }
                _ => {}
            }
            if atoms_section.is_none() {
                let tokens: Vec<&str> = content.split_whitespace().collect();
                if let [count, "atoms"] = tokens.as_slice() {
                    declared_atoms = Some(parse_u64(count, "atom count", line_num)?);
                }
                check_tilt(content, line_num)?;
            }
            index += 1;
        }

        let (body, style) = atoms_section.ok_or_else(|| ParseError::MissingSection("Atoms".to_string()))?;
        let mut atoms = Vec::with_capacity(body.len());
        for (line_num, content) in body {
            let tokens: Vec<&str> = content.split_whitespace().collect();
            let (type_index, coordinate_start) = layout(&tokens, style, line_num)?;
            let id = parse_u64(tokens[0], "atom id", line_num)?;
            let type_id = parse_type_id(tokens[type_index], line_num)?;
            let x = parse_f64(tokens[coordinate_start], "x", line_num)?;
            let y = parse_f64(tokens[coordinate_start + 1], "y", line_num)?;
            let z = parse_f64(tokens[coordinate_start + 2], "z", line_num)?;
            atoms.push(
                Atom::new(&element_for(type_id, &labels, options), Point3::new(x, y, z))
                    .with_id(id)
                    .with_type_id(type_id),
            );
        }
        if atoms.is_empty() {
            return Err(ParseError::Empty("atom lines in the Atoms section"));
        }
        if let Some(declared) = declared_atoms {
            if declared != atoms.len() as u64 {
                warn!(declared, found = atoms.len(), "Declared atom count does not match the Atoms section.");
            }
        }
        if options.sort_by_id {
            atoms.sort_by_key(|a| a.id);
        }

        let mut model = StructureModel::new(Frame::new(atoms));
        model.comment = comment;
        model.element_defaults = labels;
        model.source = Some(SourceInfo {
            filename: filename.to_string(),
            format: Self::FORMAT,
        });
        Ok(model)
    }
}
