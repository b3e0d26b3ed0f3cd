use super::error::{ParseError, ParseErrorKind};
use super::format::FileFormat;
use super::traits::{ParseOptions, StructureFile};
use super::util::{guess_element, parse_f64};
use crate::core::chemistry;
use crate::core::models::atom::Atom;
use crate::core::models::frame::{Frame, SourceInfo, StructureModel};
use nalgebra::Point3;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{debug, instrument};

/// Point-list (`.xyz`) reader and writer.
///
/// Each block is an atom count, a free-text comment and `element x y z`
/// lines. Several concatenated blocks are read as an animation.
pub struct XyzFile;

fn next_non_blank<'a>(lines: &mut impl Iterator<Item = (usize, &'a str)>) -> Option<(usize, &'a str)> {
    lines.find(|(_, line)| !line.trim().is_empty())
}

fn parse_atom_count(text: &str, line: usize) -> Result<usize, ParseError> {
    match text.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::at(
            line,
            ParseErrorKind::InvalidAtomCount {
                value: text.trim().to_string(),
            },
        )),
    }
}

fn element_from_token(token: &str) -> String {
    if token.chars().all(|c| c.is_ascii_digit()) {
        if let Some(symbol) = token.parse().ok().and_then(chemistry::symbol_for_number) {
            return symbol.to_string();
        }
    }
    guess_element(token)
        .map(str::to_string)
        .unwrap_or_else(|| token.to_string())
}

fn parse_atom_line(line: &str, line_num: usize, index: usize) -> Result<Atom, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(ParseError::at(
            line_num,
            ParseErrorKind::TooFewFields {
                expected: 4,
                found: tokens.len(),
            },
        ));
    }
    let x = parse_f64(tokens[1], "x", line_num)?;
    let y = parse_f64(tokens[2], "y", line_num)?;
    let z = parse_f64(tokens[3], "z", line_num)?;
    Ok(Atom::new(&element_from_token(tokens[0]), Point3::new(x, y, z)).with_id(index as u64 + 1))
}

impl StructureFile for XyzFile {
    const FORMAT: FileFormat = FileFormat::Xyz;

    #[instrument(skip_all, name = "xyz_parse", fields(filename = filename))]
    fn parse(text: &str, filename: &str, _options: &ParseOptions) -> Result<StructureModel, ParseError> {
        let last_line = text.lines().count().max(1);
        let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));
        let mut frames = Vec::new();
        let mut comment = None;

        while let Some((count_line, count_text)) = next_non_blank(&mut lines) {
            let count = match parse_atom_count(count_text, count_line) {
                Ok(count) => count,
                Err(_) if !frames.is_empty() => {
                    debug!(line = count_line, "Trailing text after the last point-list block ignored.");
                    break;
                }
                Err(e) => return Err(e),
            };
            let block_comment = lines
                .next()
                .map(|(_, l)| l.trim().to_string())
                .unwrap_or_default();
            if frames.is_empty() {
                comment = Some(block_comment);
            }

            let mut atoms = Vec::with_capacity(count);
            while atoms.len() < count {
                let Some((line_num, line)) = next_non_blank(&mut lines) else {
                    return Err(ParseError::at(
                        last_line,
                        ParseErrorKind::TruncatedAtoms {
                            expected: count,
                            found: atoms.len(),
                        },
                    ));
                };
                atoms.push(parse_atom_line(line, line_num, atoms.len())?);
            }
            debug!(frame = frames.len(), atoms = count, "Read point-list block.");
            frames.push(Frame::new(atoms));
        }

        let mut model = StructureModel::from_frames(frames).ok_or(ParseError::Empty("atom count line"))?;
        model.comment = comment.filter(|c| !c.is_empty());
        model.source = Some(SourceInfo {
            filename: filename.to_string(),
            format: Self::FORMAT,
        });
        Ok(model)
    }
}

impl XyzFile {
    /// Writes frames as concatenated point-list blocks.
    pub fn write_to(frames: &[Frame], comment: &str, writer: &mut impl Write) -> io::Result<()> {
        let comment = comment.replace(['\n', '\r'], " ");
        for frame in frames {
            writeln!(writer, "{}", frame.len())?;
            match frame.timestep {
                Some(step) if comment.is_empty() => writeln!(writer, "timestep {}", step)?,
                _ => writeln!(writer, "{}", comment)?,
            }
            for atom in &frame.atoms {
                writeln!(
                    writer,
                    "{:<2} {:>16.8} {:>16.8} {:>16.8}",
                    atom.element, atom.position.x, atom.position.y, atom.position.z
                )?;
            }
        }
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(frames: &[Frame], comment: &str, path: P) -> io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(frames, comment, &mut writer)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<StructureModel, ParseError> {
        XyzFile::parse(text, "test.xyz", &ParseOptions::default())
    }

    #[test]
    fn parses_count_comment_and_atoms() {
        let model = parse("2\ncomment\nC 0 0 0\nO 1.2 0 0\n").unwrap();
        assert_eq!(model.atom_count(), 2);
        assert_eq!(model.frame_count(), 1);
        assert_eq!(model.comment.as_deref(), Some("comment"));
        let atoms = &model.primary().atoms;
        assert_eq!(atoms[0].element, "C");
        assert_eq!(atoms[1].element, "O");
        assert_eq!(atoms[1].position, Point3::new(1.2, 0.0, 0.0));
        assert_eq!(atoms[0].id, Some(1));
        assert_eq!(atoms[1].id, Some(2));
        assert_eq!(
            model.source,
            Some(SourceInfo {
                filename: "test.xyz".into(),
                format: FileFormat::Xyz
            })
        );
    }

    #[test]
    fn leading_blank_lines_and_blank_lines_between_atoms_are_skipped() {
        let model = parse("\n\n2\nwater\n\nO 0 0 0\n\nH 0.96 0 0\n").unwrap();
        assert_eq!(model.atom_count(), 2);
        assert_eq!(model.primary().atoms[1].element, "H");
    }

    #[test]
    fn element_symbols_are_canonicalized_and_atomic_numbers_accepted() {
        let model = parse("3\n\nCL 0 0 0\n6 1 0 0\nXx 2 0 0\n").unwrap();
        let atoms = &model.primary().atoms;
        assert_eq!(atoms[0].element, "Cl");
        assert_eq!(atoms[1].element, "C");
        assert_eq!(atoms[2].element, "Xx");
        assert_eq!(model.comment, None);
    }

    #[test]
    fn concatenated_blocks_become_frames() {
        let text = "2\nstep 0\nC 0 0 0\nO 1 0 0\n2\nstep 1\nC 0.1 0 0\nO 1.1 0 0\n";
        let model = parse(text).unwrap();
        assert_eq!(model.frame_count(), 2);
        assert_eq!(model.comment.as_deref(), Some("step 0"));
        assert_eq!(model.frames()[1].atoms[0].position.x, 0.1);
    }

    #[test]
    fn trailing_text_after_last_block_is_ignored() {
        let model = parse("2\ncomment\nC 0 0 0\nO 1.2 0 0\nextra info line\n").unwrap();
        assert_eq!(model.frame_count(), 1);
        assert_eq!(model.atom_count(), 2);

        let model = parse("1\na\nC 0 0 0\n1\nb\nC 1 0 0\nend of trajectory\n2\n").unwrap();
        assert_eq!(model.frame_count(), 2);
    }

    #[test]
    fn fewer_atom_lines_than_declared_is_fatal() {
        let err = parse("3\ncomment\nC 0 0 0\nO 1 0 0\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Parse {
                kind: ParseErrorKind::TruncatedAtoms {
                    expected: 3,
                    found: 2
                },
                ..
            }
        ));
    }

    #[test]
    fn non_numeric_coordinate_is_fatal_at_its_line() {
        let err = parse("2\ncomment\nC 0 0 0\nO abc 0 0\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Parse {
                line: 4,
                kind: ParseErrorKind::InvalidFloat { field: "x", .. }
            }
        ));
    }

    #[test]
    fn invalid_atom_count_is_fatal() {
        assert!(matches!(
            parse("two\ncomment\nC 0 0 0\n"),
            Err(ParseError::Parse {
                line: 1,
                kind: ParseErrorKind::InvalidAtomCount { .. }
            })
        ));
        assert!(matches!(
            parse("0\ncomment\n"),
            Err(ParseError::Parse {
                kind: ParseErrorKind::InvalidAtomCount { .. },
                ..
            })
        ));
    }

    #[test]
    fn atom_line_with_too_few_fields_is_fatal() {
        assert!(matches!(
            parse("1\ncomment\nC 0 0\n"),
            Err(ParseError::Parse {
                line: 3,
                kind: ParseErrorKind::TooFewFields {
                    expected: 4,
                    found: 3
                }
            })
        ));
    }

    #[test]
    fn empty_input_is_fatal() {
        assert!(matches!(parse("\n  \n"), Err(ParseError::Empty(_))));
    }

    #[test]
    fn written_frames_reparse_to_the_same_positions() {
        let text = "3\nsample\nSi 0.123456 -1.5 2.25\nO 1.6 0.0 -0.333333\nH 10 20 30\n";
        let model = parse(text).unwrap();

        let mut buffer = Vec::new();
        XyzFile::write_to(model.frames(), "sample", &mut buffer).unwrap();
        let reparsed = parse(std::str::from_utf8(&buffer).unwrap()).unwrap();

        assert_eq!(reparsed.comment.as_deref(), Some("sample"));
        for (a, b) in model.primary().iter().zip(reparsed.primary().iter()) {
            assert_eq!(a.element, b.element);
            assert!((a.position - b.position).norm() < 1e-6);
        }
    }

    #[test]
    fn write_to_path_creates_readable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xyz");
        let model = parse("1\nx\nC 1 2 3\n").unwrap();
        XyzFile::write_to_path(model.frames(), "x", &path).unwrap();

        let reread = XyzFile::read_from_path(&path, &ParseOptions::default()).unwrap();
        assert_eq!(reread.primary().atoms[0].position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(reread.source.unwrap().filename, "out.xyz");
    }
}
