use super::error::ParseError;
use super::format::FileFormat;
use crate::core::models::frame::StructureModel;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Caller-supplied knobs shared by all parsers.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Skips format detection when set.
    pub format: Option<FileFormat>,
    /// Type id → element assignments supplied by the user. Placeholder values
    /// are ignored so they never mask a label declared by the file.
    pub type_overrides: BTreeMap<u32, String>,
    /// Stable-sorts each frame by particle id so frame slots line up.
    pub sort_by_id: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            format: None,
            type_overrides: BTreeMap::new(),
            sort_by_id: true,
        }
    }
}

impl ParseOptions {
    /// The override for `type_id`, if the user supplied a real element.
    pub fn override_for(&self, type_id: u32) -> Option<&str> {
        self.type_overrides
            .get(&type_id)
            .map(|s| s.trim())
            .filter(|s| !crate::core::chemistry::is_placeholder(s))
    }
}

/// Defines the interface for reading one structure file format.
///
/// Parsers are stateless: they take the whole text, never touch caller state,
/// and either return a complete [`StructureModel`] or a [`ParseError`].
pub trait StructureFile {
    /// The format this parser handles.
    const FORMAT: FileFormat;

    /// Parses a structure from text.
    ///
    /// # Arguments
    ///
    /// * `text` - The complete file contents.
    /// * `filename` - Used for the model's source information only.
    /// * `options` - Type overrides and frame ordering.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] naming the violated expectation.
    fn parse(text: &str, filename: &str, options: &ParseOptions) -> Result<StructureModel, ParseError>;

    /// Reads all of `reader` and parses it.
    fn read_from(
        reader: &mut impl BufRead,
        filename: &str,
        options: &ParseOptions,
    ) -> Result<StructureModel, ParseError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text, filename, options)
    }

    /// Opens `path` and parses it, using the file name as the source name.
    fn read_from_path<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<StructureModel, ParseError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::read_from(&mut reader, &filename, options)
    }
}
