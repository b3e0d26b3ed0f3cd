use super::error::ParseError;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// The structure formats the library can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileFormat {
    /// Point-list text: count, comment, `element x y z` lines.
    Xyz,
    /// Fixed-column ATOM/HETATM records.
    Pdb,
    /// `ITEM:`-sectioned LAMMPS trajectory dump.
    LammpsDump,
    /// LAMMPS data file with an `Atoms` section.
    LammpsData,
}

impl FileFormat {
    /// Guesses the format from a file name.
    ///
    /// Besides extensions, LAMMPS' `dump.*` and `data.*` naming conventions are
    /// recognised.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let path = Path::new(filename);
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if let Some(format) = extension.as_deref().and_then(|e| e.parse().ok()) {
            return Some(format);
        }
        let stem = path.file_name()?.to_str()?.to_ascii_lowercase();
        if stem.starts_with("dump.") {
            Some(Self::LammpsDump)
        } else if stem.starts_with("data.") {
            Some(Self::LammpsData)
        } else {
            None
        }
    }

    /// Guesses the format from the text itself.
    pub fn sniff(text: &str) -> Option<Self> {
        let mut first_content: Option<&str> = None;
        let mut has_atoms_section = false;
        let mut has_atoms_count = false;

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with("ITEM: TIMESTEP") {
                return Some(Self::LammpsDump);
            }
            if line.starts_with("ATOM  ") || line.starts_with("HETATM") {
                return Some(Self::Pdb);
            }
            if first_content.is_none() {
                first_content = Some(trimmed);
            }
            let mut tokens = trimmed.split_whitespace();
            match (tokens.next(), tokens.next(), tokens.next()) {
                (Some("Atoms"), _, _) => has_atoms_section = true,
                (Some(n), Some("atoms"), None) if n.parse::<u64>().is_ok() => has_atoms_count = true,
                _ => {}
            }
        }

        if has_atoms_section && has_atoms_count {
            return Some(Self::LammpsData);
        }
        match first_content {
            Some(first) if first.parse::<u64>().map_or(false, |n| n > 0) => Some(Self::Xyz),
            _ => None,
        }
    }

    /// Resolves the format: explicit override, then file name, then content.
    pub fn detect(filename: &str, text: &str, forced: Option<Self>) -> Result<Self, ParseError> {
        forced
            .or_else(|| Self::from_filename(filename))
            .or_else(|| Self::sniff(text))
            .ok_or_else(|| ParseError::UnknownFormat(filename.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Xyz => "xyz",
            Self::Pdb => "pdb",
            Self::LammpsDump => "lammps-dump",
            Self::LammpsData => "lammps-data",
        }
    }

    /// Returns `true` for the formats that carry numeric type ids.
    pub fn is_typed(&self) -> bool {
        matches!(self, Self::LammpsDump | Self::LammpsData)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown format '{0}' (expected xyz, pdb, dump or data)")]
pub struct UnknownFormatName(pub String);

impl FromStr for FileFormat {
    type Err = UnknownFormatName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xyz" => Ok(Self::Xyz),
            "pdb" | "ent" => Ok(Self::Pdb),
            "dump" | "lammpstrj" | "lammps-dump" => Ok(Self::LammpsDump),
            "data" | "lmp" | "lammps-data" => Ok(Self::LammpsData),
            _ => Err(UnknownFormatName(s.to_string())),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
