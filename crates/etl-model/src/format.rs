//! Source file format classification.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Structured file formats the loader understands.
///
/// Anything else is skipped by the batch driver with a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    Csv,
    Xlsx,
    Xlsm,
}

impl SourceFormat {
    /// Classify a path by its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("csv") {
            Some(Self::Csv)
        } else if ext.eq_ignore_ascii_case("xlsx") {
            Some(Self::Xlsx)
        } else if ext.eq_ignore_ascii_case("xlsm") {
            Some(Self::Xlsm)
        } else {
            None
        }
    }

    /// Workbook formats parse sheet by sheet and never use the chunked path.
    pub fn is_workbook(self) -> bool {
        matches!(self, Self::Xlsx | Self::Xlsm)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Xlsm => "xlsm",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_extensions_case_insensitively() {
        assert_eq!(
            SourceFormat::from_path(Path::new("a/report.CSV")),
            Some(SourceFormat::Csv)
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("b/Budget.xlsx")),
            Some(SourceFormat::Xlsx)
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("macro.XLSM")),
            Some(SourceFormat::Xlsm)
        );
    }

    #[test]
    fn rejects_unsupported_extensions() {
        assert_eq!(SourceFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(SourceFormat::from_path(Path::new("archive.csv.gz")), None);
        assert_eq!(SourceFormat::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn workbook_formats() {
        assert!(!SourceFormat::Csv.is_workbook());
        assert!(SourceFormat::Xlsx.is_workbook());
        assert!(SourceFormat::Xlsm.is_workbook());
    }
}
