use std::path::PathBuf;

use thiserror::Error;

/// A structural problem found while reading a tileset-definition or level file.
///
/// `line` is the 1-based line number in the file as written, so comment and
/// blank lines are counted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Missing or corrupt header, missing block delimiter, wrong field count,
    /// or a field that is not a valid number.
    #[error("line {line}: {reason}")]
    Format { line: usize, reason: String },

    /// A layout character has no entry in the active definition mapping.
    #[error("line {line}: symbol {symbol:?} has no tile definition")]
    Lookup { line: usize, symbol: char },
}

impl ParseError {
    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        Self::Format { line, reason: reason.into() }
    }

    pub fn line(&self) -> usize {
        match self {
            Self::Format { line, .. } | Self::Lookup { line, .. } => *line,
        }
    }
}

/// Everything that can go wrong loading a data file from disk.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// An external `#name` tileset reference could not be loaded.
    #[error("tileset definitions '{name}' could not be loaded: {source}")]
    Definitions {
        name: String,
        #[source]
        source: Box<DataError>,
    },

    /// The data directory holds no `.lvl` files to pick from.
    #[error("no level files found under {}", .dir.display())]
    NoLevels { dir: PathBuf },
}

impl DataError {
    pub(crate) fn parse(path: impl Into<PathBuf>, source: ParseError) -> Self {
        Self::Parse { path: path.into(), source }
    }

    /// The innermost parse error, following external-definition failures down.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse { source, .. } => Some(source),
            Self::Definitions { source, .. } => source.parse_error(),
            Self::Io { .. } | Self::NoLevels { .. } => None,
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self.parse_error(), Some(ParseError::Format { .. }))
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self.parse_error(), Some(ParseError::Lookup { .. }))
    }
}
