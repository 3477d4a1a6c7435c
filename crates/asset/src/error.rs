//! Errors produced while loading OBJ meshes.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Attribute table a face index points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attribute {
    Position,
    Texcoord,
    Normal,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::Position => "position",
            Attribute::Texcoord => "texcoord",
            Attribute::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Load failure. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to open OBJ file: {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read line {line}")]
    Io {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("Malformed face on line {line}: expected 3 groups of pos/uv/normal indices")]
    MalformedFace { line: usize },

    #[error("Malformed '{directive}' record on line {line}")]
    MalformedAttribute { line: usize, directive: &'static str },

    #[error("Face on line {line} references {attribute} {index}, but only {len} declared")]
    IndexOutOfRange {
        line: usize,
        attribute: Attribute,
        index: i64,
        len: usize,
    },
}

pub type ParseResult<T> = Result<T, ParseError>;
