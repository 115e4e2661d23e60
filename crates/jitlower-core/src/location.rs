use serde::{Deserialize, Serialize};
use std::fmt;

/// Debug location attached to every emitted operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Location {
    #[default]
    Unknown,
    FileLineCol {
        file: String,
        line: u32,
        column: u32,
    },
    Named {
        name: String,
        child: Option<Box<Location>>,
    },
}

impl Location {
    pub fn file(file: impl Into<String>, line: u32, column: u32) -> Self {
        Location::FileLineCol {
            file: file.into(),
            line,
            column,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Location::Named {
            name: name.into(),
            child: None,
        }
    }

    pub fn named_at(name: impl Into<String>, child: Location) -> Self {
        let child = match child {
            Location::Unknown => None,
            other => Some(Box::new(other)),
        };
        Location::Named {
            name: name.into(),
            child,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Location::Unknown)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Unknown => write!(f, "unknown"),
            Location::FileLineCol { file, line, column } => {
                write!(f, "\"{}\":{}:{}", file, line, column)
            }
            Location::Named { name, child: None } => write!(f, "\"{}\"", name),
            Location::Named {
                name,
                child: Some(child),
            } => write!(f, "\"{}\"({})", name, child),
        }
    }
}
