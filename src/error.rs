use std::path::PathBuf;

pub type PaneletResult<T> = Result<T, PaneletError>;

/// Identifies a panel in error messages, by title when one is known and by
/// 1-based document order otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelRef {
    pub index: usize,
    pub title: Option<String>,
}

impl PanelRef {
    pub fn new(index: usize, title: Option<String>) -> Self {
        Self { index, title }
    }
}

impl std::fmt::Display for PanelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.title {
            Some(title) => write!(f, "panel {} (\"{title}\")", self.index),
            None => write!(f, "panel {}", self.index),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PaneletError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error at line {line}: {message}")]
    Preamble { line: usize, message: String },

    #[error("parse error in {panel} at line {line}: {message}")]
    Parse {
        panel: PanelRef,
        line: usize,
        message: String,
    },

    #[error("structural error in {panel}: {message}")]
    Structure { panel: PanelRef, message: String },

    #[error("document error: {0}")]
    Document(String),

    #[error("io error on '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PaneletError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn preamble(line: usize, msg: impl Into<String>) -> Self {
        Self::Preamble {
            line,
            message: msg.into(),
        }
    }

    pub fn parse(panel: PanelRef, line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            panel,
            line,
            message: msg.into(),
        }
    }

    pub fn structure(panel: PanelRef, msg: impl Into<String>) -> Self {
        Self::Structure {
            panel,
            message: msg.into(),
        }
    }

    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
