//! Loading foreign units from their persisted form.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::hir::DeclGraph;

/// Errors raised while loading a unit snapshot.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read unit '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed unit '{}': {message}", path.display())]
    Malformed { path: PathBuf, message: String },
}

impl LoadError {
    /// The unit path the error is about.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. } | LoadError::Malformed { path, .. } => path,
        }
    }
}

/// Turns a persisted unit into its declaration graph.
///
/// Called at most once per path by [`UnitCache`](super::UnitCache).
pub trait UnitLoader {
    fn load(&self, path: &Path) -> Result<DeclGraph, LoadError>;
}

impl<F> UnitLoader for F
where
    F: Fn(&Path) -> Result<DeclGraph, LoadError>,
{
    fn load(&self, path: &Path) -> Result<DeclGraph, LoadError> {
        self(path)
    }
}

/// Loads JSON unit snapshots written by [`save_snapshot`].
#[cfg(feature = "interchange")]
#[derive(Clone, Copy, Debug, Default)]
pub struct SnapshotLoader;

#[cfg(feature = "interchange")]
impl UnitLoader for SnapshotLoader {
    fn load(&self, path: &Path) -> Result<DeclGraph, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let graph: DeclGraph = serde_json::from_str(&text).map_err(|e| LoadError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        graph.validate().map_err(|message| LoadError::Malformed {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(graph)
    }
}

/// Persist a unit so that [`SnapshotLoader`] can read it back.
#[cfg(feature = "interchange")]
pub fn save_snapshot(graph: &DeclGraph, path: &Path) -> Result<(), LoadError> {
    let text = serde_json::to_string(graph).map_err(|e| LoadError::Malformed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    std::fs::write(path, text).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
