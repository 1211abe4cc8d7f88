//! The cross-unit index: which unit holds the definition of which symbol.
//!
//! # Format
//!
//! Plain text, one record per line:
//!
//! ```text
//! <symbol-id> <relative-path>
//! ```
//!
//! Only the first space separates the two fields, so paths may contain
//! spaces. Nothing is escaped. Paths are joined onto a base directory
//! (absolute paths stay as they are); an empty path names the base
//! directory itself. Empty lines are ignored but still count for line
//! numbers.
//!
//! The file is read as bytes. Symbol ids must be UTF-8; paths are taken
//! byte for byte on unix and must be UTF-8 elsewhere. A record that breaks
//! either rule is an [`IndexError::InvalidIndexFormat`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use indexmap::map::Entry;
use thiserror::Error;

use crate::base::SymbolId;

/// Errors raised while reading an index file.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The index file could not be opened or read.
    #[error("the index file '{}' is missing: {source}", path.display())]
    MissingIndexFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A record is not of the form `<symbol-id> <path>`.
    #[error("invalid index file format at line {line}")]
    InvalidIndexFormat { line: usize },

    /// The same symbol id is mapped twice.
    #[error("multiple definitions of '{id}' in the index file (line {line})")]
    MultipleDefinitions { line: usize, id: SymbolId },
}

/// One index record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: SymbolId,
    pub path: PathBuf,
}

impl IndexEntry {
    pub fn new(id: impl Into<SymbolId>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

/// Parsed index: symbol id → unit path. Immutable once built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Index {
    entries: IndexMap<SymbolId, PathBuf>,
}

impl Index {
    /// Parse index text, joining each path onto `base_dir`.
    ///
    /// All or nothing: the first malformed or duplicate record fails the
    /// whole parse.
    pub fn parse_str(text: &str, base_dir: &Path) -> Result<Self, IndexError> {
        Self::parse_bytes(text.as_bytes(), base_dir)
    }

    /// Like [`parse_str`](Self::parse_str), for raw file contents.
    pub fn parse_bytes(bytes: &[u8], base_dir: &Path) -> Result<Self, IndexError> {
        let mut entries = IndexMap::new();

        for (line_no, line) in bytes.split(|&b| b == b'\n').enumerate().map(|(i, l)| (i + 1, l)) {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if line.is_empty() {
                continue;
            }
            let invalid = || IndexError::InvalidIndexFormat { line: line_no };
            let split = line.iter().position(|&b| b == b' ').ok_or_else(invalid)?;
            let (id, rest) = (&line[..split], &line[split + 1..]);
            let id = std::str::from_utf8(id)
                .ok()
                .filter(|id| !id.is_empty())
                .ok_or_else(invalid)?;
            let rest = path_from_bytes(rest).ok_or_else(invalid)?;

            match entries.entry(SymbolId::new(id)) {
                Entry::Occupied(slot) => {
                    return Err(IndexError::MultipleDefinitions {
                        line: line_no,
                        id: slot.key().clone(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(base_dir.join(rest));
                }
            }
        }

        Ok(Self { entries })
    }

    /// Path of the unit defining `id`.
    pub fn get(&self, id: &str) -> Option<&Path> {
        self.entries.get(id).map(PathBuf::as_path)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Iterate over records in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&SymbolId, &Path)> + '_ {
        self.entries.iter().map(|(id, path)| (id, path.as_path()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn canonicalize_existing(&mut self) {
        for path in self.entries.values_mut() {
            if let Ok(canonical) = fs::canonicalize(&*path) {
                *path = canonical;
            }
        }
    }
}

/// Reads index files from disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct IndexParser {
    /// Canonicalize every path that exists on disk, so that cache keys do
    /// not depend on how the producer spelled them.
    pub canonicalize_paths: bool,
}

impl IndexParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canonical_paths(mut self, enabled: bool) -> Self {
        self.canonicalize_paths = enabled;
        self
    }

    /// Parse the index at `index_path`, resolving records against `base_dir`.
    pub fn parse(&self, index_path: &Path, base_dir: &Path) -> Result<Index, IndexError> {
        let bytes = fs::read(index_path).map_err(|source| IndexError::MissingIndexFile {
            path: index_path.to_path_buf(),
            source,
        })?;
        let mut index = Index::parse_bytes(&bytes, base_dir)?;
        if self.canonicalize_paths {
            index.canonicalize_existing();
        }
        Ok(index)
    }
}

/// Parse the index at `index_path` with default settings.
pub fn parse_index(index_path: &Path, base_dir: &Path) -> Result<Index, IndexError> {
    IndexParser::new().parse(index_path, base_dir)
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> Option<PathBuf> {
    use std::os::unix::ffi::OsStrExt;
    Some(PathBuf::from(std::ffi::OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> Option<PathBuf> {
    std::str::from_utf8(bytes).ok().map(PathBuf::from)
}

/// Render entries in index format, in the given order.
///
/// Paths are written byte for byte, so the output is what
/// [`Index::parse_bytes`] reads back.
pub fn index_bytes<'a>(entries: impl IntoIterator<Item = &'a IndexEntry>) -> Vec<u8> {
    let mut out = Vec::new();
    for entry in entries {
        out.extend_from_slice(entry.id.as_str().as_bytes());
        out.push(b' ');
        out.extend_from_slice(entry.path.as_os_str().as_encoded_bytes());
        out.push(b'\n');
    }
    out
}

/// Render entries as text.
///
/// Returns `None` when a path is not valid UTF-8; write those with
/// [`index_bytes`].
pub fn index_string<'a>(entries: impl IntoIterator<Item = &'a IndexEntry>) -> Option<String> {
    String::from_utf8(index_bytes(entries)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_joins_base_dir() {
        let index = Index::parse_str("c:@F@f#I# f.ast\nc:@F@g# sub/g.ast\n", Path::new("/ctu")).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("c:@F@f#I#"), Some(Path::new("/ctu/f.ast")));
        assert_eq!(index.get("c:@F@g#"), Some(Path::new("/ctu/sub/g.ast")));
        assert_eq!(index.get("c:@F@h#"), None);
    }

    #[test]
    fn test_parse_keeps_spaces_in_path() {
        let index = Index::parse_str("sym my dir/unit one.ast", Path::new("/base")).unwrap();
        assert_eq!(index.get("sym"), Some(Path::new("/base/my dir/unit one.ast")));
    }

    #[test]
    fn test_absolute_path_is_kept() {
        let index = Index::parse_str("sym_f /abs/dir/unit.bin", Path::new("/ctu")).unwrap();
        assert_eq!(index.get("sym_f"), Some(Path::new("/abs/dir/unit.bin")));
    }

    #[test]
    fn test_line_without_space() {
        let err = Index::parse_str("a a.ast\nbroken\n", Path::new("")).unwrap_err();
        assert!(matches!(err, IndexError::InvalidIndexFormat { line: 2 }));
    }

    #[test]
    fn test_empty_symbol_id() {
        let err = Index::parse_str(" a.ast", Path::new("")).unwrap_err();
        assert!(matches!(err, IndexError::InvalidIndexFormat { line: 1 }));
    }

    #[test]
    fn test_empty_lines_are_counted() {
        let err = Index::parse_str("a a.ast\n\nbroken", Path::new("")).unwrap_err();
        assert!(matches!(err, IndexError::InvalidIndexFormat { line: 3 }));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = Index::parse_str("a a.ast\nb b.ast\na c.ast\n", Path::new("")).unwrap_err();
        match err {
            IndexError::MultipleDefinitions { line, id } => {
                assert_eq!(line, 3);
                assert_eq!(id.as_str(), "a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_index_string() {
        let entries = vec![IndexEntry::new("a", "b"), IndexEntry::new("c", "d e")];
        assert_eq!(index_string(&entries).as_deref(), Some("a b\nc d e\n"));
        assert_eq!(index_bytes(&entries), b"a b\nc d e\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_roundtrip() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = OsStr::from_bytes(b"caf\xE9.ast");
        let entries = vec![IndexEntry::new("sym", path)];

        assert_eq!(index_string(&entries), None);
        let index = Index::parse_bytes(&index_bytes(&entries), Path::new("/b")).unwrap();
        assert_eq!(index.get("sym"), Some(Path::new("/b").join(path).as_path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_index_file_parses() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("index.txt");
        fs::write(&index_path, b"sym_f ok.ast\nsym_g caf\xE9.ast\n").unwrap();

        let index = parse_index(&index_path, dir.path()).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("sym_f"), Some(dir.path().join("ok.ast").as_path()));
        assert!(index.get("sym_g").is_some());
    }

    #[test]
    fn test_non_utf8_symbol_id() {
        let err = Index::parse_bytes(b"a a.ast\n\xFF b.ast\n", Path::new("")).unwrap_err();
        assert!(matches!(err, IndexError::InvalidIndexFormat { line: 2 }));
    }

    #[test]
    fn test_empty_path_names_base_dir() {
        let index = Index::parse_str("sym \n", Path::new("/ctu")).unwrap();
        assert_eq!(index.get("sym"), Some(Path::new("/ctu/")));
    }

    #[test]
    fn test_crlf_records() {
        let index = Index::parse_str("a a.ast\r\nb b.ast\r\n", Path::new("/ctu")).unwrap();
        assert_eq!(index.get("b"), Some(Path::new("/ctu/b.ast")));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_index(Path::new("/nonexistent/ctu/index.txt"), Path::new("/")).unwrap_err();
        assert!(matches!(err, IndexError::MissingIndexFile { .. }));
    }
}
