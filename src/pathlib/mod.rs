use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Identifies the file a span belongs to. The annotator also uses an empty
/// `FilePath` as part of the sentinel location for builtin variables.
#[derive(Clone, Debug, Hash, Ord, PartialOrd, Eq, PartialEq)]
pub struct FilePath {
    buf: PathBuf,
}

impl FilePath {
    pub fn new() -> FilePath {
        FilePath {
            buf: PathBuf::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buf.components().count() == 0
    }

    /// Returns the final component of the `FilePath`, if there is one.
    pub fn file_name(&self) -> Option<String> {
        self.buf
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string())
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.buf.display())
    }
}

impl<T: Into<PathBuf>> From<T> for FilePath {
    fn from(s: T) -> FilePath {
        FilePath { buf: s.into() }
    }
}

impl FromStr for FilePath {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<FilePath, &'static str> {
        Ok(FilePath { buf: s.into() })
    }
}

impl AsRef<Path> for FilePath {
    fn as_ref(&self) -> &Path {
        self.buf.as_path()
    }
}
