//! Collections of changed or tracked files

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::pattern::PathPattern;

/// An ordered list of repository-relative paths
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilesCollection {
    files: Vec<PathBuf>,
}

impl FilesCollection {
    /// Create a collection from paths
    #[must_use]
    pub const fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// Number of files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the collection is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over the paths
    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.files.iter()
    }

    /// Paths as strings, using forward slashes
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        self.files.iter().map(|p| display_path(p)).collect()
    }

    /// Keep files whose extension is one of `extensions` (case-insensitive)
    ///
    /// An empty extension list keeps everything.
    #[must_use]
    pub fn extensions<S: AsRef<str>>(&self, extensions: &[S]) -> Self {
        if extensions.is_empty() {
            return self.clone();
        }
        self.filter(|path| {
            path.extension().and_then(|e| e.to_str()).is_some_and(|ext| {
                extensions
                    .iter()
                    .any(|wanted| wanted.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
        })
    }

    /// Keep files matching at least one pattern
    ///
    /// An empty pattern list keeps everything.
    #[must_use]
    pub fn paths(&self, patterns: &[PathPattern]) -> Self {
        if patterns.is_empty() {
            return self.clone();
        }
        self.filter(|path| {
            let path = display_path(path);
            patterns.iter().any(|p| p.matches(&path))
        })
    }

    /// Drop files matching any pattern
    #[must_use]
    pub fn not_paths(&self, patterns: &[PathPattern]) -> Self {
        self.filter(|path| {
            let path = display_path(path);
            !patterns.iter().any(|p| p.matches(&path))
        })
    }

    /// Keep files below a directory
    #[must_use]
    pub fn path(&self, directory: impl AsRef<Path>) -> Self {
        let directory = directory.as_ref();
        self.filter(|path| path.starts_with(directory))
    }

    /// Keep files whose file name matches a pattern
    #[must_use]
    pub fn name(&self, pattern: &PathPattern) -> Self {
        self.filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| pattern.matches_name(name))
        })
    }

    fn filter(&self, keep: impl Fn(&Path) -> bool) -> Self {
        self.files.iter().filter(|p| keep(p)).cloned().collect()
    }
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

impl FromIterator<PathBuf> for FilesCollection {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<String>> for FilesCollection {
    fn from(files: Vec<String>) -> Self {
        files.into_iter().map(PathBuf::from).collect()
    }
}

impl<'a> IntoIterator for &'a FilesCollection {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
