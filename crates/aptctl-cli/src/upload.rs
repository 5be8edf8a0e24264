//! Collecting local package files for upload.
//!
//! Source packages (`.dsc`) and upload descriptions (`.changes`) list the
//! files they ship in a `Files:` field. Those files are uploaded alongside
//! the control file and must sit in the same directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rand::Rng;
use tracing::{debug, trace};

use crate::error::{CliError, ErrorContext, Result};

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Which files an upload picks up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// `.deb`, `.udeb` and `.dsc` files, for `repo add`.
    Packages,
    /// `.changes` files, for `repo include`.
    Changes,
}

impl UploadKind {
    fn describe(self) -> &'static str {
        match self {
            Self::Packages => "debian package files (*.[u]deb | *.dsc)",
            Self::Changes => "debian *.changes files",
        }
    }

    fn accepts(self, extension: &str) -> bool {
        match self {
            Self::Packages => matches!(extension, "deb" | "udeb" | "dsc"),
            Self::Changes => extension == "changes",
        }
    }

    fn has_references(self, extension: &str) -> bool {
        match self {
            Self::Packages => extension == "dsc",
            Self::Changes => extension == "changes",
        }
    }
}

fn extension(path: &Path) -> &str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
}

/// Returns a fresh upload directory name, `upload_` plus 8 random letters.
pub fn upload_dir_name() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..8)
        .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
        .collect();
    format!("upload_{suffix}")
}

/// Extracts the file names listed in the `Files:` field of a control file.
///
/// Each entry line ends with the file name; `.dsc` entries carry checksum and
/// size before it, `.changes` entries also carry section and priority.
pub fn referenced_files(content: &str) -> Vec<String> {
    let mut files = Vec::new();
    let mut in_files = false;

    for line in content.lines() {
        if line.starts_with(' ') || line.starts_with('\t') {
            if in_files {
                if let Some(name) = line.split_whitespace().last() {
                    files.push(name.to_string());
                }
            }
            continue;
        }

        in_files = line
            .split_once(':')
            .is_some_and(|(field, _)| field.eq_ignore_ascii_case("Files"));
    }

    files
}

fn add_with_references(path: &Path, kind: UploadKind, out: &mut Vec<PathBuf>) -> Result<()> {
    out.push(path.to_path_buf());

    if !kind.has_references(extension(path)) {
        return Ok(());
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let control_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    for file in referenced_files(&content) {
        let referenced = dir.join(&file);
        if !referenced.exists() {
            return Err(CliError::MissingReference {
                file,
                referenced_by: control_name,
            });
        }
        trace!("{} references {}", control_name, referenced.display());
        out.push(referenced);
    }

    Ok(())
}

fn walk(dir: &Path, kind: UploadKind, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("reading directory {}", dir.display()))?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk(&path, kind, out)?;
        } else if kind.accepts(extension(&path)) {
            add_with_references(&path, kind, out)?;
        }
    }

    Ok(())
}

/// Collects the files to upload for `path`, a single file or a directory
/// tree. Duplicates are dropped, keeping the first occurrence.
pub fn collect(path: &Path, kind: UploadKind) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(path).with_context(|| format!("accessing {}", path.display()))?;
    let mut files = Vec::new();

    if metadata.is_dir() {
        walk(path, kind, &mut files)?;
        if files.is_empty() {
            return Err(CliError::NoUploadFiles {
                kind: kind.describe(),
                path: path.to_path_buf(),
            });
        }
    } else if kind.accepts(extension(path)) {
        add_with_references(path, kind, &mut files)?;
    } else {
        return Err(CliError::UnsupportedFile {
            kind: kind.describe(),
            path: path.to_path_buf(),
        });
    }

    let mut seen = std::collections::HashSet::new();
    files.retain(|file| seen.insert(file.clone()));

    debug!("collected {} files from {}", files.len(), path.display());
    Ok(files)
}

/// Collects every regular file under `path`, without filtering.
pub fn collect_all(path: &Path) -> Result<Vec<PathBuf>> {
    fn visit(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
        let mut entries = fs::read_dir(dir)
            .with_context(|| format!("reading directory {}", dir.display()))?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<std::io::Result<Vec<_>>>()
            .with_context(|| format!("reading directory {}", dir.display()))?;
        entries.sort();

        for path in entries {
            if path.is_dir() {
                visit(&path, out)?;
            } else {
                out.push(path);
            }
        }
        Ok(())
    }

    let metadata = fs::metadata(path).with_context(|| format!("accessing {}", path.display()))?;
    if metadata.is_dir() {
        let mut files = Vec::new();
        visit(path, &mut files)?;
        Ok(files)
    } else {
        Ok(vec![path.to_path_buf()])
    }
}
