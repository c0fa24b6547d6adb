use std::fs;
use std::path::{Path, PathBuf};

use crate::nest::FenceNote;
use crate::process;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid knowledge directory: {0}")]
    InvalidKnowledgeDir(String),
}

/// What processing one file produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// Whether the normalized content differs from what was on disk.
    pub changed: bool,
    pub notes: Vec<FenceNote>,
}

/// Split text into lines with their terminators preserved verbatim.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

/// Run the normalization pass over the file at `path`.
///
/// Reads UTF-8 text, processes it line by line, and (when `write` is set)
/// overwrites the file only if the content actually changed.
pub fn process_file_report(path: &Path, write: bool) -> Result<FileOutcome, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let report = process::process_lines_report(&split_lines(&content));
    let normalized: String = report.lines.concat();
    let changed = normalized != content;
    if changed && write {
        fs::write(path, normalized)?;
    }
    Ok(FileOutcome {
        changed,
        notes: report.notes,
    })
}

/// Normalize the file in place; returns whether a change was written.
pub fn process_file(path: &Path) -> Result<bool, IoError> {
    Ok(process_file_report(path, true)?.changed)
}

/// Recursively collect the markdown files under `root`, sorted.
pub fn scan_markdown_files(root: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !root.exists() {
        return Err(IoError::InvalidKnowledgeDir(
            "knowledge directory not found".to_string(),
        ));
    }

    let mut files = Vec::new();
    scan_directory_recursive(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == "md"
        {
            files.push(path);
        }
    }
    Ok(())
}
