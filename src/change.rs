//! Line-range splicing: write a replacement body over an entity's span,
//! preserving the file's indentation and trailing-newline structure.

use crate::entity::CodeEntity;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChangeError {
    #[error("invalid line range {line_start}..{line_end} for {file} ({file_lines} lines)")]
    InvalidRange {
        file: PathBuf,
        line_start: usize,
        line_end: usize,
        file_lines: usize,
    },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Replace the entity's line span with `rewrite`, re-indented to the
/// entity's nesting depth.
///
/// Every non-blank replacement line is prefixed with
/// `indent_level * indent_size` spaces; blank lines pass through. The
/// replacement's final line is trimmed or padded so its trailing newline
/// count matches the last line of the replaced range. The file is written
/// whole: unchanged prefix, indented replacement, unchanged suffix.
pub fn apply_code_change(entity: &CodeEntity, rewrite: &str) -> Result<(), ChangeError> {
    let content = fs::read_to_string(&entity.file_path)?;
    let lines: Vec<&str> = content.split_inclusive('\n').collect();

    if entity.line_start < 1 || entity.line_end > lines.len() || entity.line_start > entity.line_end
    {
        return Err(ChangeError::InvalidRange {
            file: entity.file_path.clone(),
            line_start: entity.line_start,
            line_end: entity.line_end,
            file_lines: lines.len(),
        });
    }

    let indent = " ".repeat(entity.indent_level * entity.indent_size);
    let mut change: Vec<String> = rewrite
        .split_inclusive('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect();

    // The replaced range's last line dictates how many trailing newlines the
    // replacement must end with.
    let original_last = lines[entity.line_end - 1];
    let newline_count = original_last.len() - original_last.trim_end_matches('\n').len();
    if let Some(last) = change.last_mut() {
        let body = last.trim_end_matches('\n').to_string();
        *last = body + &"\n".repeat(newline_count);
    }

    let mut new_content = String::with_capacity(content.len() + rewrite.len());
    for line in &lines[..entity.line_start - 1] {
        new_content.push_str(line);
    }
    for line in &change {
        new_content.push_str(line);
    }
    for line in &lines[entity.line_end..] {
        new_content.push_str(line);
    }

    atomic_write(&entity.file_path, new_content.as_bytes())?;

    // Update mtime so incremental build caches notice the mutation
    let now = filetime::FileTime::now();
    filetime::set_file_mtime(&entity.file_path, now)?;

    Ok(())
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full three-way concatenation lands or the file is untouched.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), ChangeError> {
    let parent = path.parent().ok_or_else(|| {
        ChangeError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no parent directory",
        ))
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
