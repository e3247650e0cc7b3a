//! Reading local files into the buffer and exporting saved content.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::Result;
use crate::app::services::naming::extract_filename;

/// A local file picked for import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedFile {
    pub name: String,
    pub content: String,
}

pub fn import_file(path: &Path) -> Result<ImportedFile> {
    let content = fs::read_to_string(path)?;
    Ok(ImportedFile {
        name: extract_filename(&path.to_string_lossy()),
        content,
    })
}

/// Write `content` to `dir/file_name`, creating `dir` if needed.
pub fn export_file(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    // Registry names are free-form; never let one escape the export dir.
    let path = dir.join(extract_filename(file_name));
    fs::write(&path, content)?;
    Ok(path)
}
