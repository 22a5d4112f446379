// upload-prep/src/processors/scanner.rs
use crate::core::{ExportError, Result, SourceFile};
use crate::utils::is_supported_format;
use std::path::Path;
use walkdir::WalkDir;

/// Lists the eligible images directly inside one directory.
pub struct Scanner;

impl Scanner {
    pub fn new() -> Self {
        Self
    }

    /// Returns a lazy, sorted sequence of accepted source files.
    ///
    /// Fails with [`ExportError::InputDirMissing`] before yielding anything if
    /// `input_dir` does not exist.
    pub fn scan(&self, input_dir: &Path) -> Result<impl Iterator<Item = SourceFile>> {
        if !input_dir.exists() {
            return Err(ExportError::InputDirMissing(input_dir.to_path_buf()));
        }

        if !input_dir.is_dir() {
            return Err(ExportError::InvalidParameter(format!(
                "Input path is not a directory: {}",
                input_dir.display()
            )));
        }

        let files = WalkDir::new(input_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                let supported = is_supported_format(entry.path());
                if !supported {
                    log::debug!("Skipping unsupported file: {}", entry.path().display());
                }
                supported
            })
            .filter_map(|entry| SourceFile::from_path(entry.into_path()));

        Ok(files)
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}
