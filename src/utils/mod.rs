// upload-prep/src/utils/mod.rs
use std::path::Path;

pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "tiff", "bmp"];

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exponent = ((bytes_f64.log10() / base.log10()).floor() as usize).min(UNITS.len() - 1);
    let size = bytes_f64 / base.powi(exponent as i32);

    format!("{:.2} {}", size, UNITS[exponent])
}

/// Whether the file name of `path` ends in one of the accepted extensions,
/// ignoring case. A name that is only the extension (`.png`) counts too.
pub fn is_supported_format(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy().to_lowercase();

    SUPPORTED_EXTENSIONS
        .iter()
        .any(|ext| name.strip_suffix(*ext).is_some_and(|rest| rest.ends_with('.')))
}
