// rescale/src/utils/mod.rs
use crate::core::{OutputFormat, RescaleError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Base file name of a source identifier, extension included.
/// Falls back to the whole identifier when it has no file name component.
pub fn file_name_of(source: &str) -> String {
    Path::new(source)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string())
}

/// Accepts any file whose name contains `.png`, `.jpg` or `.gif`, ignoring case.
pub fn is_supported_file_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    OutputFormat::ALL
        .iter()
        .any(|format| lower.contains(&format!(".{}", format.extension())))
}

/// Resolves the positional input argument.
///
/// A directory is scanned (one level deep) for supported files; anything else
/// is treated as a comma-separated list of paths and passed through unchecked,
/// leaving missing files to the loader.
pub fn collect_input_paths(input: &str) -> Result<Vec<PathBuf>> {
    let dir = Path::new(input);

    if dir.is_dir() {
        let mut paths: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| is_supported_file_name(&entry.file_name().to_string_lossy()))
            .map(|entry| entry.into_path())
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(RescaleError::NoInputFiles(format!(
                "No input files found in directory: {}",
                input
            )));
        }

        log::debug!("Found {} input files in {}", paths.len(), dir.display());
        return Ok(paths);
    }

    let paths: Vec<PathBuf> = input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(PathBuf::from)
        .collect();

    if paths.is_empty() {
        return Err(RescaleError::NoInputFiles(
            "Missing argument: comma-separated list of images".to_string(),
        ));
    }

    Ok(paths)
}

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
