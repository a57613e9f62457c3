use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;

/// Create the input and output directories if they are missing
pub fn ensure_directories(input_dir: &Path, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(input_dir)?;
    std::fs::create_dir_all(output_dir)?;
    debug!("Ensured directories {:?} and {:?}", input_dir, output_dir);
    Ok(())
}

/// Check a path's extension against an allow-list, ignoring case
pub fn has_supported_extension<P: AsRef<Path>>(path: P, extensions: &[String]) -> bool {
    match path.as_ref().extension().and_then(|ext| ext.to_str()) {
        Some(ext) => extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext)),
        None => false,
    }
}

fn is_hidden_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Find the first video in `directory`, by file name order
///
/// Only the top level is scanned, and hidden files (a leading `.`, such as
/// `.clip.mp4` left by an interrupted copy) are skipped. Returns `Ok(None)`
/// when nothing matches.
pub fn locate_input<P: AsRef<Path>>(directory: P, extensions: &[String]) -> Result<Option<PathBuf>> {
    let directory = directory.as_ref();

    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        if path.is_file() && !is_hidden_file(&path) && has_supported_extension(&path, extensions) {
            candidates.push(path);
        }
    }

    candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if candidates.len() > 1 {
        debug!("{} candidate videos in {:?}, taking the first", candidates.len(), directory);
    }

    let found = candidates.into_iter().next();
    if let Some(path) = &found {
        info!("Located input video: {:?}", path);
    }
    Ok(found)
}

/// Output path for `input`: `<stem><suffix><.ext>` inside `output_dir`
///
/// The input extension is kept exactly, case included.
pub fn derive_output_path<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output_dir: Q, suffix: &str) -> PathBuf {
    let input = input.as_ref();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };

    output_dir.as_ref().join(file_name)
}
