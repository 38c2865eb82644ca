use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// True for files the pipeline remuxes to mp4.
pub fn is_swappable_video(path: &Path) -> bool {
    has_extension(path, "mkv")
}

/// True for files the pipeline transcodes to mp3.
pub fn is_swappable_audio(path: &Path) -> bool {
    has_extension(path, "m4a")
}

fn is_swappable(path: &Path) -> bool {
    is_swappable_video(path) || is_swappable_audio(path)
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase() == wanted)
        .unwrap_or(false)
}

/// Collect the mkv/m4a files to swap: either `src` itself, or everything
/// eligible under it. Stable order so runs queue files predictably.
pub fn swappable_files(src: &Path) -> Result<Vec<PathBuf>> {
    if src.is_file() {
        let files = if is_swappable(src) {
            vec![src.to_path_buf()]
        } else {
            vec![]
        };
        return Ok(files);
    }

    let mut files = vec![];
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && is_swappable(path) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}
