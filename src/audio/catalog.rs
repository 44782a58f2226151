use std::path::{Path, PathBuf};

/// File extension (case-insensitive) recognised as a background music track.
pub const MUSIC_EXTENSION: &str = "mp3";

/// One background-music asset in the read-only catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Track {
    /// Path of the audio file.
    pub path: PathBuf,
    /// Display name (file name including extension). Named choices match against this.
    pub name: String,
}

/// List the tracks in `music_dir`.
///
/// The scan is non-recursive and only keeps regular files (symlinks followed) with a `.mp3` extension (any case).
/// A missing or unreadable directory yields an empty catalog. Order is ascending by
/// case-insensitive name, ties broken by exact name.
pub fn list_tracks(music_dir: &Path) -> Vec<Track> {
    let entries = match std::fs::read_dir(music_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %music_dir.display(), error = %e, "music directory unavailable");
            return Vec::new();
        }
    };

    let mut tracks: Vec<Track> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            let path = entry.path();
            if !has_music_extension(&path) {
                return None;
            }
            let name = path.file_name()?.to_str()?.to_string();
            Some(Track { path, name })
        })
        .collect();

    tracks.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    tracks
}

fn has_music_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(MUSIC_EXTENSION))
}

#[cfg(test)]
#[path = "../../tests/unit/audio/catalog.rs"]
mod tests;
