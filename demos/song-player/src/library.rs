//! Song library: the built-in playlist and loading one from JSON

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A playable song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub artist: String,
}

impl Song {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Songs are identified by title
    pub fn same_track(&self, other: &Song) -> bool {
        self.title == other.title
    }
}

/// Errors from loading a song library file
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to read song library {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid song library {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("song library {0} contains no songs")]
    Empty(PathBuf),
}

/// The playlist used when no library file is configured
pub fn builtin_songs() -> Vec<Song> {
    vec![
        Song::new("Fast Car", "Tracy Chapman"),
        Song::new("Landslide", "Fleetwood Mac"),
        Song::new("Harvest Moon", "Neil Young"),
        Song::new("Blackbird", "The Beatles"),
        Song::new("Jolene", "Dolly Parton"),
        Song::new("Vienna", "Billy Joel"),
    ]
}

/// Parse a JSON array of `{ "title": ..., "artist": ... }` objects
pub fn parse_songs(path: &Path, json: &str) -> Result<Vec<Song>, LibraryError> {
    let songs: Vec<Song> = serde_json::from_str(json).map_err(|source| LibraryError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if songs.is_empty() {
        return Err(LibraryError::Empty(path.to_path_buf()));
    }
    Ok(songs)
}

/// Read a song library file
pub fn load_songs(path: &Path) -> Result<Vec<Song>, LibraryError> {
    let json = fs::read_to_string(path).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let songs = parse_songs(path, &json)?;
    tracing::info!(path = %path.display(), count = songs.len(), "Loaded song library");
    Ok(songs)
}

/// `<config dir>/song-player/songs.json`, if the platform has a config dir
pub fn default_library_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("song-player").join("songs.json"))
}

/// Resolve the songs to start with
///
/// An explicit path must load. Without one, the default library file is used
/// when it exists, and the built-in playlist otherwise.
pub fn resolve_songs(explicit: Option<&Path>) -> Result<Vec<Song>, LibraryError> {
    if let Some(path) = explicit {
        return load_songs(path);
    }
    match default_library_path() {
        Some(path) if path.exists() => load_songs(&path),
        _ => Ok(builtin_songs()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_songs() {
        let json = r#"[
            {"title": "Song A", "artist": "Artist A"},
            {"title": "Song B", "artist": "Artist B"}
        ]"#;
        let songs = parse_songs(Path::new("songs.json"), json).unwrap();
        let expected = vec![
            Song::new("Song A", "Artist A"),
            Song::new("Song B", "Artist B"),
        ];
        assert_eq!(songs, expected);
    }

    #[test]
    fn test_parse_rejects_empty_library() {
        let err = parse_songs(Path::new("empty.json"), "[]").unwrap_err();
        assert!(matches!(err, LibraryError::Empty(_)));
        assert_eq!(err.to_string(), "song library empty.json contains no songs");
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let err = parse_songs(Path::new("bad.json"), r#"[{"title": 1}]"#).unwrap_err();
        assert!(matches!(err, LibraryError::Parse { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_songs(Path::new("/definitely/not/here/songs.json")).unwrap_err();
        assert!(matches!(err, LibraryError::Io { .. }));
    }

    #[test]
    fn test_builtin_titles_are_unique() {
        let songs = builtin_songs();
        for (i, a) in songs.iter().enumerate() {
            assert!(songs[i + 1..].iter().all(|b| !a.same_track(b)));
        }
    }
}
