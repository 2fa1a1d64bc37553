//! Song player actions

use crate::library::Song;

/// Everything the player can be asked to do
///
/// `#[action(creators)]` generates `SongActionCreators`, one dispatching
/// method per variant (`load_songs`, `play_song`, `toggle_play`, ...).
#[derive(dux::Action, Clone, Debug, PartialEq)]
#[action(creators)]
pub enum SongAction {
    /// Replace the song list
    LoadSongs(Vec<Song>),

    /// Make a song active and start playing it
    PlaySong(Song),

    /// Pause or resume the active song
    TogglePlay,

    /// Skip forward, wrapping to the first song
    PlayNext,

    /// Skip back, wrapping to the last song
    PlayPrev,
}
