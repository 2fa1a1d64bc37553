//! Player state
//!
//! The store holds an [`AppState`]; each field is a slice with its own
//! reducer, combined by `#[derive(CombineReducers)]`.

use dux::CombineReducers;

use crate::action::SongAction;
use crate::library::Song;
use crate::reducer::{player_reducer, stats_reducer};

/// What is loaded and what is playing
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerState {
    pub songs: Vec<Song>,
    pub active_song: Option<Song>,
    pub is_playing: bool,
}

impl PlayerState {
    /// Position of the active song in the list
    pub fn active_index(&self) -> Option<usize> {
        let active = self.active_song.as_ref()?;
        self.songs.iter().position(|song| song.same_track(active))
    }

    /// Whether `song` is the active song and currently playing
    pub fn is_playing_song(&self, song: &Song) -> bool {
        self.is_playing
            && self
                .active_song
                .as_ref()
                .is_some_and(|active| active.same_track(song))
    }
}

/// Session counters shown in the footer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayStats {
    pub loads: u32,
    pub track_changes: u32,
    pub toggles: u32,
}

/// Root state of the song player store
#[derive(CombineReducers, Clone, Debug, Default, PartialEq)]
#[combine(action = SongAction)]
pub struct AppState {
    #[reducer(player_reducer)]
    pub player: PlayerState,
    #[reducer(stats_reducer)]
    pub stats: PlayStats,
}
