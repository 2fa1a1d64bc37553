//! Slice reducers for [`AppState`](crate::state::AppState)
//!
//! Both are pure: they build a new slice from the old one and never touch
//! anything outside their arguments.

use crate::action::SongAction;
use crate::library::Song;
use crate::state::{PlayStats, PlayerState};

/// Reduce the player slice
pub fn player_reducer(state: &PlayerState, action: &SongAction) -> PlayerState {
    match action {
        SongAction::LoadSongs(songs) => {
            let keeps_active = state
                .active_song
                .as_ref()
                .is_some_and(|active| songs.iter().any(|song| song.same_track(active)));
            if keeps_active {
                PlayerState {
                    songs: songs.clone(),
                    ..state.clone()
                }
            } else {
                PlayerState {
                    songs: songs.clone(),
                    active_song: None,
                    is_playing: false,
                }
            }
        }

        SongAction::PlaySong(song) => PlayerState {
            active_song: Some(song.clone()),
            is_playing: true,
            ..state.clone()
        },

        SongAction::TogglePlay => PlayerState {
            is_playing: state.active_song.is_some() && !state.is_playing,
            ..state.clone()
        },

        SongAction::PlayNext => step(state, Direction::Next),
        SongAction::PlayPrev => step(state, Direction::Prev),
    }
}

enum Direction {
    Next,
    Prev,
}

fn step(state: &PlayerState, direction: Direction) -> PlayerState {
    let len = state.songs.len();
    if len == 0 {
        return state.clone();
    }

    let index = match (state.active_index(), direction) {
        (Some(i), Direction::Next) => (i + 1) % len,
        (Some(i), Direction::Prev) => (i + len - 1) % len,
        (None, Direction::Next) => 0,
        (None, Direction::Prev) => len - 1,
    };
    let song: &Song = &state.songs[index];

    PlayerState {
        active_song: Some(song.clone()),
        is_playing: true,
        ..state.clone()
    }
}

/// Reduce the stats slice
pub fn stats_reducer(stats: &PlayStats, action: &SongAction) -> PlayStats {
    let mut next = *stats;
    match action {
        SongAction::LoadSongs(_) => next.loads += 1,
        SongAction::PlaySong(_) | SongAction::PlayNext | SongAction::PlayPrev => {
            next.track_changes += 1
        }
        SongAction::TogglePlay => next.toggles += 1,
    }
    next
}
