//! Terminal presentation for the song player
//!
//! The store knows nothing about the terminal. Two listeners subscribed to
//! it keep small view models current: one for the header showing the active
//! song, one for the song list. The main loop redraws whenever a listener (or
//! a cursor move) marks the views dirty.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use dux::{Listener, StoreApi, Unsubscribe};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::action::{SongAction, SongActionCreators};
use crate::library::Song;
use crate::state::{AppState, PlayStats, PlayerState};

const PLAY_GLYPH: &str = "▶";
const PAUSE_GLYPH: &str = "⏸";

/// Glyph for a play/pause control: pause while playing, play otherwise
pub fn control_glyph(is_playing: bool) -> &'static str {
    if is_playing {
        PAUSE_GLYPH
    } else {
        PLAY_GLYPH
    }
}

/// What the header shows
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeaderView {
    pub now_playing: Option<Song>,
    pub is_playing: bool,
}

impl HeaderView {
    pub fn from_state(player: &PlayerState) -> Self {
        Self {
            now_playing: player.active_song.clone(),
            is_playing: player.is_playing,
        }
    }
}

/// One line of the song list
#[derive(Clone, Debug, PartialEq)]
pub struct SongRow {
    pub song: Song,
    /// This is the active song (playing or paused)
    pub is_active: bool,
    /// This is the active song and it is playing
    pub is_playing: bool,
}

/// What the song list shows
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SongListView {
    pub rows: Vec<SongRow>,
    pub stats: PlayStats,
}

impl SongListView {
    pub fn from_state(state: &AppState) -> Self {
        let player = &state.player;
        let rows = player
            .songs
            .iter()
            .map(|song| SongRow {
                song: song.clone(),
                is_active: player
                    .active_song
                    .as_ref()
                    .is_some_and(|active| active.same_track(song)),
                is_playing: player.is_playing_song(song),
            })
            .collect();
        Self {
            rows,
            stats: state.stats,
        }
    }
}

/// Result of handling a key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
    Quit,
}

/// The song player screen
///
/// Owns the view models, the listener subscriptions feeding them and the
/// cursor, which is local UI state and never goes through the store.
pub struct SongPlayer {
    actions: SongActionCreators,
    header: Rc<RefCell<HeaderView>>,
    list: Rc<RefCell<SongListView>>,
    dirty: Rc<Cell<bool>>,
    subscriptions: Vec<Unsubscribe>,
    cursor: usize,
}

impl SongPlayer {
    /// Subscribe the header and song list listeners to `store`
    pub fn connect<St>(store: &St) -> Self
    where
        St: StoreApi<AppState, SongAction> + Clone + 'static,
    {
        let state = store.get_state();
        let header = Rc::new(RefCell::new(HeaderView::from_state(&state.player)));
        let list = Rc::new(RefCell::new(SongListView::from_state(&state)));
        let dirty = Rc::new(Cell::new(true));

        let header_listener = {
            let reader = store.clone();
            let header = Rc::clone(&header);
            let dirty = Rc::clone(&dirty);
            Listener::new(move || {
                let next = HeaderView::from_state(&reader.get_state().player);
                if *header.borrow() != next {
                    *header.borrow_mut() = next;
                    dirty.set(true);
                }
            })
        };

        let list_listener = {
            let reader = store.clone();
            let list = Rc::clone(&list);
            let dirty = Rc::clone(&dirty);
            Listener::new(move || {
                let next = SongListView::from_state(&reader.get_state());
                if *list.borrow() != next {
                    *list.borrow_mut() = next;
                    dirty.set(true);
                }
            })
        };

        let subscriptions = vec![
            store.subscribe(header_listener),
            store.subscribe(list_listener),
        ];

        Self {
            actions: SongActionCreators::new(store.dispatcher()),
            header,
            list,
            dirty,
            subscriptions,
            cursor: 0,
        }
    }

    /// The bound action creators this screen dispatches through
    pub fn actions(&self) -> &SongActionCreators {
        &self.actions
    }

    pub fn header(&self) -> HeaderView {
        self.header.borrow().clone()
    }

    pub fn song_list(&self) -> SongListView {
        self.list.borrow().clone()
    }

    /// Cursor position, clamped to the current list
    pub fn cursor(&self) -> usize {
        let len = self.list.borrow().rows.len();
        self.cursor.min(len.saturating_sub(1))
    }

    /// Return whether a redraw is needed and clear the flag
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    /// Stop listening to the store
    pub fn disconnect(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.list.borrow().rows.len();
        if len == 0 {
            return;
        }
        let next = self.cursor().saturating_add_signed(delta).min(len - 1);
        if next != self.cursor {
            self.cursor = next;
            self.dirty.set(true);
        }
    }

    /// Select the song under the cursor
    ///
    /// Selecting the song that is playing pauses it; selecting any other
    /// song, including a paused active one, plays it.
    pub fn select(&mut self) -> Option<SongAction> {
        let row = self.list.borrow().rows.get(self.cursor()).cloned()?;
        if row.is_playing {
            Some(self.actions.toggle_play())
        } else {
            Some(self.actions.play_song(row.song))
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::Ignored;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Home | KeyCode::Char('g') => self.move_cursor(isize::MIN),
            KeyCode::End | KeyCode::Char('G') => self.move_cursor(isize::MAX),
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.select();
            }
            KeyCode::Char('n') => {
                self.actions.play_next();
            }
            KeyCode::Char('p') => {
                self.actions.play_prev();
            }
            KeyCode::Char('t') => {
                self.actions.toggle_play();
            }
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let [header_area, list_area, footer_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        render_header(frame, header_area, &self.header.borrow());
        let list = self.list.borrow();
        render_song_list(frame, list_area, &list, self.cursor());
        render_footer(frame, footer_area, &list.stats);
    }
}

impl Drop for SongPlayer {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn render_header(frame: &mut Frame, area: Rect, header: &HeaderView) {
    let line = match &header.now_playing {
        Some(song) => Line::from(vec![
            Span::styled(
                control_glyph(header.is_playing),
                Style::default().fg(Color::Green),
            ),
            Span::raw(" "),
            Span::styled(
                song.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - "),
            Span::raw(song.artist.as_str()),
        ]),
        None => Line::from(Span::styled(
            "Nothing playing",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let block = Block::bordered().title(" Now Playing ");
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_song_list(frame: &mut Frame, area: Rect, list: &SongListView, cursor: usize) {
    let items: Vec<ListItem> = list
        .rows
        .iter()
        .map(|row| {
            let title_style = if row.is_active {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::raw(control_glyph(row.is_playing)),
                Span::raw(" "),
                Span::styled(row.song.title.as_str(), title_style),
                Span::raw("  "),
                Span::styled(
                    row.song.artist.as_str(),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let title = format!(" Songs ({}) ", list.rows.len());
    let widget = List::new(items)
        .block(Block::bordered().title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !list.rows.is_empty() {
        state.select(Some(cursor));
    }
    frame.render_stateful_widget(widget, area, &mut state);
}

fn render_footer(frame: &mut Frame, area: Rect, stats: &PlayStats) {
    let text = format!(
        " ↑↓ move  enter select  n/p skip  t play/pause  q quit   changes: {}  toggles: {}",
        stats.track_changes, stats.toggles
    );
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use dux::Store;

    fn songs() -> Vec<Song> {
        vec![
            Song::new("Song A", "Artist A"),
            Song::new("Song B", "Artist B"),
        ]
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(player: &mut SongPlayer, c: char) -> KeyOutcome {
        player.handle_key(key(KeyCode::Char(c)))
    }

    fn connected() -> (Store<AppState, SongAction>, SongPlayer) {
        let store = Store::new(AppState::default(), AppState::reduce);
        let player = SongPlayer::connect(&store);
        player.actions().load_songs(songs());
        (store, player)
    }

    #[test]
    fn test_listeners_update_views() {
        let (store, player) = connected();
        assert_eq!(player.song_list().rows.len(), 2);
        assert_eq!(player.header().now_playing, None);

        store.dispatch(SongAction::PlayNext);
        let header = player.header();
        assert_eq!(header.now_playing, Some(Song::new("Song A", "Artist A")));
        assert!(header.is_playing);

        let rows = player.song_list().rows;
        assert!(rows[0].is_playing);
        assert!(!rows[1].is_active);
    }

    #[test]
    fn test_select_toggles_only_the_playing_song() {
        let (store, mut player) = connected();
        player.move_cursor(1);

        assert_eq!(
            player.select(),
            Some(SongAction::PlaySong(Song::new("Song B", "Artist B")))
        );
        assert!(store.get_state().player.is_playing);

        assert_eq!(player.select(), Some(SongAction::TogglePlay));
        assert!(!store.get_state().player.is_playing);

        // A paused active song is played again, not toggled
        assert_eq!(
            player.select(),
            Some(SongAction::PlaySong(Song::new("Song B", "Artist B")))
        );
        assert!(store.get_state().player.is_playing);
        assert_eq!(store.get_state().stats.toggles, 1);
        assert_eq!(store.get_state().stats.track_changes, 2);
    }

    #[test]
    fn test_select_on_empty_list() {
        let store = Store::new(AppState::default(), AppState::reduce);
        let mut player = SongPlayer::connect(&store);
        assert_eq!(player.select(), None);
        assert_eq!(store.get_state().stats, PlayStats::default());
    }

    #[test]
    fn test_cursor_is_clamped() {
        let (_store, mut player) = connected();
        player.move_cursor(-1);
        assert_eq!(player.cursor(), 0);
        player.move_cursor(5);
        assert_eq!(player.cursor(), 1);

        player.actions().load_songs(vec![Song::new("Only", "One")]);
        assert_eq!(player.cursor(), 0);
    }

    #[test]
    fn test_dirty_flag() {
        let (store, mut player) = connected();
        assert!(player.take_dirty());
        assert!(!player.take_dirty());

        player.move_cursor(1);
        assert!(player.take_dirty());

        // Already at the bottom
        player.move_cursor(1);
        assert!(!player.take_dirty());

        store.dispatch(SongAction::PlayNext);
        assert!(player.take_dirty());

        player.disconnect();
        store.dispatch(SongAction::PlayNext);
        assert!(!player.take_dirty());
    }

    #[test]
    fn test_keys() {
        let (store, mut player) = connected();

        assert_eq!(press(&mut player, 'n'), KeyOutcome::Handled);
        assert_eq!(store.get_state().player.active_index(), Some(0));

        assert_eq!(press(&mut player, 'p'), KeyOutcome::Handled);
        assert_eq!(store.get_state().player.active_index(), Some(1));

        press(&mut player, 't');
        assert!(!store.get_state().player.is_playing);

        press(&mut player, 'j');
        player.handle_key(key(KeyCode::Enter));
        assert!(store.get_state().player.is_playing);

        assert_eq!(press(&mut player, 'x'), KeyOutcome::Ignored);
        assert_eq!(press(&mut player, 'q'), KeyOutcome::Quit);
        assert_eq!(player.handle_key(key(KeyCode::Esc)), KeyOutcome::Quit);
    }

    #[test]
    fn test_disconnect_stops_updates() {
        let (store, mut player) = connected();
        assert_eq!(store.listener_count(), 2);

        player.disconnect();
        assert_eq!(store.listener_count(), 0);

        store.dispatch(SongAction::PlayNext);
        assert_eq!(player.header().now_playing, None);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (store, player) = connected();
        drop(player);
        assert_eq!(store.listener_count(), 0);
    }
}
