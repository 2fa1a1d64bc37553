use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event, KeyEvent};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use dux::{apply_middleware, create_store, ActionLoggerConfig, EnhancedStore, LoggingMiddleware};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use song_player::action::SongAction;
use song_player::library::{resolve_songs, Song};
use song_player::state::AppState;
use song_player::ui::{KeyOutcome, SongPlayer};

#[derive(Parser, Debug)]
#[command(name = "song-player")]
#[command(about = "Play through a song list from the terminal")]
struct Args {
    /// Song library: a JSON array of {"title", "artist"} objects
    #[arg(long)]
    songs: Option<PathBuf>,

    /// Write logs to this file (defaults to $SONG_PLAYER_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Only log actions matching these comma-separated glob patterns
    #[arg(long)]
    log_actions: Option<String>,

    /// Start playing the first song right away
    #[arg(long, default_value_t = false)]
    autoplay: bool,
}

/// Terminal input forwarded from the poller task
enum RawEvent {
    Key(KeyEvent),
    Resize,
}

fn init_tracing(path: Option<PathBuf>) {
    // Logging to stdout would corrupt the TUI, so only a file is supported
    let from_env = || std::env::var_os("SONG_PLAYER_LOG").map(PathBuf::from);
    let Some(path) = path.or_else(from_env) else {
        return;
    };

    let file = match std::fs::File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot create log file {}: {e}", path.display());
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("song_player=debug,dux_core=debug"));

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.clone());

    // Fail before touching the terminal so the error stays readable
    let songs = match resolve_songs(args.songs.as_deref()) {
        Ok(songs) => songs,
        Err(e) => return Err(io::Error::other(e)),
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run_app(terminal, args, songs);

    disable_raw_mode()?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)?;

    result
}

#[tokio::main]
async fn run_app(
    mut terminal: Terminal<CrosstermBackend<io::Stdout>>,
    args: Args,
    songs: Vec<Song>,
) -> io::Result<()> {
    let logger = LoggingMiddleware::new()
        .with_config(ActionLoggerConfig::new(args.log_actions.as_deref(), None));
    let store: EnhancedStore<AppState, SongAction> =
        apply_middleware(logger).enhance(create_store)(AppState::reduce);

    let mut player = SongPlayer::connect(&store);
    player.actions().load_songs(songs);
    if args.autoplay {
        player.actions().play_next();
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let cancel_token = CancellationToken::new();
    let poller = spawn_event_poller(
        event_tx,
        Duration::from_millis(10),
        Duration::from_millis(16),
        cancel_token.clone(),
    );

    info!("Song player started");
    loop {
        if player.take_dirty() {
            terminal.draw(|frame| player.render(frame, frame.area()))?;
        }

        let Some(raw) = event_rx.recv().await else {
            break;
        };
        match raw {
            RawEvent::Key(key) => {
                if player.handle_key(key) == KeyOutcome::Quit {
                    break;
                }
            }
            RawEvent::Resize => {
                terminal.draw(|frame| player.render(frame, frame.area()))?;
            }
        }
    }

    cancel_token.cancel();
    let _ = poller.await;
    info!("Song player stopped");
    Ok(())
}

/// Poll crossterm for input on a background task
fn spawn_event_poller(
    tx: mpsc::UnboundedSender<RawEvent>,
    poll_timeout: Duration,
    loop_sleep: Duration,
    cancel_token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        const MAX_EVENTS_PER_BATCH: usize = 20;

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    // Leave nothing buffered for the shell
                    while event::poll(Duration::ZERO).unwrap_or(false) {
                        let _ = event::read();
                    }
                    break;
                }
                _ = tokio::time::sleep(loop_sleep) => {
                    let mut events_processed = 0;
                    while events_processed < MAX_EVENTS_PER_BATCH
                        && event::poll(poll_timeout).unwrap_or(false)
                    {
                        events_processed += 1;
                        let raw = match event::read() {
                            Ok(Event::Key(key)) => RawEvent::Key(key),
                            Ok(Event::Resize(..)) => RawEvent::Resize,
                            _ => continue,
                        };
                        if tx.send(raw).is_err() {
                            debug!("Event channel closed, stopping poller");
                            return;
                        }
                    }
                }
            }
        }
    })
}
