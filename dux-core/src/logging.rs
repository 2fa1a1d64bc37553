//! Action logging middleware with pattern-based filtering
//!
//! Logs dispatched actions through `tracing`. Which actions get logged is
//! controlled by glob patterns matched against [`Action::name`].
//!
//! # Example
//!
//! ```
//! use dux_core::logging::{ActionLoggerConfig, LoggingMiddleware};
//!
//! // Log every action
//! let middleware = LoggingMiddleware::new();
//!
//! // Log only Play* actions, before and after the reducer runs
//! let middleware = LoggingMiddleware::verbose()
//!     .with_config(ActionLoggerConfig::new(Some("Play*"), None));
//! assert!(middleware.config().should_log("PlaySong"));
//! assert!(!middleware.config().should_log("LoadSongs"));
//! ```

use tracing::debug;

use crate::action::Action;
use crate::middleware::Middleware;
use crate::store::{Dispatch, Store};

/// Configuration for action logging with glob pattern filtering.
///
/// Patterns support:
/// - `*` matches any sequence of characters
/// - `?` matches any single character
/// - Literal text matches exactly
///
/// # Examples
///
/// - `Play*` matches PlaySong, PlayNext, PlayPrev
/// - `*Song*` matches any action containing "Song"
/// - `TogglePlay` matches only TogglePlay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionLoggerConfig {
    /// If non-empty, only log actions matching these patterns
    pub include_patterns: Vec<String>,
    /// Exclude actions matching these patterns (applied after include)
    pub exclude_patterns: Vec<String>,
}

fn split_patterns(patterns: &str) -> Vec<String> {
    patterns
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

impl ActionLoggerConfig {
    /// Create a new config from comma-separated pattern strings
    ///
    /// # Arguments
    /// - `include`: comma-separated glob patterns (or None for all)
    /// - `exclude`: comma-separated glob patterns (or None to exclude nothing)
    ///
    /// # Example
    /// ```
    /// use dux_core::logging::ActionLoggerConfig;
    ///
    /// let config = ActionLoggerConfig::new(Some("Play*, TogglePlay"), Some("PlayPrev"));
    /// assert!(config.should_log("PlaySong"));
    /// assert!(config.should_log("TogglePlay"));
    /// assert!(!config.should_log("PlayPrev"));
    /// assert!(!config.should_log("LoadSongs"));
    /// ```
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Self {
        Self {
            include_patterns: include.map(split_patterns).unwrap_or_default(),
            exclude_patterns: exclude.map(split_patterns).unwrap_or_default(),
        }
    }

    /// Create a config with specific pattern vectors
    pub fn with_patterns(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            include_patterns: include,
            exclude_patterns: exclude,
        }
    }

    /// Check if an action name should be logged based on include/exclude patterns
    pub fn should_log(&self, action_name: &str) -> bool {
        if !self.include_patterns.is_empty()
            && !self
                .include_patterns
                .iter()
                .any(|p| glob_match(p, action_name))
        {
            return false;
        }

        !self
            .exclude_patterns
            .iter()
            .any(|p| glob_match(p, action_name))
    }
}

/// Match `text` against a glob `pattern` (`*` and `?` wildcards)
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let mut pi = 0;
    let mut ti = 0;
    let mut star: Option<(usize, usize)> = None;

    while ti < text.len() {
        match pattern.get(pi) {
            Some('?') => {
                pi += 1;
                ti += 1;
            }
            Some('*') => {
                star = Some((pi, ti));
                pi += 1;
            }
            Some(&c) if c == text[ti] => {
                pi += 1;
                ti += 1;
            }
            _ => match star {
                // Let the last star swallow one more character and retry
                Some((star_pi, star_ti)) => {
                    star = Some((star_pi, star_ti + 1));
                    pi = star_pi + 1;
                    ti = star_ti + 1;
                }
                None => return false,
            },
        }
    }

    pattern[pi..].iter().all(|&c| c == '*')
}

/// Middleware that logs actions (for debugging)
///
/// Emits `tracing` debug events; install a subscriber to see them.
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    /// Whether to log before the reducer runs
    pub log_before: bool,
    /// Whether to log after the reducer and listeners have run
    pub log_after: bool,
    config: ActionLoggerConfig,
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingMiddleware {
    /// Create a new logging middleware with default settings (log after only)
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
            config: ActionLoggerConfig::default(),
        }
    }

    /// Create a logging middleware that logs both before and after
    pub fn verbose() -> Self {
        Self {
            log_before: true,
            ..Self::new()
        }
    }

    /// Replace the filter configuration
    pub fn with_config(mut self, config: ActionLoggerConfig) -> Self {
        self.config = config;
        self
    }

    /// The active filter configuration
    pub fn config(&self) -> &ActionLoggerConfig {
        &self.config
    }
}

impl<S: 'static, A: Action> Middleware<S, A> for LoggingMiddleware {
    fn handle(&self, store: &Store<S, A>, next: &Dispatch<A>, action: A) -> A {
        let name = action.name();
        if !self.config.should_log(name) {
            return next.call(action);
        }

        if self.log_before {
            debug!(action = %name, "Dispatching action");
        }
        let action = next.call(action);
        if self.log_after {
            debug!(
                action = %name,
                listeners = store.listener_count(),
                "Action processed"
            );
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::apply_middleware;
    use crate::store::create_store;
    use crate::EnhancedStore;

    #[test]
    fn test_glob_match_exact() {
        assert!(glob_match("Tick", "Tick"));
        assert!(!glob_match("Tick", "Tock"));
        assert!(!glob_match("Tick", "TickTock"));
    }

    #[test]
    fn test_glob_match_star() {
        assert!(glob_match("Play*", "PlaySong"));
        assert!(glob_match("Play*", "PlayNext"));
        assert!(glob_match("Play*", "Play"));
        assert!(!glob_match("Play*", "TogglePlay"));

        assert!(glob_match("*Play", "TogglePlay"));
        assert!(glob_match("*Song*", "LoadSongs"));
    }

    #[test]
    fn test_glob_match_question() {
        assert!(glob_match("Tick?", "Ticks"));
        assert!(!glob_match("Tick?", "Tick"));
        assert!(!glob_match("Tick?", "Tickss"));
    }

    #[test]
    fn test_glob_match_backtracks() {
        assert!(glob_match("*Add*", "SearchAddChar"));
        assert!(glob_match("Play*Prev", "PlayPrevPrev"));
        assert!(!glob_match("Play*Prev", "PlayPrevNext"));
    }

    #[test]
    fn test_config_include() {
        let config = ActionLoggerConfig::new(Some("Play*,LoadSongs"), None);
        assert!(config.should_log("PlaySong"));
        assert!(config.should_log("LoadSongs"));
        assert!(!config.should_log("TogglePlay"));
    }

    #[test]
    fn test_config_exclude() {
        let config = ActionLoggerConfig::new(None, Some("LoadSongs, Play*"));
        assert!(!config.should_log("LoadSongs"));
        assert!(!config.should_log("PlayNext"));
        assert!(config.should_log("TogglePlay"));
    }

    #[test]
    fn test_config_default_logs_everything() {
        let config = ActionLoggerConfig::default();
        assert!(config.include_patterns.is_empty());
        assert!(config.exclude_patterns.is_empty());
        assert!(config.should_log("LoadSongs"));
        assert!(config.should_log("TogglePlay"));
        assert_eq!(config, ActionLoggerConfig::new(None, None));
    }

    #[test]
    fn test_config_empty_patterns_are_ignored() {
        let config = ActionLoggerConfig::new(Some(" , "), Some(""));
        assert!(config.include_patterns.is_empty());
        assert!(config.exclude_patterns.is_empty());
        assert!(config.should_log("PlaySong"));
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Refresh,
        Bump,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Refresh => "Refresh",
                TestAction::Bump => "Bump",
            }
        }
    }

    fn test_reducer(state: &u32, action: &TestAction) -> u32 {
        match action {
            TestAction::Refresh => *state,
            TestAction::Bump => state + 1,
        }
    }

    #[test]
    fn test_logging_middleware_passes_actions_through() {
        let store: EnhancedStore<u32, TestAction> =
            apply_middleware(
                LoggingMiddleware::verbose()
                    .with_config(ActionLoggerConfig::new(None, Some("Refresh"))),
            )
            .enhance(create_store)(test_reducer);

        // Filtered out of the log, but still reduced
        store.dispatch(TestAction::Refresh);
        store.dispatch(TestAction::Bump);
        store.dispatch(TestAction::Bump);
        assert_eq!(*store.get_state(), 2);
    }
}
