//! Engine configuration, set once at construction.

#[cfg(feature = "persist")]
use serde::{Deserialize, Serialize};

/// Default number of history entries kept.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Options recognized by [`ConsoleEngine`](super::ConsoleEngine).
///
/// # Examples
///
/// ```
/// use bevy_dev_console::core::ConsoleConfig;
///
/// let config = ConsoleConfig::default()
///     .max_history(20)
///     .allow_cheat_mode(true)
///     .open_on_start(true);
/// assert_eq!(config.max_history, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "persist", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "persist", serde(default))]
pub struct ConsoleConfig {
    /// Total number of history entries remembered.
    pub max_history: usize,
    /// Empty the input buffer after submitting it.
    pub clear_input_buffer_after_submit: bool,
    /// Print an error when a submitted command doesn't exist.
    pub show_command_doesnt_exist_error: bool,
    /// Permit dev mode and dev-mode-only commands.
    pub allow_dev_mode: bool,
    /// Permit cheat mode and cheat-mode-only commands.
    pub allow_cheat_mode: bool,
    /// The console is considered open from the start, without an `Opened` event.
    pub starts_open: bool,
    /// Call `open()` during initialization.
    pub open_on_start: bool,
    /// Enable dev mode during initialization if allowed.
    pub enable_dev_mode_on_start: bool,
    /// Enable cheat mode during initialization if allowed.
    pub enable_cheat_mode_on_start: bool,
    /// Log lifecycle and execution details.
    pub debug: bool,
    /// Print captured host log records into the console.
    pub print_host_logs: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            clear_input_buffer_after_submit: true,
            show_command_doesnt_exist_error: true,
            allow_dev_mode: true,
            allow_cheat_mode: false,
            starts_open: false,
            open_on_start: false,
            enable_dev_mode_on_start: false,
            enable_cheat_mode_on_start: false,
            debug: false,
            print_host_logs: false,
        }
    }
}

impl ConsoleConfig {
    /// Set the history capacity.
    pub fn max_history(mut self, max: usize) -> Self {
        self.max_history = max;
        self
    }

    /// Set whether submitting empties the input buffer.
    pub fn clear_input_buffer_after_submit(mut self, enable: bool) -> Self {
        self.clear_input_buffer_after_submit = enable;
        self
    }

    /// Set whether unknown commands print an error.
    pub fn show_command_doesnt_exist_error(mut self, enable: bool) -> Self {
        self.show_command_doesnt_exist_error = enable;
        self
    }

    /// Set whether dev mode may be used.
    pub fn allow_dev_mode(mut self, allow: bool) -> Self {
        self.allow_dev_mode = allow;
        self
    }

    /// Set whether cheat mode may be used.
    pub fn allow_cheat_mode(mut self, allow: bool) -> Self {
        self.allow_cheat_mode = allow;
        self
    }

    /// Set whether the console starts open.
    pub fn starts_open(mut self, enable: bool) -> Self {
        self.starts_open = enable;
        self
    }

    /// Set whether the console opens during initialization.
    pub fn open_on_start(mut self, enable: bool) -> Self {
        self.open_on_start = enable;
        self
    }

    /// Set whether dev mode is enabled during initialization.
    pub fn enable_dev_mode_on_start(mut self, enable: bool) -> Self {
        self.enable_dev_mode_on_start = enable;
        self
    }

    /// Set whether cheat mode is enabled during initialization.
    pub fn enable_cheat_mode_on_start(mut self, enable: bool) -> Self {
        self.enable_cheat_mode_on_start = enable;
        self
    }

    /// Set debug logging.
    pub fn debug(mut self, enable: bool) -> Self {
        self.debug = enable;
        self
    }

    /// Set whether captured host logs are printed.
    pub fn print_host_logs(mut self, enable: bool) -> Self {
        self.print_host_logs = enable;
        self
    }
}
