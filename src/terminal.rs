//! Terminal backend for headless/dedicated server console.
//!
//! This module provides stdin/stdout integration for running the console
//! without a graphical UI, useful for dedicated servers.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use bevy::prelude::*;

use crate::core::{ConsoleEngine, DisplaySink, PrintType};

/// Plugin that adds terminal (stdin/stdout) console support.
///
/// Add it after [`ConsolePlugin`](crate::ConsolePlugin): every stdin line is
/// placed in the input buffer and submitted, and console output goes to
/// stdout through a [`TerminalDisplay`].
#[derive(Default)]
pub struct TerminalPlugin {
    /// Whether to use colored output (ANSI escape codes).
    pub colored: bool,
}

impl Plugin for TerminalPlugin {
    fn build(&self, app: &mut App) {
        let (sender, receiver) = mpsc::channel();
        let _handle = spawn_stdin_reader(sender);

        app.insert_resource(StdinReceiver(Mutex::new(receiver)))
            .insert_resource(TerminalConfig { colored: self.colored })
            .add_systems(PreStartup, install_terminal_display)
            .add_systems(Update, read_stdin);
    }
}

/// Configuration for terminal behavior.
#[derive(Resource, Debug, Clone, Default)]
pub struct TerminalConfig {
    /// Whether to use colored output (ANSI escape codes).
    pub colored: bool,
}

/// Display sink writing console output to stdout.
#[derive(Debug, Clone, Default)]
pub struct TerminalDisplay {
    colored: bool,
}

impl TerminalDisplay {
    /// Create a display, optionally colored by print type.
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }
}

impl DisplaySink for TerminalDisplay {
    fn print(&mut self, text: &str, print_type: PrintType) {
        let mut stdout = io::stdout().lock();
        let _ = if self.colored {
            writeln!(stdout, "{}{}\x1b[0m", color_code(print_type), text)
        } else {
            writeln!(stdout, "{}", text)
        };
        let _ = stdout.flush();
    }

    fn clear(&mut self) {
        if self.colored {
            print!("\x1b[2J\x1b[H");
            let _ = io::stdout().flush();
        }
    }

    // Lines already written to stdout stay there
    fn remove_oldest(&mut self, _index: usize) {}
}

fn color_code(print_type: PrintType) -> &'static str {
    match print_type {
        PrintType::Misc => "\x1b[90m",
        PrintType::Info => "\x1b[0m",
        PrintType::Warning => "\x1b[33m",
        PrintType::Error => "\x1b[31m",
        PrintType::Success => "\x1b[32m",
    }
}

#[derive(Resource)]
struct StdinReceiver(Mutex<Receiver<String>>);

fn spawn_stdin_reader(sender: Sender<String>) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        let handle = stdin.lock();

        for line in handle.lines().map_while(Result::ok) {
            let text = line.trim().to_string();
            if !text.is_empty() && sender.send(text).is_err() {
                break;
            }
        }
    })
}

fn install_terminal_display(config: Res<TerminalConfig>, console: Option<ResMut<ConsoleEngine>>) {
    match console {
        Some(mut console) => console.set_display(TerminalDisplay::new(config.colored)),
        None => warn!("TerminalPlugin: no ConsoleEngine resource, add ConsolePlugin first"),
    }
}

fn read_stdin(receiver: Res<StdinReceiver>, console: Option<ResMut<ConsoleEngine>>) {
    let Some(mut console) = console else {
        return;
    };
    let Ok(rx) = receiver.0.lock() else {
        return;
    };
    while let Ok(line) = rx.try_recv() {
        console.set_input_buffer(line);
        console.submit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConCommand, ConsoleConfig};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_color_codes() {
        assert_eq!(color_code(PrintType::Error), "\x1b[31m");
        assert_eq!(color_code(PrintType::Warning), "\x1b[33m");
        assert_eq!(color_code(PrintType::Success), "\x1b[32m");
    }

    #[test]
    fn test_stdin_lines_are_submitted() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let console = ConsoleEngine::builder(ConsoleConfig::default())
            .command(ConCommand::new("ping", move |_, _| {
                seen.fetch_add(1, Ordering::SeqCst);
            }))
            .build()
            .unwrap();

        let (sender, receiver) = mpsc::channel();
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(console)
            .insert_resource(StdinReceiver(Mutex::new(receiver)))
            .add_systems(Update, read_stdin);

        sender.send("ping".to_string()).unwrap();
        sender.send("PING".to_string()).unwrap();
        app.update();

        assert_eq!(count.load(Ordering::SeqCst), 2);
        let console = app.world().resource::<ConsoleEngine>();
        assert_eq!(console.history().len(), 2);
        assert_eq!(console.input_buffer(), "");
    }
}
