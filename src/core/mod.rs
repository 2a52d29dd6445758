//! Core console types with zero optional dependencies.
//!
//! This module provides the fundamental building blocks:
//! - [`ConsoleEngine`] - The console itself: state, dispatch and notifications
//! - [`ConsoleCommand`] / [`ConCommand`] - Commands, hand-written or closure-based
//! - [`CommandRegistry`] - Case-insensitive name lookup
//! - [`ModeGate`] - Dev-mode and cheat-mode gating
//! - [`HistoryBuffer`] - Bounded history with navigation
//! - [`tokenize`] - Simple command tokenizer
//! - [`InputSource`] / [`DisplaySink`] - Host collaborator seams
//! - Events for observers and the Bevy message bus

mod builtins;
mod command;
mod config;
mod engine;
mod events;
mod history;
mod io;
mod modes;
mod registry;
mod tokenizer;

#[cfg(test)]
pub(crate) mod testing;

pub use builtins::{builtin_commands, register_builtin_commands};
pub use command::{
    CommandArgs, CommandFlags, CommandHandler, CommandTask, ConCommand, ConsoleCommand, NO_HELP,
    TaskFactory, TaskStep,
};
pub use config::{ConsoleConfig, DEFAULT_MAX_HISTORY};
pub use engine::{
    CHEAT_MODE_DISABLED, CHEAT_MODE_ONLY, ConsoleBuilder, ConsoleEngine, DEV_MODE_DISABLED,
    DEV_MODE_ONLY, SubmitOutcome, command_doesnt_exist,
};
pub use events::{
    ConsoleAction, ConsoleEvent, ConsoleObserver, ConsoleObservers, PrintType, SubscriptionId,
};
pub use history::{HistoryBuffer, Recorded};
pub use io::{DisplaySink, InputSource};
pub use modes::{Authorization, ModeGate};
pub use registry::{CommandRef, CommandRegistry, RegisterError, normalize_name};
pub use tokenizer::{TokenizeError, TokenizedCommand, tokenize};
