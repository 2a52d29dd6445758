//! Command registry.
//!
//! Ordered storage with a normalized-name index. When two commands share a
//! name, the first one registered keeps it.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use super::ConsoleCommand;

/// Shared handle to a registered command.
pub type CommandRef = Arc<dyn ConsoleCommand>;

/// Registration error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// The command exposes no non-blank name.
    NoNames,
}

impl std::fmt::Display for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegisterError::NoNames => write!(f, "command has no names"),
        }
    }
}

impl std::error::Error for RegisterError {}

/// Normalize a command name for lookup.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Central registry for console commands.
///
/// # Examples
///
/// ```
/// use bevy_dev_console::core::{CommandRegistry, ConCommand};
///
/// let mut registry = CommandRegistry::new();
/// registry.register(ConCommand::new("echo", |args, console| {
///     console.print(args.join(" "));
/// })).unwrap();
///
/// assert!(registry.lookup("  ECHO ").is_some());
/// assert!(registry.lookup("nope").is_none());
/// ```
#[derive(Default)]
pub struct CommandRegistry {
    /// Commands in registration order.
    commands: Vec<CommandRef>,
    /// Normalized name -> index of the first command claiming it.
    index: HashMap<Box<str>, usize>,
}

impl CommandRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command.
    ///
    /// Colliding names are accepted; lookups keep resolving to the earlier
    /// command and a warning is logged.
    pub fn register(&mut self, command: impl ConsoleCommand) -> Result<(), RegisterError> {
        self.register_shared(Arc::new(command))
    }

    /// Register an already shared command.
    pub fn register_shared(&mut self, command: CommandRef) -> Result<(), RegisterError> {
        let keys: Vec<String> = command
            .names()
            .into_iter()
            .map(normalize_name)
            .filter(|key| !key.is_empty())
            .collect();

        if keys.is_empty() {
            return Err(RegisterError::NoNames);
        }

        let position = self.commands.len();
        for key in keys {
            match self.index.entry(key.into_boxed_str()) {
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
                Entry::Occupied(slot) if *slot.get() != position => {
                    bevy::log::warn!(
                        "Console: '{}' is already registered, keeping the earlier command",
                        slot.key()
                    );
                }
                Entry::Occupied(_) => {}
            }
        }

        self.commands.push(command);
        Ok(())
    }

    /// Find the first registered command answering to `name`.
    pub fn lookup(&self, name: &str) -> Option<&CommandRef> {
        let key = normalize_name(name);
        self.index.get(key.as_str()).map(|&i| &self.commands[i])
    }

    /// Check if a name resolves to a command.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// All commands in registration order.
    pub fn all(&self) -> &[CommandRef] {
        &self.commands
    }

    /// Iterate over all commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandRef> {
        self.commands.iter()
    }

    /// Get the number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.commands.len())
            .field("names", &self.index.len())
            .finish()
    }
}
