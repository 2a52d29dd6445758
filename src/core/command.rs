//! Console command protocol.
//!
//! Commands are named actions resolved by the registry and executed by the
//! engine. They talk to the outside world only through the
//! [`ConsoleEngine`] they are handed.

use super::ConsoleEngine;

/// Help text reported by commands that do not provide any.
pub const NO_HELP: &str = "none";

/// Arguments passed to a command.
#[derive(Debug, Clone)]
pub struct CommandArgs<'a> {
    /// The raw submitted line.
    raw: &'a str,
    /// Parsed arguments (excluding command name).
    args: Vec<&'a str>,
}

impl<'a> CommandArgs<'a> {
    /// Create new command args from a raw string and parsed arguments.
    pub fn new(raw: &'a str, args: Vec<&'a str>) -> Self {
        Self { raw, args }
    }

    /// Get the raw submitted line.
    #[inline]
    pub fn raw(&self) -> &str {
        self.raw
    }

    /// Get the number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Check if there are no arguments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Get an argument by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.args.get(index).copied()
    }

    /// Try to parse an argument as a specific type.
    pub fn parse<T: std::str::FromStr>(&self, index: usize) -> Option<T> {
        self.get(index).and_then(|s| s.parse().ok())
    }

    /// Get all arguments as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[&str] {
        &self.args
    }

    /// Iterate over arguments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.args.iter().copied()
    }

    /// Join all arguments with a separator.
    pub fn join(&self, separator: &str) -> String {
        self.args.join(separator)
    }

    /// Copy the arguments into owned strings.
    pub fn to_vec(&self) -> Vec<String> {
        self.args.iter().map(|s| s.to_string()).collect()
    }
}

impl std::ops::Index<usize> for CommandArgs<'_> {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        self.args[index]
    }
}

/// Result of advancing a [`CommandTask`] by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStep {
    /// More steps remain.
    Pending,
    /// The task is finished and will be dropped.
    Done,
}

/// A command body that runs across several ticks.
///
/// The engine advances each running task once per
/// [`update`](ConsoleEngine::update). Tasks run until they return
/// [`TaskStep::Done`]; there is no cancellation.
pub trait CommandTask: Send + Sync + 'static {
    /// Advance by one step.
    fn step(&mut self, console: &mut ConsoleEngine) -> TaskStep;
}

impl<F> CommandTask for F
where
    F: FnMut(&mut ConsoleEngine) -> TaskStep + Send + Sync + 'static,
{
    fn step(&mut self, console: &mut ConsoleEngine) -> TaskStep {
        self(console)
    }
}

/// An executable console command.
///
/// # Examples
///
/// ```
/// use bevy_dev_console::core::{CommandArgs, ConsoleCommand, ConsoleEngine};
///
/// struct HelloWorld;
///
/// impl ConsoleCommand for HelloWorld {
///     fn names(&self) -> Vec<&str> {
///         vec!["helloworld", "hw"]
///     }
///
///     fn help(&self) -> &str {
///         "Prints \"Hello world!\""
///     }
///
///     fn execute(&self, _args: &CommandArgs, console: &mut ConsoleEngine) {
///         console.print("Hello world!");
///     }
/// }
/// ```
pub trait ConsoleCommand: Send + Sync + 'static {
    /// Every name this command answers to. Compared trimmed and
    /// case-insensitively. Must contain at least one non-blank name.
    fn names(&self) -> Vec<&str>;

    /// Human-readable description.
    fn help(&self) -> &str {
        NO_HELP
    }

    /// Only runs while dev mode is enabled and allowed.
    fn dev_mode_only(&self) -> bool {
        false
    }

    /// Only runs while cheat mode is enabled and allowed.
    fn cheat_mode_only(&self) -> bool {
        false
    }

    /// Perform the command.
    fn execute(&self, args: &CommandArgs, console: &mut ConsoleEngine);

    /// Optionally start a multi-tick task after `execute` returns.
    fn start_task(&self, _args: &CommandArgs) -> Option<Box<dyn CommandTask>> {
        None
    }
}

/// Gating flags for [`ConCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandFlags(u8);

impl CommandFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);

    /// Requires dev mode.
    pub const DEV_ONLY: Self = Self(1 << 0);

    /// Requires cheat mode.
    pub const CHEAT: Self = Self(1 << 1);

    /// Check if a flag is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Combine two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check if no flags are set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for CommandFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Type alias for command handler functions.
pub type CommandHandler = Box<dyn Fn(&CommandArgs, &mut ConsoleEngine) + Send + Sync>;

/// Type alias for task factories attached to a [`ConCommand`].
pub type TaskFactory = Box<dyn Fn(&CommandArgs) -> Option<Box<dyn CommandTask>> + Send + Sync>;

/// A console command assembled at runtime from a closure.
///
/// # Examples
///
/// ```
/// use bevy_dev_console::core::{CommandFlags, ConCommand};
///
/// let god = ConCommand::new("god", |_args, console| {
///     console.print_success("God mode on");
/// })
/// .alias("buddha")
/// .help("Become invulnerable")
/// .flags(CommandFlags::CHEAT);
/// ```
pub struct ConCommand {
    names: Vec<Box<str>>,
    help: Box<str>,
    flags: CommandFlags,
    handler: CommandHandler,
    task: Option<TaskFactory>,
}

impl ConCommand {
    /// Create a new command with the given name and handler.
    pub fn new<F>(name: impl Into<Box<str>>, handler: F) -> Self
    where
        F: Fn(&CommandArgs, &mut ConsoleEngine) + Send + Sync + 'static,
    {
        Self {
            names: vec![name.into()],
            help: NO_HELP.into(),
            flags: CommandFlags::NONE,
            handler: Box::new(handler),
            task: None,
        }
    }

    /// Add another name.
    pub fn alias(mut self, name: impl Into<Box<str>>) -> Self {
        self.names.push(name.into());
        self
    }

    /// Set the help text.
    pub fn help(mut self, help: impl Into<Box<str>>) -> Self {
        self.help = help.into();
        self
    }

    /// Set the flags.
    pub fn flags(mut self, flags: CommandFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Attach a task factory, called after the handler on every execution.
    pub fn task<F>(mut self, factory: F) -> Self
    where
        F: Fn(&CommandArgs) -> Option<Box<dyn CommandTask>> + Send + Sync + 'static,
    {
        self.task = Some(Box::new(factory));
        self
    }

    /// Get the flags.
    #[inline]
    pub fn get_flags(&self) -> CommandFlags {
        self.flags
    }
}

impl ConsoleCommand for ConCommand {
    fn names(&self) -> Vec<&str> {
        self.names.iter().map(AsRef::as_ref).collect()
    }

    fn help(&self) -> &str {
        &self.help
    }

    fn dev_mode_only(&self) -> bool {
        self.flags.contains(CommandFlags::DEV_ONLY)
    }

    fn cheat_mode_only(&self) -> bool {
        self.flags.contains(CommandFlags::CHEAT)
    }

    fn execute(&self, args: &CommandArgs, console: &mut ConsoleEngine) {
        (self.handler)(args, console);
    }

    fn start_task(&self, args: &CommandArgs) -> Option<Box<dyn CommandTask>> {
        self.task.as_ref().and_then(|factory| factory(args))
    }
}

impl std::fmt::Debug for ConCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConCommand")
            .field("names", &self.names)
            .field("help", &self.help)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args_basic() {
        let args = CommandArgs::new("echo hello world", vec!["hello", "world"]);
        assert_eq!(args.len(), 2);
        assert_eq!(args.get(0), Some("hello"));
        assert_eq!(args.get(1), Some("world"));
        assert_eq!(args.get(2), None);
        assert_eq!(&args[1], "world");
        assert_eq!(args.raw(), "echo hello world");
    }

    #[test]
    fn test_command_args_parse() {
        let args = CommandArgs::new("give 42", vec!["42"]);
        assert_eq!(args.parse::<i32>(0), Some(42));
        assert_eq!(args.parse::<i32>(1), None);
    }

    #[test]
    fn test_command_args_join_keeps_empty() {
        let args = CommandArgs::new("echo a  b", vec!["a", "", "b"]);
        assert_eq!(args.join(" "), "a  b");
        assert_eq!(args.to_vec(), vec!["a", "", "b"]);
    }

    #[test]
    fn test_concommand_creation() {
        let cmd = ConCommand::new("noclip", |_args, _console| {})
            .alias("nc")
            .help("Fly through walls")
            .flags(CommandFlags::CHEAT | CommandFlags::DEV_ONLY);

        assert_eq!(cmd.names(), vec!["noclip", "nc"]);
        assert_eq!(ConsoleCommand::help(&cmd), "Fly through walls");
        assert!(cmd.cheat_mode_only());
        assert!(cmd.dev_mode_only());
    }

    #[test]
    fn test_concommand_defaults() {
        let cmd = ConCommand::new("status", |_args, _console| {});

        assert_eq!(ConsoleCommand::help(&cmd), NO_HELP);
        assert!(!cmd.cheat_mode_only());
        assert!(!cmd.dev_mode_only());
        assert!(cmd.get_flags().is_empty());
        assert!(cmd.start_task(&CommandArgs::new("status", vec![])).is_none());
    }

    #[test]
    fn test_flags() {
        let flags = CommandFlags::CHEAT | CommandFlags::DEV_ONLY;
        assert!(flags.contains(CommandFlags::CHEAT));
        assert!(flags.contains(CommandFlags::DEV_ONLY));
        assert!(!CommandFlags::CHEAT.contains(CommandFlags::DEV_ONLY));
    }
}
