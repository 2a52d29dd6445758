//! The console engine.
//!
//! [`ConsoleEngine`] owns every piece of console state and is the only entry
//! point collaborators call into. It is single-threaded and tick-driven:
//! hosts call [`tick`](ConsoleEngine::tick) or
//! [`update`](ConsoleEngine::update) once per frame.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use bevy::prelude::*;

use super::{
    Authorization, CommandArgs, CommandRef, CommandRegistry, CommandTask, ConsoleAction,
    ConsoleCommand, ConsoleConfig, ConsoleEvent, ConsoleObservers, DisplaySink, HistoryBuffer,
    InputSource, ModeGate, PrintType, Recorded, RegisterError, SubscriptionId, TaskStep,
    builtins, tokenize,
};

/// Printed when a cheat-mode-only command is refused.
pub const CHEAT_MODE_ONLY: &str = "Cheats not allowed.";
/// Printed when a dev-mode-only command is refused.
pub const DEV_MODE_ONLY: &str = "Please enable dev mode to use this command.";
/// Logged when dev mode is requested while disallowed.
pub const DEV_MODE_DISABLED: &str = "Cannot set dev mode, its usage has been disabled.";
/// Logged when cheat mode is requested while disallowed.
pub const CHEAT_MODE_DISABLED: &str = "Cannot set cheat mode, its usage has been disabled.";

/// Error line for a name that resolves to no command.
pub fn command_doesnt_exist(name: &str) -> String {
    format!("\"{}\" is not a command.", name)
}

/// What happened to a submitted line.
///
/// Purely informational: every case has already been reported through
/// prints and notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; a blank line was printed.
    Blank,
    /// No command answers to the name.
    UnknownCommand(String),
    /// Refused because cheat mode is off or disallowed.
    DeniedCheat,
    /// Refused because dev mode is off or disallowed.
    DeniedDev,
    /// The command ran.
    Executed,
    /// The command panicked; the panic was reported as an error line.
    Panicked,
}

struct RunningTask {
    name: String,
    task: Box<dyn CommandTask>,
}

/// The developer console.
///
/// # Examples
///
/// ```
/// use bevy_dev_console::core::{ConCommand, ConsoleAction, ConsoleConfig, ConsoleEngine};
///
/// let mut console = ConsoleEngine::builder(ConsoleConfig::default())
///     .builtins()
///     .command(ConCommand::new("greet", |args, console| {
///         console.print(format!("Hello, {}!", args.get(0).unwrap_or("World")));
///     }))
///     .build()
///     .unwrap();
///
/// console.update(ConsoleAction::Toggle);
/// assert!(console.is_open());
///
/// console.set_input_buffer("greet Developer");
/// console.update(ConsoleAction::Submit);
/// assert_eq!(console.input_buffer(), "");
/// assert_eq!(console.history().len(), 1);
/// ```
#[derive(Resource)]
pub struct ConsoleEngine {
    config: ConsoleConfig,
    registry: CommandRegistry,
    modes: ModeGate,
    history: HistoryBuffer,
    observers: ConsoleObservers,
    display: Option<Box<dyn DisplaySink>>,
    input: Option<Box<dyn InputSource>>,
    tasks: Vec<RunningTask>,
    input_buffer: String,
    open: bool,
    initialized: bool,
    shut_down: bool,
}

impl ConsoleEngine {
    /// Create an uninitialized engine with no commands or collaborators.
    ///
    /// Call [`initialize`](Self::initialize) once observers are subscribed,
    /// or use [`builder`](Self::builder) which does it for you.
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            modes: ModeGate::new(config.allow_dev_mode, config.allow_cheat_mode),
            history: HistoryBuffer::new(config.max_history),
            config,
            registry: CommandRegistry::new(),
            observers: ConsoleObservers::new(),
            display: None,
            input: None,
            tasks: Vec::new(),
            input_buffer: String::new(),
            open: false,
            initialized: false,
            shut_down: false,
        }
    }

    /// Start building an engine.
    pub fn builder(config: ConsoleConfig) -> ConsoleBuilder {
        ConsoleBuilder::new(config)
    }

    // --- Lifecycle ---

    /// Run the startup sequence and fire [`ConsoleEvent::Initialized`].
    ///
    /// Only the first call has any effect.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        if self.config.debug {
            info!("Console: initializing developer console");
        }

        if self.config.starts_open {
            self.open = true;
        }
        if self.config.open_on_start && !self.open {
            self.open();
        }
        if self.config.enable_cheat_mode_on_start {
            self.set_cheat_mode(true);
        }
        if self.config.enable_dev_mode_on_start {
            self.set_dev_mode(true);
        }

        self.emit(ConsoleEvent::Initialized);
    }

    /// Fire [`ConsoleEvent::Shutdown`] once. No-op before initialization.
    pub fn shutdown(&mut self) {
        if !self.initialized || self.shut_down {
            return;
        }
        self.shut_down = true;

        if self.config.debug {
            info!("Console: shutting down developer console");
        }
        self.emit(ConsoleEvent::Shutdown);
    }

    /// Whether [`initialize`](Self::initialize) has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // --- Collaborators ---

    /// Install the display sink, replacing any previous one.
    pub fn set_display(&mut self, display: impl DisplaySink) {
        self.display = Some(Box::new(display));
    }

    /// Install the input source polled by [`tick`](Self::tick).
    pub fn set_input_source(&mut self, input: impl InputSource) {
        self.input = Some(Box::new(input));
    }

    /// Add an observer. Observers are called in subscription order.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&ConsoleEvent) + Send + Sync + 'static,
    {
        self.observers.subscribe(observer)
    }

    /// Remove an observer.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn emit(&mut self, event: ConsoleEvent) {
        self.observers.emit(&event);
    }

    // --- Commands ---

    /// Register a command.
    pub fn register(&mut self, command: impl ConsoleCommand) -> Result<(), RegisterError> {
        self.registry.register(command)
    }

    /// Get the command registry.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Find a command by name (trimmed, case-insensitive).
    pub fn command(&self, name: &str) -> Option<CommandRef> {
        self.registry.lookup(name).cloned()
    }

    /// Number of multi-tick tasks still running.
    pub fn running_tasks(&self) -> usize {
        self.tasks.len()
    }

    // --- State ---

    /// Get the configuration.
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Whether the console is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the console is closed.
    pub fn is_closed(&self) -> bool {
        !self.open
    }

    /// Whether dev mode is enabled.
    pub fn is_dev_mode(&self) -> bool {
        self.modes.dev_mode()
    }

    /// Whether cheat mode is enabled.
    pub fn is_cheat_mode(&self) -> bool {
        self.modes.cheat_mode()
    }

    /// Get the mode gate.
    pub fn modes(&self) -> &ModeGate {
        &self.modes
    }

    /// Get the submitted-line history.
    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// The current uncommitted line.
    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    /// Replace the input buffer. Always fires
    /// [`ConsoleEvent::InputBufferChanged`], even if unchanged.
    pub fn set_input_buffer(&mut self, value: impl Into<String>) {
        self.input_buffer = value.into();
        self.emit(ConsoleEvent::InputBufferChanged(self.input_buffer.clone()));
    }

    // --- Modes ---

    /// Enable or disable dev mode.
    ///
    /// While dev mode is disallowed this only ever forces it off.
    pub fn set_dev_mode(&mut self, enable: bool) {
        if !self.modes.allow_dev_mode() && self.config.debug {
            error!("{}", DEV_MODE_DISABLED);
        }
        if let Some(value) = self.modes.set_dev_mode(enable) {
            self.emit(ConsoleEvent::DevModeChanged(value));
        }
    }

    /// Enable or disable cheat mode.
    ///
    /// While cheat mode is disallowed this only ever forces it off.
    pub fn set_cheat_mode(&mut self, enable: bool) {
        if !self.modes.allow_cheat_mode() && self.config.debug {
            error!("{}", CHEAT_MODE_DISABLED);
        }
        if let Some(value) = self.modes.set_cheat_mode(enable) {
            self.emit(ConsoleEvent::CheatModeChanged(value));
        }
    }

    /// Change whether dev mode may be used. Disallowing turns it off.
    pub fn set_allow_dev_mode(&mut self, allow: bool) {
        self.config.allow_dev_mode = allow;
        if let Some(value) = self.modes.set_allow_dev_mode(allow) {
            self.emit(ConsoleEvent::DevModeChanged(value));
        }
    }

    /// Change whether cheat mode may be used. Disallowing turns it off.
    pub fn set_allow_cheat_mode(&mut self, allow: bool) {
        self.config.allow_cheat_mode = allow;
        if let Some(value) = self.modes.set_allow_cheat_mode(allow) {
            self.emit(ConsoleEvent::CheatModeChanged(value));
        }
    }

    // --- Open / close ---

    /// Open the console. No-op if already open.
    pub fn open(&mut self) {
        if self.open {
            return;
        }
        self.open = true;
        self.emit(ConsoleEvent::Opened);
    }

    /// Close the console. No-op if already closed.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.emit(ConsoleEvent::Closed);
    }

    /// Flip the open state. [`ConsoleEvent::Toggled`] always fires.
    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
        self.emit(ConsoleEvent::Toggled);
    }

    // --- Tick ---

    /// Poll the input source once and apply its action.
    pub fn tick(&mut self) {
        let action = self
            .input
            .as_mut()
            .map(|input| input.next_action())
            .unwrap_or_default();
        self.update(action);
    }

    /// Apply one action, then advance every running task by one step.
    pub fn update(&mut self, action: ConsoleAction) {
        match action {
            ConsoleAction::None => {}
            ConsoleAction::Open => self.open(),
            ConsoleAction::Close => self.close(),
            ConsoleAction::Toggle => self.toggle(),
            ConsoleAction::Submit => {
                self.submit();
            }
            ConsoleAction::Clear => self.clear(),
            ConsoleAction::HistoryBack => self.history_back(),
            ConsoleAction::HistoryForward => self.history_forward(),
        }

        self.step_tasks();
    }

    /// Load the previous history entry into the input buffer.
    pub fn history_back(&mut self) {
        if let Some(line) = self.history.back().map(str::to_owned) {
            self.set_input_buffer(line);
        }
    }

    /// Load the next history entry into the input buffer.
    pub fn history_forward(&mut self) {
        if let Some(line) = self.history.forward().map(str::to_owned) {
            self.set_input_buffer(line);
        }
    }

    // --- Submit ---

    /// Submit the input buffer, then empty it if configured to.
    pub fn submit(&mut self) -> SubmitOutcome {
        let text = self.input_buffer.clone();
        let outcome = self.submit_text(&text);

        if self.config.clear_input_buffer_after_submit {
            self.set_input_buffer(String::new());
        }
        outcome
    }

    /// Record, parse and run a line. [`ConsoleEvent::Submitted`] fires after
    /// dispatch whatever the outcome.
    pub fn submit_text(&mut self, text: &str) -> SubmitOutcome {
        let outcome = self.dispatch(text);
        self.emit(ConsoleEvent::Submitted(text.to_string()));
        outcome
    }

    fn dispatch(&mut self, text: &str) -> SubmitOutcome {
        match self.history.record(text) {
            Recorded::Skipped => {
                self.print("");
                return SubmitOutcome::Blank;
            }
            Recorded::Evicted(_) => {
                if let Some(display) = self.display.as_mut() {
                    display.remove_oldest(0);
                }
            }
            Recorded::Appended => {}
        }

        let Ok(tokens) = tokenize(text) else {
            self.print("");
            return SubmitOutcome::Blank;
        };

        let Some(command) = self.command(tokens.command) else {
            if self.config.show_command_doesnt_exist_error {
                self.print_error(command_doesnt_exist(tokens.command));
            }
            return SubmitOutcome::UnknownCommand(tokens.command.to_string());
        };

        match self.modes.authorize(&*command) {
            Authorization::DeniedCheat => {
                self.print_error(CHEAT_MODE_ONLY);
                return SubmitOutcome::DeniedCheat;
            }
            Authorization::DeniedDev => {
                self.print_error(DEV_MODE_ONLY);
                return SubmitOutcome::DeniedDev;
            }
            Authorization::Allowed => {}
        }

        let args = CommandArgs::new(text, tokens.args);
        self.run_command(tokens.command, &command, &args)
    }

    fn run_command(&mut self, name: &str, command: &CommandRef, args: &CommandArgs) -> SubmitOutcome {
        if self.config.debug {
            info!("Console: executing '{}' with arguments {:?}", name, args.as_slice());
        }

        // Execute with panic safety so one bad command can't take the console down
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            command.execute(args, self);
            command.start_task(args)
        }));

        match result {
            Ok(task) => {
                self.emit(ConsoleEvent::CommandExecuted {
                    name: name.to_string(),
                    args: args.to_vec(),
                });
                if let Some(task) = task {
                    self.tasks.push(RunningTask {
                        name: name.to_string(),
                        task,
                    });
                }
                SubmitOutcome::Executed
            }
            Err(payload) => {
                self.print_error(format!(
                    "Command '{}' panicked: {}",
                    name,
                    panic_message(payload.as_ref())
                ));
                SubmitOutcome::Panicked
            }
        }
    }

    fn step_tasks(&mut self) {
        if self.tasks.is_empty() {
            return;
        }

        let running = std::mem::take(&mut self.tasks);
        let mut pending = Vec::with_capacity(running.len());

        for mut running_task in running {
            let result = panic::catch_unwind(AssertUnwindSafe(|| running_task.task.step(self)));
            match result {
                Ok(TaskStep::Pending) => pending.push(running_task),
                Ok(TaskStep::Done) => {}
                Err(payload) => {
                    self.print_error(format!(
                        "Command '{}' panicked: {}",
                        running_task.name,
                        panic_message(payload.as_ref())
                    ));
                }
            }
        }

        // Tasks started while stepping go after the ones already running
        pending.append(&mut self.tasks);
        self.tasks = pending;
    }

    // --- Output ---

    /// Clear the display and history, then fire [`ConsoleEvent::Cleared`].
    pub fn clear(&mut self) {
        if let Some(display) = self.display.as_mut() {
            display.clear();
        }
        self.history.clear();
        self.emit(ConsoleEvent::Cleared);
    }

    /// Print an [`Info`](PrintType::Info) line.
    pub fn print(&mut self, text: impl Into<String>) {
        self.print_as(text, PrintType::Info);
    }

    /// Print a line with the given classification.
    pub fn print_as(&mut self, text: impl Into<String>, print_type: PrintType) {
        let text = text.into();
        if let Some(display) = self.display.as_mut() {
            display.print(&text, print_type);
        }
        self.emit(ConsoleEvent::Printed(text));
    }

    /// Print a [`Success`](PrintType::Success) line.
    pub fn print_success(&mut self, text: impl Into<String>) {
        self.print_as(text, PrintType::Success);
    }

    /// Print a [`Warning`](PrintType::Warning) line.
    pub fn print_warning(&mut self, text: impl Into<String>) {
        self.print_as(text, PrintType::Warning);
    }

    /// Print an [`Error`](PrintType::Error) line.
    pub fn print_error(&mut self, text: impl Into<String>) {
        self.print_as(text, PrintType::Error);
    }
}

impl std::fmt::Debug for ConsoleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleEngine")
            .field("open", &self.open)
            .field("modes", &self.modes)
            .field("input_buffer", &self.input_buffer)
            .field("history", &self.history.len())
            .field("registry", &self.registry)
            .field("tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Assembles a [`ConsoleEngine`] and runs its startup sequence.
pub struct ConsoleBuilder {
    config: ConsoleConfig,
    display: Option<Box<dyn DisplaySink>>,
    input: Option<Box<dyn InputSource>>,
    commands: Vec<CommandRef>,
    observers: Vec<super::events::ConsoleObserver>,
}

impl ConsoleBuilder {
    /// Create a builder with the given configuration.
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            display: None,
            input: None,
            commands: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Set the display sink.
    pub fn display(mut self, display: impl DisplaySink) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    /// Set the input source.
    pub fn input(mut self, input: impl InputSource) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    /// Queue a command for registration.
    pub fn command(mut self, command: impl ConsoleCommand) -> Self {
        self.commands.push(std::sync::Arc::new(command));
        self
    }

    /// Queue the built-in commands (`echo`, `help`, `clear`) at this point
    /// of the registration order.
    pub fn builtins(mut self) -> Self {
        self.commands.extend(builtins::builtin_commands());
        self
    }

    /// Subscribe an observer before initialization so it sees startup events.
    pub fn observer<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&ConsoleEvent) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
        self
    }

    /// Register everything and initialize the engine.
    pub fn build(self) -> Result<ConsoleEngine, RegisterError> {
        let mut engine = ConsoleEngine::new(self.config);
        engine.display = self.display;
        engine.input = self.input;

        for command in self.commands {
            engine.registry.register_shared(command)?;
        }
        for observer in self.observers {
            engine.observers.subscribe(observer);
        }

        engine.initialize();
        Ok(engine)
    }
}
