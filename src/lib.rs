//! An embeddable developer console for Bevy.
//!
//! bevy_dev_console provides:
//!
//! - **ConsoleEngine**: Console state, command dispatch and change notifications
//! - **ConCommand**: Console commands built from closures, or hand-written [`ConsoleCommand`]s
//! - **Dev / cheat modes**: Gate commands behind runtime-switchable modes
//! - **History**: Bounded, navigable history of submitted lines
//!
//! The engine never renders or reads devices; hosts plug in an
//! [`InputSource`] and a [`DisplaySink`].
//!
//! # Features
//!
//! - `log-capture` (default): print host log records into the console
//! - `terminal`: stdin/stdout backend for dedicated servers
//! - `persist`: RON configuration files
//! - `full`: Enable log-capture + persist
//!
//! # Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_dev_console::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ConsolePlugin::new(ConsoleConfig::default().allow_cheat_mode(true)))
//!         .add_systems(Startup, setup_console)
//!         .run();
//! }
//!
//! fn setup_console(mut console: ResMut<ConsoleEngine>) {
//!     console.register(ConCommand::new("noclip", |_, console| {
//!         console.print_success("Noclip toggled!");
//!     })
//!     .help("Toggle noclip mode")
//!     .flags(CommandFlags::CHEAT))
//!     .unwrap();
//! }
//! ```

use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver};

use bevy::prelude::*;

// Core module (always available, zero optional deps)
pub mod core;

// Re-export core types at crate root for convenience
pub use core::{
    Authorization, CommandArgs, CommandFlags, CommandRef, CommandRegistry, CommandTask,
    ConCommand, ConsoleAction, ConsoleBuilder, ConsoleCommand, ConsoleConfig, ConsoleEngine,
    ConsoleEvent, DisplaySink, HistoryBuffer, InputSource, ModeGate, PrintType, RegisterError,
    SubmitOutcome, SubscriptionId, TaskStep, TokenizeError, TokenizedCommand,
    register_builtin_commands, tokenize,
};

// Host log capture (feature-gated)
#[cfg(feature = "log-capture")]
pub mod logging;

// Terminal backend (feature-gated)
#[cfg(feature = "terminal")]
pub mod terminal;

// Persistence module (feature-gated)
#[cfg(feature = "persist")]
pub mod persist;

#[cfg(feature = "log-capture")]
pub use logging::{LogMessage, custom_log_layer};

#[cfg(feature = "persist")]
pub use persist::{ConfigError, ConfigPath};

#[cfg(feature = "terminal")]
pub use terminal::{TerminalConfig, TerminalDisplay, TerminalPlugin};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::core::{
        CommandArgs, CommandFlags, CommandTask, ConCommand, ConsoleAction, ConsoleCommand,
        ConsoleConfig, ConsoleEngine, ConsoleEvent, DisplaySink, InputSource, PrintType,
        TaskStep,
    };
    pub use crate::ConsolePlugin;
}

/// Main console plugin.
///
/// Inserts a [`ConsoleEngine`] resource with the built-in commands, ticks it
/// once per `Update`, re-publishes every [`ConsoleEvent`] as a Bevy message
/// and shuts the engine down on [`AppExit`].
///
/// # Configuration
///
/// ```ignore
/// ConsolePlugin::new(ConsoleConfig::default().open_on_start(true))
/// ```
pub struct ConsolePlugin {
    config: ConsoleConfig,
    builtins: bool,
    #[cfg(feature = "persist")]
    config_file: Option<std::path::PathBuf>,
}

impl Default for ConsolePlugin {
    fn default() -> Self {
        Self::new(ConsoleConfig::default())
    }
}

impl ConsolePlugin {
    /// Create the plugin with the given configuration.
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            builtins: true,
            #[cfg(feature = "persist")]
            config_file: None,
        }
    }

    /// Read the configuration from a RON file when the plugin is built.
    ///
    /// A missing or invalid file is logged and the defaults are used.
    #[cfg(feature = "persist")]
    pub fn with_config_file(path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            config_file: Some(path.into()),
            ..Self::default()
        }
    }

    /// Skip registering `echo`, `help` and `clear`.
    pub fn without_builtins(mut self) -> Self {
        self.builtins = false;
        self
    }

    fn resolve_config(&self, _app: &mut App) -> ConsoleConfig {
        // Config file (feature-gated)
        #[cfg(feature = "persist")]
        {
            if let Some(path) = &self.config_file {
                _app.insert_resource(persist::ConfigPath(path.clone()));
                return persist::load_config(path);
            }
        }

        self.config.clone()
    }
}

impl Plugin for ConsolePlugin {
    fn build(&self, app: &mut App) {
        let config = self.resolve_config(app);

        // Engine notifications are bridged onto the message bus
        let (sender, receiver) = mpsc::channel();
        let mut builder = ConsoleEngine::builder(config).observer(move |event| {
            let _ = sender.send(event.clone());
        });
        if self.builtins {
            builder = builder.builtins();
        }

        let console = match builder.build() {
            Ok(console) => console,
            Err(e) => {
                error!("Failed to build console: {}", e);
                return;
            }
        };

        app.add_message::<ConsoleEvent>()
            .insert_resource(console)
            .insert_resource(ConsoleEventReceiver(Mutex::new(receiver)));

        // 1. tick_console: Poll the input source, apply the action, step tasks
        // 2. forward_console_events: Publish notifications as messages
        app.add_systems(Update, (tick_console, forward_console_events).chain());
        app.add_systems(Last, (shutdown_on_exit, forward_console_events).chain());
    }
}

/// Receives engine notifications until they are written as messages.
#[derive(Resource)]
struct ConsoleEventReceiver(Mutex<Receiver<ConsoleEvent>>);

fn tick_console(mut console: ResMut<ConsoleEngine>) {
    console.tick();
}

fn forward_console_events(
    receiver: Res<ConsoleEventReceiver>,
    mut events: MessageWriter<ConsoleEvent>,
) {
    let Ok(rx) = receiver.0.lock() else {
        return;
    };
    for event in rx.try_iter() {
        events.write(event);
    }
}

fn shutdown_on_exit(mut exits: MessageReader<AppExit>, mut console: ResMut<ConsoleEngine>) {
    if exits.read().last().is_some() {
        console.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Test resource collecting forwarded console messages.
    #[derive(Resource, Default)]
    struct ReceivedEvents(Vec<ConsoleEvent>);

    fn collect_events(mut reader: MessageReader<ConsoleEvent>, mut received: ResMut<ReceivedEvents>) {
        received.0.extend(reader.read().cloned());
    }

    fn app_with(plugin: ConsolePlugin) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(plugin);
        app.init_resource::<ReceivedEvents>();
        app.add_systems(PostUpdate, collect_events);
        app
    }

    /// Queue actions for the next ticks.
    fn script(app: &mut App, actions: impl IntoIterator<Item = ConsoleAction>) {
        let queue: VecDeque<ConsoleAction> = actions.into_iter().collect();
        app.world_mut()
            .resource_mut::<ConsoleEngine>()
            .set_input_source(queue);
    }

    #[test]
    fn test_plugin_inserts_engine_with_builtins() {
        let mut app = app_with(ConsolePlugin::default());
        app.update();

        let console = app.world().resource::<ConsoleEngine>();
        assert!(console.is_initialized());
        for name in ["echo", "help", "clear"] {
            assert!(console.registry().contains(name));
        }
    }

    #[test]
    fn test_plugin_without_builtins() {
        let mut app = app_with(ConsolePlugin::default().without_builtins());
        app.update();

        assert!(app.world().resource::<ConsoleEngine>().registry().is_empty());
    }

    #[test]
    fn test_command_execution() {
        let mut app = app_with(ConsolePlugin::default());
        let last_args = Arc::new(Mutex::new(Vec::new()));
        let tracker = last_args.clone();

        app.add_systems(Startup, move |mut console: ResMut<ConsoleEngine>| {
            let tracker = tracker.clone();
            console
                .register(ConCommand::new("test_cmd", move |args, _| {
                    *tracker.lock().unwrap() = args.to_vec();
                }))
                .unwrap();
        });

        // Run startup
        app.update();

        app.world_mut()
            .resource_mut::<ConsoleEngine>()
            .set_input_buffer("test_cmd arg1 arg2");
        script(&mut app, [ConsoleAction::Submit]);
        app.update();

        assert_eq!(*last_args.lock().unwrap(), vec!["arg1", "arg2"]);
        let console = app.world().resource::<ConsoleEngine>();
        assert_eq!(console.input_buffer(), "");
        assert_eq!(console.history().get(0), Some("test_cmd arg1 arg2"));
    }

    #[test]
    fn test_events_forwarded_as_messages() {
        let mut app = app_with(ConsolePlugin::default());
        script(&mut app, [ConsoleAction::Toggle]);
        app.update();

        let received = &app.world().resource::<ReceivedEvents>().0;
        assert_eq!(
            *received,
            vec![
                ConsoleEvent::Initialized,
                ConsoleEvent::Opened,
                ConsoleEvent::Toggled,
            ]
        );
    }

    #[test]
    fn test_builtin_echo_command() {
        let mut app = app_with(ConsolePlugin::default());
        app.update();

        app.world_mut()
            .resource_mut::<ConsoleEngine>()
            .set_input_buffer("echo hello world");
        script(&mut app, [ConsoleAction::Submit]);
        app.update();

        let received = &app.world().resource::<ReceivedEvents>().0;
        assert!(received.contains(&ConsoleEvent::Printed("hello world".to_string())));
        assert!(received.contains(&ConsoleEvent::Submitted("echo hello world".to_string())));
    }

    #[test]
    fn test_history_navigation_across_frames() {
        let mut app = app_with(ConsolePlugin::new(
            ConsoleConfig::default().show_command_doesnt_exist_error(false),
        ));
        {
            let mut console = app.world_mut().resource_mut::<ConsoleEngine>();
            console.submit_text("first");
            console.submit_text("second");
        }

        script(&mut app, [ConsoleAction::HistoryBack, ConsoleAction::HistoryForward]);
        app.update();
        assert_eq!(app.world().resource::<ConsoleEngine>().input_buffer(), "first");
        app.update();
        assert_eq!(app.world().resource::<ConsoleEngine>().input_buffer(), "second");
    }

    #[test]
    fn test_cheat_enforcement() {
        let mut app = app_with(ConsolePlugin::default());
        let ran = Arc::new(Mutex::new(0usize));
        let counter = ran.clone();
        {
            let mut console = app.world_mut().resource_mut::<ConsoleEngine>();
            console
                .register(
                    ConCommand::new("god", move |_, _| *counter.lock().unwrap() += 1)
                        .flags(CommandFlags::CHEAT),
                )
                .unwrap();
            console.submit_text("god");
            // Cheat mode can't be enabled while disallowed
            console.set_cheat_mode(true);
            console.submit_text("god");
        }
        assert_eq!(*ran.lock().unwrap(), 0);

        {
            let mut console = app.world_mut().resource_mut::<ConsoleEngine>();
            console.set_allow_cheat_mode(true);
            console.set_cheat_mode(true);
            console.submit_text("god");
        }
        assert_eq!(*ran.lock().unwrap(), 1);
    }

    #[test]
    fn test_shutdown_on_app_exit() {
        let mut app = app_with(ConsolePlugin::default());
        let shutdowns = Arc::new(Mutex::new(0usize));
        let counter = shutdowns.clone();
        app.world_mut()
            .resource_mut::<ConsoleEngine>()
            .subscribe(move |event| {
                if *event == ConsoleEvent::Shutdown {
                    *counter.lock().unwrap() += 1;
                }
            });

        app.update();
        assert_eq!(*shutdowns.lock().unwrap(), 0);

        app.world_mut()
            .resource_mut::<Messages<AppExit>>()
            .write(AppExit::Success);
        app.update();
        app.update();
        assert_eq!(*shutdowns.lock().unwrap(), 1);
    }

    #[cfg(feature = "persist")]
    #[test]
    fn test_plugin_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.ron");
        ConsoleConfig::default()
            .max_history(7)
            .starts_open(true)
            .save(&path)
            .unwrap();

        let mut app = app_with(ConsolePlugin::with_config_file(&path));
        app.update();

        let console = app.world().resource::<ConsoleEngine>();
        assert_eq!(console.config().max_history, 7);
        assert!(console.is_open());
        assert_eq!(app.world().resource::<ConfigPath>().0, path);
    }
}
