//! Custom [LogPlugin](bevy::log::LogPlugin) functionality.
//!
//! Captures host log records and, when
//! [`ConsoleConfig::print_host_logs`](crate::core::ConsoleConfig::print_host_logs)
//! is enabled, prints them into the [`ConsoleEngine`].

use bevy::log::{BoxedLayer, Level};
use bevy::prelude::*;
use std::sync::mpsc;
use std::time::SystemTime;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::field::Visit;

use crate::core::{ConsoleEngine, PrintType};

/// Log target prefix of this crate; its own records are never printed back.
const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// A function that implements the log reading functionality for the
/// developer console via [`LogPlugin::custom_layer`](bevy::log::LogPlugin::custom_layer).
///
/// ```ignore
/// App::new().add_plugins(DefaultPlugins.set(LogPlugin {
///     custom_layer: custom_log_layer,
///     ..default()
/// }));
/// ```
pub fn custom_log_layer(app: &mut App) -> Option<BoxedLayer> {
    Some(Box::new(create_custom_log_layer(app)))
}

fn create_custom_log_layer(app: &mut App) -> LogCaptureLayer {
    let (sender, receiver) = mpsc::channel();
    app.add_message::<LogMessage>();
    app.insert_non_send_resource(CapturedLogEvents(receiver));
    app.add_systems(PostUpdate, transfer_log_events);

    LogCaptureLayer { sender }
}

/// A [`tracing`](bevy::log::tracing) log record captured from the host.
#[derive(Message, Debug, Clone)]
pub struct LogMessage {
    /// The message contents.
    pub message: String,

    /// The part of the system that the record occurred in.
    pub target: &'static str,

    /// The level of verbosity of the record.
    pub level: Level,

    /// The name of the Rust module where the record occurred,
    /// or `None` if this could not be determined.
    pub module_path: Option<&'static str>,

    /// The time the record occurred.
    pub time: SystemTime,
}

impl LogMessage {
    /// Whether the record came from this crate.
    pub fn is_own(&self) -> bool {
        self.target == CRATE_TARGET
            || self
                .target
                .strip_prefix(CRATE_TARGET)
                .is_some_and(|rest| rest.starts_with("::"))
    }
}

/// Map a log level to the console print type.
pub fn print_type_for(level: Level) -> PrintType {
    match level {
        Level::ERROR => PrintType::Error,
        Level::WARN => PrintType::Warning,
        Level::INFO => PrintType::Info,
        _ => PrintType::Misc,
    }
}

/// Prints captured records into the console, then forwards them as
/// [`LogMessage`]s.
fn transfer_log_events(
    receiver: NonSend<CapturedLogEvents>,
    console: Option<ResMut<ConsoleEngine>>,
    mut log_events: MessageWriter<LogMessage>,
) {
    let mut console = console.filter(|console| console.config().print_host_logs);

    for msg in receiver.0.try_iter() {
        if let Some(console) = console.as_mut() {
            if !msg.is_own() {
                console.print_as(msg.message.clone(), print_type_for(msg.level));
            }
        }
        log_events.write(msg);
    }
}

/// This struct temporarily stores [`LogMessage`]s before they are
/// consumed by [`transfer_log_events`].
struct CapturedLogEvents(mpsc::Receiver<LogMessage>);

/// A [`Layer`] that captures log events and saves them to [`CapturedLogEvents`].
struct LogCaptureLayer {
    sender: mpsc::Sender<LogMessage>,
}

impl<S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>> Layer<S>
    for LogCaptureLayer
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut message = None;
        event.record(&mut LogEventVisitor(&mut message));
        if let Some(message) = message {
            let metadata = event.metadata();
            let _ = self.sender.send(LogMessage {
                message,
                target: metadata.target(),
                level: *metadata.level(),
                module_path: metadata.module_path(),
                time: SystemTime::now(),
            });
        }
    }
}

/// A [`Visit`]or that records log messages that are transferred to [`LogCaptureLayer`].
struct LogEventVisitor<'a>(&'a mut Option<String>);

impl Visit for LogEventVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        // Only log out messages
        if field.name() == "message" {
            *self.0 = Some(format!("{value:?}"));
        }
    }
}
