//! Console notifications and the abstract input vocabulary.
//!
//! Events are the primary mechanism for:
//! - Input Source -> Engine: [`ConsoleAction`]s, one per tick
//! - Engine -> Observers: [`ConsoleEvent`]s, delivered synchronously in
//!   subscription order

use bevy::prelude::*;

/// Abstract command produced by an input source once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConsoleAction {
    /// Nothing to do this tick.
    #[default]
    None,
    /// Open the console.
    Open,
    /// Close the console.
    Close,
    /// Flip between open and closed.
    Toggle,
    /// Submit the current input buffer.
    Submit,
    /// Clear the display and the history.
    Clear,
    /// Step back to an older history entry.
    HistoryBack,
    /// Step forward to a newer history entry.
    HistoryForward,
}

/// Classification of a printed line. Affects presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrintType {
    /// General information.
    #[default]
    Info,
    /// A successful outcome.
    Success,
    /// Something worth attention.
    Warning,
    /// A failure.
    Error,
    /// Anything else.
    Misc,
}

impl PrintType {
    /// Get the display name for this print type.
    pub fn name(&self) -> &'static str {
        match self {
            PrintType::Info => "Info",
            PrintType::Success => "Success",
            PrintType::Warning => "Warning",
            PrintType::Error => "Error",
            PrintType::Misc => "Misc",
        }
    }
}

impl std::fmt::Display for PrintType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Notification broadcast by a [`ConsoleEngine`](super::ConsoleEngine).
///
/// Inside a Bevy app the [`ConsolePlugin`](crate::ConsolePlugin) re-sends
/// every notification as a message.
///
/// # Examples
///
/// ```ignore
/// fn watch_console(mut events: MessageReader<ConsoleEvent>) {
///     for event in events.read() {
///         if let ConsoleEvent::Submitted(line) = event {
///             info!("Console submitted: {}", line);
///         }
///     }
/// }
/// ```
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// The engine finished its startup sequence.
    Initialized,
    /// The engine was shut down.
    Shutdown,
    /// The console transitioned to open.
    Opened,
    /// The console transitioned to closed.
    Closed,
    /// `toggle` was called, whether or not the state changed.
    Toggled,
    /// The display and history were cleared.
    Cleared,
    /// A line was printed.
    Printed(String),
    /// The input buffer was assigned.
    InputBufferChanged(String),
    /// Dev mode was set (possibly to the same value).
    DevModeChanged(bool),
    /// Cheat mode was set (possibly to the same value).
    CheatModeChanged(bool),
    /// A line finished dispatch.
    Submitted(String),
    /// A command ran to the end of its `execute`.
    CommandExecuted {
        /// The name the command was invoked by.
        name: String,
        /// The arguments it received.
        args: Vec<String>,
    },
}

/// Handle returned by [`ConsoleObservers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Type alias for observer callbacks.
pub type ConsoleObserver = Box<dyn FnMut(&ConsoleEvent) + Send + Sync>;

/// Ordered list of observers owned by an engine.
#[derive(Default)]
pub struct ConsoleObservers {
    next_id: u64,
    observers: Vec<(SubscriptionId, ConsoleObserver)>,
}

impl ConsoleObservers {
    /// Create an empty observer list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer. It is called after every previously added observer.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&ConsoleEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(other, _)| *other != id);
        self.observers.len() != before
    }

    /// Deliver an event to every observer in subscription order.
    pub fn emit(&mut self, event: &ConsoleEvent) {
        for (_, observer) in &mut self.observers {
            observer(event);
        }
    }

    /// Get the number of observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Check if there are no observers.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for ConsoleObservers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleObservers")
            .field("len", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_observers_receive_in_subscription_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut observers = ConsoleObservers::new();

        let first = seen.clone();
        observers.subscribe(move |_| first.lock().unwrap().push("first"));
        let second = seen.clone();
        observers.subscribe(move |_| second.lock().unwrap().push("second"));

        observers.emit(&ConsoleEvent::Opened);
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Arc::new(Mutex::new(0));
        let mut observers = ConsoleObservers::new();

        let counter = count.clone();
        let id = observers.subscribe(move |_| *counter.lock().unwrap() += 1);

        observers.emit(&ConsoleEvent::Cleared);
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.emit(&ConsoleEvent::Cleared);

        assert_eq!(*count.lock().unwrap(), 1);
        assert!(observers.is_empty());
    }

    #[test]
    fn test_print_type_default_is_info() {
        assert_eq!(PrintType::default(), PrintType::Info);
        assert_eq!(PrintType::Warning.to_string(), "Warning");
    }

    #[test]
    fn test_action_default_is_none() {
        assert_eq!(ConsoleAction::default(), ConsoleAction::None);
    }
}
