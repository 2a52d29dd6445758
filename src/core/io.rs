//! Collaborator interfaces for input and display.
//!
//! The engine never renders or reads devices itself. Hosts compose an
//! [`InputSource`] and a [`DisplaySink`] into the engine at construction.

use std::collections::VecDeque;

use super::{ConsoleAction, PrintType};

/// Supplies one abstract action per tick.
///
/// Implementations must not block; return [`ConsoleAction::None`] when
/// nothing happened.
pub trait InputSource: Send + Sync + 'static {
    /// Poll the next action.
    fn next_action(&mut self) -> ConsoleAction;
}

impl<F> InputSource for F
where
    F: FnMut() -> ConsoleAction + Send + Sync + 'static,
{
    fn next_action(&mut self) -> ConsoleAction {
        self()
    }
}

/// A queue of actions replayed one per tick, then `None` forever.
impl InputSource for VecDeque<ConsoleAction> {
    fn next_action(&mut self) -> ConsoleAction {
        self.pop_front().unwrap_or_default()
    }
}

/// Renders console output.
pub trait DisplaySink: Send + Sync + 'static {
    /// Show a line of text.
    fn print(&mut self, text: &str, print_type: PrintType);

    /// Remove every displayed line.
    fn clear(&mut self);

    /// Drop the displayed entry at `index`.
    ///
    /// Called with `0` whenever history evicts its oldest entry so a mirrored
    /// list stays bounded in lockstep.
    fn remove_oldest(&mut self, index: usize);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_input_source_drains_then_idles() {
        let mut source: VecDeque<ConsoleAction> =
            VecDeque::from([ConsoleAction::Open, ConsoleAction::Submit]);

        assert_eq!(source.next_action(), ConsoleAction::Open);
        assert_eq!(source.next_action(), ConsoleAction::Submit);
        assert_eq!(source.next_action(), ConsoleAction::None);
        assert_eq!(source.next_action(), ConsoleAction::None);
    }

    #[test]
    fn test_closure_input_source() {
        let mut flip = false;
        let mut source = move || {
            flip = !flip;
            if flip { ConsoleAction::Toggle } else { ConsoleAction::None }
        };

        assert_eq!(InputSource::next_action(&mut source), ConsoleAction::Toggle);
        assert_eq!(InputSource::next_action(&mut source), ConsoleAction::None);
    }
}
