//! Test doubles shared by the unit tests.

use std::sync::{Arc, Mutex};

use super::{DisplaySink, PrintType};

/// One call received by a [`RecordingDisplay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    Print(String, PrintType),
    Clear,
    RemoveOldest(usize),
}

/// Display sink that records every call; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl RecordingDisplay {
    pub fn calls(&self) -> Vec<DisplayCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl DisplaySink for RecordingDisplay {
    fn print(&mut self, text: &str, print_type: PrintType) {
        self.calls
            .lock()
            .unwrap()
            .push(DisplayCall::Print(text.to_string(), print_type));
    }

    fn clear(&mut self) {
        self.calls.lock().unwrap().push(DisplayCall::Clear);
    }

    fn remove_oldest(&mut self, index: usize) {
        self.calls.lock().unwrap().push(DisplayCall::RemoveOldest(index));
    }
}
