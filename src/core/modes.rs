//! Dev-mode and cheat-mode gating.
//!
//! Each mode has an `allow` switch and an `enabled` switch. A mode only
//! counts as active when both are on, and it can never be enabled while
//! its usage is disallowed.

use super::ConsoleCommand;

/// Outcome of checking a command against the current modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Authorization {
    /// The command may run.
    Allowed,
    /// The command needs cheat mode.
    DeniedCheat,
    /// The command needs dev mode.
    DeniedDev,
}

impl Authorization {
    /// Check if the command may run.
    #[inline]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Authorization::Allowed)
    }
}

/// Tracks dev/cheat enablement and their allow flags.
///
/// The setters return the value to broadcast as a change notification, or
/// `None` when nothing should be announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeGate {
    allow_dev: bool,
    allow_cheat: bool,
    dev: bool,
    cheat: bool,
}

impl ModeGate {
    /// Create a gate with both modes disabled.
    pub fn new(allow_dev: bool, allow_cheat: bool) -> Self {
        Self {
            allow_dev,
            allow_cheat,
            dev: false,
            cheat: false,
        }
    }

    /// Whether dev mode is enabled.
    #[inline]
    pub fn dev_mode(&self) -> bool {
        self.dev
    }

    /// Whether cheat mode is enabled.
    #[inline]
    pub fn cheat_mode(&self) -> bool {
        self.cheat
    }

    /// Whether dev mode may be used.
    #[inline]
    pub fn allow_dev_mode(&self) -> bool {
        self.allow_dev
    }

    /// Whether cheat mode may be used.
    #[inline]
    pub fn allow_cheat_mode(&self) -> bool {
        self.allow_cheat
    }

    /// Set dev mode.
    ///
    /// When dev mode is disallowed the mode is forced off and `Some(false)`
    /// is returned only if it was on. Otherwise the value is stored and
    /// always returned, even when unchanged.
    pub fn set_dev_mode(&mut self, enable: bool) -> Option<bool> {
        set_mode(self.allow_dev, &mut self.dev, enable)
    }

    /// Set cheat mode. Same rules as [`set_dev_mode`](Self::set_dev_mode).
    pub fn set_cheat_mode(&mut self, enable: bool) -> Option<bool> {
        set_mode(self.allow_cheat, &mut self.cheat, enable)
    }

    /// Change whether dev mode may be used.
    ///
    /// Disallowing while dev mode is on forces it off and returns
    /// `Some(false)`.
    pub fn set_allow_dev_mode(&mut self, allow: bool) -> Option<bool> {
        set_allow(&mut self.allow_dev, &mut self.dev, allow)
    }

    /// Change whether cheat mode may be used.
    pub fn set_allow_cheat_mode(&mut self, allow: bool) -> Option<bool> {
        set_allow(&mut self.allow_cheat, &mut self.cheat, allow)
    }

    /// Check a command's requirements. Cheat is checked before dev.
    pub fn authorize(&self, command: &dyn ConsoleCommand) -> Authorization {
        self.authorize_flags(command.dev_mode_only(), command.cheat_mode_only())
    }

    /// Check raw requirements. Cheat is checked before dev.
    pub fn authorize_flags(&self, dev_mode_only: bool, cheat_mode_only: bool) -> Authorization {
        if cheat_mode_only && !(self.allow_cheat && self.cheat) {
            return Authorization::DeniedCheat;
        }
        if dev_mode_only && !(self.allow_dev && self.dev) {
            return Authorization::DeniedDev;
        }
        Authorization::Allowed
    }
}

fn set_mode(allowed: bool, mode: &mut bool, enable: bool) -> Option<bool> {
    if !allowed {
        return std::mem::replace(mode, false).then_some(false);
    }
    *mode = enable;
    Some(enable)
}

fn set_allow(allow: &mut bool, mode: &mut bool, value: bool) -> Option<bool> {
    *allow = value;
    if !value {
        return std::mem::replace(mode, false).then_some(false);
    }
    None
}
