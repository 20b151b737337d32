//! Codex entries and remotely detected signals.

use crate::records::{CodexEntry, RemoteSignal};
use crate::registry::SystemRegistry;

impl SystemRegistry {
    /// Append a codex entry unless an identical one is already recorded.
    pub(crate) fn add_codex(&mut self, entry: CodexEntry) -> bool {
        if self.codex.contains(&entry) {
            return false;
        }
        self.codex.push(entry);
        true
    }

    /// Append the signals not yet recorded; returns how many were new.
    pub(crate) fn add_remote_signals(&mut self, signals: Vec<RemoteSignal>) -> usize {
        let before = self.remote_signals.len();
        for signal in signals {
            if !self.remote_signals.contains(&signal) {
                self.remote_signals.push(signal);
            }
        }
        self.remote_signals.len() - before
    }
}
