//! Diagnostic events.
//!
//! Anomalies that point at an upstream inconsistency are reported here and
//! never block ingestion of later records.

use parking_lot::Mutex;
use tracing::warn;

use crate::error::RejectReason;
use crate::types::{NodeId, SystemAddress};

/// Something worth a look in the record stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Only the relaxed structural match found a node for the record.
    LooseMatch {
        system: SystemAddress,
        name: String,
        node: NodeId,
    },
    /// Strict and relaxed structural matches found different nodes.
    AmbiguousMatch {
        system: SystemAddress,
        name: String,
        strict: NodeId,
        loose: NodeId,
    },
    /// Docking at a station no earlier approach or touchdown reported.
    UnmatchedDocking {
        system: SystemAddress,
        station: String,
    },
    /// A record referred to a body missing from the tree.
    DanglingReference {
        system: SystemAddress,
        record: &'static str,
        body: String,
    },
    /// A deferred record failed when replayed.
    ReplayRejected {
        system: SystemAddress,
        reason: RejectReason,
    },
}

/// Receiver of diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Logs every diagnostic as a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::LooseMatch { system, name, node } => {
                warn!(%system, name = %name, ?node, "body matched only by relaxed structural search");
            }
            Diagnostic::AmbiguousMatch {
                system,
                name,
                strict,
                loose,
            } => {
                warn!(%system, name = %name, ?strict, ?loose, "structural match passes disagree");
            }
            Diagnostic::UnmatchedDocking { system, station } => {
                warn!(%system, station = %station, "docking with no earlier approach or touchdown, dropped");
            }
            Diagnostic::DanglingReference { system, record, body } => {
                warn!(%system, record = %record, body = %body, "record refers to unknown body, dropped");
            }
            Diagnostic::ReplayRejected { system, reason } => {
                warn!(%system, %reason, "deferred record rejected on replay");
            }
        }
    }
}

/// Keeps diagnostics in memory, and logs them too.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything reported so far.
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.lock().clone()
    }

    /// Drain everything reported so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: Diagnostic) {
        TracingSink.report(diagnostic.clone());
        self.events.lock().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_collects_and_drains() {
        let sink = RecordingSink::new();
        sink.report(Diagnostic::UnmatchedDocking {
            system: SystemAddress(3),
            station: "Outpost".into(),
        });
        assert_eq!(sink.events().len(), 1);
        assert_eq!(sink.take().len(), 1);
        assert!(sink.events().is_empty());
    }
}
