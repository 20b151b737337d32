//! Records parked until their system's registry exists.

use std::collections::{HashMap, VecDeque};

use crate::error::RejectReason;
use crate::records::{
    BarycentreObservation, BodySignal, CodexEntry, Genus, OrganicScan, RemoteSignal,
    SurfaceFeature,
};
use crate::registry::SystemRegistry;
use crate::types::{BodyId, SystemAddress};
use crate::Context;

/// A non-body record waiting for its system.
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredRecord {
    Barycentre {
        id: BodyId,
        observation: BarycentreObservation,
    },
    Codex(CodexEntry),
    RemoteSignals(Vec<RemoteSignal>),
    BodySignals {
        body: BodyId,
        signals: Vec<BodySignal>,
    },
    Genuses {
        body: BodyId,
        genuses: Vec<Genus>,
    },
    Organic(OrganicScan),
    SurfaceFeature {
        feature: SurfaceFeature,
        body: Option<BodyId>,
    },
}

impl DeferredRecord {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            DeferredRecord::Barycentre { .. } => "barycentre",
            DeferredRecord::Codex(_) => "codex",
            DeferredRecord::RemoteSignals(_) => "remote signals",
            DeferredRecord::BodySignals { .. } => "body signals",
            DeferredRecord::Genuses { .. } => "genuses",
            DeferredRecord::Organic(_) => "organic scan",
            DeferredRecord::SurfaceFeature { .. } => "surface feature",
        }
    }

    /// Apply the record to a registry as if it had just arrived.
    pub(crate) fn apply(
        self,
        registry: &mut SystemRegistry,
        ctx: &Context<'_>,
    ) -> Result<(), RejectReason> {
        match self {
            DeferredRecord::Barycentre { id, observation } => {
                registry.link_barycentre(id, observation);
            }
            DeferredRecord::Codex(entry) => {
                registry.add_codex(entry);
            }
            DeferredRecord::RemoteSignals(signals) => {
                registry.add_remote_signals(signals);
            }
            DeferredRecord::BodySignals { body, signals } => {
                registry.set_body_signals(body, signals, ctx)?;
            }
            DeferredRecord::Genuses { body, genuses } => {
                registry.set_genuses(body, genuses, ctx)?;
            }
            DeferredRecord::Organic(scan) => {
                registry.add_organic_scan(scan, ctx)?;
            }
            DeferredRecord::SurfaceFeature { feature, body } => {
                registry.reconcile_feature(feature, body, ctx)?;
            }
        }
        Ok(())
    }
}

/// Per-system FIFO queues of deferred records.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    queues: HashMap<SystemAddress, VecDeque<DeferredRecord>>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, system: SystemAddress, record: DeferredRecord) {
        self.queues.entry(system).or_default().push_back(record);
    }

    /// Remove and return everything queued for `system`, oldest first.
    pub fn take(&mut self, system: SystemAddress) -> VecDeque<DeferredRecord> {
        self.queues.remove(&system).unwrap_or_default()
    }

    pub fn len(&self, system: SystemAddress) -> usize {
        self.queues.get(&system).map_or(0, VecDeque::len)
    }

    pub fn total_len(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }
}
