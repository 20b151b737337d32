//! Concurrent entry point.
//!
//! One registry per system behind its own mutex, all registries behind a
//! read-write map, and one queue for records whose system has no registry
//! yet. A system's registry is created under that system's gate, so building
//! and replaying one system never blocks another. The queue lock is only held
//! to push or take. Locks are always taken in the order gate, deferred queue,
//! system map, registry.

use std::collections::{HashMap, VecDeque};
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard, RwLock};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::deferred::{DeferredQueue, DeferredRecord};
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::error::RejectReason;
use crate::records::{
    BarycentreObservation, BodyRecord, BodySignal, CodexEntry, Genus, OrganicScan, RemoteSignal,
    SurfaceFeature,
};
use crate::registry::SystemRegistry;
use crate::surface::FeatureOutcome;
use crate::types::{BodyId, NodeHandle, SystemAddress};
use crate::Context;

type SharedRegistry = Arc<Mutex<SystemRegistry>>;
type Gate = Arc<Mutex<()>>;

/// Result of handing a non-body record to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intake<T> {
    /// The system was known and the record was applied.
    Applied(T),
    /// The system has no registry yet; the record waits for its first body.
    Deferred,
}

impl<T> Intake<T> {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Intake::Deferred)
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Intake::Applied(value) => Some(value),
            Intake::Deferred => None,
        }
    }
}

/// Body hierarchy engine shared by ingestion threads and readers.
pub struct Engine {
    config: EngineConfig,
    systems: RwLock<HashMap<SystemAddress, SharedRegistry>>,
    gates: Mutex<HashMap<SystemAddress, Gate>>,
    deferred: Mutex<DeferredQueue>,
    sink: Arc<dyn DiagnosticSink>,
}

impl Engine {
    /// Create an engine reporting diagnostics through `tracing`.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    pub fn with_sink(config: EngineConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            config,
            systems: RwLock::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
            deferred: Mutex::new(DeferredQueue::new()),
            sink,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve a body record to its node, creating the system on first touch.
    ///
    /// The first body of a system builds the registry, replays the records
    /// deferred for it, and only then publishes it. A rejected first body
    /// creates nothing.
    pub fn ingest_body(&self, record: &BodyRecord) -> Result<NodeHandle, RejectReason> {
        let system = record.system_address;
        let ctx = self.ctx();

        if let Some(registry) = self.registry(system) {
            let node = registry.lock().insert_body(record, &ctx)?;
            return Ok(NodeHandle { system, node });
        }

        let gate = self.gate(system);
        let _creating = gate.lock();
        if let Some(registry) = self.registry(system) {
            let node = registry.lock().insert_body(record, &ctx)?;
            return Ok(NodeHandle { system, node });
        }

        let mut registry = SystemRegistry::new(system, record.system_name.clone());
        let node = registry.insert_body(record, &ctx)?;
        let backlog = self.deferred.lock().take(system);
        let replayed = self.replay(&mut registry, backlog);

        info!(%system, name = %record.system_name, replayed, "system registry created");
        self.systems
            .write()
            .insert(system, Arc::new(Mutex::new(registry)));
        // later callers find the registry before asking for a gate
        self.gates.lock().remove(&system);
        Ok(NodeHandle { system, node })
    }

    /// Attach a barycentre observation. Returns `false` when deferred.
    pub fn ingest_barycentre(
        &self,
        system: SystemAddress,
        id: BodyId,
        observation: BarycentreObservation,
    ) -> bool {
        match self.live_or_defer(system, observation, |observation| {
            DeferredRecord::Barycentre { id, observation }
        }) {
            Some((registry, observation)) => {
                registry.lock().link_barycentre(id, observation);
                true
            }
            None => false,
        }
    }

    /// Merge an approach, touchdown or docking record.
    ///
    /// `body` is the body id reported alongside a docking; other kinds carry
    /// their body in the feature itself.
    pub fn ingest_surface_feature(
        &self,
        system: SystemAddress,
        feature: SurfaceFeature,
        body: Option<BodyId>,
    ) -> Result<Intake<FeatureOutcome>, RejectReason> {
        match self.live_or_defer(system, feature, |feature| DeferredRecord::SurfaceFeature {
            feature,
            body,
        }) {
            Some((registry, feature)) => registry
                .lock()
                .reconcile_feature(feature, body, &self.ctx())
                .map(Intake::Applied),
            None => Ok(Intake::Deferred),
        }
    }

    /// Record a codex entry in the system it names.
    ///
    /// Entries whose recorded system address is below the configured
    /// threshold are rejected before anything else happens. `Applied(false)`
    /// means the entry was already known.
    pub fn ingest_catalog_entry(&self, entry: CodexEntry) -> Result<Intake<bool>, RejectReason> {
        if entry.system_address < self.config.min_codex_system_address {
            return Err(RejectReason::InvalidSystemAddress(entry.system_address));
        }
        let system = SystemAddress(entry.system_address);
        Ok(match self.live_or_defer(system, entry, DeferredRecord::Codex) {
            Some((registry, entry)) => Intake::Applied(registry.lock().add_codex(entry)),
            None => Intake::Deferred,
        })
    }

    /// Record remotely detected signal sources; returns how many were new.
    pub fn ingest_remote_signals(
        &self,
        system: SystemAddress,
        signals: Vec<RemoteSignal>,
    ) -> Intake<usize> {
        match self.live_or_defer(system, signals, DeferredRecord::RemoteSignals) {
            Some((registry, signals)) => Intake::Applied(registry.lock().add_remote_signals(signals)),
            None => Intake::Deferred,
        }
    }

    /// Replace the signal counts detected on a body.
    pub fn ingest_body_signals(
        &self,
        system: SystemAddress,
        body: BodyId,
        signals: Vec<BodySignal>,
    ) -> Result<Intake<()>, RejectReason> {
        match self.live_or_defer(system, signals, |signals| DeferredRecord::BodySignals {
            body,
            signals,
        }) {
            Some((registry, signals)) => registry
                .lock()
                .set_body_signals(body, signals, &self.ctx())
                .map(Intake::Applied),
            None => Ok(Intake::Deferred),
        }
    }

    /// Replace the genuses known on a body.
    pub fn ingest_genuses(
        &self,
        system: SystemAddress,
        body: BodyId,
        genuses: Vec<Genus>,
    ) -> Result<Intake<()>, RejectReason> {
        match self.live_or_defer(system, genuses, |genuses| DeferredRecord::Genuses {
            body,
            genuses,
        }) {
            Some((registry, genuses)) => registry
                .lock()
                .set_genuses(body, genuses, &self.ctx())
                .map(Intake::Applied),
            None => Ok(Intake::Deferred),
        }
    }

    /// Record one organic sampling step. `Applied(false)` means a repeat.
    pub fn ingest_organic_scan(
        &self,
        system: SystemAddress,
        scan: OrganicScan,
    ) -> Result<Intake<bool>, RejectReason> {
        match self.live_or_defer(system, scan, DeferredRecord::Organic) {
            Some((registry, scan)) => registry
                .lock()
                .add_organic_scan(scan, &self.ctx())
                .map(Intake::Applied),
            None => Ok(Intake::Deferred),
        }
    }

    /// Read access to one system, if it exists.
    pub fn snapshot(&self, system: SystemAddress) -> Option<SystemHandle> {
        self.registry(system).map(|registry| SystemHandle { registry })
    }

    /// Replay whatever is queued for `system` into its registry.
    ///
    /// Runs on its own when a registry is created; calling it again is
    /// harmless. Returns the number of records replayed, including ones
    /// that were rejected.
    pub fn flush_deferred(&self, system: SystemAddress) -> usize {
        let Some(registry) = self.registry(system) else {
            return 0;
        };
        let backlog = self.deferred.lock().take(system);
        if backlog.is_empty() {
            return 0;
        }
        let mut guard = registry.lock();
        self.replay(&mut guard, backlog)
    }

    /// Number of records waiting for `system`.
    pub fn deferred_len(&self, system: SystemAddress) -> usize {
        self.deferred.lock().len(system)
    }

    /// Known systems, in address order.
    pub fn systems(&self) -> Vec<SystemAddress> {
        let mut systems: Vec<_> = self.systems.read().keys().copied().collect();
        systems.sort_unstable();
        systems
    }

    fn ctx(&self) -> Context<'_> {
        Context {
            config: &self.config,
            sink: self.sink.as_ref(),
        }
    }

    fn registry(&self, system: SystemAddress) -> Option<SharedRegistry> {
        self.systems.read().get(&system).cloned()
    }

    /// Creation lock for one system.
    fn gate(&self, system: SystemAddress) -> Gate {
        self.gates.lock().entry(system).or_default().clone()
    }

    /// Hand back the registry for `system`, or queue the record.
    ///
    /// The second lookup happens under the system's gate, which registry
    /// creation holds from taking the backlog until publishing, so a record
    /// is never queued after its system's backlog has been replayed.
    fn live_or_defer<T>(
        &self,
        system: SystemAddress,
        value: T,
        defer: impl FnOnce(T) -> DeferredRecord,
    ) -> Option<(SharedRegistry, T)> {
        if let Some(registry) = self.registry(system) {
            return Some((registry, value));
        }
        let gate = self.gate(system);
        let _deferring = gate.lock();
        if let Some(registry) = self.registry(system) {
            return Some((registry, value));
        }
        let record = defer(value);
        debug!(%system, record = record.label(), "system unknown, record deferred");
        self.deferred.lock().push(system, record);
        None
    }

    fn replay(&self, registry: &mut SystemRegistry, backlog: VecDeque<DeferredRecord>) -> usize {
        let ctx = self.ctx();
        let system = registry.address();
        let count = backlog.len();
        for record in backlog {
            if let Err(reason) = record.apply(registry, &ctx) {
                self.sink.report(Diagnostic::ReplayRejected { system, reason });
            }
        }
        if count > 0 {
            info!(%system, count, "deferred records replayed");
        }
        count
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Shared reference to one system's registry.
#[derive(Clone)]
pub struct SystemHandle {
    registry: SharedRegistry,
}

impl SystemHandle {
    /// Lock the registry for reading. Writers to this system wait until the
    /// guard is dropped, so everything seen through it is consistent.
    pub fn lock(&self) -> SystemGuard<'_> {
        SystemGuard {
            guard: self.registry.lock(),
        }
    }
}

/// Read-only view of a locked registry.
pub struct SystemGuard<'a> {
    guard: MutexGuard<'a, SystemRegistry>,
}

impl Deref for SystemGuard<'_> {
    type Target = SystemRegistry;

    fn deref(&self) -> &SystemRegistry {
        &self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;
    use crate::records::{ParentKind, ParentLink, ScanDetail};
    use crate::types::BodyHint;
    use std::sync::mpsc;
    use std::time::Duration;

    const SOL: SystemAddress = SystemAddress(10477373803);

    fn engine() -> (Engine, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        (Engine::with_sink(EngineConfig::default(), sink.clone()), sink)
    }

    fn body(name: &str, hint: BodyHint) -> BodyRecord {
        BodyRecord::new(SOL, "Sol", name, hint)
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
        assert_send_sync::<SystemHandle>();
    }

    #[test]
    fn first_body_creates_system() {
        let (engine, _) = engine();
        assert!(engine.snapshot(SOL).is_none());

        let handle = engine.ingest_body(&body("Sol", BodyHint::Star)).unwrap();
        assert_eq!(handle.system, SOL);
        assert_eq!(engine.systems(), vec![SOL]);

        let snapshot = engine.snapshot(SOL).unwrap();
        let view = snapshot.lock();
        assert_eq!(view.name(), "Sol");
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn rejected_first_body_creates_nothing() {
        let (engine, _) = engine();
        let err = engine
            .ingest_body(&body("Sol A 1 a b c d", BodyHint::Planet))
            .unwrap_err();
        assert!(matches!(err, RejectReason::PathTooDeep { .. }));
        assert!(engine.snapshot(SOL).is_none());
    }

    #[test]
    fn records_before_first_body_are_replayed() {
        let (engine, _) = engine();
        let observation = BarycentreObservation {
            eccentricity: Some(0.5),
            ..BarycentreObservation::default()
        };
        assert!(!engine.ingest_barycentre(SOL, BodyId(1), observation));
        assert_eq!(engine.deferred_len(SOL), 1);

        let detail = ScanDetail {
            parents: vec![ParentLink::new(ParentKind::Null, 1)],
            ..ScanDetail::default()
        };
        let handle = engine
            .ingest_body(&body("Sol AB 1", BodyHint::Planet).with_body_id(2).with_detail(detail))
            .unwrap();

        assert_eq!(engine.deferred_len(SOL), 0);
        let snapshot = engine.snapshot(SOL).unwrap();
        let view = snapshot.lock();
        let link = &view.node(handle.node).unwrap().ancestry()[0];
        assert_eq!(link.barycentre.as_ref().unwrap().eccentricity, Some(0.5));
    }

    #[test]
    fn replay_rejections_become_diagnostics() {
        let (engine, sink) = engine();
        let deferred = engine
            .ingest_body_signals(SOL, BodyId(42), Vec::new())
            .unwrap();
        assert!(deferred.is_deferred());

        engine.ingest_body(&body("Sol", BodyHint::Star)).unwrap();
        assert!(sink
            .events()
            .iter()
            .any(|d| matches!(d, Diagnostic::ReplayRejected { .. })));
    }

    #[test]
    fn codex_threshold() {
        let (engine, _) = engine();
        let entry = CodexEntry {
            timestamp: 0,
            entry_id: 1,
            name: "Bacterium".into(),
            category: None,
            sub_category: None,
            region: None,
            system_name: "Sol".into(),
            system_address: 12,
            body_id: None,
            latitude: None,
            longitude: None,
            is_new_discovery: false,
        };
        assert_eq!(
            engine.ingest_catalog_entry(entry.clone()),
            Err(RejectReason::InvalidSystemAddress(12))
        );

        let entry = CodexEntry {
            system_address: SOL.0,
            ..entry
        };
        assert_eq!(engine.ingest_catalog_entry(entry.clone()), Ok(Intake::Deferred));
        engine.ingest_body(&body("Sol", BodyHint::Star)).unwrap();
        assert_eq!(engine.ingest_catalog_entry(entry), Ok(Intake::Applied(false)));
        assert_eq!(engine.snapshot(SOL).unwrap().lock().codex_entries().len(), 1);
    }

    #[test]
    fn flush_without_backlog_is_a_noop() {
        let (engine, _) = engine();
        assert_eq!(engine.flush_deferred(SOL), 0);
        engine.ingest_body(&body("Sol", BodyHint::Star)).unwrap();
        assert_eq!(engine.flush_deferred(SOL), 0);
    }

    /// Holds up the replay of one system until told to continue.
    struct StallOnReplay {
        system: SystemAddress,
        stalled: mpsc::SyncSender<()>,
        resume: Mutex<mpsc::Receiver<()>>,
    }

    impl DiagnosticSink for StallOnReplay {
        fn report(&self, diagnostic: Diagnostic) {
            if matches!(diagnostic, Diagnostic::ReplayRejected { system, .. } if system == self.system) {
                let _ = self.stalled.send(());
                let _ = self.resume.lock().recv_timeout(Duration::from_secs(5));
            }
        }
    }

    #[test]
    fn replay_of_one_system_does_not_block_another() {
        const OTHER: SystemAddress = SystemAddress(20);
        const THIRD: SystemAddress = SystemAddress(30);

        let (stalled_tx, stalled_rx) = mpsc::sync_channel(1);
        let (resume_tx, resume_rx) = mpsc::channel();
        let sink = Arc::new(StallOnReplay {
            system: SOL,
            stalled: stalled_tx,
            resume: Mutex::new(resume_rx),
        });
        let engine = Engine::with_sink(EngineConfig::default(), sink);
        assert!(engine
            .ingest_body_signals(SOL, BodyId(42), Vec::new())
            .unwrap()
            .is_deferred());

        std::thread::scope(|scope| {
            let creator = scope.spawn(|| engine.ingest_body(&body("Sol", BodyHint::Star)));
            stalled_rx.recv_timeout(Duration::from_secs(5)).unwrap();

            engine
                .ingest_body(&BodyRecord::new(OTHER, "Achenar", "Achenar", BodyHint::Star))
                .unwrap();
            assert!(engine.ingest_remote_signals(THIRD, Vec::new()).is_deferred());
            // Sol is still replaying
            assert!(engine.snapshot(SOL).is_none());
            assert!(engine.snapshot(OTHER).is_some());

            resume_tx.send(()).unwrap();
            creator.join().unwrap().unwrap();
        });

        assert_eq!(engine.systems(), vec![OTHER, SOL]);
        assert_eq!(engine.deferred_len(THIRD), 1);
    }

    #[test]
    fn concurrent_first_touch_creates_one_registry() {
        let (engine, _) = engine();
        std::thread::scope(|scope| {
            for i in 0..8u32 {
                let engine = &engine;
                scope.spawn(move || {
                    engine
                        .ingest_body(&body(&format!("Sol {}", i + 1), BodyHint::Planet).with_body_id(i + 1))
                        .unwrap();
                });
            }
        });
        assert_eq!(engine.systems().len(), 1);
        // main star placeholder plus eight planets
        assert_eq!(engine.snapshot(SOL).unwrap().lock().len(), 9);
    }
}
