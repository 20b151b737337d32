//! Starmap Body Hierarchy
//!
//! Builds one tree per star system from an unordered stream of observation
//! records: bodies, barycentres, surface features, codex entries and
//! per-body enrichment.
//!
//! # Design
//!
//! Each system is a [`SystemRegistry`]: an arena of [`BodyNode`]s with
//! children keyed by own name and parents as plain indices. A record is
//! resolved to a node by body id, then by name, then by decomposing its
//! designator and walking the path, so the same body is never stored twice
//! however it is reported.
//!
//! # Concurrency
//!
//! [`Engine`] is shared between ingestion threads and readers. Each registry
//! has its own lock; records for a system that has no registry yet are
//! queued and replayed when its first body arrives.

mod barycentre;
mod builder;
mod catalog;
mod config;
mod deferred;
mod diagnostics;
mod engine;
mod enrich;
mod error;
mod node;
mod records;
mod registry;
mod surface;
mod types;

pub use config::EngineConfig;
pub use deferred::{DeferredQueue, DeferredRecord};
pub use diagnostics::{Diagnostic, DiagnosticSink, RecordingSink, TracingSink};
pub use engine::{Engine, Intake, SystemGuard, SystemHandle};
pub use error::{ConfigError, RejectReason};
pub use node::BodyNode;
pub use records::{
    BarycentreObservation, BodyRecord, BodySignal, CodexEntry, FeatureKind, Genus, OrganicScan,
    ParentKind, ParentLink, RemoteSignal, RingData, ScanDetail, SurfaceFeature,
};
pub use registry::{DepthFirst, SystemRegistry};
pub use surface::FeatureOutcome;
pub use types::{BodyHint, BodyId, NodeHandle, NodeId, NodeKind, Provenance, SystemAddress};

pub use starmap_names::MAIN_STAR;

/// What every mutation needs besides the registry itself.
pub(crate) struct Context<'a> {
    pub(crate) config: &'a EngineConfig,
    pub(crate) sink: &'a dyn DiagnosticSink,
}
