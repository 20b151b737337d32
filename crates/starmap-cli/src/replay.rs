//! Batch replay of JSON-lines record files.
//!
//! Each line is one record tagged by `"record"`:
//!
//! ```text
//! {"record":"body","system_address":10477373803,"system_name":"Sol","full_name":"Sol 3","body_id":3,"hint":"planet"}
//! {"record":"barycentre","system_address":10477373803,"body_id":1,"observation":{"eccentricity":0.1}}
//! {"record":"surface_feature","system_address":10477373803,"feature":{"kind":"touchdown","latitude":1.0,"longitude":2.0,"body_id":3}}
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use starmap_tree::{
    BarycentreObservation, BodyId, BodyRecord, BodySignal, CodexEntry, Engine, FeatureOutcome,
    Genus, Intake, OrganicScan, RejectReason, RemoteSignal, SurfaceFeature, SystemAddress,
};

use crate::error::{Error, Result};

/// One line of a replay file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum ReplayRecord {
    Body(BodyRecord),
    Barycentre {
        system_address: SystemAddress,
        body_id: BodyId,
        #[serde(default)]
        observation: BarycentreObservation,
    },
    SurfaceFeature {
        system_address: SystemAddress,
        feature: SurfaceFeature,
        #[serde(default)]
        body_id: Option<BodyId>,
    },
    Codex(CodexEntry),
    RemoteSignals {
        system_address: SystemAddress,
        signals: Vec<RemoteSignal>,
    },
    BodySignals {
        system_address: SystemAddress,
        body_id: BodyId,
        signals: Vec<BodySignal>,
    },
    Genuses {
        system_address: SystemAddress,
        body_id: BodyId,
        genuses: Vec<Genus>,
    },
    Organic {
        system_address: SystemAddress,
        scan: OrganicScan,
    },
}

/// What happened to the records of a replay.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayStats {
    pub records: usize,
    pub applied: usize,
    pub deferred: usize,
    pub rejected: usize,
    pub features: BTreeMap<String, usize>,
}

/// Feed every record from `reader` into `engine`.
///
/// Blank lines are skipped. A malformed line stops the replay; a record the
/// engine rejects is counted and logged.
pub fn replay<R: BufRead>(engine: &Engine, reader: R) -> Result<ReplayStats> {
    let mut stats = ReplayStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: ReplayRecord = serde_json::from_str(&line).map_err(|source| Error::Json {
            line: index + 1,
            source,
        })?;
        stats.records += 1;

        match apply(engine, record) {
            Ok(Intake::Applied(Some(outcome))) => {
                stats.applied += 1;
                *stats.features.entry(format!("{outcome:?}")).or_insert(0) += 1;
            }
            Ok(Intake::Applied(None)) => stats.applied += 1,
            Ok(Intake::Deferred) => stats.deferred += 1,
            Err(reason) => {
                warn!(line = index + 1, %reason, "record rejected");
                stats.rejected += 1;
            }
        }
    }

    debug!(records = stats.records, rejected = stats.rejected, "replay finished");
    Ok(stats)
}

fn apply(
    engine: &Engine,
    record: ReplayRecord,
) -> std::result::Result<Intake<Option<FeatureOutcome>>, RejectReason> {
    let done = Intake::Applied(None);
    Ok(match record {
        ReplayRecord::Body(body) => {
            engine.ingest_body(&body)?;
            done
        }
        ReplayRecord::Barycentre {
            system_address,
            body_id,
            observation,
        } => {
            if engine.ingest_barycentre(system_address, body_id, observation) {
                done
            } else {
                Intake::Deferred
            }
        }
        ReplayRecord::SurfaceFeature {
            system_address,
            feature,
            body_id,
        } => match engine.ingest_surface_feature(system_address, feature, body_id)? {
            Intake::Applied(outcome) => Intake::Applied(Some(outcome)),
            Intake::Deferred => Intake::Deferred,
        },
        ReplayRecord::Codex(entry) => erase(engine.ingest_catalog_entry(entry)?),
        ReplayRecord::RemoteSignals {
            system_address,
            signals,
        } => erase(engine.ingest_remote_signals(system_address, signals)),
        ReplayRecord::BodySignals {
            system_address,
            body_id,
            signals,
        } => erase(engine.ingest_body_signals(system_address, body_id, signals)?),
        ReplayRecord::Genuses {
            system_address,
            body_id,
            genuses,
        } => erase(engine.ingest_genuses(system_address, body_id, genuses)?),
        ReplayRecord::Organic {
            system_address,
            scan,
        } => erase(engine.ingest_organic_scan(system_address, scan)?),
    })
}

fn erase<T>(intake: Intake<T>) -> Intake<Option<FeatureOutcome>> {
    match intake {
        Intake::Applied(_) => Intake::Applied(None),
        Intake::Deferred => Intake::Deferred,
    }
}

/// Per-system totals printed after a replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemSummary {
    pub address: SystemAddress,
    pub name: String,
    pub nodes: usize,
    pub by_kind: BTreeMap<&'static str, usize>,
    pub codex_entries: usize,
    pub remote_signals: usize,
}

/// Summaries of every system in `engine`, in address order.
pub fn summarize(engine: &Engine) -> Vec<SystemSummary> {
    engine
        .systems()
        .into_iter()
        .filter_map(|address| {
            let handle = engine.snapshot(address)?;
            let registry = handle.lock();
            Some(SystemSummary {
                address,
                name: registry.name().to_owned(),
                nodes: registry.len(),
                by_kind: registry.count_by_kind(),
                codex_entries: registry.codex_entries().len(),
                remote_signals: registry.remote_signals().len(),
            })
        })
        .collect()
}

impl fmt::Display for SystemSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {} nodes", self.name, self.address, self.nodes)?;
        for (kind, count) in &self.by_kind {
            write!(f, ", {count} {kind}")?;
        }
        if self.codex_entries > 0 {
            write!(f, ", {} codex", self.codex_entries)?;
        }
        if self.remote_signals > 0 {
            write!(f, ", {} signals", self.remote_signals)?;
        }
        Ok(())
    }
}

impl fmt::Display for ReplayStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records: {} applied, {} deferred, {} rejected",
            self.records, self.applied, self.deferred, self.rejected
        )?;
        for (outcome, count) in &self.features {
            write!(f, "\n  surface {outcome}: {count}")?;
        }
        Ok(())
    }
}
