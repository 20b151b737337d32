//! Per-body enrichment lists: detected signals, genuses, organic scans.

use crate::diagnostics::Diagnostic;
use crate::error::RejectReason;
use crate::records::{BodySignal, Genus, OrganicScan};
use crate::registry::SystemRegistry;
use crate::types::{BodyId, NodeId};
use crate::Context;

impl SystemRegistry {
    /// Replace the signal list of a body. The latest report wins.
    pub(crate) fn set_body_signals(
        &mut self,
        body: BodyId,
        signals: Vec<BodySignal>,
        ctx: &Context<'_>,
    ) -> Result<(), RejectReason> {
        let id = self.require(body, "body signals", ctx)?;
        self.node_mut(id).signals = Some(signals);
        Ok(())
    }

    /// Replace the genus list of a body.
    pub(crate) fn set_genuses(
        &mut self,
        body: BodyId,
        genuses: Vec<Genus>,
        ctx: &Context<'_>,
    ) -> Result<(), RejectReason> {
        let id = self.require(body, "genuses", ctx)?;
        self.node_mut(id).genuses = Some(genuses);
        Ok(())
    }

    /// Append an organic scan unless the same step is already recorded.
    pub(crate) fn add_organic_scan(
        &mut self,
        scan: OrganicScan,
        ctx: &Context<'_>,
    ) -> Result<bool, RejectReason> {
        let id = self.require(scan.body_id, "organic scan", ctx)?;
        let organics = self.node_mut(id).organics.get_or_insert_with(Vec::new);
        if organics.contains(&scan) {
            return Ok(false);
        }
        organics.push(scan);
        Ok(true)
    }

    fn require(
        &self,
        body: BodyId,
        record: &'static str,
        ctx: &Context<'_>,
    ) -> Result<NodeId, RejectReason> {
        self.locate(Some(body), None).ok_or_else(|| {
            ctx.sink.report(Diagnostic::DanglingReference {
                system: self.address(),
                record,
                body: body.to_string(),
            });
            RejectReason::DanglingReference {
                body: body.to_string(),
            }
        })
    }
}
