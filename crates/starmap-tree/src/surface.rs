//! Surface feature reconciliation.
//!
//! Approach, touchdown and docking records often describe the same patch of
//! ground. Features on a node are matched by name first and by coordinate
//! proximity second, and the richer record is kept.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::error::RejectReason;
use crate::records::{within, FeatureKind, SurfaceFeature};
use crate::registry::SystemRegistry;
use crate::types::{BodyId, NodeId};
use crate::Context;

/// What happened to a surface feature record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureOutcome {
    /// Stored as a new feature.
    Added,
    /// Moved the coordinates of the feature with the same name.
    Updated,
    /// Repeated report of a known feature.
    Unchanged,
    /// Took the place of a matching feature.
    Replaced,
    /// Removed a nearby touchdown and was stored in its place.
    Superseded,
    /// Touchdown at a location a richer feature already covers.
    Covered,
    /// Docking with no earlier report of the station.
    Dropped,
}

impl SystemRegistry {
    /// Merge a surface feature into the features of the body it lies on.
    ///
    /// `body` overrides the feature's own body id, as docking records carry
    /// it separately.
    pub(crate) fn reconcile_feature(
        &mut self,
        feature: SurfaceFeature,
        body: Option<BodyId>,
        ctx: &Context<'_>,
    ) -> Result<FeatureOutcome, RejectReason> {
        let body = body.or(feature.body_id);
        let Some(id) = self.locate(body, feature.body_name.as_deref()) else {
            let reference = match (body, &feature.body_name) {
                (Some(b), _) => b.to_string(),
                (None, Some(name)) => name.clone(),
                (None, None) => "<unnamed>".to_owned(),
            };
            ctx.sink.report(Diagnostic::DanglingReference {
                system: self.address(),
                record: "surface feature",
                body: reference.clone(),
            });
            return Err(RejectReason::DanglingReference { body: reference });
        };

        let outcome = match feature.kind {
            FeatureKind::ApproachSettlement => self.add_approach(id, feature, ctx),
            FeatureKind::Touchdown => self.add_touchdown(id, feature, ctx),
            FeatureKind::Docking => self.add_docking(id, feature, ctx),
        };
        debug!(system = %self.address(), node = ?id, ?outcome, "surface feature reconciled");
        Ok(outcome)
    }

    fn add_approach(&mut self, id: NodeId, feature: SurfaceFeature, ctx: &Context<'_>) -> FeatureOutcome {
        let features = &mut self.node_mut(id).surface_features;

        if let Some(existing) = features.iter_mut().find(|f| f.same_name(&feature)) {
            return match (existing.coordinates(), feature.coordinates()) {
                (Some(old), Some(new)) if within(old, new, ctx.config.approach_update_tolerance_deg) => {
                    FeatureOutcome::Unchanged
                }
                (_, Some(new)) => {
                    existing.set_coordinates(new);
                    FeatureOutcome::Updated
                }
                (_, None) => FeatureOutcome::Unchanged,
            };
        }

        let tolerance = ctx.config.proximity_tolerance_deg;
        if let Some(pos) = features.iter().position(|f| f.is_near(&feature, tolerance)) {
            if features[pos].kind == FeatureKind::Touchdown {
                features[pos] = feature;
                return FeatureOutcome::Superseded;
            }
        }

        features.push(feature);
        FeatureOutcome::Added
    }

    fn add_touchdown(&mut self, id: NodeId, feature: SurfaceFeature, ctx: &Context<'_>) -> FeatureOutcome {
        let tolerance = ctx.config.proximity_tolerance_deg;
        let features = &mut self.node_mut(id).surface_features;

        let matched = features
            .iter()
            .position(|f| f.is_near(&feature, tolerance))
            .or_else(|| features.iter().position(|f| f.same_name(&feature)));

        match matched {
            None => {
                features.push(feature);
                FeatureOutcome::Added
            }
            Some(pos) if features[pos].kind == FeatureKind::Touchdown => {
                features[pos] = feature;
                FeatureOutcome::Replaced
            }
            Some(_) => FeatureOutcome::Covered,
        }
    }

    fn add_docking(&mut self, id: NodeId, mut feature: SurfaceFeature, ctx: &Context<'_>) -> FeatureOutcome {
        let address = self.address();
        let features = &mut self.node_mut(id).surface_features;

        match features.iter().position(|f| f.same_name(&feature)) {
            Some(pos) => {
                feature.inherit_from(&features[pos]);
                features[pos] = feature;
                FeatureOutcome::Replaced
            }
            None => {
                ctx.sink.report(Diagnostic::UnmatchedDocking {
                    system: address,
                    station: feature.name.unwrap_or_default(),
                });
                FeatureOutcome::Dropped
            }
        }
    }
}
