//! Identifiers and tags shared across the engine.

use serde::{Deserialize, Serialize};
use starmap_names::RootKind;

/// Stable numeric identity of a star system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemAddress(pub u64);

impl std::fmt::Display for SystemAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable numeric identity of a body within its system.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BodyId(pub u32);

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a node in its registry's arena.
///
/// Only meaningful together with the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Reference to a node returned from ingestion.
///
/// Two handles are equal exactly when they name the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    pub system: SystemAddress,
    pub node: NodeId,
}

/// What a node in the hierarchy represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A star at the top of the hierarchy.
    TopLevelStar,
    /// Common centre of mass of a group of bodies.
    Barycentre,
    /// Planet, moon or sub-star orbiting another node.
    PlanetMoonSubstar,
    /// Asteroid belt around a star.
    Belt,
    /// Cluster within a belt.
    BeltCluster,
    /// Planetary ring.
    Ring,
}

impl NodeKind {
    /// Kind of a first path segment.
    pub fn from_root(kind: RootKind) -> Self {
        match kind {
            RootKind::Star => NodeKind::TopLevelStar,
            RootKind::Barycentre => NodeKind::Barycentre,
        }
    }

    /// Short label for summaries and logs.
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::TopLevelStar => "star",
            NodeKind::Barycentre => "barycentre",
            NodeKind::PlanetMoonSubstar => "body",
            NodeKind::Belt => "belt",
            NodeKind::BeltCluster => "belt cluster",
            NodeKind::Ring => "ring",
        }
    }
}

/// Where a node's data came from, ordered by trust.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Placeholder created while walking a path to a deeper body.
    Synthesized,
    /// Backfilled from a remote catalog.
    Remote,
    /// Observed directly.
    #[default]
    Observed,
}

/// Coarse body class supplied with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyHint {
    Star,
    Planet,
    Ring,
    Barycentre,
    Unknown,
}

impl BodyHint {
    /// Whether bodies of this class sit at the top of the hierarchy.
    pub fn is_root_class(self) -> bool {
        matches!(self, BodyHint::Star | BodyHint::Barycentre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provenance_orders_by_trust() {
        assert!(Provenance::Synthesized < Provenance::Remote);
        assert!(Provenance::Remote < Provenance::Observed);
        assert_eq!(Provenance::default(), Provenance::Observed);
    }

    #[test]
    fn root_kind_mapping() {
        assert_eq!(NodeKind::from_root(RootKind::Star), NodeKind::TopLevelStar);
        assert_eq!(NodeKind::from_root(RootKind::Barycentre), NodeKind::Barycentre);
    }

    #[test]
    fn ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&BodyId(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&SystemAddress(10477373803)).unwrap(), "10477373803");
        assert_eq!(serde_json::to_string(&BodyHint::Planet).unwrap(), "\"planet\"");
    }
}
