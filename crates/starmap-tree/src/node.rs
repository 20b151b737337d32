//! Body nodes.

use std::collections::BTreeMap;

use crate::records::{
    BodySignal, Genus, OrganicScan, ParentLink, RingData, ScanDetail, SurfaceFeature,
};
use crate::types::{BodyId, NodeId, NodeKind, Provenance};

/// One body, belt, belt cluster or ring in a system tree.
///
/// Children are owned through the registry arena and keyed by their own
/// name; the parent link is a plain index used for upward walks.
#[derive(Debug, Clone)]
pub struct BodyNode {
    pub(crate) id: NodeId,
    pub(crate) kind: NodeKind,
    pub(crate) full_name: String,
    pub(crate) own_name: String,
    pub(crate) level: usize,
    pub(crate) custom_name: Option<String>,
    pub(crate) body_id: Option<BodyId>,
    pub(crate) provenance: Provenance,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: BTreeMap<String, NodeId>,
    pub(crate) detail: Option<ScanDetail>,
    pub(crate) ring_data: Option<RingData>,
    pub(crate) signals: Option<Vec<BodySignal>>,
    pub(crate) genuses: Option<Vec<Genus>>,
    pub(crate) organics: Option<Vec<OrganicScan>>,
    pub(crate) surface_features: Vec<SurfaceFeature>,
}

impl BodyNode {
    pub(crate) fn new(
        id: NodeId,
        parent: Option<NodeId>,
        own_name: &str,
        full_name: String,
        kind: NodeKind,
        level: usize,
    ) -> Self {
        Self {
            id,
            kind,
            full_name,
            own_name: own_name.to_owned(),
            level,
            custom_name: None,
            body_id: None,
            provenance: Provenance::Synthesized,
            parent,
            children: BTreeMap::new(),
            detail: None,
            ring_data: None,
            signals: None,
            genuses: None,
            organics: None,
            surface_features: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Full designator: system name followed by the path.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Path segment distinguishing this node from its siblings.
    pub fn own_name(&self) -> &str {
        &self.own_name
    }

    /// Depth below the roots (roots are level 0).
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn custom_name(&self) -> Option<&str> {
        self.custom_name.as_deref()
    }

    /// Custom name if the body has one, otherwise the designator.
    pub fn display_name(&self) -> &str {
        self.custom_name.as_deref().unwrap_or(&self.full_name)
    }

    pub fn body_id(&self) -> Option<BodyId> {
        self.body_id
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Children in own-name order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }

    pub fn child(&self, own_name: &str) -> Option<NodeId> {
        self.children.get(own_name).copied()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn detail(&self) -> Option<&ScanDetail> {
        self.detail.as_ref()
    }

    /// Ancestry path from the scan detail, nearest parent first.
    pub fn ancestry(&self) -> &[ParentLink] {
        self.detail.as_ref().map(|d| d.parents.as_slice()).unwrap_or_default()
    }

    pub fn ring_data(&self) -> Option<&RingData> {
        self.ring_data.as_ref()
    }

    pub fn signals(&self) -> Option<&[BodySignal]> {
        self.signals.as_deref()
    }

    pub fn genuses(&self) -> Option<&[Genus]> {
        self.genuses.as_deref()
    }

    pub fn organics(&self) -> Option<&[OrganicScan]> {
        self.organics.as_deref()
    }

    pub fn surface_features(&self) -> &[SurfaceFeature] {
        &self.surface_features
    }

    /// Whether a record has ever been resolved to this node.
    pub fn is_placeholder(&self) -> bool {
        self.provenance == Provenance::Synthesized
    }

    /// Whether a record called `name` could be describing this node.
    pub(crate) fn answers_to(&self, name: &str) -> bool {
        same_name(&self.full_name, name)
            || same_name(&self.own_name, name)
            || self.custom_name.as_deref().is_some_and(|c| same_name(c, name))
    }
}

/// Names compare with whitespace runs collapsed. Case is significant:
/// `Sol A 1 A` and `Sol A 1 a` are different bodies.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.split_whitespace().eq(b.split_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(own: &str, full: &str) -> BodyNode {
        BodyNode::new(NodeId(0), None, own, full.to_owned(), NodeKind::PlanetMoonSubstar, 1)
    }

    #[test]
    fn new_nodes_are_placeholders() {
        let n = node("3", "Sol 3");
        assert!(n.is_placeholder());
        assert_eq!(n.display_name(), "Sol 3");
        assert!(n.ancestry().is_empty());
    }

    #[test]
    fn answers_to_full_own_and_custom_names() {
        let mut n = node("3", "Sol 3");
        assert!(n.answers_to("Sol 3"));
        assert!(n.answers_to("Sol  3"));
        assert!(!n.answers_to("sol 3"));
        assert!(n.answers_to("3"));
        assert!(!n.answers_to("Earth"));

        n.custom_name = Some("Earth".to_owned());
        assert!(n.answers_to("Earth"));
        assert_eq!(n.display_name(), "Earth");
    }
}
