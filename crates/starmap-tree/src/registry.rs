//! Per-system node registry.

use std::collections::{BTreeMap, HashMap};

use crate::node::{same_name, BodyNode};
use crate::records::{BarycentreObservation, CodexEntry, RemoteSignal};
use crate::types::{BodyId, NodeId, NodeKind, SystemAddress};

/// The hierarchy of one star system.
///
/// Nodes live in an arena and refer to each other by [`NodeId`]; roots are
/// kept in own-name order and identifiers are indexed as they become known.
/// A registry is created by the first body record of its system and lives
/// for the rest of the session.
#[derive(Debug, Clone)]
pub struct SystemRegistry {
    address: SystemAddress,
    name: String,
    pub(crate) nodes: Vec<BodyNode>,
    pub(crate) roots: BTreeMap<String, NodeId>,
    pub(crate) by_body_id: HashMap<BodyId, NodeId>,
    pub(crate) barycentres: BTreeMap<BodyId, BarycentreObservation>,
    pub(crate) codex: Vec<CodexEntry>,
    pub(crate) remote_signals: Vec<RemoteSignal>,
}

impl SystemRegistry {
    /// Create an empty registry.
    pub fn new(address: SystemAddress, name: impl Into<String>) -> Self {
        Self {
            address,
            name: name.into(),
            nodes: Vec::new(),
            roots: BTreeMap::new(),
            by_body_id: HashMap::new(),
            barycentres: BTreeMap::new(),
            codex: Vec::new(),
            remote_signals: Vec::new(),
        }
    }

    pub fn address(&self) -> SystemAddress {
        self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by arena id.
    pub fn node(&self, id: NodeId) -> Option<&BodyNode> {
        self.nodes.get(id.index())
    }

    /// Get a node by body identifier.
    pub fn node_by_body_id(&self, body: BodyId) -> Option<&BodyNode> {
        self.by_body_id.get(&body).and_then(|id| self.node(*id))
    }

    /// First node whose designator equals `full_name`.
    pub fn node_by_full_name(&self, full_name: &str) -> Option<&BodyNode> {
        self.nodes.iter().find(|n| same_name(&n.full_name, full_name))
    }

    /// Root nodes in own-name order.
    pub fn roots(&self) -> impl Iterator<Item = &BodyNode> + '_ {
        self.roots.values().filter_map(|id| self.node(*id))
    }

    pub fn root(&self, own_name: &str) -> Option<&BodyNode> {
        self.roots.get(own_name).and_then(|id| self.node(*id))
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &BodyNode> + '_ {
        self.nodes.iter()
    }

    /// Children of a node in own-name order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &BodyNode> + '_ {
        self.node(id)
            .into_iter()
            .flat_map(|n| n.children())
            .filter_map(|child| self.node(child))
    }

    /// Follow own-name segments from the roots.
    pub fn find_by_path<S: AsRef<str>>(&self, segments: &[S]) -> Option<&BodyNode> {
        let (first, rest) = segments.split_first()?;
        let mut current = *self.roots.get(first.as_ref())?;
        for segment in rest {
            current = self.node(current)?.child(segment.as_ref())?;
        }
        self.node(current)
    }

    /// Ids from `id` up to its root, inclusive.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.node(id);
        while let Some(node) = current {
            path.push(node.id);
            current = node.parent.and_then(|p| self.node(p));
        }
        path
    }

    /// Pre-order walk of the whole tree, roots and children in name order.
    pub fn depth_first(&self) -> DepthFirst<'_> {
        let mut stack: Vec<NodeId> = self.roots.values().copied().collect();
        stack.reverse();
        DepthFirst {
            registry: self,
            stack,
        }
    }

    /// Number of nodes of each kind.
    pub fn count_by_kind(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for node in &self.nodes {
            *counts.entry(node.kind.label()).or_insert(0) += 1;
        }
        counts
    }

    /// Latest observation of a barycentre.
    pub fn barycentre(&self, id: BodyId) -> Option<&BarycentreObservation> {
        self.barycentres.get(&id)
    }

    pub fn barycentres(&self) -> impl Iterator<Item = (BodyId, &BarycentreObservation)> + '_ {
        self.barycentres.iter().map(|(id, obs)| (*id, obs))
    }

    pub fn codex_entries(&self) -> &[CodexEntry] {
        &self.codex
    }

    pub fn remote_signals(&self) -> &[RemoteSignal] {
        &self.remote_signals
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut BodyNode {
        &mut self.nodes[id.index()]
    }

    /// Child of `parent` (or root when `parent` is `None`) with `own_name`.
    pub(crate) fn child_of(&self, parent: Option<NodeId>, own_name: &str) -> Option<NodeId> {
        match parent {
            Some(p) => self.node(p)?.child(own_name),
            None => self.roots.get(own_name).copied(),
        }
    }

    /// Link a new placeholder node under `parent`.
    pub(crate) fn add_node(
        &mut self,
        parent: Option<NodeId>,
        own_name: &str,
        full_name: String,
        kind: NodeKind,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let level = match parent {
            Some(p) => self.node_mut(p).level + 1,
            None => 0,
        };
        self.nodes
            .push(BodyNode::new(id, parent, own_name, full_name, kind, level));
        match parent {
            Some(p) => {
                self.node_mut(p).children.insert(own_name.to_owned(), id);
            }
            None => {
                self.roots.insert(own_name.to_owned(), id);
            }
        }
        id
    }

    /// Node a surface or enrichment record refers to.
    pub(crate) fn locate(&self, body: Option<BodyId>, body_name: Option<&str>) -> Option<NodeId> {
        body.and_then(|b| self.by_body_id.get(&b).copied()).or_else(|| {
            let name = body_name?;
            self.nodes.iter().find(|n| n.answers_to(name)).map(|n| n.id)
        })
    }
}

/// Pre-order iterator over a registry.
pub struct DepthFirst<'a> {
    registry: &'a SystemRegistry,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a BodyNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.registry.node(id)?;
        self.stack.extend(node.children.values().rev().copied());
        Some(node)
    }
}
